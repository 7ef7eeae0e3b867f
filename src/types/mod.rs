//! Shared HTTP types.

mod patch;
mod response;

pub use patch::double_option;
pub use response::{Created, NoContent};

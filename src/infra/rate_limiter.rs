//! Redis-backed fixed-window rate limiter.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};

use crate::config::RATE_LIMIT_KEY_PREFIX;
use crate::errors::{AppError, AppResult};

/// Outcome of one rate limit check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitDecision {
    /// Requests seen in the current window, including this one
    pub count: u64,
    pub allowed: bool,
}

impl RateLimitDecision {
    pub fn new(count: u64, max_requests: u64) -> Self {
        Self {
            count,
            allowed: count <= max_requests,
        }
    }

    pub fn remaining(&self, max_requests: u64) -> u64 {
        max_requests.saturating_sub(self.count)
    }
}

/// Counts requests per identifier in Redis.
#[derive(Clone)]
pub struct RateLimiter {
    connection: ConnectionManager,
}

impl RateLimiter {
    /// Connect to Redis, returning an error instead of panicking.
    pub async fn connect(redis_url: &str) -> Result<Self, RedisError> {
        let client = Client::open(redis_url)?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!("Redis rate limiter connected");

        Ok(Self { connection })
    }

    /// Count one request for `identifier` in the current window.
    ///
    /// The counter key expires `window_seconds` after the first request.
    pub async fn check(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<RateLimitDecision> {
        let key = format!("{}{}", RATE_LIMIT_KEY_PREFIX, identifier);
        let mut conn = self.connection.clone();

        let count: u64 = conn.incr(&key, 1u64).await.map_err(redis_error)?;
        if count == 1 {
            let _: () = conn
                .expire(&key, window_seconds as i64)
                .await
                .map_err(redis_error)?;
        }

        Ok(RateLimitDecision::new(count, max_requests))
    }

    /// Check Redis connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_error)?;
        Ok(())
    }
}

fn redis_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Rate limiter error: {}", e))
}

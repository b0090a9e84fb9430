use crate::errors::AppError;
use axum::http::HeaderMap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use std::{num::NonZeroU32, sync::Arc};

pub fn content_length_ok(headers: &HeaderMap, max_kb: usize) -> Result<(), AppError> {
    if let Some(len) = headers
        .get(axum::http::header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse::<usize>().ok())
    {
        if len > max_kb * 1024 {
            return Err(AppError::RequestTooLarge);
        }
    }
    Ok(())
}

/// Process-wide request budget shared by every HTTP caller.
#[derive(Clone)]
pub struct RateLimiters {
    global: Arc<DefaultDirectRateLimiter>,
}

impl RateLimiters {
    pub fn new(per_second: u32, burst: u32) -> Self {
        let rate = NonZeroU32::new(per_second).unwrap_or(nonzero!(1u32));
        let burst = NonZeroU32::new(burst).unwrap_or(rate);
        Self { global: Arc::new(RateLimiter::direct(Quota::per_second(rate).allow_burst(burst))) }
    }

    pub fn check(&self) -> Result<(), AppError> {
        self.global.check().map_err(|_| AppError::RateLimited)
    }
}

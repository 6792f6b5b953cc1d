//! HTTP client module
//!
//! Provides the HTTP transport with retry, rate limiting, and backoff.
//!
//! # Features
//!
//! - **Automatic Retries**: 429 honours `Retry-After`, 5xx and timeouts back off
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Authentication**: Bearer tokens from the auth module

mod client;
mod rate_limit;

pub use client::{
    path_and_query, ApiResponse, HttpClient, HttpClientConfig, HttpClientConfigBuilder,
    RequestConfig, DEFAULT_BASE_URL, USER_AGENT,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};

#[cfg(test)]
mod tests;

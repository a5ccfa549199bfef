//! Shared outbound HTTP client
//!
//! `reqwest::Client` keeps a connection pool internally and clones are handles
//! to the same pool, so one client is built per process and cloned into every
//! component. Per-call deadlines are applied by the callers.

use std::time::Duration;

const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const POOL_MAX_IDLE_PER_HOST: usize = 32;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

pub fn build_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .pool_idle_timeout(POOL_IDLE_TIMEOUT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .connect_timeout(CONNECT_TIMEOUT)
        .build()
}

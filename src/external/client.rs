use std::time::Duration;

/// User-Agent sent by outbound gateway requests
const USER_AGENT: &str = concat!("fusion-notify/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client used by HTTP-based channel transports.
///
/// Each transport owns its client so request timeouts follow that channel's
/// configuration; connections are still pooled per client.
///
/// # Example
/// ```no_run
/// use std::time::Duration;
/// use fusion_notify::external::build_http_client;
///
/// let client = build_http_client(Duration::from_secs(10)).expect("client");
/// ```
pub fn build_http_client(timeout: Duration) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        // Timeouts
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        // Connection pooling
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(USER_AGENT)
        .build()
}

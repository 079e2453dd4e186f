//! Per-client rate limits.
//!
//! Starting a quiz costs one question generation call, so `start` is limited
//! per client IP. The client IP is taken from `X-Forwarded-For`, `X-Real-IP`
//! or `Forwarded` when present, else from the peer address; the server must be
//! served with `into_make_service_with_connect_info::<SocketAddr>()`.

/// Seconds needed to earn back one quiz start.
pub const START_REPLENISH_SECONDS: u64 = 2;
/// Quiz starts allowed back to back before limiting kicks in.
pub const START_BURST_SIZE: u32 = 10;

/// Build a `tower_governor` layer keyed on the client IP.
///
/// Replenishes one request every `$replenish_secs` seconds, up to `$burst`.
/// Expands in place because the layer type is too unwieldy to name.
#[macro_export]
macro_rules! make_rate_limit_layer {
    ($replenish_secs:expr, $burst:expr) => {{
        let config = ::tower_governor::governor::GovernorConfigBuilder::default()
            .key_extractor(::tower_governor::key_extractor::SmartIpKeyExtractor)
            .per_second($replenish_secs)
            .burst_size($burst)
            .use_headers()
            .finish()
            .expect("rate limit period and burst size must be non-zero");

        ::tower_governor::GovernorLayer::new(config)
    }};
}

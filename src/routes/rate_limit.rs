use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::{extract::ConnectInfo, http::Request, Router};
use tower_governor::{
    governor::GovernorConfigBuilder, key_extractor::KeyExtractor, GovernorError, GovernorLayer,
};

use crate::common::AppState;
use crate::config::Config;

/// Client IP for rate limiting.
/// Tries X-Forwarded-For, X-Real-IP, then the peer address, then localhost.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackIpKeyExtractor;

impl KeyExtractor for FallbackIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let header_ip = |name: &str| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|v| v.trim().parse::<IpAddr>().ok())
        };

        if let Some(ip) = header_ip("x-forwarded-for").or_else(|| header_ip("x-real-ip")) {
            return Ok(ip);
        }

        if let Some(ConnectInfo(peer)) = req.extensions().get::<ConnectInfo<SocketAddr>>() {
            return Ok(peer.ip());
        }

        // Requests without an identifiable client share one bucket
        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    }
}

/// Wrap the chart routes in a per-IP limiter.
///
/// Chart rendering is the only CPU heavy endpoint; everything else only
/// proxies the sensor API. Returns the routes unchanged when limiting is
/// disabled or the configured quota is unusable (zero rate or burst).
pub fn limit_chart_routes(routes: Router<AppState>, config: &Config) -> Router<AppState> {
    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
        return routes;
    }

    let Some(limiter) = GovernorConfigBuilder::default()
        .key_extractor(FallbackIpKeyExtractor)
        .per_second(config.rate_limit_chart_per_second)
        .burst_size(config.rate_limit_chart_burst)
        .finish()
    else {
        tracing::error!(
            per_second = config.rate_limit_chart_per_second,
            burst = config.rate_limit_chart_burst,
            "Invalid chart rate limit, serving charts without limiting"
        );
        return routes;
    };

    tracing::info!(
        per_second = config.rate_limit_chart_per_second,
        burst = config.rate_limit_chart_burst,
        "Rate limiting configured"
    );

    routes.layer(GovernorLayer {
        config: Arc::new(limiter),
    })
}

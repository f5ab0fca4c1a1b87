mod metrics;

pub use metrics::HitCounter;
pub use metrics::MetricsMiddleware;

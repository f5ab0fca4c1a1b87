/// File-server hit metrics
///
/// Counts requests passing through the `/app` static mount. The counter is
/// the only shared mutable in-process state in the application; it is read
/// by the admin metrics page and zeroed by the admin reset endpoint.

use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Shared hit counter, registered as app data.
#[derive(Default)]
pub struct HitCounter(AtomicU32);

impl HitCounter {
    pub fn increment(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn value(&self) -> u32 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.0.store(0, Ordering::Relaxed);
    }
}

/// Middleware incrementing the hit counter on every request it wraps.
pub struct MetricsMiddleware {
    hits: web::Data<HitCounter>,
}

impl MetricsMiddleware {
    pub fn new(hits: web::Data<HitCounter>) -> Self {
        Self { hits }
    }
}

impl<S, B> Transform<S, ServiceRequest> for MetricsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = MetricsMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(MetricsMiddlewareService {
            service: Rc::new(service),
            hits: self.hits.clone(),
        }))
    }
}

pub struct MetricsMiddlewareService<S> {
    service: Rc<S>,
    hits: web::Data<HitCounter>,
}

impl<S, B> Service<ServiceRequest> for MetricsMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        self.hits.increment();

        let service = self.service.clone();
        Box::pin(async move { service.call(req).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increments_and_resets() {
        let counter = HitCounter::default();
        assert_eq!(counter.value(), 0);

        counter.increment();
        counter.increment();
        assert_eq!(counter.value(), 2);

        counter.reset();
        assert_eq!(counter.value(), 0);
    }
}

//! Request logging middleware
//!
//! Every request gets a UUID, echoed in the `x-request-id` response header and
//! attached to a tracing span together with method, path, status and latency.

use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::Error;
use futures::future::{ready, LocalBoxFuture, Ready};
use tracing::{info, warn, Instrument};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Middleware factory; wrap the app with `.wrap(RequestLogger)`
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let request_id = Uuid::new_v4();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let span = tracing::info_span!("request", request_id = %request_id, method = %method, path = %path);
        let started = Instant::now();
        let fut = self.service.call(req);

        Box::pin(
            async move {
                let mut res = fut.await?;
                let status = res.status().as_u16();
                let elapsed_ms = started.elapsed().as_millis() as u64;

                if res.status().is_server_error() {
                    warn!(status = status, elapsed_ms = elapsed_ms, "Request failed");
                } else {
                    info!(status = status, elapsed_ms = elapsed_ms, "Request completed");
                }

                if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                    res.headers_mut()
                        .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                }
                Ok(res)
            }
            .instrument(span),
        )
    }
}

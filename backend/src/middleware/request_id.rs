//! Request correlation middleware.
//!
//! Every request runs with a [`CorrelationId`] in task-local scope. A
//! non-blank `X-Request-ID` header is reused verbatim; otherwise a fresh
//! UUID is generated. Inbound bytes that are not UTF-8 are decoded lossily
//! for the scoped id, while the response echoes the original header bytes. The id is echoed on every response and recorded on the
//! request span, so logs and error bodies carry the same value.
//!
//! Tokio task-local variables are not inherited across spawned tasks. Wrap
//! spawned work in [`CorrelationId::scope`] to keep the id.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{Instrument, error, info_span};

use crate::domain::{CorrelationId, REQUEST_ID_HEADER};

/// Middleware binding a correlation id to each request and adding an
/// `X-Request-ID` header to every response.
///
/// Register it outermost so every other layer sees the id.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use auth_backend::RequestId;
///
/// let app = App::new().wrap(RequestId);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestId;

impl<S, B> Transform<S, ServiceRequest> for RequestId
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestIdMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddleware { service }))
    }
}

/// Service wrapper produced by [`RequestId`].
pub struct RequestIdMiddleware<S> {
    service: S,
}

/// The inbound header and its decoded text, when present and not blank.
fn inbound_id(req: &ServiceRequest) -> Option<(HeaderValue, String)> {
    let value = req.headers().get(REQUEST_ID_HEADER)?;
    let text = String::from_utf8_lossy(value.as_bytes()).into_owned();
    (!text.trim().is_empty()).then(|| (value.clone(), text))
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddleware<S>
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
        let inbound = inbound_id(&req);
        let request_id = CorrelationId::begin(inbound.as_ref().map(|(_, text)| text.as_str()));
        let echoed = match inbound {
            Some((value, _)) => Ok(value),
            None => HeaderValue::from_str(request_id.as_str()),
        };
        let span = info_span!(
            "request",
            request_id = %request_id,
            method = %req.method(),
            path = %req.path(),
        );
        let fut = CorrelationId::sync_scope(request_id.clone(), || self.service.call(req));
        let scoped = request_id.clone();
        Box::pin(CorrelationId::scope(
            scoped,
            async move {
                let mut res = fut.await?;
                match echoed {
                    Ok(value) => {
                        res.response_mut()
                            .headers_mut()
                            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
                    }
                    Err(error) => {
                        error!(
                            %error,
                            request_id = %request_id,
                            "failed to encode request identifier header"
                        );
                    }
                }
                Ok(res)
            }
            .instrument(span),
        ))
    }
}

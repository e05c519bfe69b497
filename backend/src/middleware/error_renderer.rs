//! Error body middleware.
//!
//! Handlers and extractors fail with bare statuses; this layer replaces each
//! failed response with the rendered error body. [`ApiError`]s are rendered
//! as classified. Any other framework error is classified first, so
//! malformed payloads become `BAD_REQUEST` and the rest become internal
//! errors.
//!
//! Register it inside [`crate::RequestId`] so bodies carry the request id.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::{BoxBody, EitherBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{Error, HttpResponse};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::inbound::http::error::ApiError;
use crate::inbound::http::render::{RenderConfig, render};

/// Middleware rendering error bodies with a fixed [`RenderConfig`].
///
/// # Examples
/// ```
/// use actix_web::App;
/// use auth_backend::inbound::http::render::RenderConfig;
/// use auth_backend::{ErrorRenderer, RequestId};
///
/// let app = App::new()
///     .wrap(ErrorRenderer::new(RenderConfig::default()))
///     .wrap(RequestId);
/// ```
#[derive(Clone, Debug)]
pub struct ErrorRenderer {
    config: Rc<RenderConfig>,
}

impl ErrorRenderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config: Rc::new(config),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for ErrorRenderer
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type InitError = ();
    type Transform = ErrorRendererMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ErrorRendererMiddleware {
            service,
            config: Rc::clone(&self.config),
        }))
    }
}

/// Service wrapper produced by [`ErrorRenderer`].
pub struct ErrorRendererMiddleware<S> {
    service: S,
    config: Rc<RenderConfig>,
}

fn render_failure(err: &Error, config: &RenderConfig, path: &str) -> HttpResponse {
    match err.as_error::<ApiError>() {
        Some(api) => render(api, config, path),
        None => render(&ApiError::from_framework(err), config, path),
    }
}

impl<S, B> Service<ServiceRequest> for ErrorRendererMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<EitherBody<B, BoxBody>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let config = Rc::clone(&self.config);
        let http_req = req.request().clone();
        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(res) => {
                    let rendered = res
                        .response()
                        .error()
                        .map(|err| render_failure(err, &config, res.request().path()));
                    Ok(match rendered {
                        Some(body) => res.into_response(body).map_into_right_body(),
                        None => res.map_into_left_body(),
                    })
                }
                Err(err) => {
                    let body = render_failure(&err, &config, http_req.path());
                    Ok(ServiceResponse::new(http_req, body).map_into_right_body())
                }
            }
        })
    }
}

//! Application assembly shared by the server binary and integration tests.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::{DomainError, ErrorCode};
use crate::middleware::{ErrorRenderer, RequestId};

use super::error::ApiError;
use super::health::{HealthState, live, ready};
use super::render::RenderConfig;
use super::state::HttpState;
use super::users;

/// Everything a worker needs to build its [`App`].
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub render: RenderConfig,
}

async fn unmatched_route() -> Result<HttpResponse, ApiError> {
    Err(DomainError::not_found(ErrorCode::ResourceNotFound).into())
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        ApiError::MalformedBody {
            detail: err.to_string(),
        }
        .into()
    })
}

/// Build the application with correlation and error rendering installed.
///
/// `RequestId` wraps everything, so error bodies rendered by
/// `ErrorRenderer` see the same id as the response header.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        render,
    } = deps;

    let api = web::scope("/api/v1").configure(users::configure);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(json_config())
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.default_service(web::to(unmatched_route))
        .wrap(ErrorRenderer::new(render))
        .wrap(RequestId)
}

use crate::state::AppState;
use crate::{api, auth, logging};
use axum::http::{header, HeaderValue, Method};
use axum::middleware;
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "aquamon API",
        description = "Sensor threshold configuration and admin account REST API",
    ),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Auth", description = "Authentication"),
        (name = "Thresholds", description = "Sensor alert threshold configuration"),
        (name = "Admins", description = "Admin account management (superadmin only)")
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

/// Cross-origin policy. A configured allow-list grants exactly those
/// origins; an empty list mirrors whatever origin asks (development
/// default). Credentials are permitted either way, which is why the
/// permissive form mirrors instead of using a wildcard.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origin = if allowed_origins.is_empty() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(
            allowed_origins
                .iter()
                .filter_map(|o| o.parse::<HeaderValue>().ok()),
        )
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}

pub fn build_http_app(state: AppState) -> Router {
    let (public_router, public_spec) = api::public_routes().split_for_parts();
    let (login_router, login_spec) = api::auth_routes().split_for_parts();
    let (protected_router, protected_spec) = api::protected_routes().split_for_parts();
    let (admin_router, admin_spec) = api::admin_routes().split_for_parts();

    let mut spec = ApiDoc::openapi();
    spec.merge(public_spec);
    spec.merge(login_spec);
    spec.merge(protected_spec);
    spec.merge(admin_spec);

    let cors = cors_layer(&state.config.cors_allowed_origins);

    public_router
        .merge(login_router)
        .merge(protected_router.layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        )))
        .merge(
            admin_router
                .layer(middleware::from_fn(auth::require_superadmin))
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    auth::auth_middleware,
                )),
        )
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", spec))
        .layer(cors)
        .layer(middleware::from_fn(logging::request_logging))
}

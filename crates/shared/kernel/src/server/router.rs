use super::health::{__path_up_handler, up_handler};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes outside the API key guard: the `/up` liveness probe.
pub fn system_router<S: Clone + Send + Sync + 'static>() -> OpenApiRouter<S> {
    OpenApiRouter::new().routes(routes!(up_handler))
}

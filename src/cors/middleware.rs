//! Axum host for the CORS filter.
//!
//! Runs the before phase, routes (unless short-circuited or aborted), then
//! runs the after phase on whichever response came out. The router must be
//! wrapped so this runs ahead of route matching; see [`pre_routing`].

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::cors::filter::{Admission, CorsFilter};

pub async fn cors_middleware(
    State(filter): State<Arc<CorsFilter>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let (mut response, context) = match filter.before_routing(req.method(), req.headers()) {
        Admission::Continue(context) => {
            // Visible to handlers as `Extension<CorsContext>`.
            req.extensions_mut().insert(context.clone());
            (next.run(req).await, context)
        }
        Admission::ShortCircuit(response, context) => (response, context),
        Admission::Abort(rejection, context) => (rejection.into_response(), context),
    };

    filter.after_response(&context, response.headers_mut());
    response
}

/// Wrap `routes` so the CORS filter sees every request before matching.
pub fn pre_routing(routes: Router, filter: CorsFilter) -> Router {
    Router::new()
        .fallback_service(routes)
        .layer(middleware::from_fn_with_state(Arc::new(filter), cors_middleware))
}

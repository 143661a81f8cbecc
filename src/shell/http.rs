use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::modules::reservations::use_cases::cancel_reservation::inbound::http as cancel_http;
use crate::modules::reservations::use_cases::check_availability::inbound::http as availability_http;
use crate::modules::reservations::use_cases::confirm_reservation::inbound::http as confirm_http;
use crate::modules::reservations::use_cases::create_pending_reservation::inbound::http as reserve_http;
use crate::modules::reservations::use_cases::pay_for_reservation::inbound::http as pay_http;
use crate::modules::reservations::use_cases::price_reservation::inbound::http as quote_http;
use crate::shell::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/availability", get(availability_http::handle))
        .route("/quotes", post(quote_http::handle))
        .route("/reservations", post(reserve_http::handle))
        .route("/reservations/{id}/payments", post(pay_http::handle))
        .route("/reservations/{id}/confirm", post(confirm_http::handle))
        .route("/reservations/{id}/cancel", post(cancel_http::handle))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod router_tests {
    use super::*;
    use crate::tests::fixtures::world::World;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn it_should_not_route_unknown_paths() {
        let world = World::new();
        let response = router(world.state())
            .oneshot(Request::get("/rooms").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn it_should_reject_the_wrong_verb_on_a_known_path() {
        let world = World::new();
        let response = router(world.state())
            .oneshot(Request::get("/reservations").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

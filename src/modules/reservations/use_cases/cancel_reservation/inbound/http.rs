use axum::{
    Json,
    extract::{Path, State},
    response::IntoResponse,
};

use crate::shared::core::primitives::ReservationId;
use crate::shell::state::AppState;

pub async fn handle(
    State(state): State<AppState>,
    Path(reservation_id): Path<ReservationId>,
) -> impl IntoResponse {
    match state.cancel_reservation.handle(reservation_id).await {
        Ok(reservation) => Json(reservation).into_response(),
        Err(error) => error.into_response(),
    }
}

#[cfg(test)]
mod cancel_reservation_http_inbound_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::post,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::shell::state::AppState;
    use crate::tests::fixtures::world::World;

    use super::handle;

    fn app(state: AppState) -> Router {
        Router::new()
            .route("/reservations/{id}/cancel", post(handle))
            .with_state(state)
    }

    #[tokio::test]
    async fn it_should_return_200_with_the_cancelled_reservation() {
        let world = World::new();
        let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
        let response = app(world.state())
            .oneshot(
                Request::post(format!("/reservations/{}/cancel", reservation.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "cancelled");
    }

    #[tokio::test]
    async fn it_should_return_404_for_an_unknown_reservation() {
        let world = World::new();
        let response = app(world.state())
            .oneshot(
                Request::post(format!(
                    "/reservations/{}/cancel",
                    crate::shared::core::primitives::ReservationId::new()
                ))
                .body(Body::empty())
                .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}

use crate::modules::reservations::application::errors::ApplicationError;
use crate::modules::reservations::adapters::outbound::simulated_gateway::SimulatedGateway;
use crate::modules::reservations::core::catalog::{DateOverride, WeeklySchedule};
use crate::modules::reservations::core::errors::{BookingError, UnavailableReason};
use crate::modules::reservations::core::payment::PaymentStatus;
use crate::modules::reservations::core::ports::{PaymentRepository, ReservationRepository};
use crate::modules::reservations::core::reservation::ReservationStatus;
use crate::modules::reservations::use_cases::check_availability::command::CheckAvailability;
use crate::modules::reservations::use_cases::create_pending_reservation::command::CreatePendingReservation;
use crate::modules::reservations::use_cases::create_pending_reservation::handler::CreatePendingReservationHandler;
use crate::modules::reservations::use_cases::expire_stale_reservations::handler::ExpireStaleReservationsHandler;
use crate::modules::reservations::use_cases::pay_for_reservation::command::{
    PayForReservation, PaymentSource,
};
use crate::shell::http::router;
use crate::shell::workers::spawn_expiry_sweeper;
use crate::tests::fixtures::world::{World, at, card_options, registry_over};
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{NaiveDate, NaiveTime, TimeDelta, Utc, Weekday};
use http_body_util::BodyExt;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tower::ServiceExt;

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn post(uri: String, body: Value) -> Request<Body> {
    Request::post(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[rstest]
#[tokio::test]
async fn it_should_quote_reserve_pay_and_confirm_a_tuesday_slot() {
    let world = World::new();
    let app = router(world.state());

    let (status, quote) = send(
        &app,
        post(
            "/quotes".into(),
            json!({
                "room_id": world.room.id,
                "user_id": world.member.id,
                "start": "2024-01-02T10:00:00",
                "end": "2024-01-02T11:30:00"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quote["total"], "40.00");

    let (status, created) = send(
        &app,
        post(
            "/reservations".into(),
            json!({
                "room_id": world.room.id,
                "user_id": world.member.id,
                "start": "2024-01-02T10:00:00",
                "end": "2024-01-02T11:30:00"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let reservation_id = created["reservation_id"].as_str().unwrap().to_string();

    let (status, rejected) = send(
        &app,
        post(
            "/reservations".into(),
            json!({
                "room_id": world.room.id,
                "user_id": world.member.id,
                "start": "2024-01-02T11:00:00",
                "end": "2024-01-02T12:00:00"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(rejected["error"], "SLOT_UNAVAILABLE");

    let (status, early) = send(
        &app,
        post(format!("/reservations/{reservation_id}/confirm"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(early["error"], "PAYMENT_REQUIRED");

    let (status, payment) = send(
        &app,
        post(
            format!("/reservations/{reservation_id}/payments"),
            json!({ "amount": quote["total"], "method": "credit_card", "options": card_options() }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(payment["status"], "completed");

    let (status, confirmed) = send(
        &app,
        post(format!("/reservations/{reservation_id}/confirm"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(confirmed["status"], "confirmed");

    let (status, cancel) = send(
        &app,
        post(format!("/reservations/{reservation_id}/cancel"), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(cancel["error"], "INVALID_TRANSITION");
}

#[rstest]
#[tokio::test]
async fn it_should_let_a_closed_override_win_over_monday_hours() {
    let world = World::new();
    let room_id = world.room.id;
    world
        .store
        .update_catalog(|catalog| {
            catalog.weekly_schedules.push(WeeklySchedule {
                room_id,
                weekday: Weekday::Mon,
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
            });
            catalog.date_overrides.push(DateOverride {
                room_id,
                date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                label: Some("Floor polishing".into()),
                start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                end: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
                is_open: false,
            });
        })
        .await;
    let state = world.state();
    let check = |day: &str| CheckAvailability {
        room_id,
        start: at(&format!("{day}T09:00")),
        end: at(&format!("{day}T17:00")),
    };

    assert!(state.check_availability.handle(check("2024-01-08")).await.is_ok());
    assert!(state.check_availability.handle(check("2024-01-22")).await.is_ok());
    match state.check_availability.handle(check("2024-01-15")).await {
        Err(ApplicationError::Domain(BookingError::SlotUnavailable { reason, .. })) => {
            assert_eq!(
                reason,
                UnavailableReason::ClosedByOverride {
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                    label: Some("Floor polishing".into())
                }
            );
        }
        other => panic!("expected the override to close the day, got {other:?}"),
    }
}

#[rstest]
#[tokio::test]
async fn it_should_never_double_book_random_interval_pairs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let day_open = 10 * 60;
    let day_close = 18 * 60;

    for _ in 0..200 {
        let world = World::new();
        let handler = CreatePendingReservationHandler::new(world.store.clone(), world.store.clone(), 3);
        let mut pick = || {
            let start = rng.gen_range(day_open..day_close - 15);
            let end = rng.gen_range(start + 1..=day_close);
            (start, end)
        };
        let (first, second) = (pick(), pick());
        let command = |(start, end): (i64, i64)| CreatePendingReservation {
            room_id: world.room.id,
            user_id: world.member.id,
            start: at("2024-01-02T00:00") + TimeDelta::minutes(start),
            end: at("2024-01-02T00:00") + TimeDelta::minutes(end),
            equipment: Vec::new(),
            requested_at: Utc::now(),
        };

        handler
            .handle(command(first))
            .await
            .expect("an open slot on an empty calendar is bookable");
        let overlapping = first.0 < second.1 && second.0 < first.1;
        let result = handler.handle(command(second)).await;

        if overlapping {
            assert!(
                matches!(
                    result,
                    Err(ApplicationError::Domain(BookingError::SlotUnavailable { .. }))
                ),
                "{first:?} and {second:?} overlap but both were booked"
            );
            assert_eq!(world.store.reservation_count().await, 1);
        } else {
            assert!(result.is_ok(), "{first:?} and {second:?} are disjoint: {result:?}");
            assert_eq!(world.store.reservation_count().await, 2);
        }
    }
}

#[rstest]
#[tokio::test]
async fn it_should_accept_exactly_one_of_many_concurrent_requests_for_a_slot() {
    let world = World::new();
    world.store.set_delay_append_ms(5);
    let handler = Arc::new(CreatePendingReservationHandler::new(
        world.store.clone(),
        world.store.clone(),
        10,
    ));

    let mut tasks = JoinSet::new();
    for offset in 0..8 {
        let handler = handler.clone();
        let command = CreatePendingReservation {
            room_id: world.room.id,
            user_id: world.member.id,
            start: at("2024-01-02T10:00") + TimeDelta::minutes(offset),
            end: at("2024-01-02T11:00") + TimeDelta::minutes(offset),
            equipment: Vec::new(),
            requested_at: Utc::now(),
        };
        tasks.spawn(async move { handler.handle(command).await });
    }

    let mut accepted = 0;
    while let Some(joined) = tasks.join_next().await {
        match joined.unwrap() {
            Ok(_) => accepted += 1,
            Err(ApplicationError::Domain(BookingError::SlotUnavailable { .. })) => {}
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(world.store.reservation_count().await, 1);
}

#[rstest]
#[tokio::test]
async fn it_should_fail_a_timed_out_payment_and_keep_the_reservation_pending() {
    let world = World::new();
    let slow = Arc::new(SimulatedGateway::new().with_latency(Duration::from_millis(250)));
    let state = world.state_with(registry_over(slow, Duration::from_millis(25)));
    let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;

    let result = state
        .pay_for_reservation
        .handle(PayForReservation {
            reservation_id: reservation.id,
            source: PaymentSource::Raw {
                type_key: "bitcoin".into(),
                options: json!({ "wallet_address": "bc1qexample" }),
            },
            amount: rust_decimal_macros::dec!(20.00),
            requested_at: Utc::now(),
        })
        .await;

    assert!(matches!(
        result,
        Err(ApplicationError::Domain(BookingError::PaymentProcessingFailed { .. }))
    ));
    let payments = world.store.for_reservation(reservation.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Failed);
    let stored = world.store.get(reservation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReservationStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn it_should_release_a_slot_once_the_sweeper_expires_the_hold() {
    let world = World::new();
    let reservation = world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
    tokio::time::sleep(Duration::from_millis(5)).await;

    let expire = Arc::new(ExpireStaleReservationsHandler::new(
        world.store.clone(),
        world.store.clone(),
        TimeDelta::zero(),
    ));
    let sweeper = spawn_expiry_sweeper(expire, Duration::from_millis(10));
    tokio::time::sleep(Duration::from_millis(60)).await;
    sweeper.abort();

    let stored = world.store.get(reservation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, ReservationStatus::Cancelled);
    world.reserve("2024-01-02T10:00", "2024-01-02T11:00").await;
}

//! Race-condition coverage for the seat allocator.
//!
//! The defining property: N concurrent booking attempts against a pool of K
//! seats admit exactly K of them, regardless of interleaving.

mod common;

use infra::models::{BookingStatus, EventStatus, Role};
use infra::pagination::LimitOffset;

use api::error::AppError;
use api::services::bookings;

use common::*;

#[tokio::test]
async fn concurrent_bookings_never_oversell_the_pool() {
    let state = setup_state();
    let (organizer, _) = create_test_user(&state, "org@race.com", Role::Organizer).await;
    let event_id =
        create_test_event(&state, organizer.id, 5, EventStatus::Approved, next_week()).await;

    let mut handles = Vec::new();
    for i in 0..20 {
        let (user, _) = create_test_user(&state, &format!("racer{i}@race.com"), Role::User).await;
        let claims = claims_for(&user);
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            bookings::create_booking(&state, &claims, event_id).await
        }));
    }

    let mut admitted = 0;
    let mut sold_out = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => admitted += 1,
            Err(AppError::SoldOut) => sold_out += 1,
            Err(other) => panic!("unexpected booking failure: {other:?}"),
        }
    }

    assert_eq!(admitted, 5, "exactly the seat pool is admitted");
    assert_eq!(sold_out, 15, "everyone else is sold out");

    let event = state.store().get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.available_seats, 0);

    // Conservation: confirmed bookings fill the pool exactly.
    let confirmed = state
        .store()
        .list_bookings(LimitOffset {
            limit: 100,
            offset: 0,
        })
        .await
        .unwrap()
        .into_iter()
        .filter(|b| b.event_id == event_id && b.status == BookingStatus::Confirmed)
        .count();
    assert_eq!(confirmed, 5);
}

#[tokio::test]
async fn concurrent_cancellations_release_the_seat_once() {
    let state = setup_state();
    let (organizer, _) = create_test_user(&state, "org2@race.com", Role::Organizer).await;
    let (user, _) = create_test_user(&state, "flaky@race.com", Role::User).await;
    let event_id =
        create_test_event(&state, organizer.id, 1, EventStatus::Approved, next_week()).await;

    let claims = claims_for(&user);
    let created = bookings::create_booking(&state, &claims, event_id)
        .await
        .expect("booking should succeed");
    let ticket_id = created.ticket.ticket_id;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let state = state.clone();
        let claims = claims.clone();
        let ticket_id = ticket_id.clone();
        handles.push(tokio::spawn(async move {
            bookings::cancel_booking(&state, &claims, &ticket_id).await
        }));
    }

    let mut succeeded = 0;
    let mut already_cancelled = 0;
    for handle in handles {
        match handle.await.expect("task panicked") {
            Ok(_) => succeeded += 1,
            Err(AppError::AlreadyCancelled) => already_cancelled += 1,
            Err(other) => panic!("unexpected cancellation failure: {other:?}"),
        }
    }

    assert_eq!(succeeded, 1, "one cancellation wins");
    assert_eq!(already_cancelled, 3);

    // The seat came back exactly once.
    let event = state.store().get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.available_seats, 1);
}

#[tokio::test]
async fn racing_over_the_last_seat_admits_one_booking() {
    let state = setup_state();
    let (organizer, _) = create_test_user(&state, "org3@race.com", Role::Organizer).await;
    let event_id =
        create_test_event(&state, organizer.id, 1, EventStatus::Approved, next_week()).await;

    let (user_a, _) = create_test_user(&state, "a@race.com", Role::User).await;
    let (user_b, _) = create_test_user(&state, "b@race.com", Role::User).await;

    let claims_a = claims_for(&user_a);
    let claims_b = claims_for(&user_b);
    let (left, right) = tokio::join!(
        bookings::create_booking(&state, &claims_a, event_id),
        bookings::create_booking(&state, &claims_b, event_id),
    );

    let wins = [&left, &right].iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1, "the last seat goes to exactly one caller");

    let event = state.store().get_event(event_id).await.unwrap().unwrap();
    assert_eq!(event.available_seats, 0);
}

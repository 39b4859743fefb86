use anyhow::Result;
use chrono::{Duration, NaiveDate, Utc};
use sea_orm::EntityTrait;

use super::memory_db;
use crate::errors::ModelError;
use crate::{housekeeping_task, reservation, room, session, user, user_credentials, work_order};

fn alice() -> user::NewUser<'static> {
    user::NewUser { name: "Alice", email: "  Alice@Hotel.com ", role: "guest", phone: None }
}

#[tokio::test]
async fn user_email_is_normalized_and_unique() -> Result<()> {
    let db = memory_db().await?;
    let u = user::create(&db, alice()).await?;
    assert_eq!(u.email, "alice@hotel.com");
    assert!(u.last_login.is_none());

    let found = user::find_by_email(&db, "ALICE@hotel.com").await?.unwrap();
    assert_eq!(found.id, u.id);

    let dup = user::create(&db, user::NewUser { name: "Other", email: "alice@hotel.com", role: "admin", phone: None }).await;
    assert!(matches!(dup, Err(ModelError::Conflict(_))));
    Ok(())
}

#[tokio::test]
async fn user_validation_rejects_bad_input() -> Result<()> {
    let db = memory_db().await?;
    let bad_email = user::create(&db, user::NewUser { name: "Bob", email: "bob", role: "guest", phone: None }).await;
    assert!(matches!(bad_email, Err(ModelError::Validation(_))));
    let no_name = user::create(&db, user::NewUser { name: " ", email: "bob@hotel.com", role: "guest", phone: None }).await;
    assert!(matches!(no_name, Err(ModelError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn touch_last_login_sets_timestamp() -> Result<()> {
    let db = memory_db().await?;
    let u = user::create(&db, alice()).await?;
    let at = Utc::now();
    user::touch_last_login(&db, u.id, at).await?;
    let reloaded = user::Entity::find_by_id(u.id).one(&db).await?.unwrap();
    let stamped = reloaded.last_login.unwrap();
    assert_eq!(stamped.timestamp(), at.timestamp());
    Ok(())
}

#[tokio::test]
async fn credentials_upsert_replaces_hash() -> Result<()> {
    let db = memory_db().await?;
    let u = user::create(&db, alice()).await?;
    let first = user_credentials::upsert_password(&db, u.id, "hash-1".into(), "argon2").await?;
    let second = user_credentials::upsert_password(&db, u.id, "hash-2".into(), "argon2").await?;
    assert_eq!(first.id, second.id);
    let stored = user_credentials::find_by_user(&db, u.id).await?.unwrap();
    assert_eq!(stored.password_hash, "hash-2");

    let empty = user_credentials::upsert_password(&db, u.id, " ".into(), "argon2").await;
    assert!(matches!(empty, Err(ModelError::Validation(_))));
    Ok(())
}

#[tokio::test]
async fn session_lifecycle() -> Result<()> {
    let db = memory_db().await?;
    let u = user::create(&db, alice()).await?;
    let now = Utc::now();
    let s = session::create(&db, u.id, "tok-1", "ref-1", now + Duration::hours(24), now).await?;

    assert_eq!(session::find_by_token(&db, "tok-1").await?.unwrap().id, s.id);
    assert_eq!(session::find_by_refresh_token(&db, "ref-1").await?.unwrap().id, s.id);

    let rotated = session::rotate(&db, s.id, "tok-2", "ref-2", now + Duration::hours(48)).await?.unwrap();
    assert_eq!(rotated.id, s.id);
    assert!(session::find_by_token(&db, "tok-1").await?.is_none());
    assert!(session::find_by_refresh_token(&db, "ref-1").await?.is_none());

    assert!(session::delete_by_token(&db, "tok-2").await?);
    assert!(!session::delete_by_token(&db, "tok-2").await?);
    assert!(session::rotate(&db, s.id, "x", "y", now).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn room_and_task_defaults() -> Result<()> {
    let db = memory_db().await?;
    let r = room::create(&db, room::NewRoom {
        number: "101".into(),
        room_type: "deluxe".into(),
        floor: 1,
        base_rate: 180.0,
        current_rate: None,
    })
    .await?;
    assert_eq!(r.status, "available");
    assert_eq!(r.cleaning_status, "clean");
    assert_eq!(r.current_rate, 180.0);

    let t = housekeeping_task::create(&db, housekeeping_task::NewTask {
        room_number: "101".into(),
        task_type: "cleaning".into(),
        ..Default::default()
    })
    .await?;
    assert_eq!(t.priority, housekeeping_task::DEFAULT_PRIORITY);
    assert_eq!(t.status, housekeeping_task::STATUS_PENDING);
    assert!(t.started_at.is_none());
    Ok(())
}

#[tokio::test]
async fn work_order_defaults_and_delete() -> Result<()> {
    let db = memory_db().await?;
    let reporter = user::create(&db, alice()).await?;
    let missing = work_order::create(&db, work_order::NewWorkOrder { room_number: "204".into(), issue: "Leaking tap".into(), ..Default::default() }).await;
    assert!(matches!(missing, Err(ModelError::Validation(_))));

    let wo = work_order::create(&db, work_order::NewWorkOrder {
        room_number: "204".into(),
        issue: "Leaking tap".into(),
        category: "plumbing".into(),
        estimated_cost: Some(80.0),
        reported_by: Some(reporter.id),
        ..Default::default()
    })
    .await?;
    assert_eq!(wo.priority, "medium");
    assert_eq!(wo.status, "pending");
    assert_eq!(wo.reported_by, Some(reporter.id));
    assert!(wo.actual_cost.is_none());

    assert!(work_order::delete(&db, wo.id).await?);
    assert!(!work_order::delete(&db, wo.id).await?);
    assert!(work_order::Entity::find_by_id(wo.id).one(&db).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn reservation_defaults_and_stay_check() -> Result<()> {
    let db = memory_db().await?;
    let r = room::create(&db, room::NewRoom { number: "305".into(), room_type: "suite".into(), floor: 3, base_rate: 320.0, current_rate: None }).await?;
    let day = |d| NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
    let input = reservation::NewReservation {
        guest_id: None,
        guest_name: "Bob Guest".into(),
        guest_email: " Bob@Mail.com ".into(),
        room_id: r.id,
        room_number: r.number.clone(),
        room_type: r.room_type.clone(),
        check_in: day(10),
        check_out: day(12),
        total_amount: 640.0,
        currency: reservation::DEFAULT_CURRENCY.into(),
        number_of_guests: 2,
        special_requests: vec!["late check-in".into()],
    };

    let backwards = reservation::NewReservation { check_out: day(10), ..input.clone() };
    assert!(matches!(reservation::create(&db, backwards).await, Err(ModelError::Validation(_))));

    let b = reservation::create(&db, input).await?;
    assert_eq!(b.guest_email, "bob@mail.com");
    assert_eq!(b.status, reservation::STATUS_CONFIRMED);
    assert_eq!(b.payment_status, reservation::PAYMENT_PENDING);
    assert_eq!(b.special_requests, serde_json::json!(["late check-in"]));
    let reloaded = reservation::Entity::find_by_id(b.id).one(&db).await?.unwrap();
    assert_eq!(reloaded.check_in, day(10));
    Ok(())
}

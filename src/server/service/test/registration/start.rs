use super::*;
use std::sync::Arc;

use crate::server::{
    config::RegistrationPolicy,
    service::registration::RegistrationService,
    util::{clock::ManualClock, password::PasswordHasher},
};

/// Tests starting a registration for a new email.
///
/// Expected: a pending registration and one `RegistrationStarted` event carrying its code
#[tokio::test]
async fn creates_pending_registration_and_event() -> Result<(), AppError> {
    let fixture = Fixture::new().await;

    let registration = fixture.registrations().start("a@test.com").await?;

    assert_eq!(registration.status, RegistrationStatus::Pending);
    assert_eq!(registration.code_attempts, 0);
    assert_eq!(registration.verification_code.len(), fixture.policy.code_length);

    let events = OutboxRepository::new(fixture.db())
        .find_by_aggregate(registration.id)
        .await?;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].event()?,
        RegistrationEvent::RegistrationStarted {
            registration_id: registration.id,
            email: "a@test.com".to_string(),
            verification_code: registration.verification_code.clone(),
        }
    );

    Ok(())
}

/// Tests that an active registration blocks a second start.
///
/// Expected: Err(InProgress)
#[tokio::test]
async fn rejects_registration_in_progress() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let service = fixture.registrations();

    service.start("a@test.com").await?;

    assert_registration_err(service.start("a@test.com").await, RegistrationError::InProgress);

    Ok(())
}

/// Tests starting for an email that already has a student account.
///
/// Expected: Err(AlreadyRegistered)
#[tokio::test]
async fn rejects_existing_student() -> Result<(), AppError> {
    let fixture = Fixture::new().await;

    let group = factory::create_group(fixture.db()).await?;
    factory::student::StudentFactory::new(fixture.db(), group.id)
        .email("a@test.com")
        .build()
        .await?;

    assert_registration_err(
        fixture.registrations().start("a@test.com").await,
        RegistrationError::AlreadyRegistered,
    );

    Ok(())
}

/// Tests starting for an email whose latest registration completed.
///
/// Expected: Err(AlreadyRegistered) even before the student is provisioned
#[tokio::test]
async fn rejects_completed_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;

    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .status("completed")
        .barcode("STU001")
        .build()
        .await?;

    assert_registration_err(
        fixture.registrations().start("a@test.com").await,
        RegistrationError::AlreadyRegistered,
    );

    Ok(())
}

/// Tests that an expired registration does not block a restart.
///
/// Expected: Ok with a new pending registration
#[tokio::test]
async fn restarts_after_expiry() -> Result<(), AppError> {
    let fixture = Fixture::new().await;

    let expired = RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .status("expired")
        .created_at(Utc::now() - Duration::hours(1))
        .build()
        .await?;

    let registration = fixture.registrations().start("a@test.com").await?;

    assert_ne!(registration.id.to_string(), expired.id);
    assert_eq!(registration.status, RegistrationStatus::Pending);

    Ok(())
}

/// Tests that a pending registration whose code lapsed does not block a restart.
///
/// Expected: Ok with a new registration, the lapsed one is expired
#[tokio::test]
async fn restarts_after_lapsed_pending() -> Result<(), AppError> {
    let fixture = Fixture::new().await;

    let lapsed = RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .created_at(Utc::now() - Duration::hours(1))
        .code_expires_at(Utc::now() - Duration::minutes(45))
        .build()
        .await?;

    let registration = fixture.registrations().start("a@test.com").await?;

    assert_eq!(registration.status, RegistrationStatus::Pending);

    let old = RegistrationRepository::new(fixture.db())
        .find_by_id(Uuid::parse_str(&lapsed.id).unwrap())
        .await?
        .unwrap();
    assert_eq!(old.status, RegistrationStatus::Expired);

    Ok(())
}

/// Tests concurrent starts for the same email.
///
/// Expected: exactly one succeeds, the others fail with InProgress, and exactly
/// one registration row and one `RegistrationStarted` event exist
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_create_single_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let db = fixture.db().clone();
    let policy = Arc::new(RegistrationPolicy::default());
    let clock = Arc::new(ManualClock::starting_now());
    let hasher = Arc::new(PasswordHasher::new(1_000));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            let policy = policy.clone();
            let clock = clock.clone();
            let hasher = hasher.clone();
            tokio::spawn(async move {
                RegistrationService::new(&db, &policy, &*clock, &hasher)
                    .start("a@test.com")
                    .await
            })
        })
        .collect();

    let mut winners = Vec::new();
    for handle in handles {
        match handle.await.unwrap() {
            Ok(registration) => winners.push(registration),
            Err(AppError::RegistrationErr(RegistrationError::InProgress)) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(winners.len(), 1);

    let latest = RegistrationRepository::new(&db)
        .find_latest_by_email("a@test.com")
        .await?
        .unwrap();
    assert_eq!(latest.id, winners[0].id);

    let events = OutboxRepository::new(&db)
        .fetch_due(Utc::now() + Duration::minutes(1), 10, 100)
        .await?;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].aggregate_id, winners[0].id);

    Ok(())
}

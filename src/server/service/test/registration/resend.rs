use super::*;

/// Tests resending before the cooldown elapsed.
///
/// Expected: Err(ResendThrottled) with the seconds remaining, code unchanged
#[tokio::test]
async fn throttles_within_cooldown() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .resend_available_at(Utc::now() + Duration::seconds(30))
        .build()
        .await?;

    let result = fixture.registrations().resend("a@test.com").await;

    match result {
        Err(AppError::RegistrationErr(RegistrationError::ResendThrottled { retry_after_secs })) => {
            assert!((1..=30).contains(&retry_after_secs));
        }
        other => panic!("expected ResendThrottled, got {other:?}"),
    }

    let stored = RegistrationRepository::new(fixture.db())
        .find_latest_by_email("a@test.com")
        .await?
        .unwrap();
    assert_eq!(stored.verification_code, "ABC123");
    assert_eq!(stored.version, 1);

    Ok(())
}

/// Tests a resend after the cooldown.
///
/// Expected: a different code, attempts reset, cooldown pushed forward and a
/// `VerificationCodeResent` event with the new code
#[tokio::test]
async fn issues_new_code_and_resets_attempts() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .code_attempts(2)
        .build()
        .await?;

    let registration = fixture.registrations().resend("a@test.com").await?;

    assert_ne!(registration.verification_code, "ABC123");
    assert_eq!(registration.code_attempts, 0);
    assert!(registration.resend_available_at > Utc::now());

    let events = OutboxRepository::new(fixture.db())
        .find_by_aggregate(registration.id)
        .await?;
    assert_eq!(events.len(), 1);
    assert_eq!(
        events[0].event()?,
        RegistrationEvent::VerificationCodeResent {
            registration_id: registration.id,
            email: "a@test.com".to_string(),
            verification_code: registration.verification_code.clone(),
        }
    );

    Ok(())
}

/// Tests that the old code stops working after a resend.
///
/// Expected: old code rejected with InvalidCode, new code verifies
#[tokio::test]
async fn old_code_is_invalid_after_resend() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let service = fixture.registrations();
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .build()
        .await?;

    let registration = service.resend("a@test.com").await?;

    assert_registration_err(
        service.verify(verify_params("a@test.com", "ABC123")).await,
        RegistrationError::InvalidCode { remaining: 2 },
    );
    let verified = service
        .verify(verify_params("a@test.com", &registration.verification_code))
        .await?;
    assert_eq!(verified.status, RegistrationStatus::Verified);

    Ok(())
}

/// Tests resending for a registration that is no longer pending.
///
/// Expected: Err(NotFound)
#[tokio::test]
async fn rejects_verified_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .status("verified")
        .verified_at(Utc::now())
        .build()
        .await?;

    assert_registration_err(
        fixture.registrations().resend("a@test.com").await,
        RegistrationError::NotFound,
    );

    Ok(())
}

/// Tests resending after the code lapsed.
///
/// Expected: Err(NotFound) and the registration is expired
#[tokio::test]
async fn lapsed_registration_is_expired() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .code_expires_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;

    assert_registration_err(
        fixture.registrations().resend("a@test.com").await,
        RegistrationError::NotFound,
    );

    let stored = RegistrationRepository::new(fixture.db())
        .find_latest_by_email("a@test.com")
        .await?
        .unwrap();
    assert_eq!(stored.status, RegistrationStatus::Expired);

    Ok(())
}

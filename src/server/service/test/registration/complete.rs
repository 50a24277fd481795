use super::*;

/// Seeds a group and a verified registration for `a@test.com` with code `ABC123`.
async fn seed_verified(fixture: &Fixture) -> Result<i32, AppError> {
    let group = factory::create_group(fixture.db()).await?;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .status("verified")
        .verified_at(Utc::now())
        .build()
        .await?;

    Ok(group.id)
}

/// Tests completing a verified registration.
///
/// Expected: Ok with a completed registration, barcode claimed and a
/// `StudentRegistrationCompleted` event carrying a verifiable password hash
#[tokio::test]
async fn completes_verified_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;

    let registration = fixture
        .registrations()
        .complete(complete_params("a@test.com", "ABC123", group_id, "STU001"))
        .await?;

    assert_eq!(registration.status, RegistrationStatus::Completed);
    assert_eq!(registration.barcode.as_deref(), Some("STU001"));
    assert!(registration.completed_at.is_some());

    let events = OutboxRepository::new(fixture.db())
        .find_by_aggregate(registration.id)
        .await?;
    assert_eq!(events.len(), 1);
    match events[0].event()? {
        RegistrationEvent::StudentRegistrationCompleted {
            email,
            barcode,
            group_id: event_group,
            password_hash,
            ..
        } => {
            assert_eq!(email, "a@test.com");
            assert_eq!(barcode, "STU001");
            assert_eq!(event_group, group_id);
            assert!(fixture.hasher.verify("correct horse battery", &password_hash));
        }
        other => panic!("unexpected event {other:?}"),
    }

    Ok(())
}

/// Tests completing before verification.
///
/// Expected: Err(VerifyFirst)
#[tokio::test]
async fn requires_verification() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group = factory::create_group(fixture.db()).await?;
    RegistrationFactory::new(fixture.db())
        .email("a@test.com")
        .build()
        .await?;

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ABC123", group.id, "STU001"))
            .await,
        RegistrationError::VerifyFirst,
    );

    Ok(())
}

/// Tests completing with a code other than the verified one.
///
/// Expected: Err(CodeMismatch) and no attempt is recorded
#[tokio::test]
async fn rejects_mismatched_code() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ZZZ999", group_id, "STU001"))
            .await,
        RegistrationError::CodeMismatch,
    );

    let stored = RegistrationRepository::new(fixture.db())
        .find_latest_by_email("a@test.com")
        .await?
        .unwrap();
    assert_eq!(stored.status, RegistrationStatus::Verified);
    assert_eq!(stored.code_attempts, 0);

    Ok(())
}

/// Tests completing into a group that does not exist.
///
/// Expected: Err(GroupNotFound)
#[tokio::test]
async fn rejects_missing_group() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ABC123", group_id + 1000, "STU001"))
            .await,
        RegistrationError::GroupNotFound(group_id + 1000),
    );

    Ok(())
}

/// Tests completing with a barcode held by an existing student.
///
/// Expected: Err(DuplicateBarcode)
#[tokio::test]
async fn rejects_barcode_of_existing_student() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;
    factory::student::StudentFactory::new(fixture.db(), group_id)
        .barcode("STU001")
        .build()
        .await?;

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ABC123", group_id, "STU001"))
            .await,
        RegistrationError::DuplicateBarcode,
    );

    Ok(())
}

/// Tests completing with a barcode claimed by another completed registration.
///
/// Expected: Err(DuplicateBarcode)
#[tokio::test]
async fn rejects_barcode_of_completed_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;
    RegistrationFactory::new(fixture.db())
        .status("completed")
        .barcode("STU001")
        .build()
        .await?;

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ABC123", group_id, "STU001"))
            .await,
        RegistrationError::DuplicateBarcode,
    );

    Ok(())
}

/// Tests completing twice.
///
/// Expected: the second call fails with AlreadyCompleted
#[tokio::test]
async fn rejects_second_completion() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;
    let service = fixture.registrations();

    service
        .complete(complete_params("a@test.com", "ABC123", group_id, "STU001"))
        .await?;

    assert_registration_err(
        service
            .complete(complete_params("a@test.com", "ABC123", group_id, "STU002"))
            .await,
        RegistrationError::AlreadyCompleted,
    );

    Ok(())
}

/// Tests completing after the completion window closed.
///
/// Expected: Err(Expired) and the registration is persisted as expired
#[tokio::test]
async fn lapsed_verification_expires_registration() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    let group_id = seed_verified(&fixture).await?;

    fixture.clock.advance(fixture.policy.completion_window);

    assert_registration_err(
        fixture
            .registrations()
            .complete(complete_params("a@test.com", "ABC123", group_id, "STU001"))
            .await,
        RegistrationError::Expired,
    );

    let stored = RegistrationRepository::new(fixture.db())
        .find_latest_by_email("a@test.com")
        .await?
        .unwrap();
    assert_eq!(stored.status, RegistrationStatus::Expired);
    assert!(stored.barcode.is_none());

    Ok(())
}

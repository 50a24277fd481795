use super::*;

/// Tests a version-checked update against the current version.
///
/// Expected: Ok(true) and the stored row reflects the transition
#[tokio::test]
async fn updates_when_version_matches() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let policy = RegistrationPolicy::default();
    let repo = RegistrationRepository::new(db);
    let mut registration = started("a@test.com");
    repo.insert(&registration).await?;

    let expected = registration.version;
    registration.verify("ABC123", Utc::now(), &policy)?;

    assert!(repo.update(&registration, expected).await?);

    let stored = repo.find_by_id(registration.id).await?.unwrap();
    assert_eq!(stored.status, RegistrationStatus::Verified);
    assert_eq!(stored.version, expected + 1);
    assert!(stored.verified_at.is_some());

    Ok(())
}

/// Tests that a writer holding a stale version loses.
///
/// Two copies are loaded at version 1; the first write wins and the second is
/// reported as a conflict without touching the row.
///
/// Expected: Ok(false) for the stale write, stored attempts reflect only the first
#[tokio::test]
async fn rejects_stale_version() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let policy = RegistrationPolicy::default();
    let repo = RegistrationRepository::new(db);
    let registration = started("a@test.com");
    repo.insert(&registration).await?;

    let mut first = registration.clone();
    let mut second = registration.clone();
    first.verify("WRONG1", Utc::now(), &policy)?;
    second.verify("WRONG2", Utc::now(), &policy)?;

    assert!(repo.update(&first, 1).await?);
    assert!(!repo.update(&second, 1).await?);

    let stored = repo.find_by_id(registration.id).await?.unwrap();
    assert_eq!(stored.code_attempts, 1);
    assert_eq!(stored.version, 2);

    Ok(())
}

/// Tests that expiring a registration releases its email.
///
/// Expected: a new registration for the same email can be inserted afterwards
#[tokio::test]
async fn expiry_releases_active_email() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = RegistrationRepository::new(db);
    let mut registration = started("a@test.com");
    repo.insert(&registration).await?;

    registration.expire(Utc::now());
    assert!(repo.update(&registration, 1).await?);

    assert!(repo.insert(&started("a@test.com")).await?);

    Ok(())
}

/// Tests completing with a barcode another registration already claimed.
///
/// Expected: Err(DuplicateBarcode) and the registration stays verified
#[tokio::test]
async fn rejects_claimed_barcode() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::registration::RegistrationFactory::new(db)
        .status("completed")
        .barcode("STU001")
        .build()
        .await?;

    let policy = RegistrationPolicy::default();
    let repo = RegistrationRepository::new(db);
    let mut registration = started("a@test.com");
    repo.insert(&registration).await?;
    registration.verify("ABC123", Utc::now(), &policy)?;
    repo.update(&registration, 1).await?;

    registration.complete(
        "ABC123",
        CompletionProfile {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            barcode: "STU001".to_string(),
            group_id: 1,
            password_hash: "hash".to_string(),
        },
        Utc::now(),
        &policy,
    )?;
    let result = repo.update(&registration, 2).await;

    assert!(matches!(
        result,
        Err(AppError::RegistrationErr(RegistrationError::DuplicateBarcode))
    ));
    let stored = repo.find_by_id(registration.id).await?.unwrap();
    assert_eq!(stored.status, RegistrationStatus::Verified);

    Ok(())
}

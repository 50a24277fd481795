use super::*;

/// Tests the expiry sweep.
///
/// Expected: lapsed pending and verified registrations are expired, fresh ones
/// are untouched, and the released email can start again
#[tokio::test]
async fn expires_lapsed_registrations() -> Result<(), AppError> {
    let fixture = Fixture::new().await;
    RegistrationFactory::new(fixture.db())
        .email("pending@test.com")
        .code_expires_at(Utc::now() - Duration::minutes(1))
        .build()
        .await?;
    RegistrationFactory::new(fixture.db())
        .email("verified@test.com")
        .status("verified")
        .verified_at(Utc::now() - fixture.policy.completion_window - Duration::minutes(1))
        .build()
        .await?;
    RegistrationFactory::new(fixture.db())
        .email("fresh@test.com")
        .build()
        .await?;

    let service = fixture.registrations();
    let expired = service.expire_lapsed(100).await?;

    assert_eq!(expired, 2);

    let repo = RegistrationRepository::new(fixture.db());
    let fresh = repo.find_latest_by_email("fresh@test.com").await?.unwrap();
    assert_eq!(fresh.status, RegistrationStatus::Pending);

    assert_eq!(service.expire_lapsed(100).await?, 0);
    service.start("pending@test.com").await?;

    Ok(())
}

use super::*;

/// Tests that an enqueued event is stored with its encoded payload.
///
/// Expected: one unpublished message whose payload decodes to the same event
#[tokio::test]
async fn stores_encoded_event() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let registration_id = Uuid::new_v4();
    let event = started_event(registration_id);

    let repo = OutboxRepository::new(db);
    repo.enqueue(&event, Utc::now()).await?;

    let messages = repo.find_by_aggregate(registration_id).await?;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].event_type, "RegistrationStarted");
    assert_eq!(messages[0].attempts, 0);
    assert!(messages[0].published_at.is_none());
    assert_eq!(messages[0].event()?, event);

    Ok(())
}

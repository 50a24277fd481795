use super::*;

/// Tests that published events are no longer due.
///
/// Expected: the event is fetched once, then skipped after `mark_published`
#[tokio::test]
async fn skips_published_events() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    repo.enqueue(&started_event(Uuid::new_v4()), now).await?;

    let due = repo.fetch_due(now, 10, 50).await?;
    assert_eq!(due.len(), 1);

    repo.mark_published(due[0].id, now).await?;

    assert!(repo.fetch_due(now, 10, 50).await?.is_empty());

    Ok(())
}

/// Tests that a failed event waits for its backoff.
///
/// Expected: not due before `next_attempt_at`, due again afterwards with attempts recorded
#[tokio::test]
async fn respects_backoff_after_failure() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    repo.enqueue(&started_event(Uuid::new_v4()), now).await?;
    let id = repo.fetch_due(now, 10, 50).await?[0].id;

    repo.mark_failed(id, 1, "smtp down", now + Duration::seconds(30))
        .await?;

    assert!(repo.fetch_due(now, 10, 50).await?.is_empty());

    let later = repo.fetch_due(now + Duration::seconds(31), 10, 50).await?;
    assert_eq!(later.len(), 1);
    assert_eq!(later[0].attempts, 1);
    assert_eq!(later[0].last_error.as_deref(), Some("smtp down"));

    Ok(())
}

/// Tests that events reaching the attempt limit are parked.
///
/// Expected: not fetched once attempts equal `max_attempts`
#[tokio::test]
async fn parks_events_at_attempt_limit() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    repo.enqueue(&started_event(Uuid::new_v4()), now).await?;
    let id = repo.fetch_due(now, 3, 50).await?[0].id;

    repo.mark_failed(id, 3, "smtp down", now).await?;

    assert!(repo.fetch_due(now, 3, 50).await?.is_empty());

    Ok(())
}

/// Tests the batch size limit.
///
/// Expected: at most `limit` events, oldest first
#[tokio::test]
async fn limits_batch_size() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let now = Utc::now();
    let repo = OutboxRepository::new(db);
    for _ in 0..3 {
        repo.enqueue(&started_event(Uuid::new_v4()), now).await?;
    }

    let due = repo.fetch_due(now, 10, 2).await?;

    assert_eq!(due.len(), 2);
    assert!(due[0].id < due[1].id);

    Ok(())
}

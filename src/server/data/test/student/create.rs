use super::*;

fn params(group_id: i32, registration_id: Uuid) -> CreateStudentParams {
    CreateStudentParams {
        registration_id,
        email: "a@test.com".to_string(),
        barcode: "STU001".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        group_id,
        password_hash: "pbkdf2-sha256$1$00$00".to_string(),
        created_at: Utc::now(),
    }
}

/// Tests creating a student and finding it by its registration.
///
/// Expected: Ok with the student retrievable through `find_by_registration_id`
#[tokio::test]
async fn creates_student_for_registration() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let registration_id = Uuid::new_v4();

    let repo = StudentRepository::new(db);
    let created = repo.create(params(group.id, registration_id)).await?;

    let found = repo.find_by_registration_id(registration_id).await?.unwrap();
    assert_eq!(found.id, created.id);
    assert_eq!(found.email, "a@test.com");
    assert_eq!(found.group_id, group.id);

    Ok(())
}

/// Tests that a registration can only be provisioned once.
///
/// Expected: Err on the second insert for the same registration ID
#[tokio::test]
async fn rejects_second_student_for_registration() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    let registration_id = Uuid::new_v4();

    let repo = StudentRepository::new(db);
    repo.create(params(group.id, registration_id)).await?;

    assert!(repo.create(params(group.id, registration_id)).await.is_err());

    Ok(())
}

/// Tests lookup for a registration that was never provisioned.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_when_not_provisioned() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = StudentRepository::new(db);

    assert!(repo.find_by_registration_id(Uuid::new_v4()).await?.is_none());

    Ok(())
}

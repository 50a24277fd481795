use super::*;

/// Tests existence checks by email and barcode.
///
/// Expected: true for the seeded student's values, false for others
#[tokio::test]
async fn checks_email_and_barcode() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = factory::create_group(db).await?;
    factory::student::StudentFactory::new(db, group.id)
        .email("taken@test.com")
        .barcode("STU001")
        .build()
        .await?;

    let repo = StudentRepository::new(db);

    assert!(repo.exists_by_email("taken@test.com").await?);
    assert!(!repo.exists_by_email("free@test.com").await?);
    assert!(repo.exists_by_barcode("STU001").await?);
    assert!(!repo.exists_by_barcode("STU002").await?);

    Ok(())
}

use crate::server::{data::student_group::StudentGroupRepository, error::AppError};
use test_utils::{builder::TestBuilder, factory::student_group::StudentGroupFactory};

/// Tests group existence checks.
///
/// Expected: true for a seeded group, false for an unknown ID
#[tokio::test]
async fn checks_group_exists() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let group = StudentGroupFactory::new(db).build().await?;

    let repo = StudentGroupRepository::new(db);

    assert!(repo.exists(group.id).await?);
    assert!(!repo.exists(group.id + 1000).await?);

    Ok(())
}

/// Tests listing groups.
///
/// Expected: Ok with all groups ordered by name
#[tokio::test]
async fn gets_all_groups_by_name() -> Result<(), AppError> {
    let test = TestBuilder::new()
        .with_registration_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    StudentGroupFactory::new(db).name("CS-102").build().await?;
    StudentGroupFactory::new(db).name("CS-101").build().await?;

    let repo = StudentGroupRepository::new(db);
    let groups = repo.get_all().await?;

    let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["CS-101", "CS-102"]);

    Ok(())
}

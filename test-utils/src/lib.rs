//! Coursehub Test Utils
//!
//! Shared testing utilities for the coursehub backend: a builder for test contexts
//! backed by in-memory SQLite databases, and factories for seeding groups, students
//! and registrations.
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory};
//!
//! #[tokio::test]
//! async fn completes_registration() -> Result<(), sea_orm::DbErr> {
//!     let test = TestBuilder::new()
//!         .with_registration_tables()
//!         .build()
//!         .await
//!         .unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let group = factory::create_group(db).await?;
//!     // ...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;

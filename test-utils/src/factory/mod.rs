//! Factory methods for creating test data.
//!
//! Each entity has a `Factory` struct for customization and a `create_*`
//! convenience function for quick default creation.
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! let group = factory::create_group(db).await?;
//!
//! let registration = factory::registration::RegistrationFactory::new(db)
//!     .email("b@test.com")
//!     .status("expired")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `student_group` - Create student group entities
//! - `student` - Create provisioned student entities
//! - `registration` - Create registration rows in any state
//! - `helpers` - Shared ID generation

pub mod helpers;
pub mod registration;
pub mod student;
pub mod student_group;

pub use registration::create_registration;
pub use student::create_student;
pub use student_group::create_group;

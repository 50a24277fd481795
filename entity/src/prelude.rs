pub use super::outbox_event::Entity as OutboxEvent;
pub use super::registration::Entity as Registration;
pub use super::student::Entity as Student;
pub use super::student_group::Entity as StudentGroup;

//! Server-side domain models and parameter types.
//!
//! Domain models are converted from entity models at the repository boundary and
//! transformed to DTOs at the controller boundary. The registration aggregate
//! carries the state machine itself; its transitions are pure and leave
//! persistence to the service layer.

pub mod event;
pub mod group;
pub mod outbox;
pub mod registration;
pub mod student;

//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Driving the registration state machine
//! - **Orchestration**: Coordinating repositories, the mailer and provisioning
//! - **Domain Models**: Working with domain models rather than DTOs or entity models
//! - **Transaction Management**: Writing state changes and their outbox events atomically

pub mod group;
pub mod notification;
pub mod outbox;
pub mod provisioning;
pub mod registration;

#[cfg(test)]
mod test;

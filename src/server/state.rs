//! Application state shared across all request handlers.
//!
//! This module defines the `AppState` struct which holds all shared resources and
//! dependencies needed by the application. The state is initialized once during startup
//! and then cloned for each request handler through Axum's state extraction.
//!
//! The state includes:
//! - Database connection pool for data persistence
//! - Registration policy and outbox tuning loaded from configuration
//! - The time source and mail transport injected into services

use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::server::{
    config::{Config, OutboxSettings, RegistrationPolicy},
    service::{
        notification::Mailer, outbox::OutboxRelay, registration::RegistrationService,
    },
    util::{clock::Clock, password::PasswordHasher},
};

/// Application state containing shared resources and dependencies.
///
/// All fields are cheap to clone: `DatabaseConnection` is a pool handle and the
/// rest sit behind `Arc` or are `Copy`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool for accessing persistent storage.
    pub db: DatabaseConnection,

    /// Limits of the registration state machine.
    pub policy: Arc<RegistrationPolicy>,

    /// Outbox relay batch size and retry limit.
    pub outbox: Arc<OutboxSettings>,

    /// Time source for expiry and throttling decisions.
    pub clock: Arc<dyn Clock>,

    /// Hasher for passwords submitted at completion.
    pub hasher: PasswordHasher,

    /// Transport for verification mails.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    /// Creates a new application state from configuration and injected collaborators.
    ///
    /// # Arguments
    /// - `db` - Database connection pool
    /// - `config` - Loaded configuration
    /// - `clock` - Time source
    /// - `mailer` - Mail transport
    pub fn new(
        db: DatabaseConnection,
        config: &Config,
        clock: Arc<dyn Clock>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            db,
            policy: Arc::new(config.registration.clone()),
            outbox: Arc::new(config.outbox.clone()),
            clock,
            hasher: PasswordHasher::new(config.password_hash_iterations),
            mailer,
        }
    }

    /// Builds a registration service borrowing this state.
    pub fn registration_service(&self) -> RegistrationService<'_> {
        RegistrationService::new(&self.db, &self.policy, self.clock.as_ref(), &self.hasher)
    }

    /// Builds an outbox relay borrowing this state.
    pub fn outbox_relay(&self) -> OutboxRelay<'_> {
        OutboxRelay::new(
            &self.db,
            self.mailer.as_ref(),
            self.clock.as_ref(),
            &self.outbox,
        )
    }
}

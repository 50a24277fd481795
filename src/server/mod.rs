//! Server-side API backend and business logic.
//!
//! This module contains the complete backend for student self-registration:
//! API endpoints, the registration state machine, data access and background jobs.
//! The backend uses Axum as the web framework and SeaORM for database operations.
//!
//! # Architecture
//!
//! The server follows a layered architecture with clear separation of concerns:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and DTO conversion
//! - **Service Layer** (`service/`) - Orchestration of transitions, persistence and the outbox
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models, the registration aggregate and events
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based configuration and registration policy
//! - **State** (`state`) - Shared application state (DB, policy, clock, mailer)
//! - **Startup** (`startup`) - Tracing and database initialization
//! - **Router** (`router`) - Axum routes and OpenAPI documentation
//! - **Scheduler** (`scheduler/`) - Outbox relay and registration expiry jobs
//! - **Util** (`util/`) - Clock, code generation, password hashing and validation
//!
//! # Request Flow
//!
//! 1. **Router** receives the HTTP request and routes it to a controller
//! 2. **Controller** validates the DTO into service parameters
//! 3. **Service** loads the aggregate, applies a transition and persists it with
//!    its events in one transaction
//! 4. **Controller** converts the domain model to a DTO and responds
//! 5. **Scheduler** later relays the events to the mailer and the provisioner

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;

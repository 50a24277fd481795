//! HTTP request handlers.
//!
//! Controllers convert request DTOs into validated service parameters, call the
//! service layer and convert the resulting domain models back into DTOs. Every
//! handler is annotated with `utoipa::path` so the router can publish the
//! OpenAPI document.

pub mod group;
pub mod health;
pub mod registration;

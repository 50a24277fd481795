//! API data transfer objects shared by the HTTP layer.

pub mod api;
pub mod group;
pub mod registration;

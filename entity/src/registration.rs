use sea_orm::entity::prelude::*;

/// Student self-registration in progress or finished.
///
/// `active_email` mirrors `email` only while the registration is `pending` or
/// `verified` and is `NULL` otherwise. Its unique index is what guarantees a
/// single in-flight registration per address.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "registration")]
pub struct Model {
    /// UUID string.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub email: String,
    #[sea_orm(unique)]
    pub active_email: Option<String>,
    /// One of `pending`, `verified`, `completed`, `expired`.
    pub status: String,
    pub verification_code: String,
    pub code_attempts: i32,
    pub code_expires_at: DateTimeUtc,
    pub resend_available_at: DateTimeUtc,
    pub verified_at: Option<DateTimeUtc>,
    pub completed_at: Option<DateTimeUtc>,
    #[sea_orm(unique)]
    pub barcode: Option<String>,
    /// Optimistic concurrency token, bumped on every update.
    pub version: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use chrono::{Duration, Utc};
use sea_orm::DatabaseConnection;
use test_utils::{builder::TestBuilder, context::TestContext};

use crate::server::{
    config::{OutboxSettings, RegistrationPolicy},
    service::registration::RegistrationService,
    util::{clock::ManualClock, password::PasswordHasher},
};


/// Everything a service under test borrows, backed by an in-memory database.
struct Fixture {
    test: TestContext,
    policy: RegistrationPolicy,
    outbox: OutboxSettings,
    clock: ManualClock,
    hasher: PasswordHasher,
}

impl Fixture {
    /// Creates the registration tables. The clock starts one second ahead of
    /// wall time so rows seeded with factory defaults are already in the past.
    async fn new() -> Self {
        let test = TestBuilder::new()
            .with_registration_tables()
            .build()
            .await
            .unwrap();

        Self {
            test,
            policy: RegistrationPolicy::default(),
            outbox: OutboxSettings::default(),
            clock: ManualClock::new(Utc::now() + Duration::seconds(1)),
            hasher: PasswordHasher::new(1_000),
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.test.db.as_ref().unwrap()
    }

    fn registrations(&self) -> RegistrationService<'_> {
        RegistrationService::new(self.db(), &self.policy, &self.clock, &self.hasher)
    }
}

//! Background jobs.
//!
//! Both jobs run on one `tokio-cron-scheduler` instance:
//! - `outbox_relay` delivers committed events every five seconds
//! - `registration_expiry` releases lapsed registrations every minute
//!
//! A tick that fires while the previous run of the same job is still going is
//! skipped, so a slow relay run never overlaps the next one.

pub mod outbox_relay;
pub mod registration_expiry;

use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio_cron_scheduler::JobScheduler;

use crate::server::{error::AppError, state::AppState};

/// Creates the scheduler, registers every job and starts it.
///
/// # Arguments
/// - `state` - Application state the jobs build their services from
///
/// # Returns
/// - `Ok(JobScheduler)` - Running scheduler; keep it to shut it down
/// - `Err(AppError::SchedulerErr)` - A job could not be created or the scheduler failed to start
pub async fn start_scheduler(state: AppState) -> Result<JobScheduler, AppError> {
    let scheduler = JobScheduler::new().await?;

    scheduler.add(outbox_relay::job(state.clone())?).await?;
    scheduler.add(registration_expiry::job(state)?).await?;
    scheduler.start().await?;

    tracing::info!("Background scheduler started");

    Ok(scheduler)
}

/// Lets at most one run of a job proceed at a time.
#[derive(Clone, Default)]
pub struct RunGuard(Arc<Mutex<()>>);

impl RunGuard {
    /// Claims the job for one run.
    ///
    /// # Returns
    /// - `Some(guard)` - No run in progress; the claim lasts until the guard is dropped
    /// - `None` - Another run still holds the claim
    pub fn try_claim(&self) -> Option<OwnedMutexGuard<()>> {
        self.0.clone().try_lock_owned().ok()
    }
}

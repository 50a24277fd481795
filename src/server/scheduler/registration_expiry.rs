use tokio_cron_scheduler::Job;

use crate::server::{error::AppError, scheduler::RunGuard, state::AppState};

/// At the start of every minute.
const SCHEDULE: &str = "0 * * * * *";

/// Registrations examined per sweep.
const SWEEP_LIMIT: u64 = 500;

/// Builds the job that expires lapsed registrations.
pub fn job(state: AppState) -> Result<Job, AppError> {
    let running = RunGuard::default();

    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let state = state.clone();
        let running = running.clone();

        Box::pin(async move {
            let Some(_claim) = running.try_claim() else {
                tracing::warn!("Registration expiry still running, skipping tick");
                return;
            };

            if let Err(e) = state.registration_service().expire_lapsed(SWEEP_LIMIT).await {
                tracing::error!("Error expiring lapsed registrations: {}", e);
            }
        })
    })?;

    Ok(job)
}

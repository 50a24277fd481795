use tokio_cron_scheduler::Job;

use crate::server::{error::AppError, scheduler::RunGuard, state::AppState};

/// Every five seconds.
const SCHEDULE: &str = "*/5 * * * * *";

/// Builds the job that relays due outbox events.
pub fn job(state: AppState) -> Result<Job, AppError> {
    let running = RunGuard::default();

    let job = Job::new_async(SCHEDULE, move |_uuid, _lock| {
        let state = state.clone();
        let running = running.clone();

        Box::pin(async move {
            let Some(_claim) = running.try_claim() else {
                tracing::warn!("Outbox relay still running, skipping tick");
                return;
            };

            if let Err(e) = state.outbox_relay().relay_due().await {
                tracing::error!("Error relaying outbox events: {}", e);
            }
        })
    })?;

    Ok(job)
}

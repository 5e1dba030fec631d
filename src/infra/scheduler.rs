use std::sync::Arc;
use std::time::Duration;

use chrono::{Days, NaiveDateTime, Utc};
use tracing::{error, info};

use crate::use_cases::subscriber::SubscriberUseCases;

const FALLBACK_WAIT_SECS: u64 = 60 * 60;

/// Runs reconcile and the reminder sweep once a day at `run_hour` UTC. Never returns.
pub async fn run_daily_jobs_loop(subscriber_use_cases: Arc<SubscriberUseCases>, run_hour: u32) {
    info!(run_hour, "Daily subscription jobs scheduled (UTC)");

    loop {
        let wait = until_next_run(Utc::now().naive_utc(), run_hour);
        info!(wait_secs = wait.as_secs(), "Next daily run scheduled");
        tokio::time::sleep(wait).await;

        run_daily_jobs(&subscriber_use_cases).await;
    }
}

pub async fn run_daily_jobs(subscriber_use_cases: &SubscriberUseCases) {
    match subscriber_use_cases.reconcile().await {
        Ok(demoted) => info!(demoted, "Daily reconcile finished"),
        Err(e) => error!(error = ?e, "Daily reconcile failed"),
    }

    // Reconcile failing must not cost anyone their reminder.
    if let Err(e) = subscriber_use_cases.send_due_reminders().await {
        error!(error = ?e, "Reminder sweep failed");
    }
}

/// Time from `now` until the next `run_hour:00:00`, strictly in the future.
fn until_next_run(now: NaiveDateTime, run_hour: u32) -> Duration {
    let Some(today_run) = now.date().and_hms_opt(run_hour, 0, 0) else {
        return Duration::from_secs(FALLBACK_WAIT_SECS);
    };
    let next = if today_run > now {
        Some(today_run)
    } else {
        today_run.checked_add_days(Days::new(1))
    };
    next.and_then(|next| (next - now).to_std().ok())
        .unwrap_or(Duration::from_secs(FALLBACK_WAIT_SECS))
}

//! Schedule command implementation
//!
//! Recurring extraction loop: one run per interval, with a single retry after
//! a fixed delay when a run fails. A run that fails twice is logged and the
//! loop continues to the next interval.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use chrono::Utc;
use specialsits_core::config::Settings;

use crate::cli::ScheduleArgs;
use crate::commands::extract;
use crate::output::OutputWriter;

pub async fn execute(args: ScheduleArgs, output: &OutputWriter) -> Result<()> {
    let settings = Settings::from_env();
    let interval = Duration::from_secs(args.every_hours * 3600);
    let retry_delay = Duration::from_secs(args.retry_delay_secs);

    output.info(format!(
        "Scheduling extraction of '{}' every {} hour(s), one retry after {}s on failure",
        args.extract.dataset, args.every_hours, args.retry_delay_secs
    ));

    loop {
        let started = Utc::now();
        tracing::info!(run_at = %started.format("%Y-%m-%d %H:%M:%S UTC"), "Starting scheduled run");

        let outcome =
            run_with_retry(|| extract::run(&args.extract, &settings), retry_delay).await;

        match outcome {
            Ok(report) => {
                output.success(format!("Run at {} succeeded", started.format("%H:%M:%S")));
                if output.is_json() {
                    output.result(&report)?;
                }
            }
            Err(err) => {
                output.warning(format!("Run at {} failed twice: {:#}", started.format("%H:%M:%S"), err));
            }
        }

        let next = Utc::now() + chrono::Duration::from_std(interval)?;
        tracing::info!(next_run = %next.format("%Y-%m-%d %H:%M:%S UTC"), "Sleeping until next run");
        tokio::time::sleep(interval).await;
    }
}

/// Attempt a job, retrying exactly once after `retry_delay` on failure.
async fn run_with_retry<F, Fut, T>(job: F, retry_delay: Duration) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    match job().await {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(error = %err, delay_secs = retry_delay.as_secs(), "Run failed, retrying once");
            tokio::time::sleep(retry_delay).await;
            job().await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn succeeds_without_retry() {
        let attempts = AtomicUsize::new(0);
        let result = run_with_retry(
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Ok::<_, anyhow::Error>(42)
            },
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(result, 42);
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retries_exactly_once_then_succeeds() {
        let attempts = AtomicUsize::new(0);
        let result = run_with_retry(
            || async {
                let n = attempts.fetch_add(1, Ordering::SeqCst);
                if n == 0 {
                    anyhow::bail!("transient failure")
                }
                Ok(7)
            },
            Duration::ZERO,
        )
        .await
        .unwrap();

        assert_eq!(result, 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn second_failure_propagates() {
        let attempts = AtomicUsize::new(0);
        let err = run_with_retry(
            || async {
                attempts.fetch_add(1, Ordering::SeqCst);
                Err::<(), _>(anyhow::anyhow!("still down"))
            },
            Duration::ZERO,
        )
        .await
        .unwrap_err();

        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(err.to_string().contains("still down"));
    }
}

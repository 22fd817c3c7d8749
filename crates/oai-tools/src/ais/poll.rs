//! Run status polling with bounded attempts and exponential backoff.

use crate::{Error, Result};
use async_openai::types::RunStatus;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;

// region:    --- Run Phase

/// Coarse classification of a run status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
	/// queued, in_progress, cancelling, requires_action
	Pending,
	Completed,
	/// failed, cancelled, expired
	Ended,
}

impl From<&RunStatus> for RunPhase {
	fn from(status: &RunStatus) -> Self {
		match status {
			RunStatus::Completed => RunPhase::Completed,
			RunStatus::Failed | RunStatus::Cancelled | RunStatus::Expired => RunPhase::Ended,
			_ => RunPhase::Pending,
		}
	}
}

// endregion: --- Run Phase

// region:    --- Poll Policy

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
	initial_interval: Duration,
	max_interval: Duration,
	multiplier: f64,
	max_attempts: u32,
}

impl PollPolicy {
	/// A `multiplier` below 1.0 (or not finite) is taken as 1.0, i.e. a fixed interval.
	pub fn new(
		initial_interval: Duration,
		max_interval: Duration,
		multiplier: f64,
		max_attempts: u32,
	) -> Self {
		let multiplier = if multiplier.is_finite() && multiplier >= 1.0 {
			multiplier
		} else {
			1.0
		};
		Self {
			initial_interval: initial_interval.min(max_interval),
			max_interval,
			multiplier,
			max_attempts,
		}
	}

	pub fn initial_interval(&self) -> Duration {
		self.initial_interval
	}

	pub fn max_attempts(&self) -> u32 {
		self.max_attempts
	}

	pub fn next_interval(&self, current: Duration) -> Duration {
		Duration::try_from_secs_f64(current.as_secs_f64() * self.multiplier)
			.unwrap_or(self.max_interval)
			.min(self.max_interval)
	}
}

impl Default for PollPolicy {
	fn default() -> Self {
		Self::new(Duration::from_millis(500), Duration::from_secs(8), 2.0, 60)
	}
}

// endregion: --- Poll Policy

// region:    --- Poller

/// Calls `fetch` (with the 1-based attempt number) until it returns a terminal status.
///
/// - `Completed` returns the status.
/// - `Failed | Cancelled | Expired` returns `Error::RunEnded`.
/// - After `max_attempts` pending observations, returns `Error::RunPollExhausted`.
///
/// The first fetch happens right away; the sleep between fetches grows per the policy.
pub async fn poll_until_terminal<F, Fut>(policy: &PollPolicy, mut fetch: F) -> Result<RunStatus>
where
	F: FnMut(u32) -> Fut,
	Fut: Future<Output = Result<RunStatus>>,
{
	let mut interval = policy.initial_interval;
	let mut last_status = None;

	for attempt in 1..=policy.max_attempts {
		let status = fetch(attempt).await?;

		match RunPhase::from(&status) {
			RunPhase::Completed => return Ok(status),
			RunPhase::Ended => return Err(Error::RunEnded(status)),
			RunPhase::Pending => (),
		}
		last_status = Some(status);

		if attempt < policy.max_attempts {
			sleep(interval).await;
			interval = policy.next_interval(interval);
		}
	}

	Err(Error::RunPollExhausted {
		attempts: policy.max_attempts,
		last_status,
	})
}

// endregion: --- Poller

// region:    --- Tests


// endregion: --- Tests

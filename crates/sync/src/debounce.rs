//! Single-slot debounce timer.

use std::time::Duration;

use tokio::time::{Instant, sleep_until};

/// A deadline that is pushed back by every [`schedule`](Self::schedule).
///
/// Only one deadline exists at a time; scheduling again replaces it.
#[derive(Debug, Clone)]
pub struct Debouncer {
	delay: Duration,
	deadline: Option<Instant>,
}

impl Debouncer {
	pub fn new(delay: Duration) -> Self {
		Self { delay, deadline: None }
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Arms the timer to fire `delay` from now, replacing any pending deadline.
	pub fn schedule(&mut self) {
		self.deadline = Some(Instant::now() + self.delay);
	}

	/// Disarms the timer. Returns true if a deadline was pending.
	pub fn cancel(&mut self) -> bool {
		self.deadline.take().is_some()
	}

	pub fn is_pending(&self) -> bool {
		self.deadline.is_some()
	}

	/// Completes when the pending deadline passes and disarms the timer.
	///
	/// Never completes while disarmed. Cancel safe: dropping the future
	/// leaves the deadline in place.
	pub async fn elapsed(&mut self) {
		let Some(deadline) = self.deadline else {
			return std::future::pending().await;
		};
		sleep_until(deadline).await;
		self.deadline = None;
	}
}

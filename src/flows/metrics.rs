// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::obs::FlowKind;

/// Thread-safe counters for login flows run by one coordinator.
#[derive(Debug, Default)]
pub struct LoginMetrics {
	attempts: AtomicU64,
	success: AtomicU64,
	failure: AtomicU64,
	retries: AtomicU64,
	joined: AtomicU64,
	reused: AtomicU64,
	guest: AtomicU64,
	credential: AtomicU64,
	refresh: AtomicU64,
	callback: AtomicU64,
}
impl LoginMetrics {
	/// Returns the number of login flows started (joined callers excluded).
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of successful logins, including stored-session reuses.
	pub fn successes(&self) -> u64 {
		self.success.load(Ordering::Relaxed)
	}

	/// Returns the number of failed logins.
	pub fn failures(&self) -> u64 {
		self.failure.load(Ordering::Relaxed)
	}

	/// Returns how often an expired session triggered the automatic retry.
	pub fn retries(&self) -> u64 {
		self.retries.load(Ordering::Relaxed)
	}

	/// Returns how many callers received the outcome of a login already in flight.
	pub fn joined(&self) -> u64 {
		self.joined.load(Ordering::Relaxed)
	}

	/// Returns how many logins were satisfied by a still-valid stored session without
	/// contacting the identity provider.
	pub fn reuses(&self) -> u64 {
		self.reused.load(Ordering::Relaxed)
	}

	/// Returns how many identity-provider exchanges of `kind` were started, retries included.
	///
	/// Kinds that are not login flows always read zero.
	pub fn flow_attempts(&self, kind: FlowKind) -> u64 {
		self.flow_counter(kind).map_or(0, |counter| counter.load(Ordering::Relaxed))
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_success(&self) {
		self.success.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failure.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_retry(&self) {
		self.retries.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_join(&self) {
		self.joined.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_reuse(&self) {
		self.reused.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_flow(&self, kind: FlowKind) {
		if let Some(counter) = self.flow_counter(kind) {
			counter.fetch_add(1, Ordering::Relaxed);
		}
	}

	fn flow_counter(&self, kind: FlowKind) -> Option<&AtomicU64> {
		match kind {
			FlowKind::GuestLogin => Some(&self.guest),
			FlowKind::CredentialLogin => Some(&self.credential),
			FlowKind::Refresh => Some(&self.refresh),
			FlowKind::Callback => Some(&self.callback),
			_ => None,
		}
	}
}

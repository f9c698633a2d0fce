//! Optional observability helpers for session flows.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `commerce_session.flow` with the `flow`
//!   and `stage` (call site) fields.
//! - Enable `metrics` to increment the `commerce_session_flow_total` counter for every
//!   attempt/success/failure, labeled by `flow` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Flow kinds observed by the session layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Guest session bootstrap (authorize + PKCE token exchange).
	GuestLogin,
	/// Email/password login via PKCE.
	CredentialLogin,
	/// Refresh token grant.
	Refresh,
	/// Out-of-band redirect callback exchange.
	Callback,
	/// Session teardown.
	Logout,
	/// Raw API dispatch (transport failures only).
	Dispatch,
	/// Basket reconciliation pass.
	BasketSync,
	/// Product list mutation or hydration.
	ProductList,
}
impl FlowKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::GuestLogin => "guest_login",
			FlowKind::CredentialLogin => "credential_login",
			FlowKind::Refresh => "refresh",
			FlowKind::Callback => "callback",
			FlowKind::Logout => "logout",
			FlowKind::Dispatch => "dispatch",
			FlowKind::BasketSync => "basket_sync",
			FlowKind::ProductList => "product_list",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a session helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

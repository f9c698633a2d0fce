//! Auth coordinator: single-flight login/logout orchestration.
//!
//! [`AuthCoordinator`] owns the session store and decides which login flow runs:
//!
//! - `login(None)` reuses a stored token that is still valid, refreshes with a stored refresh
//!   token, or bootstraps a guest session;
//! - `login(Some(credentials))` runs the email/password PKCE flow;
//! - [`AuthCoordinator::handle_callback`] finishes a PKCE flow whose redirect arrived out of
//!   band.
//!
//! Every flow runs behind one async guard. A caller that arrives while a flow is in flight
//! waits for it and receives its outcome instead of starting another. An
//! [`Error::ExpiredToken`] outcome clears the stored session and retries exactly once.

pub mod common;
pub mod pkce;

mod credentials;
mod guest;
mod metrics;
mod refresh;
mod session;

pub use metrics::LoginMetrics;
pub use pkce::{CallbackParams, PkcePair};
pub use session::Session;

// self
use crate::{
	_prelude::*,
	api::{CommerceClient, TransportErrorMapper},
	auth::{AuthToken, Credentials},
	http::CommerceHttpClient,
	obs::{self, FlowKind},
	store::{SessionStore, StoreKey},
};
use session::StoredSession;

type FlightOutcome = std::result::Result<Arc<Session>, String>;

#[derive(Default)]
struct Flights {
	generation: u64,
	last: Option<FlightOutcome>,
}

#[derive(Clone, Copy)]
enum LoginRequest<'a> {
	Resume,
	Credentials(&'a Credentials),
	Callback(&'a str),
}

/// Coordinates logins against the identity provider and owns the session store.
pub struct AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	client: Arc<CommerceClient<C, M>>,
	store: Arc<dyn SessionStore>,
	metrics: Arc<LoginMetrics>,
	login_guard: AsyncMutex<()>,
	flights: Mutex<Flights>,
	current: RwLock<Option<Arc<Session>>>,
}
impl<C, M> AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	/// Creates a coordinator persisting into `store`.
	pub fn new(client: Arc<CommerceClient<C, M>>, store: Arc<dyn SessionStore>) -> Self {
		Self {
			client,
			store,
			metrics: Default::default(),
			login_guard: AsyncMutex::new(()),
			flights: Default::default(),
			current: Default::default(),
		}
	}

	/// Session store shared with the interceptor.
	pub fn store(&self) -> &dyn SessionStore {
		self.store.as_ref()
	}

	/// Login counters.
	pub fn metrics(&self) -> &LoginMetrics {
		&self.metrics
	}

	/// Last session produced by this coordinator, if any.
	pub fn session(&self) -> Option<Arc<Session>> {
		self.current.read().clone()
	}

	/// Returns `true` while a login flow holds the guard.
	pub fn is_login_pending(&self) -> bool {
		self.login_guard.try_lock().is_none()
	}

	/// Resolves once no login flow is in flight.
	pub async fn wait_for_pending_login(&self) {
		drop(self.login_guard.lock().await);
	}

	/// Reads the stored bearer token; undecodable values read as `None`.
	pub async fn current_token(&self) -> Result<Option<AuthToken>> {
		Ok(self
			.store
			.get(StoreKey::AccessToken)
			.await?
			.and_then(|raw| AuthToken::parse(&raw).ok()))
	}

	/// Ensures a session exists, logging in with `credentials` when supplied.
	///
	/// Without credentials the stored session is reused while its token is valid, then a
	/// refresh is attempted, then a guest session is created. A caller arriving while another
	/// login is in flight receives that login's outcome; a failure is reported to it as
	/// [`Error::PendingLogin`].
	pub async fn login(&self, credentials: Option<Credentials>) -> Result<Arc<Session>> {
		let request = match &credentials {
			Some(credentials) => LoginRequest::Credentials(credentials),
			None => LoginRequest::Resume,
		};

		self.single_flight(request).await
	}

	/// Completes a PKCE login from its redirect URL (`/callback?code=..&usid=..`).
	///
	/// The stashed code verifier is consumed whether or not the exchange succeeds.
	pub async fn handle_callback(&self, url: &str) -> Result<Arc<Session>> {
		self.single_flight(LoginRequest::Callback(url)).await
	}

	/// Clears the stored session and, when `login_as_guest_after` is set, starts a guest
	/// session right away and returns it.
	pub async fn logout(&self, login_as_guest_after: bool) -> Result<Option<Arc<Session>>> {
		obs::observe(FlowKind::Logout, "logout", async {
			let _guard = self.login_guard.lock().await;

			self.clear_local().await
		})
		.await?;

		if !login_as_guest_after {
			return Ok(None);
		}

		self.login(None).await.map(Some)
	}

	async fn single_flight(&self, request: LoginRequest<'_>) -> Result<Arc<Session>> {
		let ticket = self.flights.lock().generation;
		let _guard = self.login_guard.lock().await;

		{
			let flights = self.flights.lock();

			if flights.generation != ticket
				&& let Some(outcome) = &flights.last
			{
				self.metrics.record_join();

				return outcome.clone().map_err(|reason| Error::PendingLogin { reason });
			}
		}

		self.metrics.record_attempt();

		let result = self.login_with_retry(request).await;

		match &result {
			Ok(_) => self.metrics.record_success(),
			Err(_) => self.metrics.record_failure(),
		}

		let mut flights = self.flights.lock();

		flights.generation = flights.generation.wrapping_add(1);
		flights.last = Some(match &result {
			Ok(session) => Ok(session.clone()),
			Err(err) => Err(err.to_string()),
		});

		result
	}

	async fn login_with_retry(&self, request: LoginRequest<'_>) -> Result<Arc<Session>> {
		match self.run_login(request).await {
			Err(Error::ExpiredToken) => {
				self.metrics.record_retry();
				self.clear_local().await?;

				self.run_login(request).await
			},
			other => other,
		}
	}

	async fn run_login(&self, request: LoginRequest<'_>) -> Result<Arc<Session>> {
		let stored = StoredSession::load(self.store.as_ref()).await?;
		let session = match request {
			LoginRequest::Credentials(credentials) =>
				self.observed(
					FlowKind::CredentialLogin,
					self.credential_login(credentials, stored.usid.as_deref()),
				)
				.await?,
			LoginRequest::Callback(url) =>
				self.observed(FlowKind::Callback, self.exchange_callback(url)).await?,
			LoginRequest::Resume => {
				if let Some(session) = stored.valid_session(OffsetDateTime::now_utc()) {
					self.metrics.record_reuse();

					return Ok(self.reuse(session));
				}

				match stored.refresh_token.clone() {
					Some(refresh) =>
						self.observed(
							FlowKind::Refresh,
							self.refresh_login(refresh, stored.usid.as_deref()),
						)
						.await?,
					None => self.observed(FlowKind::GuestLogin, self.guest_login(&stored)).await?,
				}
			},
		};

		session.persist(self.store.as_ref()).await?;

		let session = Arc::new(session);

		*self.current.write() = Some(session.clone());

		Ok(session)
	}

	// Runs one identity-provider exchange under its own flow label.
	async fn observed<Fut>(&self, kind: FlowKind, exchange: Fut) -> Result<Session>
	where
		Fut: Future<Output = Result<Session>>,
	{
		self.metrics.record_flow(kind);

		let result = obs::observe(kind, "login", exchange).await;

		if matches!(result, Err(Error::ExpiredToken)) {
			obs::record_warning(kind, "Stored session was rejected; clearing it and retrying once.");
		}

		result
	}

	// Keeps handing out the same `Arc` while the stored session is unchanged.
	fn reuse(&self, session: Session) -> Arc<Session> {
		let mut current = self.current.write();

		if let Some(existing) = current.as_ref().filter(|existing| ***existing == session) {
			return existing.clone();
		}

		let session = Arc::new(session);

		*current = Some(session.clone());

		session
	}

	async fn clear_local(&self) -> Result<()> {
		*self.current.write() = None;

		session::clear(self.store.as_ref()).await
	}
}
impl<C, M> Debug for AuthCoordinator<C, M>
where
	C: ?Sized + CommerceHttpClient,
	M: ?Sized + TransportErrorMapper<C::TransportError>,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AuthCoordinator")
			.field("login_pending", &self.is_login_pending())
			.field("metrics", &self.metrics)
			.finish()
	}
}

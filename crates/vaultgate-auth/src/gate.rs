//! The authentication gate state machine.
//!
//! One [`AuthGate`] lives for the process lifetime and decides, per secure
//! operation, whether a device credential prompt must be shown first. It owns
//! the session state (authenticated flag, background clock, retry counters)
//! behind a single mutex and serializes all credential prompts through one
//! async lock so at most one prompt is ever outstanding.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::debug;

use crate::clock::AuthClock;
use crate::error::{AuthError, Result};
use crate::prompt::{CredentialProvider, PromptOutcome};

/// Maximum number of authentication attempts per origin before the flow
/// aborts with a terminal error.
pub const MAX_AUTH_TRIES: u32 = 3;

/// Which caller class triggered an authentication request.
///
/// Selects the terminal error once the retry ceiling is exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOrigin {
    /// User-initiated authentication (unlocking the vault).
    Vault,
    /// Storage-triggered authentication (keystore demanded re-auth mid-operation).
    System,
}

/// Mutable session state, single-writer via the gate's mutex.
#[derive(Debug)]
struct Session {
    is_authenticated: bool,
    clock: AuthClock,
    vault_tries: u32,
    system_tries: u32,
}

impl Session {
    fn new() -> Self {
        Self {
            is_authenticated: false,
            clock: AuthClock::new(),
            vault_tries: 0,
            system_tries: 0,
        }
    }

    fn tries_mut(&mut self, origin: AuthOrigin) -> &mut u32 {
        match origin {
            AuthOrigin::Vault => &mut self.vault_tries,
            AuthOrigin::System => &mut self.system_tries,
        }
    }
}

/// Gate deciding when operations need a fresh device credential check.
pub struct AuthGate {
    session: Mutex<Session>,
    // Held across the provider await so a second auth trigger queues behind
    // an outstanding prompt instead of issuing another one.
    prompt_lock: tokio::sync::Mutex<()>,
    provider: Arc<dyn CredentialProvider>,
}

impl AuthGate {
    /// Create a gate in the unauthenticated state.
    pub fn new(provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            session: Mutex::new(Session::new()),
            prompt_lock: tokio::sync::Mutex::new(()),
            provider,
        }
    }

    /// Whether the next secure operation must re-authenticate.
    ///
    /// Side effect: if the background timeout has elapsed, this flips the
    /// session to unauthenticated before answering. Checking status can
    /// itself invalidate; callers depend on this invalidate-on-read policy.
    pub fn needs_authentication(&self) -> bool {
        self.needs_authentication_at(Utc::now())
    }

    fn needs_authentication_at(&self, now: DateTime<Utc>) -> bool {
        let mut session = self.session.lock();
        if session.clock.exceeded_timeout(now) {
            session.is_authenticated = false;
        }
        !session.is_authenticated
    }

    /// Run the gate for one operation: continue immediately when the session
    /// is still valid, otherwise prompt, counting the attempt against
    /// `origin`.
    ///
    /// The origin's counter is reset to 0 only on overall success.
    pub async fn authenticate_or_continue(&self, origin: AuthOrigin) -> Result<()> {
        if !self.needs_authentication() {
            return Ok(());
        }

        let attempt = {
            let mut session = self.session.lock();
            let tries = session.tries_mut(origin);
            *tries += 1;
            *tries
        };

        self.authenticate(origin, attempt).await?;

        let mut session = self.session.lock();
        *session.tries_mut(origin) = 0;
        Ok(())
    }

    /// Request one credential check for attempt number `attempt_no`.
    ///
    /// Past the retry ceiling this fails with the origin-specific terminal
    /// error without showing a prompt.
    pub async fn authenticate(&self, origin: AuthOrigin, attempt_no: u32) -> Result<()> {
        if attempt_no > MAX_AUTH_TRIES {
            let error = match origin {
                AuthOrigin::Vault => AuthError::MaxRetriesVault,
                AuthOrigin::System => AuthError::MaxRetriesSystem,
            };
            debug!(?origin, attempt_no, "retry ceiling reached");
            return Err(error);
        }

        let _outstanding = self.prompt_lock.lock().await;
        debug!(?origin, attempt_no, "requesting credential prompt");
        let outcome = self.provider.confirm_credential().await;

        let mut session = self.session.lock();
        session.clock.clear();
        match outcome {
            PromptOutcome::Confirmed => {
                session.is_authenticated = true;
                Ok(())
            }
            PromptOutcome::Denied => {
                session.is_authenticated = false;
                Err(AuthError::AuthenticationFailed)
            }
        }
    }

    /// Force the session to unauthenticated and forget the background
    /// timestamp. Does not cancel a prompt already in flight; it only makes
    /// the next gate check require re-authentication.
    pub fn invalidate(&self) {
        let mut session = self.session.lock();
        session.is_authenticated = false;
        session.clock.clear();
    }

    /// Change the background invalidation timeout.
    pub fn set_invalidation_timeout(&self, secs: u64) {
        self.session.lock().clock.set_timeout_secs(secs);
    }

    /// Lifecycle hook: the app went to the background now.
    pub fn note_backgrounded(&self) {
        self.note_backgrounded_at(Utc::now());
    }

    /// Lifecycle hook with an explicit timestamp, for hosts that deliver
    /// pause events late and for tests.
    pub fn note_backgrounded_at(&self, at: DateTime<Utc>) {
        self.session.lock().clock.note_backgrounded(at);
    }

    /// Current attempt count for `origin`.
    pub fn tries(&self, origin: AuthOrigin) -> u32 {
        let session = self.session.lock();
        match origin {
            AuthOrigin::Vault => session.vault_tries,
            AuthOrigin::System => session.system_tries,
        }
    }
}

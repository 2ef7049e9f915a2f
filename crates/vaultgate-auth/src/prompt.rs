//! Boundary to the platform "confirm device credential" flow.
//!
//! The host supplies the real implementation (keyguard, biometric prompt,
//! whatever the platform offers). [`ScriptedCredentialProvider`] is the
//! deterministic fake used throughout the test suite.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

/// Result of a platform credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// The user passed the device credential check.
    Confirmed,
    /// The user failed or dismissed the check.
    Denied,
}

/// Async boundary over the platform's confirm-device-credential flow.
///
/// Exactly one outcome is produced per call, asynchronously. When the
/// platform cannot produce a prompt at all (no credential configured) the
/// call never resolves; that degenerate case is inherited from the platform
/// contract and callers must not rely on completion. Callers must also not
/// issue a second prompt while one is outstanding; [`AuthGate`] enforces this
/// by serializing all prompt requests through a single lock.
///
/// [`AuthGate`]: crate::gate::AuthGate
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn confirm_credential(&self) -> PromptOutcome;
}

/// One scripted response for [`ScriptedCredentialProvider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptedPrompt {
    /// Resolve the prompt with success.
    Confirm,
    /// Resolve the prompt with failure.
    Deny,
    /// Never resolve, as when no device credential is configured.
    Unavailable,
}

/// Deterministic credential provider for tests.
///
/// Pops one scripted response per prompt. An exhausted script behaves like
/// [`ScriptedPrompt::Unavailable`] and pends forever, so tests fail by
/// timeout rather than by a silently confirmed prompt.
#[derive(Default)]
pub struct ScriptedCredentialProvider {
    script: Mutex<VecDeque<ScriptedPrompt>>,
    prompts_shown: AtomicUsize,
}

impl ScriptedCredentialProvider {
    pub fn new(script: impl IntoIterator<Item = ScriptedPrompt>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            prompts_shown: AtomicUsize::new(0),
        }
    }

    /// Append a response to the script.
    pub fn push(&self, prompt: ScriptedPrompt) {
        self.script.lock().push_back(prompt);
    }

    /// How many prompts have been requested so far.
    pub fn prompts_shown(&self) -> usize {
        self.prompts_shown.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialProvider for ScriptedCredentialProvider {
    async fn confirm_credential(&self) -> PromptOutcome {
        self.prompts_shown.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().pop_front();
        match next {
            Some(ScriptedPrompt::Confirm) => PromptOutcome::Confirmed,
            Some(ScriptedPrompt::Deny) => PromptOutcome::Denied,
            Some(ScriptedPrompt::Unavailable) | None => futures::future::pending().await,
        }
    }
}

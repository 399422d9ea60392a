//! In-memory session registry — sole owner of session lifetime.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use meridian_core::SessionToken;

use crate::session::SessionHandle;

/// Returned by [`SessionRegistry::create`] when the token is already taken.
/// Random token generation makes this unreachable in practice, but it is
/// checked rather than assumed.
#[derive(Debug, thiserror::Error)]
#[error("session token already registered: {0}")]
pub struct TokenConflict(pub SessionToken);

/// Mapping from session token to live session handle.
///
/// Mutated only on successful initialization (`create`) and on close
/// (`remove`); lookups are always by exact token, never by iteration.
/// Constructed in `server::start` and passed by `Arc` — never a global.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionToken, Arc<SessionHandle>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly minted session under its token.
    pub fn create(
        &self,
        token: SessionToken,
        handle: Arc<SessionHandle>,
    ) -> Result<(), TokenConflict> {
        match self.sessions.entry(token) {
            Entry::Occupied(entry) => Err(TokenConflict(entry.key().clone())),
            Entry::Vacant(entry) => {
                entry.insert(handle);
                Ok(())
            }
        }
    }

    pub fn get(&self, token: &SessionToken) -> Option<Arc<SessionHandle>> {
        self.sessions.get(token).map(|entry| Arc::clone(entry.value()))
    }

    /// Remove a session. Absent tokens are a no-op, which keeps repeated
    /// close signals harmless.
    pub fn remove(&self, token: &SessionToken) {
        self.sessions.remove(token);
    }

    /// Number of live sessions.
    pub fn count(&self) -> usize {
        self.sessions.len()
    }
}

//! Session provider port.
//!
//! The engine never authenticates anyone itself; it asks the host for the
//! current user and refuses to act without one.

use uuid::Uuid;

/// Source of the acting user's identity.
pub trait SessionProvider: Send + Sync {
    /// The authenticated user, or `None` when no session exists.
    fn current_user(&self) -> Option<Uuid>;
}

/// Fixed identity, e.g. from configuration or a CLI flag.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSession {
    user_id: Option<Uuid>,
}

impl StaticSession {
    pub fn new(user_id: Option<Uuid>) -> Self {
        Self { user_id }
    }

    pub fn authenticated(user_id: Uuid) -> Self {
        Self::new(Some(user_id))
    }

    pub fn anonymous() -> Self {
        Self::new(None)
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<Uuid> {
        self.user_id
    }
}

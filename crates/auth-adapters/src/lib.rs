//! # auth-adapters
//!
//! [`SessionProvider`] implementations. Credentials are out of scope: a
//! session is simply "who is acting right now".

use domains::{SessionProvider, User};
use std::sync::RwLock;

/// A fixed actor, e.g. the `--as` user of a CLI invocation.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    user: Option<User>,
}

impl StaticSession {
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}

/// A session that can change hands at runtime. It only remembers who signed
/// in; the store re-reads that user's role and ban state on every call.
#[derive(Debug, Default)]
pub struct SwitchableSession {
    user: RwLock<Option<User>>,
}

impl SwitchableSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, user: User) {
        tracing::info!(user_id = %user.id, username = %user.username, "signed in");
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
    }

    pub fn sign_out(&self) {
        let previous = self.user.write().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(user) = previous {
            tracing::info!(user_id = %user.id, "signed out");
        }
    }
}

impl SessionProvider for SwitchableSession {
    fn current_user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domains::UserId;

    fn lester() -> User {
        User {
            id: UserId::from("user4"),
            username: "LesterCrest".into(),
            email: None,
            is_admin: false,
            is_banned: false,
            ban_end_date: None,
        }
    }

    #[test]
    fn static_session() {
        assert_eq!(StaticSession::anonymous().current_user(), None);
        assert_eq!(StaticSession::signed_in(lester()).current_user(), Some(lester()));
    }

    #[test]
    fn switchable_session_follows_sign_in_and_out() {
        let session = SwitchableSession::new();
        assert!(session.current_user().is_none());

        session.sign_in(lester());
        assert_eq!(session.current_user().unwrap().id, UserId::from("user4"));

        let mut other = lester();
        other.id = UserId::from("user2");
        session.sign_in(other);
        assert_eq!(session.current_user().unwrap().id, UserId::from("user2"));

        session.sign_out();
        assert!(session.current_user().is_none());
    }
}

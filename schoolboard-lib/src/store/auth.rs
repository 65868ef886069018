//! Signed-in user state.

use crate::auth::Session;

use super::Slice;

#[derive(Debug, Clone, PartialEq)]
pub enum AuthAction {
    SetCredentials(Session),
    Logout,
}

/// The credential record of the signed-in user, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthSlice {
    pub session: Option<Session>,
}

impl AuthSlice {
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// The signed-in user's profile, if the record carries one.
    pub fn user(&self) -> Option<&serde_json::Value> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }
}

impl Slice for AuthSlice {
    type Action = AuthAction;

    fn reduce(&mut self, action: AuthAction) {
        match action {
            AuthAction::SetCredentials(session) => self.session = Some(session),
            AuthAction::Logout => self.session = None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_logout() {
        let mut slice = AuthSlice::default();
        assert!(!slice.is_authenticated());

        let session = Session::new("tok").with_user(serde_json::json!({"name": "Ana"}));
        slice.reduce(AuthAction::SetCredentials(session));
        assert!(slice.is_authenticated());
        assert_eq!(slice.user().unwrap()["name"], "Ana");

        slice.reduce(AuthAction::Logout);
        assert!(slice.session.is_none());
    }
}

use serde::{Deserialize, Serialize};

/// Authenticated cashier session.
///
/// The token is opaque to the client: it is never decoded or checked for
/// expiry, only attached to requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, rename = "user")]
    pub username: String,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            username: username.into(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.is_empty())
    }

    pub fn clear(&mut self) {
        self.token = None;
        self.username.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_anonymous() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn test_empty_token_is_anonymous() {
        let session = Session::new("", "admin");
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new("abc", "admin");
        assert!(session.is_authenticated());
        session.clear();
        assert_eq!(session, Session::default());
    }
}

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::ActiveUser;

/// Tokens issued for a signed-in user.
///
/// Serializable so a front end can keep the user signed in between runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn user(&self) -> ActiveUser {
        ActiveUser {
            uid: self.uid.clone(),
            email: self.email.clone(),
        }
    }

    /// True if the id token is expired or will be within `margin` of `now`.
    pub fn expires_within(&self, margin: Duration, now: DateTime<Utc>) -> bool {
        self.expires_at - margin <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_at: DateTime<Utc>) -> Session {
        Session {
            uid: "user-1".to_string(),
            email: Some("cook@example.com".to_string()),
            id_token: "id".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at,
        }
    }

    #[test]
    fn test_expires_within() {
        let now = Utc::now();
        let margin = Duration::seconds(60);

        assert!(!session(now + Duration::seconds(3600)).expires_within(margin, now));
        assert!(session(now + Duration::seconds(30)).expires_within(margin, now));
        assert!(session(now - Duration::seconds(1)).expires_within(margin, now));
    }

    #[test]
    fn test_user() {
        let user = session(Utc::now()).user();
        assert_eq!(user.uid, "user-1");
        assert_eq!(user.email.as_deref(), Some("cook@example.com"));
    }
}

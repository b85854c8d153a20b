use std::{fmt, str::FromStr, sync::Mutex};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::SyncError;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = SyncError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        raw.trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| SyncError::invalid_input(format!("invalid user id '{}'", raw.trim())))
    }
}

/// Signed-in identity shared by every view of one app instance. It is owned
/// by the caller and passed in explicitly.
#[derive(Default)]
pub struct Session {
    current: Mutex<Option<UserId>>,
}

impl Session {
    pub fn signed_in(user: UserId) -> Self {
        Self {
            current: Mutex::new(Some(user)),
        }
    }

    pub fn sign_in(&self, user: UserId) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(user);
        info!(user_id = %user, "session signed in");
    }

    pub fn sign_out(&self) {
        let mut guard = self.current.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(user) = guard.take() {
            info!(user_id = %user, "session signed out");
        }
    }

    pub fn current_user(&self) -> Option<UserId> {
        *self.current.lock().unwrap_or_else(|p| p.into_inner())
    }

    pub fn require_user(&self) -> Result<UserId, SyncError> {
        self.current_user().ok_or_else(SyncError::missing_user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyncErrorCode;

    #[test]
    fn require_user_fails_until_signed_in() {
        let session = Session::default();
        assert_eq!(
            session.require_user().unwrap_err().code,
            SyncErrorCode::MissingUser
        );
        session.sign_in(UserId(4));
        assert_eq!(session.require_user().unwrap(), UserId(4));
        session.sign_out();
        assert!(session.current_user().is_none());
    }

    #[test]
    fn parses_user_ids() {
        assert_eq!(" 12 ".parse::<UserId>().unwrap(), UserId(12));
        assert_eq!(
            "abc".parse::<UserId>().unwrap_err().code,
            SyncErrorCode::InvalidInput
        );
    }

    #[test]
    fn user_id_serializes_as_plain_integer() {
        assert_eq!(serde_json::to_string(&UserId(9)).unwrap(), "9");
    }
}

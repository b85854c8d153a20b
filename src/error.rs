use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncErrorCode {
    MissingUser,
    InvalidInput,
    Unsupported,
    Network,
    Server,
    MalformedResponse,
    Config,
}

impl SyncErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingUser => "missing_user",
            Self::InvalidInput => "invalid_input",
            Self::Unsupported => "unsupported",
            Self::Network => "network",
            Self::Server => "server",
            Self::MalformedResponse => "malformed_response",
            Self::Config => "config",
        }
    }

    /// Precondition failures are refused before anything goes on the wire.
    pub fn is_local(self) -> bool {
        matches!(
            self,
            Self::MissingUser | Self::InvalidInput | Self::Unsupported | Self::Config
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncError {
    pub code: SyncErrorCode,
    pub message: String,
}

impl SyncError {
    pub fn new(code: SyncErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn missing_user() -> Self {
        Self::new(
            SyncErrorCode::MissingUser,
            "User not logged in or user data not available.",
        )
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::InvalidInput, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::Network, message)
    }

    pub fn server(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::Server, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::MalformedResponse, message)
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(SyncErrorCode::Config, message)
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyncError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_user_facing_message_only() {
        let err = SyncError::server("No pantry item found with that ID");
        assert_eq!(err.to_string(), "No pantry item found with that ID");
        assert_eq!(err.code.as_str(), "server");
    }

    #[test]
    fn local_codes_never_touch_the_network() {
        assert!(SyncErrorCode::MissingUser.is_local());
        assert!(SyncErrorCode::InvalidInput.is_local());
        assert!(!SyncErrorCode::Network.is_local());
        assert!(!SyncErrorCode::MalformedResponse.is_local());
    }

    #[test]
    fn serializes_code_in_snake_case() {
        let value = serde_json::to_value(SyncError::missing_user()).unwrap();
        assert_eq!(value["code"], "missing_user");
    }

    #[test]
    fn logged_code_matches_serialized_code() {
        for code in [
            SyncErrorCode::MissingUser,
            SyncErrorCode::InvalidInput,
            SyncErrorCode::Unsupported,
            SyncErrorCode::Network,
            SyncErrorCode::Server,
            SyncErrorCode::MalformedResponse,
            SyncErrorCode::Config,
        ] {
            assert_eq!(serde_json::to_value(code).unwrap(), code.as_str());
        }
    }
}

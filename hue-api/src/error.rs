use hue_client::HueError;
use thiserror::Error;

/// Error codes the bridge reports in its `{"error": {"type": ..}}` entries
pub mod error_codes {
    /// The credential used in the request path is not whitelisted
    pub const UNAUTHORIZED_USER: u16 = 1;
    /// The addressed resource does not exist
    pub const RESOURCE_NOT_AVAILABLE: u16 = 3;
    /// User creation was attempted without pressing the bridge's link button
    pub const LINK_BUTTON_NOT_PRESSED: u16 = 101;
    /// A state parameter cannot be changed while the light is off
    pub const DEVICE_OFF: u16 = 201;
}

/// High-level API errors for Hue bridge operations
///
/// This enum abstracts away the transport details of [`HueError`] and adds
/// the failure cases that only make sense at the API level.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network communication error
    ///
    /// The bridge could not be reached, timed out, or answered with a
    /// non-success HTTP status.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Response parsing error
    ///
    /// The bridge answered, but the payload did not have the expected shape.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Error entry reported by the bridge
    ///
    /// See [`error_codes`] for the codes this crate gives meaning to.
    #[error("Bridge error {code} at {address}: {description}")]
    Bridge {
        code: u16,
        address: String,
        description: String,
    },

    /// Invalid parameter value
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// An authenticated route was called without a credential
    #[error("No bridge credential available")]
    NotAuthenticated,
}

impl ApiError {
    /// Bridge error code, if this error came from the bridge
    pub fn bridge_code(&self) -> Option<u16> {
        match self {
            ApiError::Bridge { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the bridge refused to create a user because the link button was not pressed
    pub fn is_link_button_not_pressed(&self) -> bool {
        self.bridge_code() == Some(error_codes::LINK_BUTTON_NOT_PRESSED)
    }

    /// Whether the bridge rejected the credential
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::NotAuthenticated)
            || self.bridge_code() == Some(error_codes::UNAUTHORIZED_USER)
    }
}

/// Type alias for results that can return an ApiError
pub type Result<T> = std::result::Result<T, ApiError>;

impl From<HueError> for ApiError {
    fn from(error: HueError) -> Self {
        match error {
            HueError::Network(msg) => ApiError::NetworkError(msg),
            HueError::Parse(msg) => ApiError::ParseError(msg),
            HueError::Bridge {
                code,
                address,
                description,
            } => ApiError::Bridge {
                code,
                address,
                description,
            },
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        ApiError::ParseError(error.to_string())
    }
}

use hue_api::ApiError;
use thiserror::Error;

use crate::path::PathError;

#[derive(Error, Debug)]
pub enum AddonError {
    #[error("Missing required input \"{0}\"")]
    MissingInput(String),

    #[error("Invalid input \"{input}\": {reason}")]
    InvalidInput { input: String, reason: String },

    #[error("Supplied username \"{0}\" was not accepted.")]
    CredentialRejected(String),

    #[error("Please press the link button on your hub.")]
    LinkButtonNotPressed,

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Key path error: {0}")]
    Path(#[from] PathError),

    #[error("Invalid value for {variable}: {reason}")]
    InvalidValue { variable: String, reason: String },

    #[error("Resource serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

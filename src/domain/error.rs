use std::io;

use thiserror::Error;

/// Failure raised while confirming that a server can receive a publish.
///
/// Variants are ordered the way the checks run; the first failing check wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// URL is blank, malformed, or does not answer like a BI server.
    #[error("'{url}' is not a valid BI server URL")]
    InvalidServer { url: String },

    /// User id or password is blank.
    #[error("A user id and password are required to publish")]
    MissingCredentials,

    /// The server rejected the credentials (HTTP 401).
    #[error("Unable to authenticate user '{user}' against the BI server")]
    AuthenticationFailed { user: String },

    /// The authorization endpoints answered 404.
    #[error("The BI server URL '{url}' does not expose the publish API")]
    BadUrl { url: String },

    /// The account lacks a required capability.
    #[error("User '{user}' does not have permission to {action}")]
    Forbidden { user: String, action: String },
}

impl ValidationError {
    /// Dialog title for the failure category.
    pub fn title(&self) -> &'static str {
        match self {
            ValidationError::InvalidServer { .. } => "Invalid BI Server",
            ValidationError::MissingCredentials | ValidationError::AuthenticationFailed { .. } => {
                "Invalid Credentials"
            }
            ValidationError::BadUrl { .. } => "Invalid BI Server URL",
            ValidationError::Forbidden { .. } => "Permission Error",
        }
    }
}

/// Failure raised by the publish workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    /// A connection with this name already exists and override is off.
    #[error("Database connection '{0}' already exists on the server and override is disabled")]
    ConnectionExists(String),

    /// The server answered 409 CONFLICT for the resource.
    #[error("Data source '{0}' already exists on the server")]
    DuplicateDatasource(String),

    /// JNDI connections cannot be verified from outside the server.
    #[error("Database connection '{0}' uses JNDI access, which cannot be published")]
    JndiNotSupported(String),

    /// No preceding entry supplies a database connection.
    #[error("No preceding build-model entry supplies a database connection")]
    MissingDatabase,

    /// Model name is blank or contains forbidden characters.
    #[error("Invalid model name '{0}'")]
    InvalidModelName(String),

    /// The model document expected in job variables is absent.
    #[error("No generated model found for '{0}'")]
    MissingModelArtifact(String),

    /// The server answered with a failure status or code.
    #[error("Failed to publish {what}: {detail}")]
    PublishFailed { what: String, detail: String },

    /// The request never produced a response.
    #[error("Could not reach the BI server while {0}")]
    Transport(String),
}

impl PublishError {
    pub(crate) fn failed(what: impl Into<String>, detail: impl Into<String>) -> Self {
        PublishError::PublishFailed { what: what.into(), detail: detail.into() }
    }
}

/// Library-wide error type for bipub operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Underlying I/O failure.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Configuration or environment issue.
    #[error("{0}")]
    Configuration(String),

    /// Connection validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Publish workflow failed.
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// ACL access type string is not recognised.
    #[error("Invalid access type '{0}': must be one of EVERYONE, USER, ROLE")]
    InvalidAccessType(String),

    /// Requested job entry is absent.
    #[error("Job entry '{0}' not found")]
    JobEntryNotFound(String),

    /// JSON encoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to parse a persisted form.
    #[error("Failed to parse {what}: {details}")]
    ParseError { what: String, details: String },
}

impl AppError {
    pub fn config_error<S: Into<String>>(message: S) -> Self {
        AppError::Configuration(message.into())
    }
}

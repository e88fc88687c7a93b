use std::fmt;

/// Result code of a single publish primitive.
///
/// The discriminants are the literal codes the analysis import endpoint answers with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Failed = 2,
    Success = 3,
    Conflict = 4,
    CatalogExists = 8,
}

impl PublishOutcome {
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Parse a response body holding a code; anything unparseable is `Failed`.
    pub fn from_body(body: &str) -> Self {
        match body.trim().parse::<i32>() {
            Ok(3) => PublishOutcome::Success,
            Ok(4) => PublishOutcome::Conflict,
            Ok(8) => PublishOutcome::CatalogExists,
            _ => PublishOutcome::Failed,
        }
    }
}

/// Progress of one publish run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishState {
    NotStarted,
    DbConnectionPublished,
    MetadataPublished,
    SchemaPublished,
    Complete,
    RollingBack,
}

impl fmt::Display for PublishState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PublishState::NotStarted => "not-started",
            PublishState::DbConnectionPublished => "db-connection-published",
            PublishState::MetadataPublished => "metadata-published",
            PublishState::SchemaPublished => "schema-published",
            PublishState::Complete => "complete",
            PublishState::RollingBack => "rolling-back",
        };
        f.write_str(label)
    }
}

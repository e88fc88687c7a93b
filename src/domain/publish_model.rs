//! What to publish, to whom it is visible, and where it goes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::access_control::AccessControlModel;
use crate::domain::connection::ConnectionDescriptor;
use crate::domain::{AppError, PublishError};

/// Visibility of the published model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AclAccessType {
    #[default]
    Everyone,
    User,
    Role,
}

impl AclAccessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AclAccessType::Everyone => "EVERYONE",
            AclAccessType::User => "USER",
            AclAccessType::Role => "ROLE",
        }
    }
}

impl FromStr for AclAccessType {
    type Err = AppError;

    /// Blank means everyone.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "" | "EVERYONE" => Ok(AclAccessType::Everyone),
            "USER" => Ok(AclAccessType::User),
            "ROLE" => Ok(AclAccessType::Role),
            _ => Err(AppError::InvalidAccessType(s.to_string())),
        }
    }
}

impl fmt::Display for AclAccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishModel {
    pub model_name: String,
    pub override_existing: bool,
    pub user_or_role: String,
    pub access_type: AclAccessType,
    pub connection: ConnectionDescriptor,
}

impl PublishModel {
    /// Allow-list for the model, `None` when visible to everyone.
    pub fn access_control(&self) -> Option<AccessControlModel> {
        let recipient = self.user_or_role.trim();
        let mut acl = AccessControlModel::new();
        match self.access_type {
            AclAccessType::Everyone => return None,
            AclAccessType::User if !recipient.is_empty() => acl.add_user(recipient),
            AclAccessType::Role if !recipient.is_empty() => acl.add_role(recipient),
            _ => {}
        }
        if acl.is_empty() { None } else { Some(acl) }
    }
}

/// Reject blank names and names the server would treat as paths.
pub fn validate_model_name(name: &str) -> Result<(), PublishError> {
    let invalid = name.trim().is_empty()
        || name.chars().any(|c| c == '/' || c == '\\' || c.is_control());
    if invalid {
        return Err(PublishError::InvalidModelName(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_access_types() {
        assert_eq!("role".parse::<AclAccessType>().unwrap(), AclAccessType::Role);
        assert_eq!("".parse::<AclAccessType>().unwrap(), AclAccessType::Everyone);
        assert!(matches!(
            "GROUP".parse::<AclAccessType>(),
            Err(AppError::InvalidAccessType(value)) if value == "GROUP"
        ));
    }

    #[test]
    fn everyone_has_no_acl() {
        let model = PublishModel { user_or_role: "suzy".into(), ..Default::default() };
        assert!(model.access_control().is_none());
    }

    #[test]
    fn user_and_role_build_single_entry_acl() {
        let model = PublishModel {
            user_or_role: "suzy".into(),
            access_type: AclAccessType::User,
            ..Default::default()
        };
        assert_eq!(model.access_control().unwrap().users(), ["suzy".to_string()]);

        let model = PublishModel {
            user_or_role: "Analyst".into(),
            access_type: AclAccessType::Role,
            ..Default::default()
        };
        assert_eq!(model.access_control().unwrap().roles(), ["Analyst".to_string()]);
    }

    #[test]
    fn blank_recipient_yields_no_acl() {
        let model = PublishModel { access_type: AclAccessType::Role, ..Default::default() };
        assert!(model.access_control().is_none());
    }

    #[test]
    fn model_names_reject_separators_and_controls() {
        assert!(validate_model_name("sales").is_ok());
        assert!(validate_model_name("  ").is_err());
        assert!(validate_model_name("a/b").is_err());
        assert!(validate_model_name("a\\b").is_err());
        assert!(validate_model_name("a\tb").is_err());
    }
}

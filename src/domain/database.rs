//! Database connection descriptors and their wire form.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::variables::Variables;
use crate::domain::{AppError, PublishError};

/// How a client reaches the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatabaseAccessType {
    #[default]
    Native,
    Odbc,
    Oci,
    Plugin,
    Jndi,
}

/// Database vendors the BI server knows how to drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatabaseType {
    #[default]
    Postgres,
    MySql,
    Oracle,
    SqlServer,
    H2,
    Hypersonic,
    Generic,
}

impl DatabaseType {
    pub fn name(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "PostgreSQL",
            DatabaseType::MySql => "MySQL",
            DatabaseType::Oracle => "Oracle",
            DatabaseType::SqlServer => "MS SQL Server",
            DatabaseType::H2 => "H2",
            DatabaseType::Hypersonic => "Hypersonic",
            DatabaseType::Generic => "Generic database",
        }
    }

    pub fn short_name(&self) -> &'static str {
        match self {
            DatabaseType::Postgres => "POSTGRESQL",
            DatabaseType::MySql => "MYSQL",
            DatabaseType::Oracle => "ORACLE",
            DatabaseType::SqlServer => "MSSQL",
            DatabaseType::H2 => "H2",
            DatabaseType::Hypersonic => "HYPERSONIC",
            DatabaseType::Generic => "GENERIC",
        }
    }

    pub fn default_port(&self) -> i32 {
        match self {
            DatabaseType::Postgres => 5432,
            DatabaseType::MySql => 3306,
            DatabaseType::Oracle => 1521,
            DatabaseType::SqlServer => 1433,
            DatabaseType::H2 => 9092,
            DatabaseType::Hypersonic => 9001,
            DatabaseType::Generic => -1,
        }
    }

    fn supported_access_types(&self) -> Vec<DatabaseAccessType> {
        match self {
            DatabaseType::Oracle => vec![
                DatabaseAccessType::Native,
                DatabaseAccessType::Odbc,
                DatabaseAccessType::Oci,
                DatabaseAccessType::Jndi,
            ],
            _ => vec![DatabaseAccessType::Native, DatabaseAccessType::Odbc, DatabaseAccessType::Jndi],
        }
    }
}

impl FromStr for DatabaseType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSTGRESQL" | "POSTGRES" => Ok(DatabaseType::Postgres),
            "MYSQL" => Ok(DatabaseType::MySql),
            "ORACLE" => Ok(DatabaseType::Oracle),
            "MSSQL" | "MSSQLNATIVE" => Ok(DatabaseType::SqlServer),
            "H2" => Ok(DatabaseType::H2),
            "HYPERSONIC" => Ok(DatabaseType::Hypersonic),
            "GENERIC" => Ok(DatabaseType::Generic),
            other => Err(AppError::config_error(format!("Unknown database type '{other}'"))),
        }
    }
}

impl fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// A data-source connection as defined by the job that built the model.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DatabaseDescriptor {
    pub name: String,
    pub database_type: DatabaseType,
    pub access_type: DatabaseAccessType,
    pub hostname: String,
    pub port: String,
    pub database_name: String,
    pub username: String,
    pub password: String,
    pub extra_options: BTreeMap<String, String>,
    pub force_lower_case_identifiers: bool,
    pub quote_all_fields: bool,
}

impl fmt::Debug for DatabaseDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseDescriptor")
            .field("name", &self.name)
            .field("database_type", &self.database_type)
            .field("access_type", &self.access_type)
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("database_name", &self.database_name)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl DatabaseDescriptor {
    /// New descriptor with variables substituted in every text field.
    pub fn resolve(&self, variables: &Variables) -> Self {
        Self {
            name: variables.resolve(&self.name),
            hostname: variables.resolve(&self.hostname),
            port: variables.resolve(&self.port),
            database_name: variables.resolve(&self.database_name),
            username: variables.resolve(&self.username),
            password: variables.resolve(&self.password),
            extra_options: self
                .extra_options
                .iter()
                .map(|(k, v)| (k.clone(), variables.resolve(v)))
                .collect(),
            ..self.clone()
        }
    }

    pub fn is_jndi(&self) -> bool {
        self.access_type == DatabaseAccessType::Jndi
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseTypePayload {
    pub name: String,
    pub short_name: String,
    pub default_database_port: i32,
    pub supported_access_types: Vec<DatabaseAccessType>,
}

/// JSON body of the connection add/update endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub username: String,
    pub password: String,
    pub database_name: String,
    pub database_port: String,
    pub hostname: String,
    pub forcing_identifiers_to_lower_case: bool,
    pub quote_all_fields: bool,
    pub access_type: DatabaseAccessType,
    pub extra_options: BTreeMap<String, String>,
    pub database_type: DatabaseTypePayload,
}

impl ConnectionPayload {
    /// Map a descriptor to the wire form; `id` is set only when updating.
    pub fn from_descriptor(
        database: &DatabaseDescriptor,
        id: Option<String>,
    ) -> Result<Self, PublishError> {
        if database.is_jndi() {
            return Err(PublishError::JndiNotSupported(database.name.clone()));
        }

        let database_type = database.database_type;
        let port = if database.port.trim().is_empty() {
            database_type.default_port().to_string()
        } else {
            database.port.clone()
        };

        Ok(Self {
            id,
            name: database.name.clone(),
            username: database.username.clone(),
            password: database.password.clone(),
            database_name: database.database_name.clone(),
            database_port: port,
            hostname: database.hostname.clone(),
            forcing_identifiers_to_lower_case: database.force_lower_case_identifiers,
            quote_all_fields: database.quote_all_fields,
            access_type: database.access_type,
            extra_options: database.extra_options.clone(),
            database_type: DatabaseTypePayload {
                name: database_type.name().to_string(),
                short_name: database_type.short_name().to_string(),
                default_database_port: database_type.default_port(),
                supported_access_types: database_type.supported_access_types(),
            },
        })
    }
}

/// Subset of the connection lookup response the publisher cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteConnection {
    #[serde(default)]
    pub id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn postgres() -> DatabaseDescriptor {
        DatabaseDescriptor {
            name: "acme_db".into(),
            hostname: "db.internal".into(),
            database_name: "sales".into(),
            username: "etl".into(),
            password: "pw".into(),
            ..Default::default()
        }
    }

    #[test]
    fn payload_uses_vendor_default_port_when_blank() {
        let payload = ConnectionPayload::from_descriptor(&postgres(), None).unwrap();
        assert_eq!(payload.database_port, "5432");
        assert_eq!(payload.database_type.short_name, "POSTGRESQL");
        assert!(payload.id.is_none());
    }

    #[test]
    fn payload_serializes_camel_case_and_skips_missing_id() {
        let payload = ConnectionPayload::from_descriptor(&postgres(), None).unwrap();
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["databaseName"], "sales");
        assert_eq!(json["accessType"], "NATIVE");
        assert_eq!(json["forcingIdentifiersToLowerCase"], false);
        assert!(json.get("id").is_none());

        let with_id = ConnectionPayload::from_descriptor(&postgres(), Some("42".into())).unwrap();
        assert_eq!(serde_json::to_value(&with_id).unwrap()["id"], "42");
    }

    #[test]
    fn jndi_databases_are_rejected() {
        let db = DatabaseDescriptor { access_type: DatabaseAccessType::Jndi, ..postgres() };
        let err = ConnectionPayload::from_descriptor(&db, None).unwrap_err();
        assert_eq!(err, PublishError::JndiNotSupported("acme_db".into()));
    }

    #[test]
    fn parses_vendor_names() {
        assert_eq!("postgresql".parse::<DatabaseType>().unwrap(), DatabaseType::Postgres);
        assert_eq!("MSSQL".parse::<DatabaseType>().unwrap(), DatabaseType::SqlServer);
        assert!("dbase".parse::<DatabaseType>().is_err());
    }

    #[test]
    fn resolve_substitutes_variables() {
        let mut vars = Variables::new();
        vars.set("DB_HOST", "10.0.0.5");
        let db = DatabaseDescriptor { hostname: "${DB_HOST}".into(), ..postgres() };
        assert_eq!(db.resolve(&vars).hostname, "10.0.0.5");
        assert_eq!(db.hostname, "${DB_HOST}");
    }
}

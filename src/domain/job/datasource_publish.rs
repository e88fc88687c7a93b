//! Persisted settings of the datasource publish entry.

use std::fmt;

use crate::domain::connection::ConnectionDescriptor;
use crate::domain::job::attributes::RepositoryAttributes;
use crate::domain::password::{
    decrypt_password_optionally_encrypted, encrypt_password_if_not_using_variables,
};
use crate::domain::publish_model::{AclAccessType, PublishModel};
use crate::domain::variables::Variables;
use crate::domain::{AppError, xml};

const SERVER_URL: &str = "server_url";
const SERVER_USER_ID: &str = "server_user_id";
const SERVER_PASSWORD: &str = "server_password";
const MODEL_NAME: &str = "model_name";
const OVERRIDE: &str = "override";
const ACL_ACCESS_TYPE: &str = "acl_access_type";
const ACL_USER_OR_ROLE: &str = "acl_user_or_role";

/// Settings of one publish entry.
///
/// The password is held in clear in memory and obscured whenever it is persisted.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DatasourcePublishEntry {
    pub server_url: String,
    pub server_user_id: String,
    pub server_password: String,
    /// Blank means "use the model of the preceding build-model entry".
    pub model_name: String,
    pub override_existing: bool,
    pub acl_access_type: String,
    pub acl_user_or_role: String,
}

impl fmt::Debug for DatasourcePublishEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatasourcePublishEntry")
            .field("server_url", &self.server_url)
            .field("server_user_id", &self.server_user_id)
            .field("server_password", &"[REDACTED]")
            .field("model_name", &self.model_name)
            .field("override_existing", &self.override_existing)
            .field("acl_access_type", &self.acl_access_type)
            .field("acl_user_or_role", &self.acl_user_or_role)
            .finish()
    }
}

impl DatasourcePublishEntry {
    pub fn connection(&self) -> ConnectionDescriptor {
        ConnectionDescriptor::new(&self.server_url, &self.server_user_id, &self.server_password)
    }

    /// Resolve variables into a publish model.
    ///
    /// The model name may still be blank; the caller fills it from the job graph.
    pub fn to_publish_model(&self, variables: &Variables) -> Result<PublishModel, AppError> {
        let access_type: AclAccessType = variables.resolve(&self.acl_access_type).parse()?;
        Ok(PublishModel {
            model_name: variables.resolve(&self.model_name).trim().to_string(),
            override_existing: self.override_existing,
            user_or_role: variables.resolve(&self.acl_user_or_role),
            access_type,
            connection: self.connection().resolve(variables),
        })
    }

    pub fn to_xml(&self) -> String {
        let password = encrypt_password_if_not_using_variables(&self.server_password);
        let lines = [
            xml::tag(SERVER_URL, &self.server_url),
            xml::tag(SERVER_USER_ID, &self.server_user_id),
            xml::tag(SERVER_PASSWORD, &password),
            xml::tag(MODEL_NAME, &self.model_name),
            xml::tag(OVERRIDE, if self.override_existing { "Y" } else { "N" }),
            xml::tag(ACL_ACCESS_TYPE, &self.acl_access_type),
            xml::tag(ACL_USER_OR_ROLE, &self.acl_user_or_role),
        ];
        lines.iter().map(|line| format!("      {line}\n")).collect()
    }

    pub fn from_xml(entry_xml: &str) -> Result<Self, AppError> {
        let tags = xml::read_tags(entry_xml)?;
        let value = |code: &str| tags.get(code).cloned().unwrap_or_default();
        Ok(Self {
            server_url: value(SERVER_URL),
            server_user_id: value(SERVER_USER_ID),
            server_password: decrypt_password_optionally_encrypted(&value(SERVER_PASSWORD))?,
            model_name: value(MODEL_NAME),
            override_existing: value(OVERRIDE).eq_ignore_ascii_case("Y"),
            acl_access_type: value(ACL_ACCESS_TYPE),
            acl_user_or_role: value(ACL_USER_OR_ROLE),
        })
    }

    pub fn save_rep(&self, rep: &mut RepositoryAttributes, entry_id: &str) {
        rep.save_entry_attribute(entry_id, SERVER_URL, &self.server_url);
        rep.save_entry_attribute(entry_id, SERVER_USER_ID, &self.server_user_id);
        rep.save_entry_attribute(
            entry_id,
            SERVER_PASSWORD,
            &encrypt_password_if_not_using_variables(&self.server_password),
        );
        rep.save_entry_attribute(entry_id, MODEL_NAME, &self.model_name);
        rep.save_entry_attribute_bool(entry_id, OVERRIDE, self.override_existing);
        rep.save_entry_attribute(entry_id, ACL_ACCESS_TYPE, &self.acl_access_type);
        rep.save_entry_attribute(entry_id, ACL_USER_OR_ROLE, &self.acl_user_or_role);
    }

    pub fn load_rep(rep: &RepositoryAttributes, entry_id: &str) -> Result<Self, AppError> {
        let value = |code: &str| rep.entry_attribute(entry_id, code).unwrap_or_default().to_string();
        Ok(Self {
            server_url: value(SERVER_URL),
            server_user_id: value(SERVER_USER_ID),
            server_password: decrypt_password_optionally_encrypted(&value(SERVER_PASSWORD))?,
            model_name: value(MODEL_NAME),
            override_existing: rep.entry_attribute_bool(entry_id, OVERRIDE),
            acl_access_type: value(ACL_ACCESS_TYPE),
            acl_user_or_role: value(ACL_USER_OR_ROLE),
        })
    }
}

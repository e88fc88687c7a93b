//! Access-control fragment attached to metadata publish requests.

use crate::domain::xml;

const PERMISSIONS: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecipientType {
    User = 0,
    Role = 1,
}

/// Allow-list of users and roles, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessControlModel {
    users: Option<Vec<String>>,
    roles: Option<Vec<String>>,
}

impl AccessControlModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&mut self, user: impl Into<String>) {
        self.users.get_or_insert_with(Vec::new).push(user.into());
    }

    pub fn add_role(&mut self, role: impl Into<String>) {
        self.roles.get_or_insert_with(Vec::new).push(role.into());
    }

    pub fn users(&self) -> &[String] {
        self.users.as_deref().unwrap_or_default()
    }

    pub fn roles(&self) -> &[String] {
        self.roles.as_deref().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.users().is_empty() && self.roles().is_empty()
    }

    /// ACL XML, or `None` when there is nobody to grant access to.
    pub fn to_xml(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }

        let mut out = String::from("<repositoryFileAclDto>");
        for user in self.users() {
            push_ace(&mut out, user, RecipientType::User);
        }
        for role in self.roles() {
            push_ace(&mut out, role, RecipientType::Role);
        }
        out.push_str("<entriesInheriting>false</entriesInheriting>");
        out.push_str("<id></id>");
        out.push_str("<owner></owner>");
        out.push_str("<ownerType></ownerType>");
        out.push_str("</repositoryFileAclDto>");
        Some(out)
    }
}

fn push_ace(out: &mut String, recipient: &str, kind: RecipientType) {
    out.push_str("<aces>");
    out.push_str(&format!("<recipient>{}</recipient>", xml::escape(recipient)));
    out.push_str(&format!("<recipientType>{}</recipientType>", kind as u8));
    out.push_str(&format!("<permissions>{PERMISSIONS}</permissions>"));
    out.push_str("<modifiable>false</modifiable>");
    out.push_str("</aces>");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_model_has_no_xml() {
        assert_eq!(AccessControlModel::new().to_xml(), None);
    }

    #[test]
    fn single_user_yields_one_user_ace() {
        let mut acl = AccessControlModel::new();
        acl.add_user("suzy");
        let xml = acl.to_xml().unwrap();
        assert_eq!(xml.matches("<aces>").count(), 1);
        assert!(xml.contains("<recipient>suzy</recipient><recipientType>0</recipientType>"));
        assert!(xml.contains("<permissions>4</permissions><modifiable>false</modifiable>"));
        assert!(xml.ends_with(
            "<entriesInheriting>false</entriesInheriting><id></id><owner></owner>\
             <ownerType></ownerType></repositoryFileAclDto>"
        ));
    }

    #[test]
    fn single_role_yields_one_role_ace() {
        let mut acl = AccessControlModel::new();
        acl.add_role("Analyst");
        let xml = acl.to_xml().unwrap();
        assert_eq!(xml.matches("<aces>").count(), 1);
        assert!(xml.contains("<recipientType>1</recipientType>"));
    }

    #[test]
    fn output_follows_insertion_order_and_escapes_names() {
        let mut acl = AccessControlModel::new();
        acl.add_user("zed");
        acl.add_user("amy");
        acl.add_role("R&D");
        let xml = acl.to_xml().unwrap();

        let zed = xml.find("zed").unwrap();
        let amy = xml.find("amy").unwrap();
        let role = xml.find("R&amp;D").unwrap();
        assert!(zed < amy && amy < role);
    }
}

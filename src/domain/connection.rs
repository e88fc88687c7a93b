//! BI server connection descriptor.

use std::fmt;

use crate::domain::variables::{Variables, contains_variable};

const SEPARATOR: char = '/';

/// Where and as whom to publish.
///
/// `url` is either blank, a variable placeholder, or ends with exactly one `/`.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    url: String,
    pub user_id: String,
    pub password: String,
    pub name: String,
    pub default_folder: String,
    pub default_datasource_publish: bool,
}

impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("url", &self.url)
            .field("user_id", &self.user_id)
            .field("password", &"[REDACTED]")
            .field("name", &self.name)
            .field("default_folder", &self.default_folder)
            .field("default_datasource_publish", &self.default_datasource_publish)
            .finish()
    }
}

impl ConnectionDescriptor {
    pub fn new(url: &str, user_id: impl Into<String>, password: impl Into<String>) -> Self {
        let mut descriptor =
            Self { user_id: user_id.into(), password: password.into(), ..Self::default() };
        descriptor.set_url(url);
        descriptor
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn set_url(&mut self, url: &str) {
        self.url = normalize_url(url);
    }

    /// New descriptor with every field passed through `variables`.
    pub fn resolve(&self, variables: &Variables) -> Self {
        let mut resolved = Self {
            url: String::new(),
            user_id: variables.resolve(&self.user_id),
            password: variables.resolve(&self.password),
            name: variables.resolve(&self.name),
            default_folder: variables.resolve(&self.default_folder),
            default_datasource_publish: self.default_datasource_publish,
        };
        resolved.set_url(&variables.resolve(&self.url));
        resolved
    }

    pub fn has_credentials(&self) -> bool {
        !self.user_id.trim().is_empty() && !self.password.trim().is_empty()
    }
}

fn normalize_url(url: &str) -> String {
    if url.trim().is_empty() || contains_variable(url) {
        return url.to_string();
    }
    let mut normalized = url.trim_end_matches(SEPARATOR).to_string();
    normalized.push(SEPARATOR);
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn appends_missing_separator() {
        let conn = ConnectionDescriptor::new("http://x", "admin", "pw");
        assert_eq!(conn.url(), "http://x/");
    }

    #[test]
    fn collapses_double_separator() {
        let conn = ConnectionDescriptor::new("http://x//", "admin", "pw");
        assert_eq!(conn.url(), "http://x/");
    }

    #[test]
    fn keeps_blank_and_placeholder_urls() {
        assert_eq!(ConnectionDescriptor::new("", "a", "b").url(), "");
        assert_eq!(ConnectionDescriptor::new("  ", "a", "b").url(), "  ");
        assert_eq!(ConnectionDescriptor::new("${BI_URL}", "a", "b").url(), "${BI_URL}");
    }

    #[test]
    fn resolve_produces_normalized_copy() {
        let original = ConnectionDescriptor::new("${BI_URL}", "${USER}", "secret");
        let mut vars = Variables::new();
        vars.set("BI_URL", "http://bi:8080/pentaho");
        vars.set("USER", "admin");

        let resolved = original.resolve(&vars);
        assert_eq!(resolved.url(), "http://bi:8080/pentaho/");
        assert_eq!(resolved.user_id, "admin");
        assert_eq!(original.url(), "${BI_URL}");
    }

    #[test]
    fn credentials_require_both_fields() {
        assert!(ConnectionDescriptor::new("http://x", "admin", "pw").has_credentials());
        assert!(!ConnectionDescriptor::new("http://x", "", "pw").has_credentials());
        assert!(!ConnectionDescriptor::new("http://x", "admin", " ").has_credentials());
    }

    #[test]
    fn debug_redacts_password() {
        let conn = ConnectionDescriptor::new("http://x", "admin", "hunter2");
        assert!(!format!("{conn:?}").contains("hunter2"));
    }

    proptest! {
        #[test]
        fn normalized_urls_end_with_one_separator(host in "[a-z]{1,12}", slashes in 0usize..4) {
            let url = format!("http://{host}{}", "/".repeat(slashes));
            let conn = ConnectionDescriptor::new(&url, "u", "p");
            prop_assert!(conn.url().ends_with('/'));
            prop_assert!(!conn.url().ends_with("//"));
        }
    }
}

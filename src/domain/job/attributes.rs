use std::collections::BTreeMap;

/// Key/value attribute store used when job entries are saved to a repository.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepositoryAttributes {
    values: BTreeMap<(String, String), String>,
}

impl RepositoryAttributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_entry_attribute(&mut self, entry_id: &str, code: &str, value: &str) {
        self.values.insert((entry_id.to_string(), code.to_string()), value.to_string());
    }

    pub fn save_entry_attribute_bool(&mut self, entry_id: &str, code: &str, value: bool) {
        self.save_entry_attribute(entry_id, code, if value { "Y" } else { "N" });
    }

    pub fn entry_attribute(&self, entry_id: &str, code: &str) -> Option<&str> {
        self.values.get(&(entry_id.to_string(), code.to_string())).map(String::as_str)
    }

    pub fn entry_attribute_bool(&self, entry_id: &str, code: &str) -> bool {
        self.entry_attribute(entry_id, code).is_some_and(|v| v.eq_ignore_ascii_case("Y"))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

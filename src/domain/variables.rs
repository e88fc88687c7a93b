//! Job variable space with `${NAME}` substitution.

use std::collections::BTreeMap;

const OPEN: &str = "${";
const CLOSE: char = '}';

/// Named string values shared by the entries of one job run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Variables {
    values: BTreeMap<String, String>,
}

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Add values for names not already set.
    pub fn fill_missing<I>(&mut self, values: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (name, value) in values {
            self.values.entry(name).or_insert(value);
        }
    }

    /// Replace every `${NAME}` with its value.
    ///
    /// Unknown names and unterminated tokens are left untouched.
    pub fn resolve(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        let mut rest = input;

        while let Some(start) = rest.find(OPEN) {
            out.push_str(&rest[..start]);
            let after = &rest[start + OPEN.len()..];
            match after.find(CLOSE) {
                Some(end) => {
                    let name = &after[..end];
                    match self.get(name) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push_str(OPEN);
                            out.push_str(name);
                            out.push(CLOSE);
                        }
                    }
                    rest = &after[end + 1..];
                }
                None => {
                    out.push_str(&rest[start..]);
                    rest = "";
                }
            }
        }

        out.push_str(rest);
        out
    }
}

/// True when the value holds a `${...}` placeholder.
pub fn contains_variable(value: &str) -> bool {
    value.find(OPEN).is_some_and(|start| value[start..].contains(CLOSE))
}

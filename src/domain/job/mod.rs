//! Jobs: named entries connected by hops.

mod attributes;
pub mod build_model;
mod datasource_publish;

use std::collections::{HashSet, VecDeque};

pub use attributes::RepositoryAttributes;
pub use build_model::{BuildModelEntry, ConnectionInfoProvider};
pub use datasource_publish::DatasourcePublishEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobEntryKind {
    Start,
    BuildModel(BuildModelEntry),
    DatasourcePublish(DatasourcePublishEntry),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobEntry {
    pub name: String,
    pub kind: JobEntryKind,
}

impl JobEntry {
    pub fn new(name: impl Into<String>, kind: JobEntryKind) -> Self {
        Self { name: name.into(), kind }
    }

    /// Typed capability query for entries that know their backing database.
    pub fn connection_info_provider(&self) -> Option<&dyn ConnectionInfoProvider> {
        match &self.kind {
            JobEntryKind::BuildModel(entry) => Some(entry),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hop {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    pub name: String,
    pub entries: Vec<JobEntry>,
    pub hops: Vec<Hop>,
}

impl Job {
    pub fn entry(&self, name: &str) -> Option<&JobEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Nearest entry upstream of `name` that can describe its database.
    ///
    /// Hops are walked backwards breadth-first so the closest provider wins.
    pub fn find_preceding_provider(&self, name: &str) -> Option<&JobEntry> {
        let mut seen: HashSet<&str> = HashSet::from([name]);
        let mut queue: VecDeque<&str> = VecDeque::from([name]);

        while let Some(current) = queue.pop_front() {
            for hop in self.hops.iter().filter(|hop| hop.to == current) {
                if !seen.insert(hop.from.as_str()) {
                    continue;
                }
                if let Some(entry) = self.entry(&hop.from)
                    && entry.connection_info_provider().is_some()
                {
                    return Some(entry);
                }
                queue.push_back(hop.from.as_str());
            }
        }
        None
    }

    /// Entries in run order: from the start entry along the first outgoing hop.
    ///
    /// Without a start entry the chain begins at the first declared entry.
    pub fn execution_order(&self) -> Vec<&JobEntry> {
        let first = self
            .entries
            .iter()
            .find(|entry| entry.kind == JobEntryKind::Start)
            .or_else(|| self.entries.first());

        let mut order = Vec::new();
        let mut seen = HashSet::new();
        let mut current = first;
        while let Some(entry) = current {
            if !seen.insert(entry.name.as_str()) {
                break;
            }
            order.push(entry);
            current = self
                .hops
                .iter()
                .find(|hop| hop.from == entry.name)
                .and_then(|hop| self.entry(&hop.to));
        }
        order
    }
}

//! Repository records and the full-state snapshot mapping.
//!
//! A [`Snapshot`] holds every repository visible across the tracked accounts
//! as of one run, keyed by full name. It preserves insertion order (account
//! order, then within-account page order) because the discovery set derives
//! its ordering from it.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// A repository as reported by the listing endpoint.
///
/// Built fresh on every run and never mutated afterwards. Timestamps are
/// carried as the upstream ISO-8601 strings so persisted snapshots round-trip
/// byte-stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryRecord {
    /// Short repository name.
    pub name: String,

    /// Full name in "owner/name" format. Unique key across all mappings.
    pub full_name: String,

    /// Owner login.
    pub owner: String,

    /// Canonical web URL.
    pub html_url: String,

    /// Free-text description, if the owner set one.
    pub description: Option<String>,

    /// Creation timestamp as reported upstream.
    pub created_at: String,

    /// Last-update timestamp as reported upstream.
    pub updated_at: Option<String>,
}

/// A repository absent from the previous snapshot, enriched for display.
///
/// Immutable once constructed. Persisted into the dated history file and the
/// "latest" pointer file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveryRecord {
    /// Full name in "owner/name" format.
    pub full_name: String,

    /// Short repository name.
    pub name: String,

    /// Owner login.
    pub owner: String,

    /// Canonical web URL.
    pub html_url: String,

    /// Free-text description, if the owner set one.
    pub description: Option<String>,

    /// Creation timestamp as reported upstream.
    pub created_at: String,

    /// Bounded README excerpt. `None` when no excerpt could be produced.
    pub readme_snippet: Option<String>,
}

impl DiscoveryRecord {
    /// Builds a discovery from a snapshot record and an optional excerpt.
    #[must_use]
    pub fn from_record(record: &RepositoryRecord, readme_snippet: Option<String>) -> Self {
        Self {
            full_name: record.full_name.clone(),
            name: record.name.clone(),
            owner: record.owner.clone(),
            html_url: record.html_url.clone(),
            description: record.description.clone(),
            created_at: record.created_at.clone(),
            readme_snippet,
        }
    }
}

/// All repositories known as of one run, keyed by full name.
///
/// Iteration and serialization follow insertion order. Inserting a full name
/// that is already present replaces the record in place without moving it.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    records: Vec<RepositoryRecord>,
    index: HashMap<String, usize>,
}

impl Snapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, replacing in place if the full name is known.
    pub fn insert(&mut self, record: RepositoryRecord) {
        match self.index.get(&record.full_name) {
            Some(&position) => self.records[position] = record,
            None => {
                self.index.insert(record.full_name.clone(), self.records.len());
                self.records.push(record);
            }
        }
    }

    /// Inserts every record from an iterator, in order.
    pub fn extend(&mut self, records: impl IntoIterator<Item = RepositoryRecord>) {
        for record in records {
            self.insert(record);
        }
    }

    /// Looks up a record by full name.
    #[must_use]
    pub fn get(&self, full_name: &str) -> Option<&RepositoryRecord> {
        self.index.get(full_name).map(|&position| &self.records[position])
    }

    /// Returns whether a full name is present.
    #[must_use]
    pub fn contains(&self, full_name: &str) -> bool {
        self.index.contains_key(full_name)
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &RepositoryRecord> {
        self.records.iter()
    }

    /// Number of repositories in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the snapshot holds no repositories.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for Snapshot {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(&record.full_name, record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Snapshot {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = Snapshot;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a map of full repository names to repository records")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Snapshot, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut snapshot = Snapshot::new();
                // Document order becomes insertion order.
                while let Some((_, record)) =
                    access.next_entry::<String, RepositoryRecord>()?
                {
                    snapshot.insert(record);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(full_name: &str) -> RepositoryRecord {
        let (owner, name) = full_name.split_once('/').unwrap();
        RepositoryRecord {
            name: name.to_string(),
            full_name: full_name.to_string(),
            owner: owner.to_string(),
            html_url: format!("https://github.com/{full_name}"),
            description: None,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: Some("2024-01-02T00:00:00Z".to_string()),
        }
    }

    #[test]
    fn insert_preserves_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(record("alice/zeta"));
        snapshot.insert(record("alice/alpha"));
        snapshot.insert(record("bob/tool"));

        let names: Vec<_> = snapshot.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, ["alice/zeta", "alice/alpha", "bob/tool"]);
    }

    #[test]
    fn reinsert_replaces_in_place() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(record("alice/tool"));
        snapshot.insert(record("bob/tool"));

        let mut updated = record("alice/tool");
        updated.description = Some("now described".to_string());
        snapshot.insert(updated);

        assert_eq!(snapshot.len(), 2);
        let names: Vec<_> = snapshot.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, ["alice/tool", "bob/tool"]);
        assert_eq!(
            snapshot.get("alice/tool").unwrap().description.as_deref(),
            Some("now described")
        );
    }

    #[test]
    fn serde_round_trips_in_order() {
        let mut snapshot = Snapshot::new();
        snapshot.insert(record("bob/zzz"));
        snapshot.insert(record("alice/aaa"));

        let json = serde_json::to_string_pretty(&snapshot).unwrap();
        // Key order in the document is insertion order, not alphabetical.
        assert!(json.find("bob/zzz").unwrap() < json.find("alice/aaa").unwrap());

        let reloaded: Snapshot = serde_json::from_str(&json).unwrap();
        let names: Vec<_> = reloaded.iter().map(|r| r.full_name.as_str()).collect();
        assert_eq!(names, ["bob/zzz", "alice/aaa"]);
    }

    #[test]
    fn discovery_record_carries_snapshot_fields() {
        let mut source = record("alice/tool");
        source.description = Some("a tool".to_string());

        let discovery =
            DiscoveryRecord::from_record(&source, Some("Tool\nDoes things".to_string()));

        assert_eq!(discovery.full_name, "alice/tool");
        assert_eq!(discovery.owner, "alice");
        assert_eq!(discovery.description.as_deref(), Some("a tool"));
        assert_eq!(discovery.readme_snippet.as_deref(), Some("Tool\nDoes things"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::config::Granularity;

// Content categories a view can land in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Sports,
    Entertainment,
    Business,
    Education,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Sports,
        Category::Entertainment,
        Category::Business,
        Category::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Sports => "sports",
            Category::Entertainment => "entertainment",
            Category::Business => "business",
            Category::Education => "education",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Aggregation key: `<category>:<time bucket>`.
//
// Not unique per event. Every view of a category inside the same bucket
// shares one key and therefore one counter entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventKey(String);

impl EventKey {
    pub fn new(category: Category, at: DateTime<Utc>, granularity: Granularity) -> Self {
        Self(format!("{}:{}", category, at.format(granularity.format())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Views and clicks for one key. clicks <= views is not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counts {
    pub views: u64,
    pub clicks: u64,
}

// Point-in-time copy of the counter store, serialized as
// `{"<key>": {"views": n, "clicks": n}, ...}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    entries: BTreeMap<String, Counts>,
}

impl Snapshot {
    pub fn get(&self, key: &str) -> Option<Counts> {
        self.entries.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Counts)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl FromIterator<(String, Counts)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (String, Counts)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

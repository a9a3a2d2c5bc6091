//! Per-table unique name allocation.
//!
//! Each table owns three registries (columns, forward navigations, reverse
//! navigations). A name is unique when it differs, ignoring case, from the
//! class name and from every value in all three registries.

use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of numeric suffixes tried before giving up.
pub const DEFAULT_COLLISION_BOUND: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    Columns,
    ForwardKeys,
    ReverseKeys,
}

/// Source key (column or constraint name) -> assigned identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NameRegistry {
    entries: BTreeMap<String, String>,
}

impl NameRegistry {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.entries.values().any(|v| same_name(v, name))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: &str, name: String) {
        self.entries.insert(key.to_string(), name);
    }
}

/// Result of one allocation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub name: String,
    /// The suffix bound ran out and `name` may still collide.
    pub exhausted: bool,
}

/// Class name plus the three registries of one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableNames {
    class_name: String,
    columns: NameRegistry,
    forward_keys: NameRegistry,
    reverse_keys: NameRegistry,
}

impl TableNames {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            columns: NameRegistry::default(),
            forward_keys: NameRegistry::default(),
            reverse_keys: NameRegistry::default(),
        }
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    pub fn registry(&self, namespace: Namespace) -> &NameRegistry {
        match namespace {
            Namespace::Columns => &self.columns,
            Namespace::ForwardKeys => &self.forward_keys,
            Namespace::ReverseKeys => &self.reverse_keys,
        }
    }

    fn registry_mut(&mut self, namespace: Namespace) -> &mut NameRegistry {
        match namespace {
            Namespace::Columns => &mut self.columns,
            Namespace::ForwardKeys => &mut self.forward_keys,
            Namespace::ReverseKeys => &mut self.reverse_keys,
        }
    }

    /// Whether `candidate` clashes with the class name or any assigned name.
    pub fn is_taken(&self, candidate: &str) -> bool {
        same_name(&self.class_name, candidate)
            || self.columns.contains_name(candidate)
            || self.forward_keys.contains_name(candidate)
            || self.reverse_keys.contains_name(candidate)
    }

    /// All assigned names, class name first.
    pub fn all_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.class_name.as_str())
            .chain(self.columns.names())
            .chain(self.forward_keys.names())
            .chain(self.reverse_keys.names())
    }

    /// Allocate a unique name for `key` in `namespace`, starting from `base`.
    ///
    /// Repeated calls with the same key return the stored name. Otherwise
    /// `base`, `base1`, `base2`, ... are tried up to `bound` suffixes; when the
    /// bound is hit the last candidate is kept anyway.
    pub fn allocate(
        &mut self,
        namespace: Namespace,
        key: &str,
        base: &str,
        bound: usize,
    ) -> Allocation {
        if let Some(existing) = self.registry(namespace).get(key) {
            return Allocation {
                name: existing.to_string(),
                exhausted: false,
            };
        }

        let mut candidate = base.to_string();
        let mut suffix = 0;
        let mut exhausted = false;

        while self.is_taken(&candidate) {
            if suffix == bound {
                exhausted = true;
                break;
            }
            suffix += 1;
            candidate = format!("{base}{suffix}");
        }

        self.registry_mut(namespace).insert(key, candidate.clone());
        Allocation {
            name: candidate,
            exhausted,
        }
    }
}

/// Case-insensitive identifier equality.
pub fn same_name(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

//! Class name to display metadata lookup.

use std::collections::HashMap;

use p2cave_types::ObjectInfo;

use crate::objects::OBJECTS;

/// Read-only lookup of object metadata by internal class name.
///
/// Implementors are keyed by lowercase names. `lookup` and `contains` expect
/// an already lowercased key; `resolve` accepts a name as written in the file.
pub trait ObjectLookup {
    fn lookup(&self, class: &str) -> Option<&ObjectInfo>;

    fn contains(&self, class: &str) -> bool {
        self.lookup(class).is_some()
    }

    fn resolve(&self, class: &str) -> Option<&ObjectInfo> {
        self.lookup(&class.to_ascii_lowercase())
    }
}

impl ObjectLookup for HashMap<String, ObjectInfo> {
    fn lookup(&self, class: &str) -> Option<&ObjectInfo> {
        self.get(class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    objects: HashMap<String, ObjectInfo>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding every row of [`OBJECTS`].
    pub fn builtin() -> Self {
        let objects = OBJECTS
            .iter()
            .map(|row| (row.class.to_string(), row.info()))
            .collect();
        Self { objects }
    }

    /// Add or replace a class. The name is lowercased.
    pub fn insert(&mut self, class: &str, info: ObjectInfo) -> Option<ObjectInfo> {
        self.objects.insert(class.to_ascii_lowercase(), info)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ObjectInfo)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl ObjectLookup for Catalog {
    fn lookup(&self, class: &str) -> Option<&ObjectInfo> {
        self.objects.get(class)
    }
}

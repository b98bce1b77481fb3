//! Class hierarchy lookups used to classify layout nodes
//!
//! The classifier only needs one capability: given a fully qualified class
//! name, return its superclasses nearest first. [`HierarchyTable`] provides
//! that from recorded `(class, superclass)` edges, seeded with the Android
//! framework widgets and extended with the `.super` edges of an app's smali.

mod framework;

pub use framework::FRAMEWORK_SUPERCLASSES;

use std::collections::{HashMap, HashSet};

/// Source of ancestor chains for fully qualified class names
pub trait ClassHierarchy: Send + Sync {
    /// Superclasses of `class_name`, immediate superclass first, root last.
    /// `None` when the class is unknown.
    fn ancestor_chain(&self, class_name: &str) -> Option<Vec<String>>;
}

/// Superclass edges keyed by class name
#[derive(Debug, Clone, Default)]
pub struct HierarchyTable {
    parents: HashMap<String, String>,
    roots: HashSet<String>,
}

impl HierarchyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Table pre-populated with the Android framework view hierarchy
    pub fn android_framework() -> Self {
        let mut table = Self::new();
        table.roots.insert("java.lang.Object".to_string());
        for (class, superclass) in FRAMEWORK_SUPERCLASSES {
            table.insert(*class, *superclass);
        }
        table
    }

    /// Record that `class` directly extends `superclass`
    pub fn insert(&mut self, class: impl Into<String>, superclass: impl Into<String>) {
        self.parents.insert(class.into(), superclass.into());
    }

    /// Record a class with no superclass
    pub fn insert_root(&mut self, class: impl Into<String>) {
        self.roots.insert(class.into());
    }

    pub fn contains(&self, class_name: &str) -> bool {
        self.parents.contains_key(class_name) || self.roots.contains(class_name)
    }

    pub fn superclass(&self, class_name: &str) -> Option<&str> {
        self.parents.get(class_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn extend(&mut self, other: HierarchyTable) {
        self.parents.extend(other.parents);
        self.roots.extend(other.roots);
    }
}

impl ClassHierarchy for HierarchyTable {
    fn ancestor_chain(&self, class_name: &str) -> Option<Vec<String>> {
        if !self.contains(class_name) {
            return None;
        }

        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        seen.insert(class_name);

        let mut current = class_name;
        while let Some(parent) = self.superclass(current) {
            if !seen.insert(parent) {
                break;
            }
            chain.push(parent.to_string());
            current = parent;
        }

        Some(chain)
    }
}

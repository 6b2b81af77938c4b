//! The index registry: packages and classes accumulated over a session.
//!
//! A `Registry` is an ordinary value. Callers own it and lend it to indexing
//! operations, so independent sessions never share state. It only ever grows:
//! nothing is removed and a registered `ClassInfo` is never replaced.
//!
//! Classes are kept in insertion order (the JSON export relies on it) with a
//! side index by FQCN.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::config::DuplicatePolicy;
use crate::types::{ClassInfo, Location, MethodInfo};

/// Packages and classes discovered so far.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    packages: HashSet<String>,
    classes: Vec<ClassInfo>,
    by_fqcn: HashMap<String, usize>,
}

/// Counters reported by [`Registry::merge`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOutcome {
    /// Classes that were new to the target registry
    pub classes_added: usize,
    /// Classes whose FQCN the target already knew
    pub duplicate_classes: usize,
    /// Methods appended to already-known classes (merge policy)
    pub methods_merged: usize,
    /// Methods discarded with their duplicate class (first-wins policy)
    pub methods_dropped: usize,
}

impl Registry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a package name. Returns `true` if it was not yet known.
    pub fn add_package(&mut self, name: impl Into<String>) -> bool {
        self.packages.insert(name.into())
    }

    /// Look up `fqcn`, registering a new class if it is unknown.
    ///
    /// Returns the class and whether this call created it. An existing class is
    /// returned untouched; its name and location are never overwritten.
    pub fn get_or_create_class(
        &mut self,
        fqcn: &str,
        simple_name: &str,
        location: Location,
    ) -> (&mut ClassInfo, bool) {
        if let Some(&idx) = self.by_fqcn.get(fqcn) {
            return (&mut self.classes[idx], false);
        }
        let idx = self.push_class(ClassInfo::new(fqcn, simple_name, location));
        (&mut self.classes[idx], true)
    }

    /// Append a method to the class registered under `fqcn`.
    ///
    /// Returns `false` (and drops the method) if no such class exists.
    pub fn append_method(&mut self, fqcn: &str, method: MethodInfo) -> bool {
        match self.by_fqcn.get(fqcn) {
            Some(&idx) => {
                self.classes[idx].add_method(method);
                true
            }
            None => false,
        }
    }

    /// The class registered under `fqcn`.
    #[must_use]
    pub fn class(&self, fqcn: &str) -> Option<&ClassInfo> {
        self.by_fqcn.get(fqcn).map(|&idx| &self.classes[idx])
    }

    /// Whether `fqcn` is registered.
    #[must_use]
    pub fn contains_class(&self, fqcn: &str) -> bool {
        self.by_fqcn.contains_key(fqcn)
    }

    /// Whether `name` is a known package.
    #[must_use]
    pub fn contains_package(&self, name: &str) -> bool {
        self.packages.contains(name)
    }

    /// Classes in registration order.
    pub fn classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter()
    }

    /// Classes sorted by FQCN.
    #[must_use]
    pub fn classes_sorted(&self) -> Vec<&ClassInfo> {
        let mut sorted: Vec<_> = self.classes.iter().collect();
        sorted.sort_by(|a, b| a.fqcn.cmp(&b.fqcn));
        sorted
    }

    /// Packages sorted alphabetically.
    #[must_use]
    pub fn sorted_packages(&self) -> Vec<&str> {
        let mut sorted: Vec<_> = self.packages.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        sorted
    }

    /// Number of distinct packages.
    #[must_use]
    pub fn package_count(&self) -> usize {
        self.packages.len()
    }

    /// Number of registered classes.
    #[must_use]
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Number of method declarations across all classes.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.classes.iter().map(ClassInfo::method_count).sum()
    }

    /// Number of call records across all methods.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.classes
            .iter()
            .flat_map(ClassInfo::methods)
            .map(|m| m.calls.len())
            .sum()
    }

    /// Whether nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.classes.is_empty()
    }

    /// Fold another registry into this one.
    ///
    /// Packages are unioned. Classes new to `self` are appended in `other`'s
    /// order. For an FQCN already present, `self` keeps its `ClassInfo`; the
    /// incoming methods are appended under [`DuplicatePolicy::Merge`] and
    /// discarded under [`DuplicatePolicy::FirstWins`].
    pub fn merge(&mut self, other: Registry, policy: DuplicatePolicy) -> MergeOutcome {
        let mut outcome = MergeOutcome::default();
        self.packages.extend(other.packages);

        for incoming in other.classes {
            let Some(&idx) = self.by_fqcn.get(&incoming.fqcn) else {
                self.push_class(incoming);
                outcome.classes_added += 1;
                continue;
            };

            outcome.duplicate_classes += 1;
            match policy {
                DuplicatePolicy::FirstWins => {
                    outcome.methods_dropped += incoming.method_count();
                    debug!(
                        fqcn = %incoming.fqcn,
                        dropped = incoming.method_count(),
                        "Duplicate class ignored during merge"
                    );
                }
                DuplicatePolicy::Merge => {
                    let existing = &mut self.classes[idx];
                    for method in incoming.methods().cloned() {
                        existing.add_method(method);
                        outcome.methods_merged += 1;
                    }
                }
            }
        }

        outcome
    }

    fn push_class(&mut self, class: ClassInfo) -> usize {
        let idx = self.classes.len();
        self.by_fqcn.insert(class.fqcn.clone(), idx);
        self.classes.push(class);
        idx
    }
}

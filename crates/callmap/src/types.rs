//! Domain types for the callmap index.
//!
//! - **Entities**: `ClassInfo`, `MethodInfo`, `MethodCall` (held by the registry)
//! - **Results**: `UnitSummary`, `IndexStats` (what an indexing pass reports)
//!
//! All positions are zero-based, exactly as tree-sitter reports them. Display
//! code adds one when printing.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::IndexError;

/// Prefix of the synthetic call name recorded for `new Type(...)`.
pub const CONSTRUCTOR_MARKER_PREFIX: &str = "<init:";

/// A zero-based source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Location {
    /// Zero-based line
    pub line: u32,
    /// Zero-based column (in bytes)
    pub col: u32,
}

impl Location {
    /// Create a location from zero-based coordinates.
    #[must_use]
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// One-based `(line, col)` for display.
    #[must_use]
    pub fn display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// One invocation or construction expression found in a method body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    /// Simple name of the callee, or a constructor marker like `<init:User>`
    pub name: String,
    /// Receiver text (`repo`, `System.out`, `this.repo`); `None` for implicit
    /// receivers and constructions
    pub receiver: Option<String>,
    /// Where the expression starts
    pub location: Location,
}

impl MethodCall {
    /// A call such as `repo.save(name)` or `helper()`.
    #[must_use]
    pub fn invocation(
        name: impl Into<String>,
        receiver: Option<String>,
        location: Location,
    ) -> Self {
        Self {
            name: name.into(),
            receiver,
            location,
        }
    }

    /// A construction such as `new User(name)`, recorded as `<init:User>`.
    #[must_use]
    pub fn construction(type_name: &str, location: Location) -> Self {
        Self {
            name: format!("{CONSTRUCTOR_MARKER_PREFIX}{type_name}>"),
            receiver: None,
            location,
        }
    }

    /// Whether this record was synthesized from a construction expression.
    #[must_use]
    pub fn is_construction(&self) -> bool {
        self.name.starts_with(CONSTRUCTOR_MARKER_PREFIX) && self.name.ends_with('>')
    }

    /// The constructed type for construction records.
    #[must_use]
    pub fn constructed_type(&self) -> Option<&str> {
        if !self.is_construction() {
            return None;
        }
        self.name
            .strip_prefix(CONSTRUCTOR_MARKER_PREFIX)
            .and_then(|rest| rest.strip_suffix('>'))
    }
}

/// A method or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    /// Declared name (constructors carry the class name)
    pub name: String,
    /// Parameters rendered as `"<type> <name>"`
    pub params: Vec<String>,
    /// Return type text; `None` for constructors
    pub return_type: Option<String>,
    /// Where the declaration starts
    pub location: Location,
    /// Calls in source pre-order
    pub calls: Vec<MethodCall>,
}

impl MethodInfo {
    /// The `name(params)` part of the signature.
    #[must_use]
    pub fn signature(&self) -> String {
        format!("{}({})", self.name, self.params.join(", "))
    }
}

/// All declarations sharing one method name within a class, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverloadSet {
    /// The shared method name
    pub name: String,
    /// Declarations in the order they were registered
    pub overloads: Vec<MethodInfo>,
}

/// A class-like declaration (class, interface, enum, record, annotation type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassInfo {
    /// Name as written in the declaration
    pub simple_name: String,
    /// Package plus the dot-joined nesting path
    pub fqcn: String,
    /// Where the declaration starts
    pub location: Location,
    methods: Vec<OverloadSet>,
}

impl ClassInfo {
    /// Create a class with no methods.
    #[must_use]
    pub fn new(fqcn: impl Into<String>, simple_name: impl Into<String>, location: Location) -> Self {
        Self {
            simple_name: simple_name.into(),
            fqcn: fqcn.into(),
            location,
            methods: Vec::new(),
        }
    }

    /// Append a declaration to the overload set for its name.
    pub fn add_method(&mut self, method: MethodInfo) {
        match self.methods.iter_mut().find(|set| set.name == method.name) {
            Some(set) => set.overloads.push(method),
            None => self.methods.push(OverloadSet {
                name: method.name.clone(),
                overloads: vec![method],
            }),
        }
    }

    /// Overload sets in the order their names were first registered.
    #[must_use]
    pub fn overload_sets(&self) -> &[OverloadSet] {
        &self.methods
    }

    /// Declarations registered under `name`, in declaration order.
    #[must_use]
    pub fn overloads(&self, name: &str) -> &[MethodInfo] {
        self.methods
            .iter()
            .find(|set| set.name == name)
            .map_or(&[], |set| set.overloads.as_slice())
    }

    /// Every declaration, grouped by name in registration order.
    pub fn methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.iter().flat_map(|set| set.overloads.iter())
    }

    /// Total number of declarations across all overload sets.
    #[must_use]
    pub fn method_count(&self) -> usize {
        self.methods.iter().map(|set| set.overloads.len()).sum()
    }
}

/// What a single compilation unit contributed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitSummary {
    /// The unit's package, if declared
    pub package: Option<String>,
    /// Class-like declarations registered for the first time
    pub classes_registered: usize,
    /// Class-like declarations whose FQCN was already known
    pub duplicate_classes: usize,
    /// Method-like declarations registered
    pub methods_registered: usize,
    /// Method-like declarations dropped (duplicate owner under first-wins)
    pub methods_dropped: usize,
    /// Method-like declarations found outside any class
    pub orphan_methods: usize,
    /// Call records harvested
    pub calls_found: usize,
}

impl UnitSummary {
    /// Fold another unit's counters into this one.
    pub fn absorb(&mut self, other: &UnitSummary) {
        self.classes_registered += other.classes_registered;
        self.duplicate_classes += other.duplicate_classes;
        self.methods_registered += other.methods_registered;
        self.methods_dropped += other.methods_dropped;
        self.orphan_methods += other.orphan_methods;
        self.calls_found += other.calls_found;
    }
}

/// Statistics from a directory indexing run.
#[derive(Debug, Clone, Default)]
pub struct IndexStats {
    /// Units parsed and walked successfully
    pub units_indexed: usize,
    /// Units that failed and were skipped
    pub units_failed: usize,
    /// Aggregated per-unit counters
    pub totals: UnitSummary,
    /// How long the run took
    pub duration: Duration,
    /// Directories that could not be read (path, error reason)
    pub directories_skipped: Vec<(PathBuf, String)>,
    /// Unit failures (non-fatal)
    pub errors: Vec<IndexError>,
}

//! Rendering the registry as a text report or JSON.
//!
//! The text report sorts packages and classes by name and prints positions
//! one-based. The JSON export keeps zero-based positions and registry
//! insertion order, and parses back into an [`IndexSnapshot`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::DuplicatePolicy;
use crate::error::Result;
use crate::registry::Registry;
use crate::types::{ClassInfo, Location, MethodCall, MethodInfo};

/// Human-readable summary of a registry.
///
/// ```text
/// === PACKAGES ===
///  - com.acme.demo
///
/// === CLASSES & METHODS ===
///
/// [com.acme.demo.User]  (line 37, col 1)
///   - User(String name)  @ 39:5
/// ```
pub struct Report<'a> {
    registry: &'a Registry,
}

impl<'a> Report<'a> {
    /// Wrap a registry for display.
    #[must_use]
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n=== PACKAGES ===")?;
        for package in self.registry.sorted_packages() {
            writeln!(f, " - {package}")?;
        }

        writeln!(f, "\n=== CLASSES & METHODS ===")?;
        for class in self.registry.classes_sorted() {
            let (line, col) = class.location.display();
            writeln!(f, "\n[{}]  (line {line}, col {col})", class.fqcn)?;
            for method in class.methods() {
                write_method(f, method)?;
            }
        }
        Ok(())
    }
}

fn write_method(f: &mut fmt::Formatter<'_>, method: &MethodInfo) -> fmt::Result {
    let (line, col) = method.location.display();
    let return_type = method
        .return_type
        .as_deref()
        .filter(|ty| !ty.is_empty())
        .map(|ty| format!(" -> {ty}"))
        .unwrap_or_default();
    writeln!(f, "  - {}{return_type}  @ {line}:{col}", method.signature())?;

    for call in &method.calls {
        let (line, col) = call.location.display();
        let receiver = call
            .receiver
            .as_deref()
            .filter(|r| !r.is_empty())
            .map(|r| format!("{r}."))
            .unwrap_or_default();
        writeln!(f, "      calls: {receiver}{}  @ {line}:{col}", call.name)?;
    }
    Ok(())
}

/// Serializable view of a whole registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Package names, sorted
    pub packages: Vec<String>,
    /// Classes in registration order
    pub classes: Vec<ClassSnapshot>,
}

/// Serializable view of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSnapshot {
    /// Fully-qualified class name
    pub fqcn: String,
    /// Name as declared
    pub simple_name: String,
    /// Zero-based declaration line
    pub line: u32,
    /// Zero-based declaration column
    pub col: u32,
    /// Methods grouped by name, each group in declaration order
    pub methods: Vec<MethodSnapshot>,
}

/// Serializable view of one method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSnapshot {
    /// Declared name
    pub name: String,
    /// Parameters as `"<type> <name>"`
    pub params: Vec<String>,
    /// Return type; `null` for constructors
    pub return_type: Option<String>,
    /// Zero-based declaration line
    pub line: u32,
    /// Zero-based declaration column
    pub col: u32,
    /// Calls in source order
    pub calls: Vec<CallSnapshot>,
}

/// Serializable view of one call site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSnapshot {
    /// Callee name or constructor marker
    pub name: String,
    /// Receiver text; `null` when absent
    pub receiver: Option<String>,
    /// Zero-based line
    pub line: u32,
    /// Zero-based column
    pub col: u32,
}

impl From<&MethodCall> for CallSnapshot {
    fn from(call: &MethodCall) -> Self {
        Self {
            name: call.name.clone(),
            receiver: call.receiver.clone(),
            line: call.location.line,
            col: call.location.col,
        }
    }
}

impl From<&MethodInfo> for MethodSnapshot {
    fn from(method: &MethodInfo) -> Self {
        Self {
            name: method.name.clone(),
            params: method.params.clone(),
            return_type: method.return_type.clone(),
            line: method.location.line,
            col: method.location.col,
            calls: method.calls.iter().map(CallSnapshot::from).collect(),
        }
    }
}

impl From<&ClassInfo> for ClassSnapshot {
    fn from(class: &ClassInfo) -> Self {
        Self {
            fqcn: class.fqcn.clone(),
            simple_name: class.simple_name.clone(),
            line: class.location.line,
            col: class.location.col,
            methods: class.methods().map(MethodSnapshot::from).collect(),
        }
    }
}

impl From<&Registry> for IndexSnapshot {
    fn from(registry: &Registry) -> Self {
        Self {
            packages: registry
                .sorted_packages()
                .into_iter()
                .map(str::to_string)
                .collect(),
            classes: registry.classes().map(ClassSnapshot::from).collect(),
        }
    }
}

impl IndexSnapshot {
    /// Pretty-printed JSON with two-space indentation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously exported snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Json`] if the text is not a snapshot.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Rebuild a registry from this snapshot.
    ///
    /// A repeated FQCN follows `policy`, as it would during indexing.
    #[must_use]
    pub fn into_registry(self, policy: DuplicatePolicy) -> Registry {
        let mut registry = Registry::new();
        for package in self.packages {
            registry.add_package(package);
        }

        for class in self.classes {
            let location = Location::new(class.line, class.col);
            let (_, created) =
                registry.get_or_create_class(&class.fqcn, &class.simple_name, location);
            if !created && policy == DuplicatePolicy::FirstWins {
                continue;
            }
            for method in class.methods {
                registry.append_method(&class.fqcn, method.into_method());
            }
        }
        registry
    }
}

impl MethodSnapshot {
    fn into_method(self) -> MethodInfo {
        MethodInfo {
            name: self.name,
            params: self.params,
            return_type: self.return_type,
            location: Location::new(self.line, self.col),
            calls: self
                .calls
                .into_iter()
                .map(|call| MethodCall {
                    name: call.name,
                    receiver: call.receiver,
                    location: Location::new(call.line, call.col),
                })
                .collect(),
        }
    }
}

/// Export a registry as pretty JSON.
///
/// # Errors
///
/// Returns [`crate::Error::Json`] if serialization fails.
pub fn to_json(registry: &Registry) -> Result<String> {
    IndexSnapshot::from(registry).to_json()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_registry() -> Registry {
        let mut registry = Registry::new();
        registry.add_package("com.acme");
        registry.get_or_create_class("com.acme.Zeta", "Zeta", Location::new(10, 0));
        registry.get_or_create_class("com.acme.Alpha", "Alpha", Location::new(2, 4));
        registry.append_method(
            "com.acme.Alpha",
            MethodInfo {
                name: "save".to_string(),
                params: vec!["String name".to_string()],
                return_type: Some("void".to_string()),
                location: Location::new(3, 4),
                calls: vec![
                    MethodCall::invocation("add", Some("store".to_string()), Location::new(3, 30)),
                    MethodCall::construction("User", Location::new(4, 8)),
                ],
            },
        );
        registry.append_method(
            "com.acme.Alpha",
            MethodInfo {
                name: "Alpha".to_string(),
                params: Vec::new(),
                return_type: None,
                location: Location::new(5, 4),
                calls: Vec::new(),
            },
        );
        registry
    }

    #[test]
    fn report_sorts_classes_and_uses_one_based_positions() {
        let report = Report::new(&sample_registry()).to_string();

        let alpha = report.find("[com.acme.Alpha]").expect("alpha listed");
        let zeta = report.find("[com.acme.Zeta]").expect("zeta listed");
        assert!(alpha < zeta);
        assert!(report.contains("=== PACKAGES ===\n - com.acme\n"));
        assert!(report.contains("[com.acme.Alpha]  (line 3, col 5)"));
        assert!(report.contains("  - save(String name) -> void  @ 4:5"));
        assert!(report.contains("      calls: store.add  @ 4:31"));
        assert!(report.contains("      calls: <init:User>  @ 5:9"));
        assert!(report.contains("  - Alpha()  @ 6:5"));
    }

    #[test]
    fn json_uses_camel_case_and_nulls() {
        let json = to_json(&sample_registry()).expect("serialize");
        let value: serde_json::Value = serde_json::from_str(&json).expect("valid json");

        let alpha = &value["classes"][1];
        assert_eq!(alpha["fqcn"], "com.acme.Alpha");
        assert_eq!(alpha["simpleName"], "Alpha");
        assert_eq!(alpha["methods"][0]["returnType"], "void");
        assert!(alpha["methods"][1]["returnType"].is_null());
        assert!(alpha["methods"][0]["calls"][1]["receiver"].is_null());
        assert_eq!(alpha["methods"][0]["calls"][0]["col"], 30);
    }

    #[test]
    fn json_class_order_is_registration_order() {
        let snapshot = IndexSnapshot::from(&sample_registry());
        let order: Vec<_> = snapshot.classes.iter().map(|c| c.fqcn.as_str()).collect();

        assert_eq!(order, vec!["com.acme.Zeta", "com.acme.Alpha"]);
    }

    #[test]
    fn snapshot_rebuilds_equivalent_registry() {
        let exported = sample_registry();
        let json = to_json(&exported).expect("serialize");

        let rebuilt = IndexSnapshot::from_json(&json)
            .expect("parse")
            .into_registry(DuplicatePolicy::FirstWins);

        assert_eq!(rebuilt.sorted_packages(), exported.sorted_packages());
        assert_eq!(rebuilt.class_count(), exported.class_count());
        let alpha = rebuilt.class("com.acme.Alpha").expect("alpha");
        assert_eq!(alpha, exported.class("com.acme.Alpha").expect("alpha"));
    }

    #[test]
    fn empty_receiver_stays_distinct_from_null() {
        let mut registry = Registry::new();
        registry.get_or_create_class("A", "A", Location::default());
        registry.append_method(
            "A",
            MethodInfo {
                name: "m".to_string(),
                params: Vec::new(),
                return_type: None,
                location: Location::default(),
                calls: vec![
                    MethodCall::invocation("x", Some(String::new()), Location::default()),
                    MethodCall::invocation("y", None, Location::default()),
                ],
            },
        );

        let json = to_json(&registry).expect("serialize");
        let back = IndexSnapshot::from_json(&json).expect("parse");
        let calls = &back.classes[0].methods[0].calls;

        assert_eq!(calls[0].receiver.as_deref(), Some(""));
        assert_eq!(calls[1].receiver, None);
    }

    #[test]
    fn malformed_json_is_rejected() {
        assert!(matches!(
            IndexSnapshot::from_json("{\"packages\": 3}"),
            Err(crate::Error::Json(_))
        ));
    }
}

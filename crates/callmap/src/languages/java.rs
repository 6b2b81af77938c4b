//! Java extraction: package, class nesting, methods and call sites.
//!
//! One pass over a compilation unit's tree does all the work:
//!
//! 1. The package is read from the root's immediate children.
//! 2. A depth-first walk tracks enclosing class-like declarations on a
//!    [`NestingStack`]. Entering a class pushes a frame through a [`ClassScope`]
//!    guard that pops it when dropped, so the stack cannot outlive the subtree.
//! 3. Each method-like declaration is attributed to the innermost class and
//!    its body is scanned for invocations and constructions with an explicit
//!    worklist.
//!
//! Nothing here resolves a callee to a declaration; receivers are kept as the
//! text that appears in the source.

use std::ops::{Deref, DerefMut};

use tracing::{debug, warn};
use tree_sitter::{Node, Tree};

use super::tree_sitter_utils::{field_text, node_location, node_text};
use crate::config::{DuplicatePolicy, IndexerConfig, OrphanPolicy};
use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::{Location, MethodCall, MethodInfo, UnitSummary};

/// Name recorded for a method-like declaration without a name field.
pub const ANONYMOUS_METHOD: &str = "<anonymous>";
/// Name recorded for an invocation without a name field.
pub const UNKNOWN_CALLEE: &str = "<unknown>";
/// Type recorded for a construction without a type field.
pub const ANONYMOUS_TYPE: &str = "<anon>";
/// Stand-in for a parameter's missing type.
pub const MISSING_PARAM_TYPE: &str = "?";
/// Stand-in for a parameter's missing name.
pub const MISSING_PARAM_NAME: &str = "param";

/// Tree-sitter node kind constants for the Java grammar.
mod node_kinds {
    // Compilation unit
    pub const PACKAGE_DECLARATION: &str = "package_declaration";

    // Class-like declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const ENUM_DECLARATION: &str = "enum_declaration";
    pub const RECORD_DECLARATION: &str = "record_declaration";
    pub const ANNOTATION_TYPE_DECLARATION: &str = "annotation_type_declaration";

    // Method-like declarations
    pub const METHOD_DECLARATION: &str = "method_declaration";
    pub const CONSTRUCTOR_DECLARATION: &str = "constructor_declaration";
    pub const COMPACT_CONSTRUCTOR_DECLARATION: &str = "compact_constructor_declaration";

    // Expressions
    pub const METHOD_INVOCATION: &str = "method_invocation";
    pub const OBJECT_CREATION_EXPRESSION: &str = "object_creation_expression";

    // Parameters
    pub const FORMAL_PARAMETER: &str = "formal_parameter";
    pub const SPREAD_PARAMETER: &str = "spread_parameter";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";
    pub const MODIFIERS: &str = "modifiers";
    pub const ANNOTATION: &str = "annotation";
    pub const MARKER_ANNOTATION: &str = "marker_annotation";

    // Names
    pub const IDENTIFIER: &str = "identifier";
    pub const SCOPED_IDENTIFIER: &str = "scoped_identifier";
}

/// Declarations that open a class scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassLikeKind {
    /// `class Foo {}`
    Class,
    /// `interface Foo {}`
    Interface,
    /// `enum Foo {}`
    Enum,
    /// `record Foo() {}`
    Record,
    /// `@interface Foo {}`
    AnnotationType,
}

/// Declarations recorded as methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodLikeKind {
    /// A method with a return type
    Method,
    /// A constructor
    Constructor,
    /// A record's compact canonical constructor
    CompactConstructor,
}

impl MethodLikeKind {
    fn has_return_type(self) -> bool {
        match self {
            Self::Method => true,
            Self::Constructor | Self::CompactConstructor => false,
        }
    }
}

/// The grammar node kinds the walkers distinguish.
///
/// Kind strings are mapped once here; everything downstream matches on this
/// enum without wildcard arms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `package a.b;`
    PackageDeclaration,
    /// A declaration that opens a class scope
    ClassLike(ClassLikeKind),
    /// A declaration recorded as a method
    MethodLike(MethodLikeKind),
    /// `recv.name(args)` or `name(args)`
    MethodInvocation,
    /// `new Type(args)`
    ObjectCreation,
    /// `Type name`
    FormalParameter,
    /// `Type... name`
    SpreadParameter,
    /// `name` or `name = value` inside a declaration
    VariableDeclarator,
    /// Modifier list
    Modifiers,
    /// `@Foo` or `@Foo(..)`
    Annotation,
    /// `a` or `a.b.c`
    Identifier,
    /// Anything the walkers treat as plain structure
    Other,
}

impl NodeKind {
    /// Map a grammar kind string.
    #[must_use]
    pub fn from_kind(kind: &str) -> Self {
        use node_kinds::{
            ANNOTATION, ANNOTATION_TYPE_DECLARATION, CLASS_DECLARATION,
            COMPACT_CONSTRUCTOR_DECLARATION, CONSTRUCTOR_DECLARATION, ENUM_DECLARATION,
            FORMAL_PARAMETER, IDENTIFIER, INTERFACE_DECLARATION, MARKER_ANNOTATION,
            METHOD_DECLARATION, METHOD_INVOCATION, MODIFIERS, OBJECT_CREATION_EXPRESSION,
            PACKAGE_DECLARATION, RECORD_DECLARATION, SCOPED_IDENTIFIER, SPREAD_PARAMETER,
            VARIABLE_DECLARATOR,
        };

        match kind {
            PACKAGE_DECLARATION => Self::PackageDeclaration,
            CLASS_DECLARATION => Self::ClassLike(ClassLikeKind::Class),
            INTERFACE_DECLARATION => Self::ClassLike(ClassLikeKind::Interface),
            ENUM_DECLARATION => Self::ClassLike(ClassLikeKind::Enum),
            RECORD_DECLARATION => Self::ClassLike(ClassLikeKind::Record),
            ANNOTATION_TYPE_DECLARATION => Self::ClassLike(ClassLikeKind::AnnotationType),
            METHOD_DECLARATION => Self::MethodLike(MethodLikeKind::Method),
            CONSTRUCTOR_DECLARATION => Self::MethodLike(MethodLikeKind::Constructor),
            COMPACT_CONSTRUCTOR_DECLARATION => {
                Self::MethodLike(MethodLikeKind::CompactConstructor)
            }
            METHOD_INVOCATION => Self::MethodInvocation,
            OBJECT_CREATION_EXPRESSION => Self::ObjectCreation,
            FORMAL_PARAMETER => Self::FormalParameter,
            SPREAD_PARAMETER => Self::SpreadParameter,
            VARIABLE_DECLARATOR => Self::VariableDeclarator,
            MODIFIERS => Self::Modifiers,
            ANNOTATION | MARKER_ANNOTATION => Self::Annotation,
            IDENTIFIER | SCOPED_IDENTIFIER => Self::Identifier,
            _ => Self::Other,
        }
    }

    /// Kind of a tree-sitter node.
    #[must_use]
    pub fn of(node: &Node<'_>) -> Self {
        Self::from_kind(node.kind())
    }
}

/// Build a fully-qualified class name from a package and a nesting path.
#[must_use]
pub fn fqcn<'a>(package: Option<&str>, path: impl IntoIterator<Item = &'a str>) -> String {
    let joined = path.into_iter().collect::<Vec<_>>().join(".");
    match package {
        Some(pkg) if !pkg.is_empty() => format!("{pkg}.{joined}"),
        _ => joined,
    }
}

/// One enclosing class-like declaration.
#[derive(Debug, Clone)]
struct ClassFrame {
    simple_name: String,
    fqcn: String,
    /// False when this occurrence is a duplicate whose methods are dropped.
    accepts_methods: bool,
}

/// Enclosing class-like declarations, outermost first.
#[derive(Debug, Default)]
pub struct NestingStack {
    frames: Vec<ClassFrame>,
}

impl NestingStack {
    fn new() -> Self {
        Self::default()
    }

    /// Push a frame for the lifetime of the returned guard.
    fn enter(&mut self, frame: ClassFrame) -> ClassScope<'_> {
        self.frames.push(frame);
        ClassScope { stack: self }
    }

    fn innermost(&self) -> Option<&ClassFrame> {
        self.frames.last()
    }

    /// Number of enclosing classes.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// FQCN a class named `simple_name` would get if declared here.
    fn child_fqcn(&self, package: Option<&str>, simple_name: &str) -> String {
        fqcn(
            package,
            self.frames
                .iter()
                .map(|f| f.simple_name.as_str())
                .chain(std::iter::once(simple_name)),
        )
    }
}

/// Keeps one class frame pushed; pops it on drop, on every exit path.
struct ClassScope<'a> {
    stack: &'a mut NestingStack,
}

impl Deref for ClassScope<'_> {
    type Target = NestingStack;

    fn deref(&self) -> &NestingStack {
        self.stack
    }
}

impl DerefMut for ClassScope<'_> {
    fn deref_mut(&mut self) -> &mut NestingStack {
        self.stack
    }
}

impl Drop for ClassScope<'_> {
    fn drop(&mut self) {
        self.stack.frames.pop();
    }
}

/// Index one parsed compilation unit into `registry`.
///
/// Registers the unit's package, every named class-like declaration, and every
/// method-like declaration with its call sites. Only the orphan policy
/// [`OrphanPolicy::Error`] can make this fail.
pub fn index_tree(
    tree: &Tree,
    content: &[u8],
    registry: &mut Registry,
    config: &IndexerConfig,
) -> Result<UnitSummary> {
    let root = tree.root_node();
    let package = resolve_package(&root, content);
    if let Some(pkg) = &package {
        registry.add_package(pkg.clone());
    }

    let mut walker = UnitWalker {
        registry,
        content,
        package,
        duplicates: config.duplicate_classes,
        orphans: config.orphan_methods,
        summary: UnitSummary::default(),
    };
    let mut stack = NestingStack::new();
    walker.walk(root, &mut stack)?;
    debug_assert_eq!(stack.depth(), 0, "class scopes must be balanced");

    walker.summary.package = walker.package;
    Ok(walker.summary)
}

/// The unit's package name, read from the root's immediate children only.
#[must_use]
pub fn resolve_package(root: &Node<'_>, content: &[u8]) -> Option<String> {
    let mut cursor = root.walk();
    let declaration = root
        .children(&mut cursor)
        .find(|child| NodeKind::of(child) == NodeKind::PackageDeclaration)?;

    if let Some(name) = field_text(&declaration, "name", content) {
        return Some(name);
    }

    let mut inner = declaration.walk();
    declaration.children(&mut inner).find_map(|child| match NodeKind::of(&child) {
        NodeKind::Identifier => Some(node_text(&child, content)),
        NodeKind::PackageDeclaration
        | NodeKind::ClassLike(_)
        | NodeKind::MethodLike(_)
        | NodeKind::MethodInvocation
        | NodeKind::ObjectCreation
        | NodeKind::FormalParameter
        | NodeKind::SpreadParameter
        | NodeKind::VariableDeclarator
        | NodeKind::Modifiers
        | NodeKind::Annotation
        | NodeKind::Other => None,
    })
}

/// Apply the orphan policy to a method-like declaration with no enclosing class.
pub fn handle_orphan(policy: OrphanPolicy, method: &str, location: Location) -> Result<()> {
    match policy {
        OrphanPolicy::Skip => Ok(()),
        OrphanPolicy::Warn => {
            warn!(
                method,
                line = location.line + 1,
                col = location.col + 1,
                "Method declared outside any class, skipping"
            );
            Ok(())
        }
        OrphanPolicy::Error => Err(Error::StructuralAnomaly {
            method: method.to_string(),
            line: location.line,
            col: location.col,
        }),
    }
}

/// Walk state for one compilation unit.
struct UnitWalker<'r, 'c> {
    registry: &'r mut Registry,
    content: &'c [u8],
    package: Option<String>,
    duplicates: DuplicatePolicy,
    orphans: OrphanPolicy,
    summary: UnitSummary,
}

impl UnitWalker<'_, '_> {
    fn walk(&mut self, node: Node<'_>, stack: &mut NestingStack) -> Result<()> {
        match NodeKind::of(&node) {
            NodeKind::ClassLike(kind) => {
                if let Some(name_node) = node.child_by_field_name("name") {
                    return self.enter_class(node, &name_node, kind, stack);
                }
            }
            NodeKind::MethodLike(kind) => self.index_method(node, kind, stack)?,
            NodeKind::PackageDeclaration
            | NodeKind::MethodInvocation
            | NodeKind::ObjectCreation
            | NodeKind::FormalParameter
            | NodeKind::SpreadParameter
            | NodeKind::VariableDeclarator
            | NodeKind::Modifiers
            | NodeKind::Annotation
            | NodeKind::Identifier
            | NodeKind::Other => {}
        }

        self.walk_children(node, stack)
    }

    /// Visit the declarations below `node` in source order.
    ///
    /// Expression subtrees can nest arbitrarily deep, so everything between
    /// two declarations is traversed with a worklist. Recursion only happens
    /// per class-like or method-like declaration.
    fn walk_children(&mut self, node: Node<'_>, stack: &mut NestingStack) -> Result<()> {
        let mut cursor = node.walk();
        let mut worklist: Vec<_> = node.children(&mut cursor).collect();
        worklist.reverse();

        while let Some(next) = worklist.pop() {
            match NodeKind::of(&next) {
                NodeKind::ClassLike(_) | NodeKind::MethodLike(_) => self.walk(next, stack)?,
                NodeKind::PackageDeclaration
                | NodeKind::MethodInvocation
                | NodeKind::ObjectCreation
                | NodeKind::FormalParameter
                | NodeKind::SpreadParameter
                | NodeKind::VariableDeclarator
                | NodeKind::Modifiers
                | NodeKind::Annotation
                | NodeKind::Identifier
                | NodeKind::Other => {
                    let children: Vec<_> = next.children(&mut cursor).collect();
                    worklist.extend(children.into_iter().rev());
                }
            }
        }
        Ok(())
    }

    /// Register a class and walk its subtree inside its own scope.
    fn enter_class(
        &mut self,
        node: Node<'_>,
        name_node: &Node<'_>,
        kind: ClassLikeKind,
        stack: &mut NestingStack,
    ) -> Result<()> {
        let simple_name = node_text(name_node, self.content);
        let location = node_location(&node);
        let fqcn = stack.child_fqcn(self.package.as_deref(), &simple_name);

        let (_, created) = self
            .registry
            .get_or_create_class(&fqcn, &simple_name, location);
        if created {
            self.summary.classes_registered += 1;
            debug!(fqcn = %fqcn, ?kind, "Registered class");
        } else {
            self.summary.duplicate_classes += 1;
            debug!(fqcn = %fqcn, ?kind, "Class already registered, keeping first occurrence");
        }

        let accepts_methods = created || self.duplicates == DuplicatePolicy::Merge;
        let mut scope = stack.enter(ClassFrame {
            simple_name,
            fqcn,
            accepts_methods,
        });
        self.walk_children(node, &mut scope)
    }

    fn index_method(
        &mut self,
        node: Node<'_>,
        kind: MethodLikeKind,
        stack: &NestingStack,
    ) -> Result<()> {
        let location = node_location(&node);
        let Some(owner) = stack.innermost() else {
            let name = field_text(&node, "name", self.content)
                .unwrap_or_else(|| ANONYMOUS_METHOD.to_string());
            self.summary.orphan_methods += 1;
            return handle_orphan(self.orphans, &name, location);
        };

        if !owner.accepts_methods {
            self.summary.methods_dropped += 1;
            return Ok(());
        }

        let method = extract_method(node, kind, self.content);
        self.summary.methods_registered += 1;
        self.summary.calls_found += method.calls.len();
        self.registry.append_method(&owner.fqcn, method);
        Ok(())
    }
}

/// Signature and call sites of one method-like declaration.
fn extract_method(node: Node<'_>, kind: MethodLikeKind, content: &[u8]) -> MethodInfo {
    let name = field_text(&node, "name", content).unwrap_or_else(|| ANONYMOUS_METHOD.to_string());
    let return_type = if kind.has_return_type() {
        field_text(&node, "type", content)
    } else {
        None
    };
    let params = node
        .child_by_field_name("parameters")
        .map(|params| extract_parameters(&params, content))
        .unwrap_or_default();

    MethodInfo {
        name,
        params,
        return_type,
        location: node_location(&node),
        calls: collect_calls(node, content),
    }
}

/// Render each parameter of a `formal_parameters` node as `"<type> <name>"`.
fn extract_parameters(params: &Node<'_>, content: &[u8]) -> Vec<String> {
    let mut cursor = params.walk();
    params
        .children(&mut cursor)
        .filter_map(|child| match NodeKind::of(&child) {
            NodeKind::FormalParameter => Some(format_parameter(
                field_text(&child, "type", content),
                field_text(&child, "name", content),
                "",
            )),
            NodeKind::SpreadParameter => Some(spread_parameter(&child, content)),
            NodeKind::PackageDeclaration
            | NodeKind::ClassLike(_)
            | NodeKind::MethodLike(_)
            | NodeKind::MethodInvocation
            | NodeKind::ObjectCreation
            | NodeKind::VariableDeclarator
            | NodeKind::Modifiers
            | NodeKind::Annotation
            | NodeKind::Identifier
            | NodeKind::Other => None,
        })
        .collect()
}

/// `String... args`: the grammar gives no fields, so pick the parts by kind.
fn spread_parameter(node: &Node<'_>, content: &[u8]) -> String {
    let mut ty = field_text(node, "type", content);
    let mut name = None;
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match NodeKind::of(&child) {
            NodeKind::VariableDeclarator => name = field_text(&child, "name", content),
            NodeKind::Modifiers | NodeKind::Annotation => {}
            NodeKind::PackageDeclaration
            | NodeKind::ClassLike(_)
            | NodeKind::MethodLike(_)
            | NodeKind::MethodInvocation
            | NodeKind::ObjectCreation
            | NodeKind::FormalParameter
            | NodeKind::SpreadParameter
            | NodeKind::Identifier
            | NodeKind::Other => {
                if ty.is_none() {
                    ty = Some(node_text(&child, content));
                }
            }
        }
    }
    format_parameter(ty, name, "...")
}

fn format_parameter(ty: Option<String>, name: Option<String>, suffix: &str) -> String {
    format!(
        "{}{suffix} {}",
        ty.as_deref().unwrap_or(MISSING_PARAM_TYPE),
        name.as_deref().unwrap_or(MISSING_PARAM_NAME)
    )
}

/// Harvest invocations and constructions under a method-like declaration.
///
/// Uses an explicit worklist so deeply nested expressions cannot exhaust the
/// call stack. Children are pushed in reverse, which yields source pre-order.
/// Nested class-like and method-like declarations belong to other methods and
/// are not entered.
#[must_use]
pub fn collect_calls(method: Node<'_>, content: &[u8]) -> Vec<MethodCall> {
    let mut calls = Vec::new();
    let mut worklist = vec![method];
    let mut cursor = method.walk();

    while let Some(node) = worklist.pop() {
        let is_root = node.id() == method.id();
        match NodeKind::of(&node) {
            NodeKind::MethodInvocation => {
                let name = field_text(&node, "name", content)
                    .unwrap_or_else(|| UNKNOWN_CALLEE.to_string());
                let receiver = field_text(&node, "object", content);
                calls.push(MethodCall::invocation(name, receiver, node_location(&node)));
            }
            NodeKind::ObjectCreation => {
                let ty = field_text(&node, "type", content)
                    .unwrap_or_else(|| ANONYMOUS_TYPE.to_string());
                calls.push(MethodCall::construction(&ty, node_location(&node)));
            }
            NodeKind::ClassLike(_) | NodeKind::MethodLike(_) if !is_root => continue,
            NodeKind::ClassLike(_)
            | NodeKind::MethodLike(_)
            | NodeKind::PackageDeclaration
            | NodeKind::FormalParameter
            | NodeKind::SpreadParameter
            | NodeKind::VariableDeclarator
            | NodeKind::Modifiers
            | NodeKind::Annotation
            | NodeKind::Identifier
            | NodeKind::Other => {}
        }

        let children: Vec<_> = node.children(&mut cursor).collect();
        worklist.extend(children.into_iter().rev());
    }

    calls
}

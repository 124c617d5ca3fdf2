//! A small host-simulation PSI for Lumen's refactoring components.
//!
//! Real IDE refactorings run against a host-owned, mutable syntax tree. This
//! crate provides the slice of that contract the refactoring crates consume:
//!
//! - an arena-owned expression tree with handle-based node identity and
//!   explicit validity tracking (`PsiTree`, `ExprId`)
//! - snippet parsing anchored at a context node (`PsiTree::parse_expr`)
//! - in-place node replacement with copy-on-insert semantics
//! - a class/field/method model with accessibility and call-resolution
//!   queries, and visibility escalation
//! - property-accessor naming conventions (`properties`)
//!
//! Nodes handed out by this crate are references into the tree, never owned
//! values. Any mutation can invalidate previously obtained handles; callers
//! must re-check [`PsiTree::is_valid`] before reusing a handle across edits.

mod model;
mod parser;
pub mod properties;
mod resolve;
mod tree;

pub use model::{
    ClassDef, ClassId, FieldDef, FieldId, LanguageProfile, MethodDef, MethodId, ProjectId, TypeRef,
    Visibility,
};
pub use tree::{BinOp, ExprId, ExprKind, PsiError, PsiTree, SiteContext, UnaryOp};

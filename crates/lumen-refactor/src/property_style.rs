//! Cosmetic normalization of Java-style accessor calls to native property
//! syntax.
//!
//! Languages with property syntax spell `q.getFoo()` as `q.foo` and
//! `q.setFoo(v)` as `q.foo = v`. Generated accessor calls are passed through
//! here after construction; the rewrite is a simplification, never a
//! correctness requirement.

use lumen_psi::{properties, ExprId, ExprKind, PsiError, PsiTree};
use tracing::error;

struct PropertyForm {
    property: String,
    qualifier: Option<ExprId>,
    argument: Option<ExprId>,
}

/// Whether `call` is a zero-argument getter or one-argument setter call that
/// resolves to a real method and has a property spelling.
pub fn is_property_accessor(tree: &PsiTree, call: ExprId) -> bool {
    property_form(tree, call).is_some()
}

fn property_form(tree: &PsiTree, call: ExprId) -> Option<PropertyForm> {
    let ExprKind::Call { callee, args } = tree.kind(call) else {
        return None;
    };
    let ExprKind::Ref { qualifier, name } = tree.kind(*callee) else {
        return None;
    };
    // `super.getFoo()` has no property spelling.
    if qualifier.is_some_and(|q| matches!(tree.kind(q), ExprKind::Super)) {
        return None;
    }
    tree.resolve_method_call(call)?;

    match args.as_slice() {
        [] => Some(PropertyForm {
            property: properties::property_name_by_getter(name, true)?,
            qualifier: *qualifier,
            argument: None,
        }),
        [argument] => Some(PropertyForm {
            property: properties::property_name_by_setter(name)?,
            qualifier: *qualifier,
            argument: Some(*argument),
        }),
        _ => None,
    }
}

/// Rewrites an accessor call into property syntax, returning the inserted
/// node, or `None` when the call has no property form.
pub fn fix_property_call(tree: &mut PsiTree, call: ExprId) -> Result<Option<ExprId>, PsiError> {
    let Some(form) = property_form(tree, call) else {
        return Ok(None);
    };

    let template = match (form.qualifier.is_some(), form.argument.is_some()) {
        (true, true) => format!("q.{} = a", form.property),
        (true, false) => format!("q.{}", form.property),
        (false, true) => format!("{} = a", form.property),
        (false, false) => form.property.clone(),
    };
    let replacement = tree.parse_expr(&template, call)?;

    // Locate the placeholder slots structurally; placeholder names could
    // collide with the property name.
    let (property_ref, value_slot) = match *tree.kind(replacement) {
        ExprKind::Assign { lhs, rhs, .. } => (lhs, Some(rhs)),
        _ => (replacement, None),
    };
    if let Some(qualifier) = form.qualifier {
        let Some(slot) = tree.ref_qualifier(property_ref) else {
            error!("property template lost its qualifier slot");
            return Err(PsiError::TemplateShape("property template has no qualifier"));
        };
        tree.replace(slot, qualifier)?;
    }
    if let (Some(slot), Some(argument)) = (value_slot, form.argument) {
        tree.replace(slot, argument)?;
    }

    Ok(Some(tree.replace(call, replacement)?))
}

#[cfg(test)]
mod tests {
    use lumen_psi::{
        LanguageProfile, ProjectId, PsiTree, SiteContext, TypeRef, Visibility,
    };
    use pretty_assertions::assert_eq;

    use super::*;

    fn property_tree() -> (PsiTree, SiteContext) {
        let mut tree = PsiTree::new(LanguageProfile {
            property_syntax: true,
        });
        let project = ProjectId(0);
        let class = tree.add_class(project, "p", "Holder");
        tree.add_method(class, "getValue", Visibility::Public);
        tree.add_method(class, "setValue", Visibility::Public);
        tree.declare_local("q", TypeRef::class("Holder"));
        let ctx = SiteContext::in_class(project, class);
        (tree, ctx)
    }

    #[test]
    fn getter_call_becomes_property_read() {
        let (mut tree, ctx) = property_tree();
        let root = tree.parse_expr_in("(q.getValue())", ctx).unwrap();
        let call = match *tree.kind(root) {
            lumen_psi::ExprKind::Paren { inner } => inner,
            _ => unreachable!(),
        };
        assert!(is_property_accessor(&tree, call));
        fix_property_call(&mut tree, call).unwrap();
        assert_eq!(tree.text(root), "(q.value)");
    }

    #[test]
    fn setter_call_becomes_property_assignment() {
        let (mut tree, ctx) = property_tree();
        let root = tree.parse_expr_in("(q.setValue(x + 1))", ctx).unwrap();
        let call = match *tree.kind(root) {
            lumen_psi::ExprKind::Paren { inner } => inner,
            _ => unreachable!(),
        };
        fix_property_call(&mut tree, call).unwrap();
        assert_eq!(tree.text(root), "(q.value = x + 1)");
    }

    #[test]
    fn unresolved_or_non_accessor_calls_are_left_alone() {
        let (mut tree, ctx) = property_tree();
        let root = tree.parse_expr_in("(q.compute())", ctx).unwrap();
        let call = match *tree.kind(root) {
            lumen_psi::ExprKind::Paren { inner } => inner,
            _ => unreachable!(),
        };
        assert!(!is_property_accessor(&tree, call));
        assert_eq!(fix_property_call(&mut tree, call).unwrap(), None);
        assert_eq!(tree.text(root), "(q.compute())");
    }
}

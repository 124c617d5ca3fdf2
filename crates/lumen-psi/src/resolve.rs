//! Resolution and accessibility queries over the class model.
//!
//! These are the host-contract queries the rewriters lean on: "what does
//! this call resolve to", "is this field accessible from this site under
//! this (possibly prospective) visibility", and "raise this field's
//! visibility to at least what this site needs".

use tracing::debug;

use crate::model::{ClassId, FieldId, MethodId, TypeRef, Visibility};
use crate::tree::{ExprId, ExprKind, PsiTree};

impl PsiTree {
    /// Best-effort static type class of an expression.
    ///
    /// Covers exactly the qualifier shapes the rewriters produce: `this`,
    /// `super`, parenthesized expressions, locals, and (qualified) field
    /// references. Anything else has no known class.
    pub fn static_type_class(&self, id: ExprId) -> Option<ClassId> {
        match self.kind(id) {
            ExprKind::This => self.ctx(id).class,
            ExprKind::Super => self
                .ctx(id)
                .class
                .and_then(|class| self.class(class).superclass),
            ExprKind::Paren { inner } => self.static_type_class(*inner),
            ExprKind::Ref { qualifier, name } => {
                let ty = match qualifier {
                    None => self.local_type(name).cloned().or_else(|| {
                        let class = self.ctx(id).class?;
                        let field = self.find_field_in_chain(class, name)?;
                        Some(self.field(field).ty.clone())
                    }),
                    Some(q) => {
                        let qualifier_class = self.static_type_class(*q)?;
                        let field = self.find_field_in_chain(qualifier_class, name)?;
                        Some(self.field(field).ty.clone())
                    }
                }?;
                match ty {
                    TypeRef::Class(name) => self.find_class_by_name(&name),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    /// First field named `name` on `class` or any of its ancestors.
    pub fn find_field_in_chain(&self, class: ClassId, name: &str) -> Option<FieldId> {
        let mut current = Some(class);
        while let Some(class) = current {
            let def = self.class(class);
            if let Some(field) = def
                .fields()
                .iter()
                .copied()
                .find(|f| self.field(*f).name == name)
            {
                return Some(field);
            }
            current = def.superclass;
        }
        None
    }

    /// First method named `name` on `class` or any of its ancestors.
    pub fn find_method_in_chain(&self, class: ClassId, name: &str) -> Option<MethodId> {
        let mut current = Some(class);
        while let Some(class) = current {
            let def = self.class(class);
            if let Some(method) = def
                .methods()
                .iter()
                .copied()
                .find(|m| self.method(*m).name == name)
            {
                return Some(method);
            }
            current = def.superclass;
        }
        None
    }

    /// Resolves a call node to a method declaration.
    ///
    /// Unqualified calls start at the call site's containing class; qualified
    /// calls start at the qualifier's static type. A `super.` qualifier
    /// starts above the containing class, which is what lets the rewriters
    /// reach an accessor shadowed by a subclass member.
    pub fn resolve_method_call(&self, call: ExprId) -> Option<MethodId> {
        let ExprKind::Call { callee, .. } = self.kind(call) else {
            return None;
        };
        let ExprKind::Ref { qualifier, name } = self.kind(*callee) else {
            return None;
        };
        let start = match qualifier {
            None => self.ctx(call).class?,
            Some(q) => self.static_type_class(*q)?,
        };
        self.find_method_in_chain(start, name)
    }

    /// Whether `field` is accessible from `site` under its current declared
    /// visibility.
    pub fn is_field_accessible(&self, field: FieldId, site: ExprId) -> bool {
        let visibility = self.field(field).visibility;
        self.is_field_accessible_as(field, visibility, site)
    }

    /// Accessibility under a prospective visibility instead of the declared
    /// one. This backs the encapsulation eligibility check, which asks "would
    /// the field still be reachable after its modifiers change".
    pub fn is_field_accessible_as(
        &self,
        field: FieldId,
        visibility: Visibility,
        site: ExprId,
    ) -> bool {
        let owner = self.field(field).owner;
        let Some(from) = self.ctx(site).class else {
            return visibility == Visibility::Public;
        };
        match visibility {
            Visibility::Public => true,
            Visibility::Private => from == owner,
            Visibility::PackageLocal => self.class(from).package == self.class(owner).package,
            Visibility::Protected => {
                if self.class(from).package == self.class(owner).package {
                    return true;
                }
                if from != owner && !self.is_inheritor(from, owner) {
                    return false;
                }
                // Protected access through a qualifier additionally requires
                // the access object's class to be the accessing class or one
                // of its subclasses.
                match self.access_object_class(site) {
                    Some(access_object) => {
                        access_object == from || self.is_inheritor(access_object, from)
                    }
                    None => true,
                }
            }
        }
    }

    /// The class of the receiver expression, when the site is a qualified
    /// reference.
    pub fn access_object_class(&self, site: ExprId) -> Option<ClassId> {
        let qualifier = self.ref_qualifier(site)?;
        self.static_type_class(qualifier)
    }

    /// Raises the field's declared visibility to the weakest level that makes
    /// it accessible from `site`. No-op when it already is; only ever raises.
    pub fn escalate_visibility(&mut self, field: FieldId, site: ExprId) {
        if self.is_field_accessible(field, site) {
            return;
        }
        let current = self.field(field).visibility;
        for visibility in [
            Visibility::PackageLocal,
            Visibility::Protected,
            Visibility::Public,
        ] {
            if visibility <= current {
                continue;
            }
            if self.is_field_accessible_as(field, visibility, site) {
                debug!(
                    field = %self.field(field).name,
                    from = %current,
                    to = %visibility,
                    "escalating field visibility for direct access"
                );
                self.set_field_visibility(field, visibility);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{LanguageProfile, ProjectId, TypeRef, Visibility};
    use crate::tree::{PsiTree, SiteContext};
    use pretty_assertions::assert_eq;

    #[test]
    fn unqualified_call_prefers_subclass_then_super_reaches_base() {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let project = ProjectId(0);
        let base = tree.add_class(project, "p", "Base");
        let derived = tree.add_class(project, "p", "Derived");
        tree.set_superclass(derived, base);
        let base_getter = tree.add_method(base, "getValue", Visibility::Public);
        let shadow = tree.add_method(derived, "getValue", Visibility::Public);

        let ctx = SiteContext::in_class(project, derived);
        let call = tree.parse_expr_in("getValue()", ctx).unwrap();
        assert_eq!(tree.resolve_method_call(call), Some(shadow));

        let super_call = tree.parse_expr_in("super.getValue()", ctx).unwrap();
        assert_eq!(tree.resolve_method_call(super_call), Some(base_getter));
    }

    #[test]
    fn qualified_call_resolves_through_qualifier_type() {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let project = ProjectId(0);
        let target = tree.add_class(project, "p", "Target");
        let user = tree.add_class(project, "p", "User");
        let getter = tree.add_method(target, "getValue", Visibility::Public);
        tree.declare_local("q", TypeRef::class("Target"));

        let ctx = SiteContext::in_class(project, user);
        let call = tree.parse_expr_in("q.getValue()", ctx).unwrap();
        assert_eq!(tree.resolve_method_call(call), Some(getter));
    }

    #[test]
    fn prospective_visibility_controls_accessibility() {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let project = ProjectId(0);
        let owner = tree.add_class(project, "a", "Owner");
        let other = tree.add_class(project, "b", "Other");
        tree.set_superclass(other, owner);
        let field = tree.add_field(owner, "value", TypeRef::primitive("int"), Visibility::Public, false);

        let ctx = SiteContext::in_class(project, other);
        let site = tree.parse_expr_in("value", ctx).unwrap();

        assert!(tree.is_field_accessible_as(field, Visibility::Public, site));
        assert!(tree.is_field_accessible_as(field, Visibility::Protected, site));
        assert!(!tree.is_field_accessible_as(field, Visibility::PackageLocal, site));
        assert!(!tree.is_field_accessible_as(field, Visibility::Private, site));
    }

    #[test]
    fn escalation_picks_weakest_sufficient_visibility() {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let project = ProjectId(0);
        let owner = tree.add_class(project, "a", "Owner");
        let sibling = tree.add_class(project, "a", "Sibling");
        let field = tree.add_field(owner, "value", TypeRef::primitive("int"), Visibility::Private, false);

        let ctx = SiteContext::in_class(project, sibling);
        let site = tree.parse_expr_in("value", ctx).unwrap();

        tree.escalate_visibility(field, site);
        assert_eq!(tree.field(field).visibility, Visibility::PackageLocal);

        // Already accessible: a second escalation is a no-op.
        tree.escalate_visibility(field, site);
        assert_eq!(tree.field(field).visibility, Visibility::PackageLocal);
    }
}

//! Encapsulate-fields helper: usage classification and rewriting.
//!
//! The refactoring driver (out of scope here) picks fields, generates
//! accessors, finds references, and then consults this module twice per
//! occurrence: [`create_usage`] decides whether the occurrence needs
//! rewriting at all, and [`process_usage`] performs the rewrite chosen by
//! the occurrence's syntactic parent shape.

use lumen_psi::{
    properties, ClassId, ExprId, ExprKind, FieldId, MethodId, PsiError, PsiTree, UnaryOp,
    Visibility,
};
use tracing::{debug, error};

use crate::property_style;

/// Options for one encapsulate-fields run, as chosen in the driver's dialog.
#[derive(Clone, Debug)]
pub struct EncapsulateFieldsDescriptor {
    pub target_class: ClassId,
    pub encapsulate_get: bool,
    pub encapsulate_set: bool,
    /// When off, usages that can still reach the field directly under its
    /// prospective visibility are left untouched.
    pub use_accessors_when_accessible: bool,
    /// The declared visibility the fields will have after the refactoring.
    pub field_visibility: Visibility,
}

/// A field selected for encapsulation together with its accessor names.
#[derive(Clone, Debug)]
pub struct FieldDescriptor {
    pub field: FieldId,
    pub getter_name: String,
    pub setter_name: String,
}

/// One usage occurrence scheduled for rewriting.
#[derive(Clone, Debug)]
pub struct EncapsulateUsage {
    pub reference: ExprId,
    pub field: FieldDescriptor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessorKind {
    Getter,
    Setter,
}

/// A generated accessor that does not exist in the tree yet; the driver
/// materializes it into the target class.
#[derive(Clone, Debug)]
pub struct AccessorPrototype {
    pub name: String,
    pub kind: AccessorKind,
    pub visibility: Visibility,
    pub text: String,
}

/// The fields of a class eligible for encapsulation.
pub fn applicable_fields(tree: &PsiTree, class: ClassId) -> Vec<FieldId> {
    tree.class(class).fields().to_vec()
}

pub fn suggest_getter_name(tree: &PsiTree, field: FieldId) -> String {
    let def = tree.field(field);
    properties::suggest_getter_name(&def.name, def.ty.is_boolean())
}

pub fn suggest_setter_name(tree: &PsiTree, field: FieldId) -> String {
    properties::suggest_setter_name(&tree.field(field).name)
}

/// Generates an accessor prototype for `field` under `name`, or `None` when
/// the name is not a usable identifier.
pub fn generate_accessor_prototype(
    tree: &PsiTree,
    field: FieldId,
    name: &str,
    kind: AccessorKind,
) -> Option<AccessorPrototype> {
    if !properties::is_valid_identifier(name) {
        return None;
    }
    let def = tree.field(field);
    let ty = def.ty.erased_text();
    let text = match kind {
        AccessorKind::Getter => {
            format!("public {ty} {name}() {{\n    return {};\n}}", def.name)
        }
        AccessorKind::Setter => format!(
            "public void {name}({ty} {field}) {{\n    this.{field} = {field};\n}}",
            field = def.name
        ),
    };
    Some(AccessorPrototype {
        name: name.to_string(),
        kind,
        visibility: Visibility::Public,
        text,
    })
}

/// Decides whether one reference occurrence needs rewriting.
///
/// Returns `None` (a normal skip, not an error) when the occurrence lies in
/// the body of an already existing accessor, when the requested get/set
/// modes do not cover the occurrence's read/write direction, or when
/// accessor-preference is off and the field stays directly accessible under
/// its prospective visibility.
pub fn create_usage(
    tree: &PsiTree,
    descriptor: &EncapsulateFieldsDescriptor,
    field: &FieldDescriptor,
    reference: ExprId,
) -> Option<EncapsulateUsage> {
    if !tree.is_valid(reference) || !matches!(tree.kind(reference), ExprKind::Ref { .. }) {
        return None;
    }

    let find_get = descriptor.encapsulate_get;
    let find_set = descriptor.encapsulate_set;

    // Rewriting inside the accessor's own body would make it self-recursive.
    if find_get && used_in_existing_accessor(tree, descriptor.target_class, &field.getter_name, reference)
    {
        return None;
    }
    if find_set && used_in_existing_accessor(tree, descriptor.target_class, &field.setter_name, reference)
    {
        return None;
    }

    if !find_get && !tree.is_accessed_for_writing(reference) {
        return None;
    }
    if (!find_set || tree.field(field.field).is_final) && !tree.is_accessed_for_reading(reference)
    {
        return None;
    }
    if !descriptor.use_accessors_when_accessible
        && tree.is_field_accessible_as(field.field, descriptor.field_visibility, reference)
    {
        debug!(
            field = %tree.field(field.field).name,
            "field stays accessible, leaving usage untouched"
        );
        return None;
    }

    Some(EncapsulateUsage {
        reference,
        field: field.clone(),
    })
}

fn used_in_existing_accessor(
    tree: &PsiTree,
    target_class: ClassId,
    accessor_name: &str,
    reference: ExprId,
) -> bool {
    let Some(method) = tree.ctx(reference).method else {
        return false;
    };
    let def = tree.method(method);
    def.owner == target_class && def.name == accessor_name
}

/// The four rewrite shapes, keyed by the usage's syntactic parent.
enum UsageSite {
    PlainAssignment { assignment: ExprId, value: ExprId },
    CompoundAssignment { assignment: ExprId, value: ExprId },
    IncDec { unary: ExprId, op: UnaryOp },
    Read,
}

fn classify(tree: &PsiTree, reference: ExprId) -> UsageSite {
    match tree
        .parent(reference)
        .map(|p| (p, tree.kind(p).clone()))
    {
        Some((parent, ExprKind::Assign { lhs, op: None, rhs })) if lhs == reference => {
            UsageSite::PlainAssignment {
                assignment: parent,
                value: rhs,
            }
        }
        Some((parent, ExprKind::Assign { lhs, op: Some(_), rhs })) if lhs == reference => {
            UsageSite::CompoundAssignment {
                assignment: parent,
                value: rhs,
            }
        }
        Some((parent, ExprKind::Unary { op, .. })) => UsageSite::IncDec { unary: parent, op },
        _ => UsageSite::Read,
    }
}

/// Rewrites one usage occurrence.
///
/// `setter`/`getter` are the materialized accessor methods on the target
/// class, when the corresponding mode is on. Returns `false` only when the
/// usage node is gone or not a reference; rewrite failures are logged and
/// swallowed so one bad occurrence does not abort the whole refactoring.
pub fn process_usage(
    tree: &mut PsiTree,
    usage: &EncapsulateUsage,
    descriptor: &EncapsulateFieldsDescriptor,
    setter: Option<MethodId>,
    getter: Option<MethodId>,
) -> bool {
    let reference = usage.reference;
    if !tree.is_valid(reference) || !matches!(tree.kind(reference), ExprKind::Ref { .. }) {
        return false;
    }

    let field = usage.field.field;
    let process_get = descriptor.encapsulate_get;
    let process_set = descriptor.encapsulate_set && !tree.field(field).is_final;
    if !process_get && !process_set {
        return true;
    }

    if let Err(err) = rewrite_usage(
        tree, usage, descriptor, setter, getter, process_get, process_set,
    ) {
        // The usage is left in whatever state the failed mutation produced;
        // the driver carries on with the remaining occurrences.
        error!(
            field = %tree.field(field).name,
            "failed to rewrite field usage: {err}"
        );
    }
    true
}

fn rewrite_usage(
    tree: &mut PsiTree,
    usage: &EncapsulateUsage,
    descriptor: &EncapsulateFieldsDescriptor,
    setter: Option<MethodId>,
    getter: Option<MethodId>,
    process_get: bool,
    process_set: bool,
) -> Result<(), PsiError> {
    let reference = usage.reference;
    let field = usage.field.field;

    match classify(tree, reference) {
        UsageSite::PlainAssignment { assignment, value } => {
            if !process_set
                || (setter_is_simple(tree, field, setter) && tree.is_field_accessible(field, reference))
            {
                return Ok(());
            }
            if let Some(call) = create_setter_call(
                tree,
                &usage.field,
                value,
                reference,
                descriptor.target_class,
                setter,
            )? {
                let inserted = tree.replace(assignment, call)?;
                try_simplify(tree, inserted);
            }
            Ok(())
        }
        UsageSite::CompoundAssignment { assignment, value } => {
            if accessors_simple_and_field_accessible(tree, field, setter, getter, reference) {
                return Ok(());
            }
            let ExprKind::Assign { op: Some(op), .. } = *tree.kind(assignment) else {
                return Err(template_shape("compound assignment lost its operator"));
            };

            let old_value = load_expr(tree, usage, descriptor, getter, process_get)?;
            let template = format!("a {} b", op.token());
            let combined = tree.parse_expr(&template, reference)?;
            let ExprKind::Binary { lhs, rhs, .. } = *tree.kind(combined) else {
                return Err(template_shape("operator template is not a binary expression"));
            };
            let inserted = tree.replace(lhs, old_value)?;
            try_simplify(tree, inserted);
            tree.replace(rhs, value)?;

            if let Some(store) =
                store_expr(tree, usage, descriptor, setter, combined, process_set)?
            {
                let inserted = tree.replace(assignment, store)?;
                try_simplify(tree, inserted);
            }
            Ok(())
        }
        UsageSite::IncDec { unary, op } => {
            if accessors_simple_and_field_accessible(tree, field, setter, getter, reference) {
                return Ok(());
            }
            let old_value = load_expr(tree, usage, descriptor, getter, process_get)?;
            let template = match op {
                UnaryOp::Inc => "a + 1",
                UnaryOp::Dec => "a - 1",
            };
            let combined = tree.parse_expr(template, unary)?;
            let ExprKind::Binary { lhs, .. } = *tree.kind(combined) else {
                return Err(template_shape("step template is not a binary expression"));
            };
            let inserted = tree.replace(lhs, old_value)?;
            try_simplify(tree, inserted);

            if let Some(store) =
                store_expr(tree, usage, descriptor, setter, combined, process_set)?
            {
                let inserted = tree.replace(unary, store)?;
                try_simplify(tree, inserted);
            }
            Ok(())
        }
        UsageSite::Read => {
            if !process_get
                || (getter_is_simple(tree, field, getter) && tree.is_field_accessible(field, reference))
            {
                return Ok(());
            }
            if let Some(call) = create_getter_call(
                tree,
                &usage.field,
                reference,
                descriptor.target_class,
                getter,
            )? {
                let inserted = tree.replace(reference, call)?;
                try_simplify(tree, inserted);
            }
            Ok(())
        }
    }
}

/// The expression producing the field's current value: a getter call when
/// get-mode is on (and the call reconciles), otherwise the raw reference.
fn load_expr(
    tree: &mut PsiTree,
    usage: &EncapsulateUsage,
    descriptor: &EncapsulateFieldsDescriptor,
    getter: Option<MethodId>,
    process_get: bool,
) -> Result<ExprId, PsiError> {
    if !process_get {
        return Ok(usage.reference);
    }
    let call = create_getter_call(
        tree,
        &usage.field,
        usage.reference,
        descriptor.target_class,
        getter,
    )?;
    Ok(call.unwrap_or(usage.reference))
}

/// Wraps `value` in a setter call when set-mode is on, else rebuilds a plain
/// reassignment `x = value`.
fn store_expr(
    tree: &mut PsiTree,
    usage: &EncapsulateUsage,
    descriptor: &EncapsulateFieldsDescriptor,
    setter: Option<MethodId>,
    value: ExprId,
    process_set: bool,
) -> Result<Option<ExprId>, PsiError> {
    if process_set {
        return create_setter_call(
            tree,
            &usage.field,
            value,
            usage.reference,
            descriptor.target_class,
            setter,
        );
    }
    let assignment = tree.parse_expr("a = b", usage.reference)?;
    let ExprKind::Assign { lhs, rhs, .. } = *tree.kind(assignment) else {
        return Err(template_shape("reassignment template is not an assignment"));
    };
    tree.replace(lhs, usage.reference)?;
    tree.replace(rhs, value)?;
    Ok(Some(assignment))
}

fn setter_is_simple(tree: &PsiTree, field: FieldId, setter: Option<MethodId>) -> bool {
    let Some(setter) = setter else {
        return true;
    };
    properties::property_name_by_setter(&tree.method(setter).name).as_deref()
        == Some(tree.field(field).name.as_str())
}

fn getter_is_simple(tree: &PsiTree, field: FieldId, getter: Option<MethodId>) -> bool {
    let Some(getter) = getter else {
        return true;
    };
    properties::property_name_by_getter(&tree.method(getter).name, true).as_deref()
        == Some(tree.field(field).name.as_str())
}

fn accessors_simple_and_field_accessible(
    tree: &PsiTree,
    field: FieldId,
    setter: Option<MethodId>,
    getter: Option<MethodId>,
    place: ExprId,
) -> bool {
    setter_is_simple(tree, field, setter)
        && getter_is_simple(tree, field, getter)
        && tree.is_field_accessible(field, place)
}

fn create_setter_call(
    tree: &mut PsiTree,
    field: &FieldDescriptor,
    argument: ExprId,
    reference: ExprId,
    target_class: ClassId,
    setter: Option<MethodId>,
) -> Result<Option<ExprId>, PsiError> {
    let qualifier = tree.ref_qualifier(reference);
    let template = match qualifier {
        Some(_) => format!("q.{}(a)", field.setter_name),
        None => format!("{}(a)", field.setter_name),
    };
    let call = tree.parse_expr(&template, reference)?;
    let ExprKind::Call { callee, args } = tree.kind(call).clone() else {
        return Err(template_shape("setter template is not a call"));
    };
    if args.len() != 1 {
        return Err(template_shape("setter template does not take one argument"));
    }
    tree.replace(args[0], argument)?;
    if let Some(qualifier) = qualifier {
        let Some(slot) = tree.ref_qualifier(callee) else {
            return Err(template_shape("qualified setter template has no qualifier slot"));
        };
        tree.replace(slot, qualifier)?;
    }

    let call = check_method_resolvable(tree, call, setter, reference, target_class)?;
    if call.is_none() {
        tree.escalate_visibility(field.field, reference);
    }
    Ok(call)
}

fn create_getter_call(
    tree: &mut PsiTree,
    field: &FieldDescriptor,
    reference: ExprId,
    target_class: ClassId,
    getter: Option<MethodId>,
) -> Result<Option<ExprId>, PsiError> {
    let qualifier = tree.ref_qualifier(reference);
    let template = match qualifier {
        Some(_) => format!("q.{}()", field.getter_name),
        None => format!("{}()", field.getter_name),
    };
    let call = tree.parse_expr(&template, reference)?;
    let ExprKind::Call { callee, .. } = *tree.kind(call) else {
        return Err(template_shape("getter template is not a call"));
    };
    if let Some(qualifier) = qualifier {
        let Some(slot) = tree.ref_qualifier(callee) else {
            return Err(template_shape("qualified getter template has no qualifier slot"));
        };
        tree.replace(slot, qualifier)?;
    }

    let call = check_method_resolvable(tree, call, getter, reference, target_class)?;
    if call.is_none() {
        tree.escalate_visibility(field.field, reference);
    }
    Ok(call)
}

/// Verifies that a generated accessor call resolves to the intended method.
///
/// When resolution lands on a member declared by a subclass of the target
/// class (the accessor is shadowed at the call site), the callee is replaced
/// with a `super.`-qualified reference, which resolves past the shadow by
/// construction. When no reconciliation is possible the call is abandoned
/// (`None`) and the caller falls back to escalating the field's visibility.
fn check_method_resolvable(
    tree: &mut PsiTree,
    call: ExprId,
    target: Option<MethodId>,
    context: ExprId,
    target_class: ClassId,
) -> Result<Option<ExprId>, PsiError> {
    let resolved = tree.resolve_method_call(call);
    if resolved.is_some() && resolved == target {
        return Ok(Some(call));
    }
    let (Some(target), Some(resolved)) = (target, resolved) else {
        return Ok(None);
    };
    let owner = tree.method(resolved).owner;
    if !tree.is_inheritor(owner, target_class) {
        return Ok(None);
    }

    let replacement = tree.parse_expr(&format!("super.{}", tree.method(target).name), context)?;
    let ExprKind::Call { callee, .. } = *tree.kind(call) else {
        return Err(template_shape("accessor call lost its callee"));
    };
    tree.replace(callee, replacement)?;
    Ok(Some(call))
}

fn try_simplify(tree: &mut PsiTree, id: ExprId) {
    if !tree.profile().property_syntax {
        return;
    }
    if !matches!(tree.kind(id), ExprKind::Call { .. }) {
        return;
    }
    if property_style::is_property_accessor(tree, id) {
        if let Err(err) = property_style::fix_property_call(tree, id) {
            error!("failed to normalize accessor call to property syntax: {err}");
        }
    }
}

fn template_shape(what: &'static str) -> PsiError {
    error!("accessor template parsed into an unexpected shape: {what}");
    PsiError::TemplateShape(what)
}

//! Quick fix rewriting a collection expression into a `toArray(...)` call.

use lumen_psi::{ExprId, ExprKind, ProjectId, PsiError, PsiTree, TypeRef};
use tracing::error;

use crate::intention::IntentionAction;

const JAVA_LANG_OBJECT: &str = "java.lang.Object";

/// Rewrites a collection-typed expression into `(expr).toArray(new T[0])`,
/// collapsing the parentheses when precedence allows.
///
/// The conversion argument is computed once at construction: empty when the
/// element type is exactly `java.lang.Object` (the no-argument overload
/// already produces `Object[]`), otherwise a zero-length array creation of
/// the erased element type.
pub struct ConvertCollectionToArrayFix {
    collection: ExprId,
    new_array_text: String,
}

impl ConvertCollectionToArrayFix {
    pub fn new(collection: ExprId, array_type: &TypeRef) -> Self {
        let component = match array_type {
            TypeRef::Array(component) => component.as_ref(),
            // Callers hand us the array type; a bare component type means the
            // same thing with the outer dimension implied.
            other => other,
        };
        let new_array_text = match component {
            TypeRef::Class(name) if name == JAVA_LANG_OBJECT => String::new(),
            _ => format!("new {}[0]", array_type_text(component)),
        };
        Self {
            collection,
            new_array_text,
        }
    }

    /// The precomputed conversion-call argument text.
    pub fn array_argument_text(&self) -> &str {
        &self.new_array_text
    }
}

fn array_type_text(component: &TypeRef) -> String {
    match component {
        TypeRef::Array(inner) => format!("{}[]", array_type_text(inner)),
        // Class types contribute their erased textual form.
        TypeRef::Class(name) | TypeRef::Primitive(name) => name.clone(),
    }
}

fn template_shape(what: &'static str) -> PsiError {
    // The template is generated right above; a shape mismatch is a bug in
    // this fix, not a user-facing condition.
    error!("conversion template parsed into an unexpected shape: {what}");
    PsiError::TemplateShape(what)
}

impl IntentionAction for ConvertCollectionToArrayFix {
    fn text(&self) -> String {
        format!("Convert collection to 'toArray({})'", self.new_array_text)
    }

    fn family_name(&self) -> &'static str {
        "Convert collection to array"
    }

    fn is_available(&self, tree: &PsiTree, project: ProjectId) -> bool {
        tree.is_valid(self.collection) && tree.project_of(self.collection) == project
    }

    fn invoke(&self, tree: &mut PsiTree) -> Result<ExprId, PsiError> {
        if !tree.is_valid(self.collection) {
            return Err(PsiError::InvalidNode);
        }

        let template = format!("(a).toArray({})", self.new_array_text);
        let call = tree.parse_expr(&template, self.collection)?;

        let ExprKind::Call { callee, .. } = tree.kind(call) else {
            return Err(template_shape("conversion template is not a call"));
        };
        let Some(parenthesized) = tree.ref_qualifier(*callee) else {
            return Err(template_shape("conversion callee has no qualifier"));
        };
        let ExprKind::Paren { inner: placeholder } = *tree.kind(parenthesized) else {
            return Err(template_shape("conversion qualifier is not parenthesized"));
        };

        tree.replace(placeholder, self.collection)?;
        if !tree.parens_needed_as_call_qualifier(self.collection) {
            tree.replace(parenthesized, self.collection)?;
        }
        tree.replace(self.collection, call)
    }

    fn starts_write_action(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use lumen_psi::TypeRef;
    use pretty_assertions::assert_eq;

    use super::*;

    fn argument_text(component: TypeRef) -> String {
        // A dangling id is fine here; only the text synthesis is exercised.
        let fix = ConvertCollectionToArrayFix::new(
            dangling_expr(),
            &TypeRef::array_of(component),
        );
        fix.array_argument_text().to_string()
    }

    fn dangling_expr() -> lumen_psi::ExprId {
        use lumen_psi::{LanguageProfile, ProjectId, PsiTree, SiteContext};
        let mut tree = PsiTree::new(LanguageProfile::default());
        tree.parse_expr_in("a", SiteContext::top_level(ProjectId(0)))
            .unwrap()
    }

    #[test]
    fn object_element_type_synthesizes_no_argument() {
        assert_eq!(argument_text(TypeRef::class("java.lang.Object")), "");
    }

    #[test]
    fn reference_element_type_synthesizes_zero_length_array() {
        assert_eq!(
            argument_text(TypeRef::class("java.lang.String")),
            "new java.lang.String[0]"
        );
    }

    #[test]
    fn nested_array_components_accumulate_brackets_before_the_size() {
        assert_eq!(
            argument_text(TypeRef::array_of(TypeRef::array_of(TypeRef::class("Foo")))),
            "new Foo[][][0]"
        );
        assert_eq!(
            argument_text(TypeRef::array_of(TypeRef::primitive("int"))),
            "new int[][0]"
        );
    }
}

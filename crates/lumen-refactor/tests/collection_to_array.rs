use lumen_psi::{
    ExprKind, LanguageProfile, ProjectId, PsiTree, SiteContext, TypeRef,
};
use lumen_refactor::{ConvertCollectionToArrayFix, IntentionAction};
use pretty_assertions::assert_eq;

fn tree() -> (PsiTree, SiteContext) {
    let tree = PsiTree::new(LanguageProfile::default());
    let ctx = SiteContext::top_level(ProjectId(0));
    (tree, ctx)
}

fn string_array() -> TypeRef {
    TypeRef::array_of(TypeRef::class("java.lang.String"))
}

fn object_array() -> TypeRef {
    TypeRef::array_of(TypeRef::class("java.lang.Object"))
}

#[test]
fn rewrites_reference_collection_without_parentheses() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("list", ctx).unwrap();

    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());
    let result = fix.invoke(&mut tree).unwrap();

    assert_eq!(tree.text(result), "list.toArray(new java.lang.String[0])");
    assert!(!tree.is_valid(collection));
}

#[test]
fn object_element_type_produces_no_conversion_argument() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("q.items", ctx).unwrap();

    let fix = ConvertCollectionToArrayFix::new(collection, &object_array());
    assert_eq!(fix.array_argument_text(), "");

    let result = fix.invoke(&mut tree).unwrap();
    assert_eq!(tree.text(result), "q.items.toArray()");
}

#[test]
fn qualifier_is_the_original_collection_expression() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("q.items", ctx).unwrap();
    // A structural twin for comparison; the original is invalidated by the
    // rewrite.
    let twin = tree.parse_expr_in("q.items", ctx).unwrap();

    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());
    let result = fix.invoke(&mut tree).unwrap();

    let ExprKind::Call { callee, args } = tree.kind(result) else {
        panic!("expected a conversion call, got {:?}", tree.kind(result));
    };
    let qualifier = tree.ref_qualifier(*callee).expect("conversion call is qualified");
    assert!(tree.structurally_equal(qualifier, twin));
    assert_eq!(args.len(), 1);
    assert_eq!(tree.text(args[0]), "new java.lang.String[0]");
}

#[test]
fn non_primary_collection_expression_keeps_its_parentheses() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("flag = make()", ctx).unwrap();

    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());
    let result = fix.invoke(&mut tree).unwrap();

    assert_eq!(
        tree.text(result),
        "(flag = make()).toArray(new java.lang.String[0])"
    );
}

#[test]
fn call_collection_expression_drops_the_template_parentheses() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("makeList()", ctx).unwrap();

    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());
    let result = fix.invoke(&mut tree).unwrap();

    assert_eq!(
        tree.text(result),
        "makeList().toArray(new java.lang.String[0])"
    );
}

#[test]
fn nested_array_type_text_ends_in_a_single_size() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("list", ctx).unwrap();

    let nested = TypeRef::array_of(TypeRef::array_of(TypeRef::array_of(TypeRef::class("Foo"))));
    let fix = ConvertCollectionToArrayFix::new(collection, &nested);
    assert_eq!(fix.array_argument_text(), "new Foo[][][0]");

    let result = fix.invoke(&mut tree).unwrap();
    assert_eq!(tree.text(result), "list.toArray(new Foo[][][0])");
}

#[test]
fn unavailable_for_invalid_or_foreign_nodes() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("list", ctx).unwrap();
    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());

    assert!(fix.is_available(&tree, ProjectId(0)));
    assert!(!fix.is_available(&tree, ProjectId(1)));
    assert!(fix.starts_write_action());

    // Replacing the captured expression invalidates it.
    let other = tree.parse_expr_in("other", ctx).unwrap();
    tree.replace(collection, other).unwrap();
    assert!(!fix.is_available(&tree, ProjectId(0)));
    assert!(fix.invoke(&mut tree).is_err());
}

#[test]
fn label_mentions_the_conversion_argument() {
    let (mut tree, ctx) = tree();
    let collection = tree.parse_expr_in("list", ctx).unwrap();
    let fix = ConvertCollectionToArrayFix::new(collection, &string_array());

    assert_eq!(
        fix.text(),
        "Convert collection to 'toArray(new java.lang.String[0])'"
    );
    assert_eq!(fix.family_name(), "Convert collection to array");
}

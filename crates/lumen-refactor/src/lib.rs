//! Refactoring components for Lumen.
//!
//! Two independent, stateless-after-construction transformation units:
//! - `ConvertCollectionToArrayFix`: rewrites a collection-typed expression
//!   into a `toArray(...)` conversion call (`collection_to_array`)
//! - the encapsulate-fields helper: classifies and rewrites usages of a
//!   field behind generated accessors (`encapsulate_fields`)
//!
//! Both operate on a [`lumen_psi::PsiTree`] they do not own; every mutating
//! entry point takes `&mut PsiTree` and must be called under the driver's
//! exclusive write scope.

mod collection_to_array;
mod encapsulate_fields;
mod intention;
mod property_style;

pub use collection_to_array::ConvertCollectionToArrayFix;
pub use encapsulate_fields::{
    applicable_fields, create_usage, generate_accessor_prototype, process_usage,
    suggest_getter_name, suggest_setter_name, AccessorKind, AccessorPrototype,
    EncapsulateFieldsDescriptor, EncapsulateUsage, FieldDescriptor,
};
pub use intention::IntentionAction;
pub use property_style::{fix_property_call, is_property_accessor};

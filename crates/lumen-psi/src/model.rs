//! Class, member, and type model backing resolution and accessibility queries.

use std::fmt;

/// Identifier for a project; nodes and classes created under different
/// projects never see each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProjectId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClassId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FieldId(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MethodId(pub(crate) u32);

/// Declared visibility of a member, ordered from most to least restrictive.
///
/// The ordering matters: visibility escalation only ever moves up this
/// ordering, which is what makes escalation commute across sequentially
/// processed usages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Visibility {
    Private,
    PackageLocal,
    Protected,
    Public,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Visibility::Private => "private",
            Visibility::PackageLocal => "package-local",
            Visibility::Protected => "protected",
            Visibility::Public => "public",
        };
        f.write_str(text)
    }
}

/// A declared type reference.
///
/// Class types carry their erased (raw) textual form only; generics never
/// survive into the synthesized array-creation text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeRef {
    Primitive(String),
    Class(String),
    Array(Box<TypeRef>),
}

impl TypeRef {
    pub fn primitive(name: impl Into<String>) -> Self {
        TypeRef::Primitive(name.into())
    }

    pub fn class(raw_name: impl Into<String>) -> Self {
        TypeRef::Class(raw_name.into())
    }

    pub fn array_of(component: TypeRef) -> Self {
        TypeRef::Array(Box::new(component))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, TypeRef::Primitive(name) if name == "boolean")
    }

    /// The erased textual form: raw class name, primitive name, or the
    /// component's form followed by `[]`.
    pub fn erased_text(&self) -> String {
        match self {
            TypeRef::Primitive(name) | TypeRef::Class(name) => name.clone(),
            TypeRef::Array(component) => format!("{}[]", component.erased_text()),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub package: String,
    pub project: ProjectId,
    pub superclass: Option<ClassId>,
    pub(crate) fields: Vec<FieldId>,
    pub(crate) methods: Vec<MethodId>,
}

impl ClassDef {
    pub fn fields(&self) -> &[FieldId] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodId] {
        &self.methods
    }
}

#[derive(Clone, Debug)]
pub struct FieldDef {
    pub name: String,
    pub ty: TypeRef,
    pub visibility: Visibility,
    pub is_final: bool,
    pub owner: ClassId,
}

#[derive(Clone, Debug)]
pub struct MethodDef {
    pub name: String,
    pub visibility: Visibility,
    pub owner: ClassId,
}

/// Static facts about the language the tree models.
///
/// The encapsulate-fields rewriter normalizes generated accessor calls to
/// native property syntax, but only when the language has one.
#[derive(Clone, Copy, Debug, Default)]
pub struct LanguageProfile {
    pub property_syntax: bool,
}

//! Arena-owned mutable expression tree.
//!
//! Expression nodes are handles (`ExprId`) into a [`PsiTree`]. The tree owns
//! every node; components read syntactic shape through accessors and request
//! mutation through [`PsiTree::replace`]. Replacement follows the host
//! contract: the replacement subtree is copied into the target's slot, the
//! inserted node is returned, and the target subtree is invalidated. Handles
//! to invalidated nodes stay index-stable but fail validity checks.

use std::collections::HashMap;

use thiserror::Error;

use crate::model::{
    ClassDef, ClassId, FieldDef, FieldId, LanguageProfile, MethodDef, MethodId, ProjectId, TypeRef,
    Visibility,
};
use crate::parser;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExprId(pub(crate) u32);

/// Where a node lives: its project plus the class and method whose body
/// syntactically contains it. Snippets parsed against an anchor inherit the
/// anchor's context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiteContext {
    pub project: ProjectId,
    pub class: Option<ClassId>,
    pub method: Option<MethodId>,
}

impl SiteContext {
    pub fn top_level(project: ProjectId) -> Self {
        Self {
            project,
            class: None,
            method: None,
        }
    }

    pub fn in_class(project: ProjectId, class: ClassId) -> Self {
        Self {
            project,
            class: Some(class),
            method: None,
        }
    }

    pub fn in_method(project: ProjectId, class: ClassId, method: MethodId) -> Self {
        Self {
            project,
            class: Some(class),
            method: Some(method),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    UShr,
    BitAnd,
    BitOr,
    BitXor,
}

impl BinOp {
    pub fn token(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Shl => "<<",
            BinOp::Shr => ">>",
            BinOp::UShr => ">>>",
            BinOp::BitAnd => "&",
            BinOp::BitOr => "|",
            BinOp::BitXor => "^",
        }
    }

    pub(crate) fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "+" => BinOp::Add,
            "-" => BinOp::Sub,
            "*" => BinOp::Mul,
            "/" => BinOp::Div,
            "%" => BinOp::Rem,
            "<<" => BinOp::Shl,
            ">>" => BinOp::Shr,
            ">>>" => BinOp::UShr,
            "&" => BinOp::BitAnd,
            "|" => BinOp::BitOr,
            "^" => BinOp::BitXor,
            _ => return None,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryOp {
    Inc,
    Dec,
}

impl UnaryOp {
    pub fn token(self) -> &'static str {
        match self {
            UnaryOp::Inc => "++",
            UnaryOp::Dec => "--",
        }
    }
}

/// Syntactic shape of one expression node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExprKind {
    /// A possibly qualified reference: `x`, `q.x`, `super.x`.
    Ref {
        qualifier: Option<ExprId>,
        name: String,
    },
    This,
    Super,
    Literal {
        text: String,
    },
    /// Array-creation syntax kept as verbatim text (`new Foo[][0]`); the
    /// rewriters only ever pass it through.
    NewArray {
        text: String,
    },
    Paren {
        inner: ExprId,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Binary {
        lhs: ExprId,
        op: BinOp,
        rhs: ExprId,
    },
    /// Assignment; `op` is `None` for plain `=` and `Some` for compound
    /// operators (`+=`, `<<=`, ...).
    Assign {
        lhs: ExprId,
        op: Option<BinOp>,
        rhs: ExprId,
    },
    Unary {
        op: UnaryOp,
        operand: ExprId,
        prefix: bool,
    },
}

#[derive(Debug, Error)]
pub enum PsiError {
    #[error("expression node is no longer valid")]
    InvalidNode,
    #[error("failed to parse expression snippet: {0}")]
    Parse(String),
    #[error("generated snippet parsed into an unexpected shape: {0}")]
    TemplateShape(&'static str),
    #[error("node cannot be replaced: {0}")]
    ReplaceFailed(&'static str),
}

#[derive(Clone, Debug)]
pub(crate) struct ExprNode {
    pub(crate) kind: ExprKind,
    pub(crate) parent: Option<ExprId>,
    pub(crate) ctx: SiteContext,
    pub(crate) valid: bool,
}

/// The arena holding every expression node and the class/member model.
///
/// All mutation goes through `&mut self`; the borrow checker stands in for
/// the host's write-action lock. There is no internal synchronization and no
/// cross-invocation state beyond the tree itself.
pub struct PsiTree {
    exprs: Vec<ExprNode>,
    classes: Vec<ClassDef>,
    fields: Vec<FieldDef>,
    methods: Vec<MethodDef>,
    locals: HashMap<String, TypeRef>,
    profile: LanguageProfile,
}

impl PsiTree {
    pub fn new(profile: LanguageProfile) -> Self {
        Self {
            exprs: Vec::new(),
            classes: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            locals: HashMap::new(),
            profile,
        }
    }

    pub fn profile(&self) -> LanguageProfile {
        self.profile
    }

    // ---- class/member model -------------------------------------------------

    pub fn add_class(
        &mut self,
        project: ProjectId,
        package: impl Into<String>,
        name: impl Into<String>,
    ) -> ClassId {
        let id = ClassId(self.classes.len() as u32);
        self.classes.push(ClassDef {
            name: name.into(),
            package: package.into(),
            project,
            superclass: None,
            fields: Vec::new(),
            methods: Vec::new(),
        });
        id
    }

    pub fn set_superclass(&mut self, class: ClassId, superclass: ClassId) {
        self.classes[class.0 as usize].superclass = Some(superclass);
    }

    pub fn add_field(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        ty: TypeRef,
        visibility: Visibility,
        is_final: bool,
    ) -> FieldId {
        let id = FieldId(self.fields.len() as u32);
        self.fields.push(FieldDef {
            name: name.into(),
            ty,
            visibility,
            is_final,
            owner: class,
        });
        self.classes[class.0 as usize].fields.push(id);
        id
    }

    pub fn add_method(
        &mut self,
        class: ClassId,
        name: impl Into<String>,
        visibility: Visibility,
    ) -> MethodId {
        let id = MethodId(self.methods.len() as u32);
        self.methods.push(MethodDef {
            name: name.into(),
            visibility,
            owner: class,
        });
        self.classes[class.0 as usize].methods.push(id);
        id
    }

    /// Registers a local variable visible to snippet resolution.
    ///
    /// The simulation keeps a flat namespace; real hosts scope locals, but
    /// the rewriters only ever ask for the static type of a qualifier.
    pub fn declare_local(&mut self, name: impl Into<String>, ty: TypeRef) {
        self.locals.insert(name.into(), ty);
    }

    pub(crate) fn local_type(&self, name: &str) -> Option<&TypeRef> {
        self.locals.get(name)
    }

    pub fn class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.0 as usize]
    }

    pub fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.0 as usize]
    }

    pub fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.0 as usize]
    }

    pub fn set_field_visibility(&mut self, field: FieldId, visibility: Visibility) {
        self.fields[field.0 as usize].visibility = visibility;
    }

    pub fn find_class_by_name(&self, name: &str) -> Option<ClassId> {
        self.classes
            .iter()
            .position(|class| class.name == name)
            .map(|idx| ClassId(idx as u32))
    }

    /// Whether `class` inherits (transitively) from `ancestor`. A class is
    /// not its own inheritor.
    pub fn is_inheritor(&self, class: ClassId, ancestor: ClassId) -> bool {
        let mut current = self.class(class).superclass;
        while let Some(sup) = current {
            if sup == ancestor {
                return true;
            }
            current = self.class(sup).superclass;
        }
        false
    }

    // ---- expression nodes ---------------------------------------------------

    pub(crate) fn alloc(&mut self, kind: ExprKind, ctx: SiteContext) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(ExprNode {
            kind,
            parent: None,
            ctx,
            valid: true,
        });
        id
    }

    pub fn kind(&self, id: ExprId) -> &ExprKind {
        &self.exprs[id.0 as usize].kind
    }

    pub fn parent(&self, id: ExprId) -> Option<ExprId> {
        self.exprs[id.0 as usize].parent
    }

    pub fn ctx(&self, id: ExprId) -> SiteContext {
        self.exprs[id.0 as usize].ctx
    }

    pub fn is_valid(&self, id: ExprId) -> bool {
        self.exprs[id.0 as usize].valid
    }

    pub fn project_of(&self, id: ExprId) -> ProjectId {
        self.exprs[id.0 as usize].ctx.project
    }

    /// The qualifier of a reference node, if the node is a reference and has
    /// one.
    pub fn ref_qualifier(&self, id: ExprId) -> Option<ExprId> {
        match self.kind(id) {
            ExprKind::Ref { qualifier, .. } => *qualifier,
            _ => None,
        }
    }

    pub fn ref_name(&self, id: ExprId) -> Option<&str> {
        match self.kind(id) {
            ExprKind::Ref { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    fn children(&self, id: ExprId) -> Vec<ExprId> {
        match self.kind(id) {
            ExprKind::Ref { qualifier, .. } => qualifier.iter().copied().collect(),
            ExprKind::This
            | ExprKind::Super
            | ExprKind::Literal { .. }
            | ExprKind::NewArray { .. } => Vec::new(),
            ExprKind::Paren { inner } => vec![*inner],
            ExprKind::Call { callee, args } => {
                let mut out = vec![*callee];
                out.extend(args.iter().copied());
                out
            }
            ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
                vec![*lhs, *rhs]
            }
            ExprKind::Unary { operand, .. } => vec![*operand],
        }
    }

    pub(crate) fn wire_parents(&mut self, root: ExprId) {
        for child in self.children(root) {
            self.exprs[child.0 as usize].parent = Some(root);
            self.wire_parents(child);
        }
    }

    // ---- parsing ------------------------------------------------------------

    /// Parses `text` as an expression in the syntactic context of `anchor`.
    ///
    /// The returned root is detached (no parent) until spliced somewhere via
    /// [`PsiTree::replace`].
    pub fn parse_expr(&mut self, text: &str, anchor: ExprId) -> Result<ExprId, PsiError> {
        let ctx = self.ctx(anchor);
        self.parse_expr_in(text, ctx)
    }

    pub fn parse_expr_in(&mut self, text: &str, ctx: SiteContext) -> Result<ExprId, PsiError> {
        let root = parser::parse(self, text, ctx)?;
        self.wire_parents(root);
        Ok(root)
    }

    // ---- mutation -----------------------------------------------------------

    /// Replaces `target` with a copy of `replacement`, in place.
    ///
    /// Returns the inserted copy. The target subtree is invalidated; the
    /// `replacement` argument itself is left untouched, so a node can be
    /// spliced into several slots. When `target` is a detached root there is
    /// no parent slot to patch and the caller must track the returned node.
    pub fn replace(&mut self, target: ExprId, replacement: ExprId) -> Result<ExprId, PsiError> {
        if !self.is_valid(target) || !self.is_valid(replacement) {
            return Err(PsiError::InvalidNode);
        }

        let target_ctx = self.ctx(target);
        let copy = self.deep_copy(replacement, target_ctx);
        let parent = self.parent(target);

        if let Some(parent_id) = parent {
            if !self.swap_child_slot(parent_id, target, copy) {
                return Err(PsiError::ReplaceFailed(
                    "target is not a child of its recorded parent",
                ));
            }
        }

        self.exprs[copy.0 as usize].parent = parent;
        self.invalidate_subtree(target);
        Ok(copy)
    }

    fn swap_child_slot(&mut self, parent: ExprId, old: ExprId, new: ExprId) -> bool {
        let kind = &mut self.exprs[parent.0 as usize].kind;
        match kind {
            ExprKind::Ref { qualifier, .. } => {
                if *qualifier == Some(old) {
                    *qualifier = Some(new);
                    return true;
                }
            }
            ExprKind::Paren { inner } => {
                if *inner == old {
                    *inner = new;
                    return true;
                }
            }
            ExprKind::Call { callee, args } => {
                if *callee == old {
                    *callee = new;
                    return true;
                }
                for arg in args.iter_mut() {
                    if *arg == old {
                        *arg = new;
                        return true;
                    }
                }
            }
            ExprKind::Binary { lhs, rhs, .. } | ExprKind::Assign { lhs, rhs, .. } => {
                if *lhs == old {
                    *lhs = new;
                    return true;
                }
                if *rhs == old {
                    *rhs = new;
                    return true;
                }
            }
            ExprKind::Unary { operand, .. } => {
                if *operand == old {
                    *operand = new;
                    return true;
                }
            }
            ExprKind::This
            | ExprKind::Super
            | ExprKind::Literal { .. }
            | ExprKind::NewArray { .. } => {}
        }
        false
    }

    fn deep_copy(&mut self, id: ExprId, ctx: SiteContext) -> ExprId {
        let kind = match self.kind(id).clone() {
            ExprKind::Ref { qualifier, name } => ExprKind::Ref {
                qualifier: qualifier.map(|q| self.deep_copy(q, ctx)),
                name,
            },
            ExprKind::Paren { inner } => ExprKind::Paren {
                inner: self.deep_copy(inner, ctx),
            },
            ExprKind::Call { callee, args } => ExprKind::Call {
                callee: self.deep_copy(callee, ctx),
                args: args.into_iter().map(|a| self.deep_copy(a, ctx)).collect(),
            },
            ExprKind::Binary { lhs, op, rhs } => ExprKind::Binary {
                lhs: self.deep_copy(lhs, ctx),
                op,
                rhs: self.deep_copy(rhs, ctx),
            },
            ExprKind::Assign { lhs, op, rhs } => ExprKind::Assign {
                lhs: self.deep_copy(lhs, ctx),
                op,
                rhs: self.deep_copy(rhs, ctx),
            },
            ExprKind::Unary {
                op,
                operand,
                prefix,
            } => ExprKind::Unary {
                op,
                operand: self.deep_copy(operand, ctx),
                prefix,
            },
            leaf @ (ExprKind::This
            | ExprKind::Super
            | ExprKind::Literal { .. }
            | ExprKind::NewArray { .. }) => leaf,
        };
        let copy = self.alloc(kind, ctx);
        for child in self.children(copy) {
            self.exprs[child.0 as usize].parent = Some(copy);
        }
        copy
    }

    fn invalidate_subtree(&mut self, id: ExprId) {
        for child in self.children(id) {
            self.invalidate_subtree(child);
        }
        self.exprs[id.0 as usize].valid = false;
    }

    // ---- queries ------------------------------------------------------------

    /// Whether `inner` needs to stay parenthesized when used as the receiver
    /// of a method call. Postfix/primary expressions bind tighter than `.`,
    /// everything else does not.
    pub fn parens_needed_as_call_qualifier(&self, inner: ExprId) -> bool {
        !matches!(
            self.kind(inner),
            ExprKind::Ref { .. }
                | ExprKind::Call { .. }
                | ExprKind::Paren { .. }
                | ExprKind::Literal { .. }
                | ExprKind::NewArray { .. }
                | ExprKind::This
                | ExprKind::Super
        )
    }

    /// Whether the reference occurs in write position (assignment target or
    /// operand of `++`/`--`). Compound assignments count as writes too.
    pub fn is_accessed_for_writing(&self, id: ExprId) -> bool {
        match self.parent(id).map(|p| self.kind(p)) {
            Some(ExprKind::Assign { lhs, .. }) => *lhs == id,
            Some(ExprKind::Unary { .. }) => true,
            _ => false,
        }
    }

    /// Whether the reference occurs in read position. Only the target of a
    /// plain `=` assignment is write-only; compound assignments and `++`/`--`
    /// read the old value.
    pub fn is_accessed_for_reading(&self, id: ExprId) -> bool {
        match self.parent(id).map(|p| self.kind(p)) {
            Some(ExprKind::Assign { lhs, op: None, .. }) => *lhs != id,
            _ => true,
        }
    }

    /// Collects every reference named `name` in the subtree rooted at `root`,
    /// in source order. Reference *names* only; qualifiers are recursed into
    /// but a match on the qualifier does not match the outer reference.
    pub fn collect_references(&self, root: ExprId, name: &str) -> Vec<ExprId> {
        let mut out = Vec::new();
        self.collect_references_into(root, name, &mut out);
        out
    }

    fn collect_references_into(&self, id: ExprId, name: &str, out: &mut Vec<ExprId>) {
        if let ExprKind::Ref {
            name: ref_name, ..
        } = self.kind(id)
        {
            if ref_name == name {
                out.push(id);
            }
        }
        for child in self.children(id) {
            self.collect_references_into(child, name, out);
        }
    }

    pub fn find_reference(&self, root: ExprId, name: &str) -> Option<ExprId> {
        self.collect_references(root, name).into_iter().next()
    }

    // ---- text ---------------------------------------------------------------

    /// Renders the node back to source text.
    pub fn text(&self, id: ExprId) -> String {
        match self.kind(id) {
            ExprKind::Ref { qualifier, name } => match qualifier {
                Some(q) => format!("{}.{}", self.text(*q), name),
                None => name.clone(),
            },
            ExprKind::This => "this".to_string(),
            ExprKind::Super => "super".to_string(),
            ExprKind::Literal { text } | ExprKind::NewArray { text } => text.clone(),
            ExprKind::Paren { inner } => format!("({})", self.text(*inner)),
            ExprKind::Call { callee, args } => {
                let args = args
                    .iter()
                    .map(|a| self.text(*a))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("{}({})", self.text(*callee), args)
            }
            ExprKind::Binary { lhs, op, rhs } => {
                format!("{} {} {}", self.text(*lhs), op.token(), self.text(*rhs))
            }
            ExprKind::Assign { lhs, op, rhs } => {
                let op = op.map(BinOp::token).unwrap_or("");
                format!("{} {}= {}", self.text(*lhs), op, self.text(*rhs))
            }
            ExprKind::Unary {
                op,
                operand,
                prefix,
            } => {
                if *prefix {
                    format!("{}{}", op.token(), self.text(*operand))
                } else {
                    format!("{}{}", self.text(*operand), op.token())
                }
            }
        }
    }

    /// Structural equality: same shapes, names, operators, and literal text.
    /// Node identity and validity are ignored.
    pub fn structurally_equal(&self, a: ExprId, b: ExprId) -> bool {
        match (self.kind(a), self.kind(b)) {
            (
                ExprKind::Ref {
                    qualifier: qa,
                    name: na,
                },
                ExprKind::Ref {
                    qualifier: qb,
                    name: nb,
                },
            ) => {
                na == nb
                    && match (qa, qb) {
                        (Some(qa), Some(qb)) => self.structurally_equal(*qa, *qb),
                        (None, None) => true,
                        _ => false,
                    }
            }
            (ExprKind::This, ExprKind::This) | (ExprKind::Super, ExprKind::Super) => true,
            (ExprKind::Literal { text: ta }, ExprKind::Literal { text: tb })
            | (ExprKind::NewArray { text: ta }, ExprKind::NewArray { text: tb }) => ta == tb,
            (ExprKind::Paren { inner: ia }, ExprKind::Paren { inner: ib }) => {
                self.structurally_equal(*ia, *ib)
            }
            (
                ExprKind::Call {
                    callee: ca,
                    args: aa,
                },
                ExprKind::Call {
                    callee: cb,
                    args: ab,
                },
            ) => {
                self.structurally_equal(*ca, *cb)
                    && aa.len() == ab.len()
                    && aa
                        .iter()
                        .zip(ab.iter())
                        .all(|(x, y)| self.structurally_equal(*x, *y))
            }
            (
                ExprKind::Binary {
                    lhs: la,
                    op: oa,
                    rhs: ra,
                },
                ExprKind::Binary {
                    lhs: lb,
                    op: ob,
                    rhs: rb,
                },
            ) => oa == ob && self.structurally_equal(*la, *lb) && self.structurally_equal(*ra, *rb),
            (
                ExprKind::Assign {
                    lhs: la,
                    op: oa,
                    rhs: ra,
                },
                ExprKind::Assign {
                    lhs: lb,
                    op: ob,
                    rhs: rb,
                },
            ) => oa == ob && self.structurally_equal(*la, *lb) && self.structurally_equal(*ra, *rb),
            (
                ExprKind::Unary {
                    op: oa,
                    operand: ea,
                    prefix: pa,
                },
                ExprKind::Unary {
                    op: ob,
                    operand: eb,
                    prefix: pb,
                },
            ) => oa == ob && pa == pb && self.structurally_equal(*ea, *eb),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tree_with_ctx() -> (PsiTree, SiteContext) {
        let tree = PsiTree::new(LanguageProfile::default());
        let ctx = SiteContext::top_level(ProjectId(0));
        (tree, ctx)
    }

    #[test]
    fn replace_patches_parent_slot_and_invalidates_target() {
        let (mut tree, ctx) = tree_with_ctx();
        let root = tree.parse_expr_in("a + b", ctx).unwrap();
        let b = tree.find_reference(root, "b").unwrap();
        let repl = tree.parse_expr_in("c", ctx).unwrap();

        let inserted = tree.replace(b, repl).unwrap();

        assert_eq!(tree.text(root), "a + c");
        assert_eq!(tree.parent(inserted), Some(root));
        assert!(!tree.is_valid(b));
        assert!(tree.is_valid(inserted));
        // The replacement argument itself is untouched and reusable.
        assert!(tree.is_valid(repl));
    }

    #[test]
    fn replace_copies_so_one_node_can_fill_two_slots() {
        let (mut tree, ctx) = tree_with_ctx();
        let root = tree.parse_expr_in("a + b", ctx).unwrap();
        let x = tree.parse_expr_in("q.x", ctx).unwrap();

        let a = tree.find_reference(root, "a").unwrap();
        tree.replace(a, x).unwrap();
        let b = tree.find_reference(root, "b").unwrap();
        tree.replace(b, x).unwrap();

        assert_eq!(tree.text(root), "q.x + q.x");
    }

    #[test]
    fn read_write_classification() {
        let (mut tree, ctx) = tree_with_ctx();

        let plain = tree.parse_expr_in("x = v", ctx).unwrap();
        let x = tree.find_reference(plain, "x").unwrap();
        assert!(tree.is_accessed_for_writing(x));
        assert!(!tree.is_accessed_for_reading(x));

        let compound = tree.parse_expr_in("x += v", ctx).unwrap();
        let x = tree.find_reference(compound, "x").unwrap();
        assert!(tree.is_accessed_for_writing(x));
        assert!(tree.is_accessed_for_reading(x));

        let inc = tree.parse_expr_in("x++", ctx).unwrap();
        let x = tree.find_reference(inc, "x").unwrap();
        assert!(tree.is_accessed_for_writing(x));
        assert!(tree.is_accessed_for_reading(x));

        let read = tree.parse_expr_in("y = x", ctx).unwrap();
        let x = tree.find_reference(read, "x").unwrap();
        assert!(!tree.is_accessed_for_writing(x));
        assert!(tree.is_accessed_for_reading(x));
    }

    #[test]
    fn qualifier_parenthesization() {
        let (mut tree, ctx) = tree_with_ctx();
        let needs = tree.parse_expr_in("a + b", ctx).unwrap();
        assert!(tree.parens_needed_as_call_qualifier(needs));

        let call = tree.parse_expr_in("f(x)", ctx).unwrap();
        assert!(!tree.parens_needed_as_call_qualifier(call));

        let qualified = tree.parse_expr_in("q.x", ctx).unwrap();
        assert!(!tree.parens_needed_as_call_qualifier(qualified));
    }

    #[test]
    fn structural_equality_ignores_identity() {
        let (mut tree, ctx) = tree_with_ctx();
        let a = tree.parse_expr_in("q.f(x + 1)", ctx).unwrap();
        let b = tree.parse_expr_in("q.f(x + 1)", ctx).unwrap();
        let c = tree.parse_expr_in("q.f(x + 2)", ctx).unwrap();
        assert!(tree.structurally_equal(a, b));
        assert!(!tree.structurally_equal(a, c));
    }
}

//! Snippet parser for template-based tree construction.
//!
//! The rewriters never build nodes structurally; they parse small source
//! snippets ("a.toArray()", "a = b", "a + 1") and splice existing subtrees
//! into the placeholder slots. The grammar here covers exactly the shape
//! space those templates and their surrounding usage sites occupy:
//! references, calls, parentheses, literals, array creation, binary
//! operators, assignments, and `++`/`--`.

use crate::tree::{BinOp, ExprId, ExprKind, PsiError, PsiTree, SiteContext, UnaryOp};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TokenKind {
    Ident,
    Int,
    Sym,
    Eof,
}

#[derive(Clone, Copy, Debug)]
struct Token {
    kind: TokenKind,
    start: usize,
    end: usize,
}

struct Parser<'t, 's> {
    tree: &'t mut PsiTree,
    src: &'s str,
    tokens: Vec<Token>,
    pos: usize,
    ctx: SiteContext,
}

pub(crate) fn parse(tree: &mut PsiTree, text: &str, ctx: SiteContext) -> Result<ExprId, PsiError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tree,
        src: text,
        tokens,
        pos: 0,
        ctx,
    };
    let root = parser.assignment()?;
    parser.expect_eof()?;
    Ok(root)
}

// Longest match first.
const SYMBOLS: &[&str] = &[
    ">>>=", ">>>", ">>=", ">>", "<<=", "<<", "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=",
    "^=", "+", "-", "*", "/", "%", "&", "|", "^", "=", "(", ")", "[", "]", ".", ",",
];

fn tokenize(src: &str) -> Result<Vec<Token>, PsiError> {
    let bytes = src.as_bytes();
    let mut tokens = Vec::new();
    let mut idx = 0;
    'outer: while idx < bytes.len() {
        let b = bytes[idx];
        if b.is_ascii_whitespace() {
            idx += 1;
            continue;
        }
        if b.is_ascii_alphabetic() || b == b'_' || b == b'$' {
            let start = idx;
            while idx < bytes.len() && is_ident_byte(bytes[idx]) {
                idx += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Ident,
                start,
                end: idx,
            });
            continue;
        }
        if b.is_ascii_digit() {
            let start = idx;
            while idx < bytes.len() && bytes[idx].is_ascii_digit() {
                idx += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Int,
                start,
                end: idx,
            });
            continue;
        }
        for sym in SYMBOLS {
            if src[idx..].starts_with(sym) {
                tokens.push(Token {
                    kind: TokenKind::Sym,
                    start: idx,
                    end: idx + sym.len(),
                });
                idx += sym.len();
                continue 'outer;
            }
        }
        return Err(PsiError::Parse(format!(
            "unexpected character {:?} at offset {idx}",
            src[idx..].chars().next().unwrap_or('\0')
        )));
    }
    tokens.push(Token {
        kind: TokenKind::Eof,
        start: src.len(),
        end: src.len(),
    });
    Ok(tokens)
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

fn binary_precedence(token: &str) -> Option<(BinOp, u8)> {
    let op = BinOp::from_token(token)?;
    let prec = match op {
        BinOp::Mul | BinOp::Div | BinOp::Rem => 60,
        BinOp::Add | BinOp::Sub => 50,
        BinOp::Shl | BinOp::Shr | BinOp::UShr => 40,
        BinOp::BitAnd => 30,
        BinOp::BitXor => 20,
        BinOp::BitOr => 10,
    };
    Some((op, prec))
}

impl<'t, 's> Parser<'t, 's> {
    fn peek(&self) -> Token {
        self.tokens[self.pos]
    }

    fn token_text(&self, token: Token) -> &'s str {
        &self.src[token.start..token.end]
    }

    fn peek_text(&self) -> &'s str {
        self.token_text(self.peek())
    }

    fn bump(&mut self) -> Token {
        let token = self.tokens[self.pos];
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn eat_sym(&mut self, sym: &str) -> bool {
        if self.peek().kind == TokenKind::Sym && self.peek_text() == sym {
            self.bump();
            return true;
        }
        false
    }

    fn expect_sym(&mut self, sym: &str) -> Result<(), PsiError> {
        if self.eat_sym(sym) {
            Ok(())
        } else {
            Err(PsiError::Parse(format!(
                "expected `{sym}`, found `{}`",
                self.peek_text()
            )))
        }
    }

    fn expect_eof(&mut self) -> Result<(), PsiError> {
        if self.peek().kind == TokenKind::Eof {
            Ok(())
        } else {
            Err(PsiError::Parse(format!(
                "trailing input starting at `{}`",
                self.peek_text()
            )))
        }
    }

    fn alloc(&mut self, kind: ExprKind) -> ExprId {
        self.tree.alloc(kind, self.ctx)
    }

    fn assignment(&mut self) -> Result<ExprId, PsiError> {
        let lhs = self.binary(0)?;
        if self.peek().kind == TokenKind::Sym {
            let text = self.peek_text();
            let op = if text == "=" {
                Some(None)
            } else {
                text.strip_suffix('=')
                    .and_then(BinOp::from_token)
                    .map(Some)
            };
            if let Some(op) = op {
                self.bump();
                let rhs = self.assignment()?;
                return Ok(self.alloc(ExprKind::Assign { lhs, op, rhs }));
            }
        }
        Ok(lhs)
    }

    fn binary(&mut self, min_prec: u8) -> Result<ExprId, PsiError> {
        let mut lhs = self.unary()?;
        while self.peek().kind == TokenKind::Sym {
            let Some((op, prec)) = binary_precedence(self.peek_text()) else {
                break;
            };
            if prec < min_prec {
                break;
            }
            self.bump();
            let rhs = self.binary(prec + 1)?;
            lhs = self.alloc(ExprKind::Binary { lhs, op, rhs });
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<ExprId, PsiError> {
        for (sym, op) in [("++", UnaryOp::Inc), ("--", UnaryOp::Dec)] {
            if self.peek().kind == TokenKind::Sym && self.peek_text() == sym {
                self.bump();
                let operand = self.unary()?;
                return Ok(self.alloc(ExprKind::Unary {
                    op,
                    operand,
                    prefix: true,
                }));
            }
        }
        self.postfix()
    }

    fn postfix(&mut self) -> Result<ExprId, PsiError> {
        let mut expr = self.primary()?;
        loop {
            if self.eat_sym(".") {
                let token = self.bump();
                if token.kind != TokenKind::Ident {
                    return Err(PsiError::Parse(format!(
                        "expected member name after `.`, found `{}`",
                        self.token_text(token)
                    )));
                }
                let name = self.token_text(token).to_string();
                let reference = self.alloc(ExprKind::Ref {
                    qualifier: Some(expr),
                    name,
                });
                expr = if self.eat_sym("(") {
                    let args = self.call_args()?;
                    self.alloc(ExprKind::Call {
                        callee: reference,
                        args,
                    })
                } else {
                    reference
                };
                continue;
            }
            if self.peek().kind == TokenKind::Sym && self.peek_text() == "(" {
                if !matches!(self.tree.kind(expr), ExprKind::Ref { .. }) {
                    return Err(PsiError::Parse(
                        "call receiver must be a reference".to_string(),
                    ));
                }
                self.bump();
                let args = self.call_args()?;
                expr = self.alloc(ExprKind::Call { callee: expr, args });
                continue;
            }
            if self.eat_sym("++") {
                expr = self.alloc(ExprKind::Unary {
                    op: UnaryOp::Inc,
                    operand: expr,
                    prefix: false,
                });
                continue;
            }
            if self.eat_sym("--") {
                expr = self.alloc(ExprKind::Unary {
                    op: UnaryOp::Dec,
                    operand: expr,
                    prefix: false,
                });
                continue;
            }
            return Ok(expr);
        }
    }

    fn call_args(&mut self) -> Result<Vec<ExprId>, PsiError> {
        let mut args = Vec::new();
        if self.eat_sym(")") {
            return Ok(args);
        }
        loop {
            args.push(self.assignment()?);
            if self.eat_sym(",") {
                continue;
            }
            self.expect_sym(")")?;
            return Ok(args);
        }
    }

    fn primary(&mut self) -> Result<ExprId, PsiError> {
        let token = self.peek();
        match token.kind {
            TokenKind::Ident => match self.peek_text() {
                "this" => {
                    self.bump();
                    Ok(self.alloc(ExprKind::This))
                }
                "super" => {
                    self.bump();
                    Ok(self.alloc(ExprKind::Super))
                }
                "new" => self.array_creation(),
                _ => {
                    let token = self.bump();
                    let name = self.token_text(token).to_string();
                    Ok(self.alloc(ExprKind::Ref {
                        qualifier: None,
                        name,
                    }))
                }
            },
            TokenKind::Int => {
                let token = self.bump();
                let text = self.token_text(token).to_string();
                Ok(self.alloc(ExprKind::Literal { text }))
            }
            TokenKind::Sym if self.peek_text() == "(" => {
                self.bump();
                let inner = self.assignment()?;
                self.expect_sym(")")?;
                Ok(self.alloc(ExprKind::Paren { inner }))
            }
            _ => Err(PsiError::Parse(format!(
                "expected expression, found `{}`",
                self.peek_text()
            ))),
        }
    }

    /// `new <dotted name> ('[' [int] ']')+`, kept as verbatim source text.
    fn array_creation(&mut self) -> Result<ExprId, PsiError> {
        let start = self.peek().start;
        self.bump(); // `new`

        let token = self.bump();
        if token.kind != TokenKind::Ident {
            return Err(PsiError::Parse(format!(
                "expected type name after `new`, found `{}`",
                self.token_text(token)
            )));
        }
        while self.eat_sym(".") {
            let token = self.bump();
            if token.kind != TokenKind::Ident {
                return Err(PsiError::Parse(
                    "expected name segment after `.` in type".to_string(),
                ));
            }
        }

        let mut end = None;
        while self.eat_sym("[") {
            if self.peek().kind == TokenKind::Int {
                self.bump();
            }
            let close = self.peek();
            self.expect_sym("]")?;
            end = Some(close.end);
        }
        let Some(end) = end else {
            return Err(PsiError::Parse(
                "array creation requires at least one dimension".to_string(),
            ));
        };

        let text = self.src[start..end].to_string();
        Ok(self.alloc(ExprKind::NewArray { text }))
    }
}

#[cfg(test)]
mod tests {
    use crate::model::{LanguageProfile, ProjectId};
    use crate::tree::{ExprKind, PsiTree, SiteContext};
    use pretty_assertions::assert_eq;

    fn parse(text: &str) -> (PsiTree, crate::tree::ExprId) {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let ctx = SiteContext::top_level(ProjectId(0));
        let root = tree.parse_expr_in(text, ctx).expect("snippet parses");
        (tree, root)
    }

    #[test]
    fn parses_conversion_template() {
        let (tree, root) = parse("(a).toArray(new java.lang.String[0])");
        let ExprKind::Call { callee, args } = tree.kind(root) else {
            panic!("expected call, got {:?}", tree.kind(root));
        };
        assert_eq!(args.len(), 1);
        let ExprKind::Ref { qualifier, name } = tree.kind(*callee) else {
            panic!("expected callee reference");
        };
        assert_eq!(name, "toArray");
        let qualifier = qualifier.expect("parenthesized qualifier");
        assert!(matches!(tree.kind(qualifier), ExprKind::Paren { .. }));
        assert_eq!(tree.text(args[0]), "new java.lang.String[0]");
    }

    #[test]
    fn parses_assignments_and_unaries() {
        let (tree, root) = parse("x += v");
        assert!(matches!(
            tree.kind(root),
            ExprKind::Assign { op: Some(crate::tree::BinOp::Add), .. }
        ));

        let (tree, root) = parse("x++");
        assert!(matches!(
            tree.kind(root),
            ExprKind::Unary { prefix: false, .. }
        ));

        let (tree, root) = parse("--q.x");
        let ExprKind::Unary { operand, prefix, .. } = tree.kind(root) else {
            panic!("expected unary");
        };
        assert!(prefix);
        assert_eq!(tree.text(*operand), "q.x");
    }

    #[test]
    fn parses_super_qualified_reference() {
        let (tree, root) = parse("super.getValue");
        let ExprKind::Ref { qualifier, name } = tree.kind(root) else {
            panic!("expected reference");
        };
        assert_eq!(name, "getValue");
        assert!(matches!(tree.kind(qualifier.unwrap()), ExprKind::Super));
    }

    #[test]
    fn binary_precedence_nests_multiplication_tighter() {
        let (tree, root) = parse("a + b * c");
        let ExprKind::Binary { lhs, rhs, .. } = tree.kind(root) else {
            panic!("expected binary");
        };
        assert_eq!(tree.text(*lhs), "a");
        assert_eq!(tree.text(*rhs), "b * c");
    }

    #[test]
    fn rejects_trailing_input_and_bad_tokens() {
        let mut tree = PsiTree::new(LanguageProfile::default());
        let ctx = SiteContext::top_level(ProjectId(0));
        assert!(tree.parse_expr_in("a b", ctx).is_err());
        assert!(tree.parse_expr_in("a ? b : c", ctx).is_err());
        assert!(tree.parse_expr_in("", ctx).is_err());
    }
}

//! Parsed file as an arena of nodes.
//!
//! Token positions (`lbrace`, `tok_pos`, ...) are byte offsets of the token's
//! first character, so "after the `(`" reads as `lparen < offset`.

use smol_str::SmolStr;

use super::span::Span;
use super::types::ChanDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `&x`
    And,
    /// `<-x`
    Arrow,
    Not,
    Neg,
    Pos,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
    LogicalAnd,
    LogicalOr,
    Eql,
    Neq,
    Lss,
    Leq,
    Gtr,
    Geq,
}

impl BinaryOp {
    pub fn is_short_circuit(self) -> bool {
        matches!(self, BinaryOp::LogicalAnd | BinaryOp::LogicalOr)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    File {
        package: NodeId,
        decls: Vec<NodeId>,
    },
    PackageClause {
        name: NodeId,
    },
    GenDecl {
        specs: Vec<NodeId>,
    },
    ValueSpec {
        names: Vec<NodeId>,
        ty: Option<NodeId>,
        values: Vec<NodeId>,
    },
    TypeSpec {
        name: NodeId,
        ty: NodeId,
    },
    FuncDecl {
        recv: Option<NodeId>,
        name: NodeId,
        ty: NodeId,
        body: Option<NodeId>,
    },
    FuncLit {
        ty: NodeId,
        body: NodeId,
    },
    FuncType {
        params: Vec<NodeId>,
        results: Vec<NodeId>,
    },
    /// One entry of a parameter, result, receiver or struct field list.
    Field {
        names: Vec<NodeId>,
        ty: NodeId,
    },
    StructType {
        fields: Vec<NodeId>,
    },
    InterfaceType {
        methods: Vec<NodeId>,
    },
    ArrayType {
        len: Option<NodeId>,
        elem: NodeId,
    },
    MapType {
        key: NodeId,
        value: NodeId,
    },
    ChanType {
        dir: ChanDir,
        elem: NodeId,
    },
    Block {
        stmts: Vec<NodeId>,
        lbrace: usize,
        rbrace: usize,
    },
    ExprStmt {
        x: NodeId,
    },
    DeclStmt {
        decl: NodeId,
    },
    Assign {
        lhs: Vec<NodeId>,
        rhs: Vec<NodeId>,
        tok_pos: usize,
        define: bool,
    },
    IncDec {
        x: NodeId,
    },
    Return {
        results: Vec<NodeId>,
    },
    If {
        init: Option<NodeId>,
        cond: NodeId,
        body: NodeId,
        els: Option<NodeId>,
    },
    For {
        init: Option<NodeId>,
        cond: Option<NodeId>,
        post: Option<NodeId>,
        body: NodeId,
    },
    Range {
        key: Option<NodeId>,
        value: Option<NodeId>,
        x: NodeId,
        body: NodeId,
    },
    Switch {
        init: Option<NodeId>,
        tag: Option<NodeId>,
        body: NodeId,
    },
    /// `switch v := x.(type) { ... }`; `assign` holds the guard statement.
    TypeSwitch {
        init: Option<NodeId>,
        assign: NodeId,
        body: NodeId,
    },
    CaseClause {
        list: Vec<NodeId>,
        body: Vec<NodeId>,
        colon: usize,
    },
    Send {
        chan: NodeId,
        value: NodeId,
        arrow: usize,
    },
    Go {
        call: NodeId,
    },
    Defer {
        call: NodeId,
    },
    Ident {
        name: SmolStr,
    },
    BasicLit {
        kind: LitKind,
    },
    Selector {
        x: NodeId,
        sel: NodeId,
    },
    Call {
        fun: NodeId,
        args: Vec<NodeId>,
        lparen: usize,
        rparen: usize,
        ellipsis: Option<usize>,
    },
    Index {
        x: NodeId,
        index: NodeId,
        lbrack: usize,
        rbrack: usize,
    },
    Slice {
        x: NodeId,
        low: Option<NodeId>,
        high: Option<NodeId>,
        max: Option<NodeId>,
        lbrack: usize,
        rbrack: usize,
    },
    Star {
        x: NodeId,
    },
    Unary {
        op: UnaryOp,
        x: NodeId,
    },
    Binary {
        op: BinaryOp,
        x: NodeId,
        y: NodeId,
        op_pos: usize,
    },
    Paren {
        x: NodeId,
    },
    CompositeLit {
        ty: Option<NodeId>,
        elts: Vec<NodeId>,
        lbrace: usize,
        rbrace: usize,
    },
    KeyValue {
        key: NodeId,
        value: NodeId,
        colon: usize,
    },
    /// `ty` is `None` for the `x.(type)` guard of a type switch.
    TypeAssert {
        x: NodeId,
        ty: Option<NodeId>,
        lparen: usize,
        rparen: usize,
    },
    Bad,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub span: Span,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, Default)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
    comments: Vec<Span>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() as u32 - 1)
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn add_comment(&mut self, span: Span) {
        self.comments.push(span);
    }

    pub fn comments(&self) -> &[Span] {
        &self.comments
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0 as usize]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.node(id).kind
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.node(id).span
    }

    pub fn ident_name(&self, id: NodeId) -> Option<&SmolStr> {
        match self.kind(id) {
            NodeKind::Ident { name } => Some(name),
            _ => None,
        }
    }

    /// Direct children in source order.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        match self.kind(id) {
            NodeKind::File { package, decls } => {
                out.push(*package);
                out.extend(decls);
            }
            NodeKind::PackageClause { name } => out.push(*name),
            NodeKind::GenDecl { specs } => out.extend(specs),
            NodeKind::ValueSpec { names, ty, values } => {
                out.extend(names);
                out.extend(*ty);
                out.extend(values);
            }
            NodeKind::TypeSpec { name, ty } => out.extend([*name, *ty]),
            NodeKind::FuncDecl {
                recv,
                name,
                ty,
                body,
            } => {
                out.extend(*recv);
                out.extend([*name, *ty]);
                out.extend(*body);
            }
            NodeKind::FuncLit { ty, body } => out.extend([*ty, *body]),
            NodeKind::FuncType { params, results } => {
                out.extend(params);
                out.extend(results);
            }
            NodeKind::Field { names, ty } => {
                out.extend(names);
                out.push(*ty);
            }
            NodeKind::StructType { fields } => out.extend(fields),
            NodeKind::InterfaceType { methods } => out.extend(methods),
            NodeKind::ArrayType { len, elem } => {
                out.extend(*len);
                out.push(*elem);
            }
            NodeKind::MapType { key, value } => out.extend([*key, *value]),
            NodeKind::ChanType { elem, .. } => out.push(*elem),
            NodeKind::Block { stmts, .. } => out.extend(stmts),
            NodeKind::ExprStmt { x } | NodeKind::IncDec { x } => out.push(*x),
            NodeKind::DeclStmt { decl } => out.push(*decl),
            NodeKind::Assign { lhs, rhs, .. } => {
                out.extend(lhs);
                out.extend(rhs);
            }
            NodeKind::Return { results } => out.extend(results),
            NodeKind::If {
                init,
                cond,
                body,
                els,
            } => {
                out.extend(*init);
                out.extend([*cond, *body]);
                out.extend(*els);
            }
            NodeKind::For {
                init,
                cond,
                post,
                body,
            } => {
                out.extend(*init);
                out.extend(*cond);
                out.extend(*post);
                out.push(*body);
            }
            NodeKind::Range {
                key,
                value,
                x,
                body,
            } => {
                out.extend(*key);
                out.extend(*value);
                out.extend([*x, *body]);
            }
            NodeKind::Switch { init, tag, body } => {
                out.extend(*init);
                out.extend(*tag);
                out.push(*body);
            }
            NodeKind::TypeSwitch { init, assign, body } => {
                out.extend(*init);
                out.extend([*assign, *body]);
            }
            NodeKind::CaseClause { list, body, .. } => {
                out.extend(list);
                out.extend(body);
            }
            NodeKind::Send { chan, value, .. } => out.extend([*chan, *value]),
            NodeKind::Go { call } | NodeKind::Defer { call } => out.push(*call),
            NodeKind::Ident { .. } | NodeKind::BasicLit { .. } | NodeKind::Bad => {}
            NodeKind::Selector { x, sel } => out.extend([*x, *sel]),
            NodeKind::Call { fun, args, .. } => {
                out.push(*fun);
                out.extend(args);
            }
            NodeKind::Index { x, index, .. } => out.extend([*x, *index]),
            NodeKind::Slice {
                x, low, high, max, ..
            } => {
                out.push(*x);
                out.extend(*low);
                out.extend(*high);
                out.extend(*max);
            }
            NodeKind::Star { x } | NodeKind::Unary { x, .. } | NodeKind::Paren { x } => {
                out.push(*x)
            }
            NodeKind::Binary { x, y, .. } => out.extend([*x, *y]),
            NodeKind::CompositeLit { ty, elts, .. } => {
                out.extend(*ty);
                out.extend(elts);
            }
            NodeKind::KeyValue { key, value, .. } => out.extend([*key, *value]),
            NodeKind::TypeAssert { x, ty, .. } => {
                out.push(*x);
                out.extend(*ty);
            }
        }
        out
    }

    /// Nodes enclosing `offset`, innermost first, root last. Empty when the
    /// offset lies outside the file.
    pub fn path_enclosing(&self, offset: usize) -> Vec<NodeId> {
        let Some(root) = self.root else {
            return Vec::new();
        };
        if !self.span(root).contains(offset) {
            return Vec::new();
        }

        let mut path = vec![root];
        let mut current = root;
        while let Some(next) = self
            .children(current)
            .into_iter()
            .find(|child| self.span(*child).contains(offset))
        {
            path.push(next);
            current = next;
        }
        path.reverse();
        path
    }

    /// First node, in source order, satisfying `pred` within the subtree of `id`.
    pub fn find_in(&self, id: NodeId, pred: &dyn Fn(&NodeKind) -> bool) -> Option<NodeId> {
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if pred(self.kind(n)) {
                return Some(n);
            }
            let mut children = self.children(n);
            children.reverse();
            stack.extend(children);
        }
        None
    }

    pub fn comment_at(&self, offset: usize) -> Option<Span> {
        self.comments
            .iter()
            .copied()
            .find(|c| c.start < offset && offset <= c.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(tree: &mut SyntaxTree, name: &str, start: usize) -> NodeId {
        tree.push(Node {
            span: Span::new(start, start + name.len()),
            kind: NodeKind::Ident { name: name.into() },
        })
    }

    #[test]
    fn path_is_innermost_first() {
        // "package p\nx.y"
        let mut tree = SyntaxTree::new();
        let pkg_name = leaf(&mut tree, "p", 8);
        let package = tree.push(Node {
            span: Span::new(0, 9),
            kind: NodeKind::PackageClause { name: pkg_name },
        });
        let x = leaf(&mut tree, "x", 10);
        let y = leaf(&mut tree, "y", 12);
        let sel = tree.push(Node {
            span: Span::new(10, 13),
            kind: NodeKind::Selector { x, sel: y },
        });
        let stmt = tree.push(Node {
            span: Span::new(10, 13),
            kind: NodeKind::ExprStmt { x: sel },
        });
        let file = tree.push(Node {
            span: Span::new(0, 13),
            kind: NodeKind::File {
                package,
                decls: vec![stmt],
            },
        });
        tree.set_root(file);

        assert_eq!(tree.path_enclosing(13), vec![y, sel, stmt, file]);
        assert_eq!(tree.path_enclosing(11), vec![x, sel, stmt, file]);
        assert!(tree.path_enclosing(40).is_empty());
    }

    #[test]
    fn comment_lookup_excludes_the_opening_offset() {
        let mut tree = SyntaxTree::new();
        tree.add_comment(Span::new(5, 20));
        assert_eq!(tree.comment_at(5), None);
        assert_eq!(tree.comment_at(6), Some(Span::new(5, 20)));
        assert_eq!(tree.comment_at(20), Some(Span::new(5, 20)));
    }
}

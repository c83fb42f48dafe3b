use std::fmt::Display;

use crate::{type_checker::types::TypeId, SourceLocation};

use super::{
    expressions::{BinaryExpr, CallExpr, ConditionExpr, ForExpr, IdentifierExpr, Literal, NumberLiteral, UnaryExpr},
    statements::{Block, FunctionDecl, Prototype, VarDecl},
};

/// Index of a node inside its module's [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node kinds, without their payloads
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum NodeType {
    Number,
    Literal,
    Identifier,
    Var,
    Unary,
    Binary,
    Condition,
    For,
    Call,
    Prototype,
    Function,
    Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Number(NumberLiteral),
    Literal(Literal),
    Identifier(IdentifierExpr),
    Var(VarDecl),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Condition(ConditionExpr),
    For(ForExpr),
    Call(CallExpr),
    Prototype(Prototype),
    Function(FunctionDecl),
    Block(Block),
}

impl NodeKind {
    pub fn get_node_type(&self) -> NodeType {
        match self {
            NodeKind::Number(_) => NodeType::Number,
            NodeKind::Literal(_) => NodeType::Literal,
            NodeKind::Identifier(_) => NodeType::Identifier,
            NodeKind::Var(_) => NodeType::Var,
            NodeKind::Unary(_) => NodeType::Unary,
            NodeKind::Binary(_) => NodeType::Binary,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::For(_) => NodeType::For,
            NodeKind::Call(_) => NodeType::Call,
            NodeKind::Prototype(_) => NodeType::Prototype,
            NodeKind::Function(_) => NodeType::Function,
            NodeKind::Block(_) => NodeType::Block,
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Number(_) | NodeKind::Literal(_) | NodeKind::Identifier(_) | NodeKind::Prototype(_) => vec![],
            NodeKind::Var(var) => vec![var.init],
            NodeKind::Unary(unary) => vec![unary.operand],
            NodeKind::Binary(binary) => vec![binary.left, binary.right],
            NodeKind::Condition(condition) => vec![condition.condition, condition.then_body, condition.else_body],
            NodeKind::For(for_expr) => vec![for_expr.start, for_expr.end, for_expr.step, for_expr.body],
            NodeKind::Call(call) => call.arguments.clone(),
            NodeKind::Function(function) => vec![function.prototype, function.body],
            NodeKind::Block(block) => block.statements.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub location: SourceLocation,
    /// Filled in by type inference.
    pub ty: Option<TypeId>,
    /// Syntactic parent. Never owns the parent; the arena owns every node.
    pub parent: Option<NodeId>,
}

/// Arena holding every node of one module.
///
/// Children are always pushed before their parent, and pushing a node links
/// each of its children back to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ast {
    nodes: Vec<Node>,
}

impl Ast {
    pub fn new() -> Self {
        Ast { nodes: vec![] }
    }

    pub fn push(&mut self, kind: NodeKind, location: SourceLocation) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);

        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }

        self.nodes.push(Node {
            kind,
            location,
            ty: None,
            parent: None,
        });
        id
    }

    pub fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn location(&self, id: NodeId) -> SourceLocation {
        self.nodes[id.index()].location
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn get_type(&self, id: NodeId) -> Option<TypeId> {
        self.nodes[id.index()].ty
    }

    pub fn set_type(&mut self, id: NodeId, ty: TypeId) {
        self.nodes[id.index()].ty = Some(ty);
    }

    /// Rewrites a number literal in place. Other nodes are left untouched.
    pub fn set_number(&mut self, id: NodeId, value: NumberLiteral) {
        if let NodeKind::Number(number) = &mut self.nodes[id.index()].kind {
            *number = value;
        }
    }

    /// Appends a statement to an existing block.
    pub fn append_statement(&mut self, block: NodeId, statement: NodeId) {
        if let NodeKind::Block(body) = &mut self.nodes[block.index()].kind {
            body.statements.push(statement);
            self.nodes[statement.index()].parent = Some(block);
        }
    }

    /// Walks up the parent links to the innermost function containing `id`.
    pub fn enclosing_function(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if let NodeKind::Function(_) = self.kind(node) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Name of the function or prototype declared by `id`, if it declares one.
    pub fn declared_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Prototype(prototype) => Some(&prototype.name),
            NodeKind::Function(function) => self.declared_name(function.prototype),
            NodeKind::Var(var) => Some(&var.name),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }
}

/// A parsed compilation unit.
#[derive(Debug, Clone)]
pub struct Module {
    pub name: String,
    pub ast: Ast,
    /// The top-level block.
    pub root: NodeId,
}

impl Module {
    /// An empty module whose root block is ready to receive statements.
    pub fn new(name: &str) -> Self {
        let mut ast = Ast::new();
        let root = ast.push(NodeKind::Block(Block { statements: vec![] }), SourceLocation::new(1, 1));

        Module {
            name: String::from(name),
            ast,
            root,
        }
    }

    pub fn statements(&self) -> &[NodeId] {
        match self.ast.kind(self.root) {
            NodeKind::Block(block) => &block.statements,
            _ => &[],
        }
    }

    /// Finds the last top-level declaration of `name`.
    pub fn find_declaration(&self, name: &str) -> Option<NodeId> {
        self.statements()
            .iter()
            .rev()
            .copied()
            .find(|statement| self.ast.declared_name(*statement) == Some(name))
    }
}

/// Builtin declarations plus every module compiled in a session, in order.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub builtins: Option<Module>,
    pub modules: Vec<Module>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            builtins: None,
            modules: vec![],
        }
    }

    pub fn module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find(|module| module.name == name)
    }
}

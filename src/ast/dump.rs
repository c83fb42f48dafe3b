use super::{
    ast::{Ast, NodeId, NodeKind},
    expressions::Literal,
};

impl Ast {
    /// Renders the subtree at `id` as an s-expression, e.g. `(+ 1 (* 2 3))`.
    pub fn dump(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Number(number) => number.to_string(),
            NodeKind::Literal(Literal::Bool(value)) => value.to_string(),
            NodeKind::Literal(Literal::Char(value)) => format!("{:?}", value),
            NodeKind::Literal(Literal::Str(value)) => format!("{:?}", value),
            NodeKind::Identifier(identifier) => identifier.name.clone(),
            NodeKind::Var(var) => format!("(var {} {})", var.name, self.dump(var.init)),
            NodeKind::Unary(unary) => format!("({} {})", unary.operator, self.dump(unary.operand)),
            NodeKind::Binary(binary) => format!(
                "({} {} {})",
                binary.operator,
                self.dump(binary.left),
                self.dump(binary.right)
            ),
            NodeKind::Condition(condition) => format!(
                "(if {} {} {})",
                self.dump(condition.condition),
                self.dump(condition.then_body),
                self.dump(condition.else_body)
            ),
            NodeKind::For(for_expr) => format!(
                "(for {} {} {} {} {})",
                for_expr.variable,
                self.dump(for_expr.start),
                self.dump(for_expr.end),
                self.dump(for_expr.step),
                self.dump(for_expr.body)
            ),
            NodeKind::Call(call) => self.dump_list("call", &call.callee, &call.arguments),
            NodeKind::Prototype(prototype) => {
                let mut parts = vec![String::from("proto"), prototype.name.clone()];
                parts.extend(prototype.parameters.iter().map(|parameter| parameter.name.clone()));
                format!("({})", parts.join(" "))
            }
            NodeKind::Function(function) => {
                format!("(fn {} {})", self.dump(function.prototype), self.dump(function.body))
            }
            NodeKind::Block(block) => {
                let mut parts = vec![String::from("block")];
                parts.extend(block.statements.iter().map(|statement| self.dump(*statement)));
                format!("({})", parts.join(" "))
            }
        }
    }

    fn dump_list(&self, head: &str, name: &str, items: &[NodeId]) -> String {
        let mut parts = vec![String::from(head), String::from(name)];
        parts.extend(items.iter().map(|item| self.dump(*item)));
        format!("({})", parts.join(" "))
    }
}

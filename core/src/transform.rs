//! Rewrite-then-recurse traversal
//!
//! `transform` offers a node to the matching [`Rewriter`] hook first, then
//! transforms the children of whatever the hook returned, printing PMSL
//! source for the result as it goes. With [`Identity`] the printed text is a
//! normalised copy of the input that parses back to the same tree.
//!
//! Every AST type has its own hook, so a statement holding a declaration is
//! offered to `rewrite_statement` and then its declaration to
//! `rewrite_var_declaration`.

use crate::ast::{
    BExpression, BTerm, Call, Definition, Expression, Factor, For, If, NotBFactor, Relation,
    Statement, Term, VarAssignment, VarDeclaration,
};
use crate::workflow::{Action, Node, Transition, Workflow};

/// Hooks called before a node's children are visited. All default to identity.
pub trait Rewriter {
    fn rewrite_statement(&mut self, statement: Statement) -> Statement {
        statement
    }

    fn rewrite_definition(&mut self, definition: Definition) -> Definition {
        definition
    }

    fn rewrite_var_declaration(&mut self, declaration: VarDeclaration) -> VarDeclaration {
        declaration
    }

    fn rewrite_var_assignment(&mut self, assignment: VarAssignment) -> VarAssignment {
        assignment
    }

    fn rewrite_if(&mut self, statement: If) -> If {
        statement
    }

    fn rewrite_for(&mut self, statement: For) -> For {
        statement
    }

    fn rewrite_call(&mut self, call: Call) -> Call {
        call
    }

    fn rewrite_bexpression(&mut self, expression: BExpression) -> BExpression {
        expression
    }

    fn rewrite_bterm(&mut self, term: BTerm) -> BTerm {
        term
    }

    fn rewrite_not_bfactor(&mut self, factor: NotBFactor) -> NotBFactor {
        factor
    }

    fn rewrite_relation(&mut self, relation: Relation) -> Relation {
        relation
    }

    fn rewrite_expression(&mut self, expression: Expression) -> Expression {
        expression
    }

    fn rewrite_term(&mut self, term: Term) -> Term {
        term
    }

    fn rewrite_factor(&mut self, factor: Factor) -> Factor {
        factor
    }
}

/// Rewriter that changes nothing; `transform` with it is a pretty-printer
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Rewriter for Identity {}

/// Transform each statement, printing ` <statement>` for each
fn transform_body<R: Rewriter + ?Sized>(
    body: Vec<Statement>,
    rewriter: &mut R,
    out: &mut String,
) -> Vec<Statement> {
    let mut result = Vec::with_capacity(body.len());
    for statement in body {
        out.push(' ');
        result.push(statement.transform(rewriter, out));
    }
    result
}

/* ===================== Statements ===================== */

impl Statement {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        match rewriter.rewrite_statement(self) {
            Statement::Definition(d) => Statement::Definition(d.transform(rewriter, out)),
            Statement::VarDeclaration(d) => Statement::VarDeclaration(d.transform(rewriter, out)),
            Statement::VarAssignment(a) => Statement::VarAssignment(a.transform(rewriter, out)),
            Statement::If(i) => Statement::If(i.transform(rewriter, out)),
            Statement::For(f) => Statement::For(f.transform(rewriter, out)),
            Statement::Call(c) => Statement::Call(c.transform(rewriter, out)),
        }
    }
}

impl Definition {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let Definition {
            name,
            params,
            body,
            returns,
            position,
        } = rewriter.rewrite_definition(self);

        out.push_str("def ");
        out.push_str(&name);
        out.push('(');
        out.push_str(&params.join(", "));
        out.push(')');
        let body = transform_body(body, rewriter, out);
        let returns = returns.map(|value| {
            out.push_str(" return ");
            value.transform(rewriter, out)
        });
        out.push_str(" end");

        Definition {
            name,
            params,
            body,
            returns,
            position,
        }
    }
}

impl VarDeclaration {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        out.push_str("var ");
        self.transform_clause(rewriter, out)
    }

    /// Declaration without the leading `var`, as printed in a for-loop head
    fn transform_clause<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let VarDeclaration {
            name,
            value,
            position,
        } = rewriter.rewrite_var_declaration(self);

        out.push_str(&name);
        out.push_str(" = ");
        let value = value.transform(rewriter, out);

        VarDeclaration {
            name,
            value,
            position,
        }
    }
}

impl VarAssignment {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let VarAssignment {
            name,
            value,
            position,
        } = rewriter.rewrite_var_assignment(self);

        out.push_str(&name);
        out.push_str(" = ");
        let value = value.transform(rewriter, out);

        VarAssignment {
            name,
            value,
            position,
        }
    }
}

impl If {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let If {
            condition,
            body,
            position,
        } = rewriter.rewrite_if(self);

        out.push_str("if ");
        let condition = condition.transform(rewriter, out);
        out.push_str(" then");
        let body = transform_body(body, rewriter, out);
        out.push_str(" end");

        If {
            condition,
            body,
            position,
        }
    }
}

impl For {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let For {
            init,
            condition,
            step,
            body,
            position,
        } = rewriter.rewrite_for(self);

        out.push_str("for ");
        let init = init.transform_clause(rewriter, out);
        out.push_str("; ");
        let condition = condition.transform(rewriter, out);
        out.push_str("; ");
        let step = step.transform(rewriter, out);
        out.push_str(" do");
        let body = transform_body(body, rewriter, out);
        out.push_str(" end");

        For {
            init,
            condition,
            step,
            body,
            position,
        }
    }
}

impl Call {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let Call {
            name,
            args,
            position,
        } = rewriter.rewrite_call(self);

        out.push_str(&name);
        out.push('(');
        let mut transformed = Vec::with_capacity(args.len());
        for (i, arg) in args.into_iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            transformed.push(arg.transform(rewriter, out));
        }
        out.push(')');

        Call {
            name,
            args: transformed,
            position,
        }
    }
}

/* ===================== Expressions ===================== */

impl BExpression {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let BExpression { first, rest } = rewriter.rewrite_bexpression(self);

        let first = first.transform(rewriter, out);
        let mut terms = Vec::with_capacity(rest.len());
        for term in rest {
            out.push_str(" or ");
            terms.push(term.transform(rewriter, out));
        }
        BExpression::new(first, terms)
    }
}

impl BTerm {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let BTerm { first, rest } = rewriter.rewrite_bterm(self);

        let first = first.transform(rewriter, out);
        let mut factors = Vec::with_capacity(rest.len());
        for factor in rest {
            out.push_str(" and ");
            factors.push(factor.transform(rewriter, out));
        }
        BTerm::new(first, factors)
    }
}

impl NotBFactor {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let NotBFactor { negated, relation } = rewriter.rewrite_not_bfactor(self);

        if negated {
            out.push_str("not ");
        }
        let relation = relation.transform(rewriter, out);
        NotBFactor { negated, relation }
    }
}

impl Relation {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let Relation { left, comparison } = rewriter.rewrite_relation(self);

        let left = left.transform(rewriter, out);
        let comparison = comparison.map(|(op, right)| {
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            (op, right.transform(rewriter, out))
        });
        Relation::new(left, comparison)
    }
}

impl Expression {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let Expression { first, rest } = rewriter.rewrite_expression(self);

        let first = first.transform(rewriter, out);
        let mut terms = Vec::with_capacity(rest.len());
        for (op, term) in rest {
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            terms.push((op, term.transform(rewriter, out)));
        }
        Expression::new(first, terms)
    }
}

impl Term {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        let Term { first, rest } = rewriter.rewrite_term(self);

        let first = first.transform(rewriter, out);
        let mut factors = Vec::with_capacity(rest.len());
        for (op, factor) in rest {
            out.push(' ');
            out.push_str(op.symbol());
            out.push(' ');
            factors.push((op, factor.transform(rewriter, out)));
        }
        Term::new(first, factors)
    }
}

impl Factor {
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        match rewriter.rewrite_factor(self) {
            Factor::Variable { name, position } => {
                out.push_str(&name);
                Factor::Variable { name, position }
            }
            Factor::Call(call) => Factor::Call(call.transform(rewriter, out)),
            Factor::Integer { text } => {
                out.push_str(&text);
                Factor::Integer { text }
            }
            Factor::String { text } => {
                out.push_str(&text);
                Factor::String { text }
            }
            Factor::Bool { value } => {
                out.push_str(if value { "true" } else { "false" });
                Factor::Bool { value }
            }
            Factor::Group(inner) => {
                out.push('(');
                let inner = inner.transform(rewriter, out);
                out.push(')');
                Factor::Group(Box::new(inner))
            }
        }
    }
}

/* ===================== Workflow ===================== */

const INDENT: &str = "  ";

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

impl Workflow {
    /// Transform every script and guard in the workflow, printing the whole
    /// workflow with one header or statement per line
    pub fn transform<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String) -> Self {
        out.push_str("workflow ");
        out.push_str(&self.name);
        out.push('\n');

        let mut workflow = Workflow::new(self.name, self.position);
        for node in self.nodes {
            workflow.add(node.transform_at(rewriter, out, 1));
        }
        out.push_str("end\n");
        workflow
    }
}

impl Node {
    fn transform_at<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String, depth: usize) -> Self {
        indent(out, depth);
        out.push_str(self.kind.keyword());
        out.push(' ');
        out.push_str(&self.name);
        out.push('\n');

        let mut node = Node::new(self.kind, self.name, self.position);
        for action in self.actions {
            node.add_action(action.transform_at(rewriter, out, depth + 1));
        }
        for transition in self.transitions {
            node.add_transition(transition.transform_at(rewriter, out, depth + 1));
        }

        indent(out, depth);
        out.push_str("end\n");
        node
    }
}

impl Action {
    fn transform_at<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String, depth: usize) -> Self {
        indent(out, depth);
        out.push_str(self.phase.keyword());
        out.push('\n');

        let mut action = Action::new(self.phase, self.position);
        for statement in self.statements {
            indent(out, depth + 1);
            action.add(statement.transform(rewriter, out));
            out.push('\n');
        }

        indent(out, depth);
        out.push_str("end\n");
        action
    }
}

impl Transition {
    fn transform_at<R: Rewriter + ?Sized>(self, rewriter: &mut R, out: &mut String, depth: usize) -> Self {
        indent(out, depth);
        out.push_str("transition to ");
        out.push_str(&self.target);
        let guard = self.guard.map(|guard| {
            out.push_str(" if ");
            guard.transform(rewriter, out)
        });
        out.push('\n');
        Transition::new(self.target, self.position, guard)
    }
}

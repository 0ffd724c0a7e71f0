//! Target code generation
//!
//! Emits JavaScript-flavoured text straight from the tree. Arithmetic is
//! parenthesised conservatively: an expression with two or more terms, or a
//! term with two or more factors, is always wrapped, even when the
//! surrounding operator would not need it. Single operands are never wrapped.

use crate::ast::{
    BExpression, BTerm, Call, Definition, Expression, Factor, For, If, NotBFactor, RelOp,
    Relation, Statement, Term, VarAssignment, VarDeclaration,
};
use crate::context::{Context, Scope};
use crate::workflow::{Action, Transition};

impl RelOp {
    /// Operator as emitted in generated code
    pub fn target_symbol(&self) -> &'static str {
        match self {
            RelOp::Greater => ">",
            RelOp::Less => "<",
            RelOp::Equal => "==",
        }
    }
}

fn generate_body<C: Context + ?Sized>(body: &[Statement], ctx: &C, out: &mut String) {
    out.push('{');
    for statement in body {
        statement.generate(ctx, out);
    }
    out.push('}');
}

/* ===================== Statements ===================== */

impl Statement {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        match self {
            Statement::Definition(d) => d.generate(ctx, out),
            Statement::VarDeclaration(d) => {
                d.generate_clause(ctx, out);
                out.push(';');
            }
            Statement::VarAssignment(a) => {
                a.generate_clause(ctx, out);
                out.push(';');
            }
            Statement::If(i) => i.generate(ctx, out),
            Statement::For(f) => f.generate(ctx, out),
            Statement::Call(c) => {
                c.generate(ctx, out);
                out.push(';');
            }
        }
    }
}

impl Definition {
    /// Parameters are local to the function body and are never resolved
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        let outer = ctx;
        let scope = Scope::new(&outer, &self.params);

        out.push_str("function ");
        out.push_str(&self.name);
        out.push('(');
        out.push_str(&self.params.join(","));
        out.push_str("){");
        for statement in &self.body {
            statement.generate(&scope, out);
        }
        if let Some(value) = &self.returns {
            out.push_str("return ");
            value.generate(&scope, out);
            out.push(';');
        }
        out.push('}');
    }
}

impl VarDeclaration {
    /// `var x=e`, or `target=e` when the context maps the name elsewhere
    pub fn generate_clause<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        let target = ctx.resolve(&self.name);
        if target == self.name.as_str() {
            out.push_str("var ");
        }
        out.push_str(&target);
        out.push('=');
        self.value.generate(ctx, out);
    }
}

impl VarAssignment {
    pub fn generate_clause<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        out.push_str(&ctx.resolve(&self.name));
        out.push('=');
        self.value.generate(ctx, out);
    }
}

impl If {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        out.push_str("if(");
        self.condition.generate(ctx, out);
        out.push(')');
        generate_body(&self.body, ctx, out);
    }
}

impl For {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        out.push_str("for(");
        self.init.generate_clause(ctx, out);
        out.push(';');
        self.condition.generate(ctx, out);
        out.push(';');
        self.step.generate_clause(ctx, out);
        out.push(')');
        generate_body(&self.body, ctx, out);
    }
}

impl Call {
    /// Callee names are emitted as written; only arguments are resolved
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        out.push_str(&self.name);
        out.push('(');
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            arg.generate(ctx, out);
        }
        out.push(')');
    }
}

/* ===================== Expressions ===================== */

impl BExpression {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        for (i, term) in self.operands().enumerate() {
            if i > 0 {
                out.push_str("||");
            }
            term.generate(ctx, out);
        }
    }
}

impl BTerm {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        for (i, factor) in self.operands().enumerate() {
            if i > 0 {
                out.push_str("&&");
            }
            factor.generate(ctx, out);
        }
    }
}

impl NotBFactor {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        if self.negated {
            out.push_str("!(");
            self.relation.generate(ctx, out);
            out.push(')');
        } else {
            self.relation.generate(ctx, out);
        }
    }
}

impl Relation {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        self.left.generate(ctx, out);
        if let Some((op, right)) = &self.comparison {
            out.push_str(op.target_symbol());
            right.generate(ctx, out);
        }
    }
}

impl Expression {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        let wrap = self.term_count() > 1;
        if wrap {
            out.push('(');
        }
        self.first.generate(ctx, out);
        for (op, term) in &self.rest {
            out.push_str(op.symbol());
            term.generate(ctx, out);
        }
        if wrap {
            out.push(')');
        }
    }
}

impl Term {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        let wrap = self.factor_count() > 1;
        if wrap {
            out.push('(');
        }
        self.first.generate(ctx, out);
        for (op, factor) in &self.rest {
            out.push_str(op.symbol());
            factor.generate(ctx, out);
        }
        if wrap {
            out.push(')');
        }
    }
}

impl Factor {
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        match self {
            Factor::Variable { name, .. } => out.push_str(&ctx.resolve(name)),
            Factor::Call(call) => call.generate(ctx, out),
            Factor::Integer { text } | Factor::String { text } => out.push_str(text),
            Factor::Bool { value } => out.push_str(if *value { "true" } else { "false" }),
            Factor::Group(inner) => {
                out.push('(');
                inner.generate(ctx, out);
                out.push(')');
            }
        }
    }
}

/* ===================== Workflow ===================== */

impl Action {
    /// The action's script as one line of target code
    pub fn generate<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        for statement in &self.statements {
            statement.generate(ctx, out);
        }
    }
}

impl Transition {
    /// The guard expression, or `true` for an unconditional transition
    pub fn generate_guard<C: Context + ?Sized>(&self, ctx: &C, out: &mut String) {
        match &self.guard {
            Some(guard) => guard.generate(ctx, out),
            None => out.push_str("true"),
        }
    }
}

#[cfg(test)]
mod tests;

//! Abstract Syntax Tree node types for PMSL scripts
//!
//! Expressions are layered the same way the grammar is, loosest binding first:
//! `BExpression` (or) → `BTerm` (and) → `NotBFactor` (not) → `Relation`
//! (`>` `<` `=`) → `Expression` (`+` `-`) → `Term` (`*` `/`) → `Factor`.

use serde::{Deserialize, Serialize};

use crate::token::Position;

/* ===================== Operators ===================== */

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddOp {
    Plus,
    Minus,
}

impl AddOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            AddOp::Plus => "+",
            AddOp::Minus => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MulOp {
    Times,
    Divide,
}

impl MulOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            MulOp::Times => "*",
            MulOp::Divide => "/",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RelOp {
    Greater,
    Less,
    Equal,
}

impl RelOp {
    /// Operator as written in PMSL source
    pub fn symbol(&self) -> &'static str {
        match self {
            RelOp::Greater => ">",
            RelOp::Less => "<",
            RelOp::Equal => "=",
        }
    }
}

/* ===================== Boolean Layers ===================== */

/// `bterm (or bterm)*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BExpression {
    pub first: BTerm,
    pub rest: Vec<BTerm>,
}

impl BExpression {
    pub fn new(first: BTerm, rest: Vec<BTerm>) -> Self {
        Self { first, rest }
    }

    pub fn operands(&self) -> impl Iterator<Item = &BTerm> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

/// `notfactor (and notfactor)*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BTerm {
    pub first: NotBFactor,
    pub rest: Vec<NotBFactor>,
}

impl BTerm {
    pub fn new(first: NotBFactor, rest: Vec<NotBFactor>) -> Self {
        Self { first, rest }
    }

    pub fn operands(&self) -> impl Iterator<Item = &NotBFactor> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotBFactor {
    pub negated: bool,
    pub relation: Relation,
}

/// `expr [(> | < | =) expr]`, at most one comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    pub left: Expression,
    pub comparison: Option<(RelOp, Expression)>,
}

impl Relation {
    pub fn new(left: Expression, comparison: Option<(RelOp, Expression)>) -> Self {
        Self { left, comparison }
    }
}

/* ===================== Arithmetic Layers ===================== */

/// `term ((+ | -) term)*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expression {
    pub first: Term,
    pub rest: Vec<(AddOp, Term)>,
}

impl Expression {
    pub fn new(first: Term, rest: Vec<(AddOp, Term)>) -> Self {
        Self { first, rest }
    }

    pub fn term_count(&self) -> usize {
        1 + self.rest.len()
    }
}

/// `factor ((* | /) factor)*`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Term {
    pub first: Factor,
    pub rest: Vec<(MulOp, Factor)>,
}

impl Term {
    pub fn new(first: Factor, rest: Vec<(MulOp, Factor)>) -> Self {
        Self { first, rest }
    }

    pub fn factor_count(&self) -> usize {
        1 + self.rest.len()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Factor {
    Variable {
        name: String,
        position: Position,
    },
    Call(Call),
    /// Decimal digits as written
    Integer {
        text: String,
    },
    /// Source text including the surrounding quotes
    String {
        text: String,
    },
    Bool {
        value: bool,
    },
    /// `( bexpr )`
    Group(Box<BExpression>),
}

impl Factor {
    /// Wrap a factor so it can stand wherever an `Expression` is expected
    pub fn into_expression(self) -> Expression {
        Expression::new(Term::new(self, Vec::new()), Vec::new())
    }
}

impl Expression {
    /// Wrap an expression so it can stand wherever a `BExpression` is expected
    pub fn into_bexpression(self) -> BExpression {
        let relation = Relation::new(self, None);
        let factor = NotBFactor {
            negated: false,
            relation,
        };
        BExpression::new(BTerm::new(factor, Vec::new()), Vec::new())
    }
}

/* ===================== Statements ===================== */

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expression>,
    /// Position of the callee identifier
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDeclaration {
    pub name: String,
    pub value: Expression,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarAssignment {
    pub name: String,
    pub value: Expression,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Statement>,
    pub returns: Option<Expression>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct If {
    pub condition: BExpression,
    pub body: Vec<Statement>,
    pub position: Position,
}

/// `for init; condition; step do body end`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct For {
    pub init: VarDeclaration,
    pub condition: Relation,
    pub step: VarAssignment,
    pub body: Vec<Statement>,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "t")]
pub enum Statement {
    Definition(Definition),
    VarDeclaration(VarDeclaration),
    VarAssignment(VarAssignment),
    If(If),
    For(For),
    Call(Call),
}

impl Statement {
    pub fn position(&self) -> Position {
        match self {
            Statement::Definition(d) => d.position,
            Statement::VarDeclaration(d) => d.position,
            Statement::VarAssignment(a) => a.position,
            Statement::If(i) => i.position,
            Statement::For(f) => f.position,
            Statement::Call(c) => c.position,
        }
    }
}

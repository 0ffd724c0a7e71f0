//! Recursive-descent parser for PMSL
//!
//! One public method per grammar rule. Every method expects the lookahead to
//! be the first token of its production, consumes exactly that production and
//! returns the built node. There is no backtracking and no error recovery:
//! the first unexpected token aborts the whole parse.
//!
//! ```text
//! workflow   := 'workflow' IDENT node* 'end'
//! node       := ('node'|'state'|'join') IDENT (action|transition)* 'end'
//! action     := ('enter'|'leave') statement* 'end'
//! transition := 'transition' 'to' IDENT ('if' bexpr)?
//! statement  := def | vardecl | if | for | IDENT (call-tail | assign-tail)
//! def        := 'def' IDENT '(' (IDENT (',' IDENT)*)? ')' statement* ('return' expr)? 'end'
//! vardecl    := ['var'] IDENT '=' expr
//! assign     := IDENT '=' expr
//! for        := 'for' vardecl ';' relation ';' assign 'do' statement* 'end'
//! if         := 'if' bexpr 'then' statement* 'end'
//! call       := IDENT '(' (expr (',' expr)*)? ')'
//! bexpr      := bterm ('or' bterm)*
//! bterm      := notfactor ('and' notfactor)*
//! notfactor  := ['not'] relation
//! relation   := expr [('>'|'<'|'=') expr]
//! expr       := term (('+'|'-') term)*
//! term       := factor (('*'|'/') factor)*
//! factor     := IDENT [call-tail] | INT | STRING | 'true' | 'false' | '(' bexpr ')'
//! ```

use std::fmt;

use thiserror::Error;
use tracing::{debug, trace};

use crate::ast::{
    AddOp, BExpression, BTerm, Call, Definition, Expression, Factor, For, If, MulOp, NotBFactor,
    RelOp, Relation, Statement, Term, VarAssignment, VarDeclaration,
};
use crate::scanner::Scanner;
use crate::token::{Token, TokenKind, TokenSource};
use crate::workflow::{Action, Node, NodeKind, Phase, Transition, Workflow};


/* ===================== Error Types ===================== */

/// What the parser was looking for when it gave up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    Kind(TokenKind),
    OneOf(Vec<TokenKind>),
    /// Start of a factor: identifier, literal or `(`
    Factor,
    /// Input nested deeper than [`MAX_NESTING`]
    Nesting,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Kind(kind) => write!(f, "{}", kind),
            Expected::OneOf(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|k| k.describe()).collect();
                write!(f, "{}", names.join(" or "))
            }
            Expected::Factor => write!(f, "identifier, literal or '('"),
            Expected::Nesting => write!(f, "at most {} levels of nesting", MAX_NESTING),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// The offending token
    pub token: Token,
    pub expected: Expected,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: unexpected {}", self.token.position, self.token.kind)?;
        // keywords and punctuation are fully named by their kind
        match self.token.kind {
            TokenKind::Identifier
            | TokenKind::IntegerLiteral
            | TokenKind::StringLiteral
            | TokenKind::Invalid => write!(f, " '{}'", self.token.text)?,
            _ => {}
        }
        write!(f, ", expected {}", self.expected)
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest allowed nesting of groups, call arguments and statement bodies
pub const MAX_NESTING: usize = 64;

/* ===================== Entry Points ===================== */

/// Parse a complete PMSL source file holding exactly one workflow
pub fn parse(source: &str) -> ParseResult<Workflow> {
    let mut parser = Parser::new(Scanner::new(source));
    let workflow = parser.parse_workflow()?;
    parser.expect_eof()?;
    Ok(workflow)
}

/// Parse a standalone boolean expression, such as a transition guard
pub fn parse_condition(source: &str) -> ParseResult<BExpression> {
    let mut parser = Parser::new(Scanner::new(source));
    let condition = parser.parse_bexpression()?;
    parser.expect_eof()?;
    debug!(terms = condition.rest.len() + 1, "parsed condition");
    Ok(condition)
}

/// Parse a sequence of statements running to the end of input
pub fn parse_script(source: &str) -> ParseResult<Vec<Statement>> {
    let mut parser = Parser::new(Scanner::new(source));
    let mut statements = Vec::new();
    while !parser.at(TokenKind::Eof) {
        statements.push(parser.parse_statement()?);
    }
    Ok(statements)
}

/* ===================== Parser ===================== */

pub struct Parser<S> {
    source: S,
    /// One-token lookahead
    current: Token,
    depth: usize,
}

impl<S: TokenSource> Parser<S> {
    pub fn new(mut source: S) -> Self {
        let current = source.next_token();
        Self {
            source,
            current,
            depth: 0,
        }
    }

    /// The lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Fail unless all input has been consumed
    pub fn expect_eof(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::Eof).map(|_| ())
    }

    /* ===================== Token Helpers ===================== */

    fn at(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn advance(&mut self) -> Token {
        let next = self.source.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(Expected::Kind(kind)))
        }
    }

    fn unexpected(&self, expected: Expected) -> ParseError {
        ParseError {
            token: self.current.clone(),
            expected,
        }
    }

    /// Run a nested production, failing at the current token once
    /// [`MAX_NESTING`] levels are open
    fn nested<T>(&mut self, parse: impl FnOnce(&mut Self) -> ParseResult<T>) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.unexpected(Expected::Nesting));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    /// `statement* 'end'`
    fn parse_block(&mut self) -> ParseResult<Vec<Statement>> {
        let mut statements = Vec::new();
        loop {
            match self.current.kind {
                TokenKind::End => {
                    self.advance();
                    return Ok(statements);
                }
                TokenKind::Eof => return Err(self.unexpected(Expected::Kind(TokenKind::End))),
                _ => statements.push(self.parse_statement()?),
            }
        }
    }

    /* ===================== Workflow Structure ===================== */

    pub fn parse_workflow(&mut self) -> ParseResult<Workflow> {
        let start = self.expect(TokenKind::Workflow)?;
        let name = self.expect(TokenKind::Identifier)?;
        let mut workflow = Workflow::new(name.text, start.position);

        loop {
            match self.current.kind {
                TokenKind::End => {
                    self.advance();
                    break;
                }
                TokenKind::Node | TokenKind::State | TokenKind::Join => {
                    workflow.add(self.parse_node()?);
                }
                _ => {
                    return Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::Node,
                        TokenKind::State,
                        TokenKind::Join,
                        TokenKind::End,
                    ])))
                }
            }
        }

        debug!(workflow = %workflow.name, nodes = workflow.nodes.len(), "parsed workflow");
        Ok(workflow)
    }

    pub fn parse_node(&mut self) -> ParseResult<Node> {
        let kind = match self.current.kind {
            TokenKind::Node => NodeKind::Node,
            TokenKind::State => NodeKind::State,
            TokenKind::Join => NodeKind::Join,
            _ => {
                return Err(self.unexpected(Expected::OneOf(vec![
                    TokenKind::Node,
                    TokenKind::State,
                    TokenKind::Join,
                ])))
            }
        };
        let start = self.advance();
        let name = self.expect(TokenKind::Identifier)?;
        let mut node = Node::new(kind, name.text, start.position);

        loop {
            match self.current.kind {
                TokenKind::End => {
                    self.advance();
                    break;
                }
                TokenKind::Enter | TokenKind::Leave => node.add_action(self.parse_action()?),
                TokenKind::Transition => node.add_transition(self.parse_transition()?),
                _ => {
                    return Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::Enter,
                        TokenKind::Leave,
                        TokenKind::Transition,
                        TokenKind::End,
                    ])))
                }
            }
        }

        trace!(
            node = %node.name,
            kind = node.kind.keyword(),
            actions = node.actions.len(),
            transitions = node.transitions.len(),
            "parsed node"
        );
        Ok(node)
    }

    pub fn parse_action(&mut self) -> ParseResult<Action> {
        let phase = match self.current.kind {
            TokenKind::Enter => Phase::Enter,
            TokenKind::Leave => Phase::Leave,
            _ => {
                return Err(
                    self.unexpected(Expected::OneOf(vec![TokenKind::Enter, TokenKind::Leave]))
                )
            }
        };
        let start = self.advance();
        let mut action = Action::new(phase, start.position);
        for statement in self.parse_block()? {
            action.add(statement);
        }
        Ok(action)
    }

    pub fn parse_transition(&mut self) -> ParseResult<Transition> {
        let start = self.expect(TokenKind::Transition)?;
        self.expect(TokenKind::To)?;
        let target = self.expect(TokenKind::Identifier)?;

        let guard = if self.at(TokenKind::If) {
            self.advance();
            Some(self.parse_bexpression()?)
        } else {
            None
        };

        Ok(Transition::new(target.text, start.position, guard))
    }

    /* ===================== Statements ===================== */

    pub fn parse_statement(&mut self) -> ParseResult<Statement> {
        match self.current.kind {
            TokenKind::Def => Ok(Statement::Definition(self.nested(Self::parse_definition)?)),
            TokenKind::Var => Ok(Statement::VarDeclaration(self.parse_var_declaration()?)),
            TokenKind::If => Ok(Statement::If(self.nested(Self::parse_if)?)),
            TokenKind::For => Ok(Statement::For(self.nested(Self::parse_for)?)),
            TokenKind::Identifier => {
                // call or assignment: decided by the token after the name
                let name = self.advance();
                match self.current.kind {
                    TokenKind::LeftParen => Ok(Statement::Call(self.parse_call_tail(name)?)),
                    TokenKind::Eq => Ok(Statement::VarAssignment(
                        self.parse_var_assignment_tail(name)?,
                    )),
                    _ => Err(self.unexpected(Expected::OneOf(vec![
                        TokenKind::LeftParen,
                        TokenKind::Eq,
                    ]))),
                }
            }
            _ => Err(self.unexpected(Expected::OneOf(vec![
                TokenKind::Def,
                TokenKind::Var,
                TokenKind::If,
                TokenKind::For,
                TokenKind::Identifier,
            ]))),
        }
    }

    pub fn parse_definition(&mut self) -> ParseResult<Definition> {
        let start = self.expect(TokenKind::Def)?;
        let name = self.expect(TokenKind::Identifier)?;

        self.expect(TokenKind::LeftParen)?;
        let mut params = Vec::new();
        if !self.at(TokenKind::RightParen) {
            loop {
                params.push(self.expect(TokenKind::Identifier)?.text);
                if !self.at(TokenKind::Comma) {
                    break;
                }
                self.advance();
            }
        }
        self.expect(TokenKind::RightParen)?;

        let mut body = Vec::new();
        let mut returns = None;
        loop {
            match self.current.kind {
                TokenKind::End => break,
                TokenKind::Return => {
                    // nothing may follow the return expression except `end`
                    self.advance();
                    returns = Some(self.parse_expression()?);
                    break;
                }
                TokenKind::Eof => return Err(self.unexpected(Expected::Kind(TokenKind::End))),
                _ => body.push(self.parse_statement()?),
            }
        }
        self.expect(TokenKind::End)?;

        Ok(Definition {
            name: name.text,
            params,
            body,
            returns,
            position: start.position,
        })
    }

    pub fn parse_call(&mut self) -> ParseResult<Call> {
        let name = self.expect(TokenKind::Identifier)?;
        self.parse_call_tail(name)
    }

    /// Argument list of a call whose name has already been consumed
    fn parse_call_tail(&mut self, name: Token) -> ParseResult<Call> {
        let args = self.nested(|parser| {
            parser.expect(TokenKind::LeftParen)?;
            let mut args = Vec::new();
            if !parser.at(TokenKind::RightParen) {
                loop {
                    args.push(parser.parse_expression()?);
                    if !parser.at(TokenKind::Comma) {
                        break;
                    }
                    parser.advance();
                }
            }
            parser.expect(TokenKind::RightParen)?;
            Ok(args)
        })?;

        Ok(Call {
            name: name.text,
            args,
            position: name.position,
        })
    }

    pub fn parse_var_declaration(&mut self) -> ParseResult<VarDeclaration> {
        self.parse_var_declaration_with(true)
    }

    /// `['var'] IDENT '=' expr`; with `keyword_required` unset the `var` is optional
    pub fn parse_var_declaration_with(
        &mut self,
        keyword_required: bool,
    ) -> ParseResult<VarDeclaration> {
        let position = self.current.position;
        if keyword_required {
            self.expect(TokenKind::Var)?;
        } else if self.at(TokenKind::Var) {
            self.advance();
        }

        let name = self.expect(TokenKind::Identifier)?;
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;

        Ok(VarDeclaration {
            name: name.text,
            value,
            position,
        })
    }

    pub fn parse_var_assignment(&mut self) -> ParseResult<VarAssignment> {
        let name = self.expect(TokenKind::Identifier)?;
        self.parse_var_assignment_tail(name)
    }

    fn parse_var_assignment_tail(&mut self, name: Token) -> ParseResult<VarAssignment> {
        self.expect(TokenKind::Eq)?;
        let value = self.parse_expression()?;

        Ok(VarAssignment {
            name: name.text,
            value,
            position: name.position,
        })
    }

    pub fn parse_for(&mut self) -> ParseResult<For> {
        let start = self.expect(TokenKind::For)?;
        let init = self.parse_var_declaration_with(false)?;
        self.expect(TokenKind::Semicolon)?;
        let condition = self.parse_relation()?;
        self.expect(TokenKind::Semicolon)?;
        let step = self.parse_var_assignment()?;
        self.expect(TokenKind::Do)?;
        let body = self.parse_block()?;

        Ok(For {
            init,
            condition,
            step,
            body,
            position: start.position,
        })
    }

    pub fn parse_if(&mut self) -> ParseResult<If> {
        let start = self.expect(TokenKind::If)?;
        let condition = self.parse_bexpression()?;
        self.expect(TokenKind::Then)?;
        let body = self.parse_block()?;

        Ok(If {
            condition,
            body,
            position: start.position,
        })
    }

    /* ===================== Expressions ===================== */

    pub fn parse_bexpression(&mut self) -> ParseResult<BExpression> {
        let first = self.parse_bterm()?;
        let mut rest = Vec::new();
        while self.at(TokenKind::Or) {
            self.advance();
            rest.push(self.parse_bterm()?);
        }
        Ok(BExpression::new(first, rest))
    }

    pub fn parse_bterm(&mut self) -> ParseResult<BTerm> {
        let first = self.parse_not_bfactor()?;
        let mut rest = Vec::new();
        while self.at(TokenKind::And) {
            self.advance();
            rest.push(self.parse_not_bfactor()?);
        }
        Ok(BTerm::new(first, rest))
    }

    pub fn parse_not_bfactor(&mut self) -> ParseResult<NotBFactor> {
        let negated = self.at(TokenKind::Not);
        if negated {
            self.advance();
        }
        let relation = self.parse_relation()?;
        Ok(NotBFactor { negated, relation })
    }

    pub fn parse_relation(&mut self) -> ParseResult<Relation> {
        let left = self.parse_expression()?;
        let op = match self.current.kind {
            TokenKind::Gt => Some(RelOp::Greater),
            TokenKind::Lt => Some(RelOp::Less),
            TokenKind::Eq => Some(RelOp::Equal),
            _ => None,
        };

        let comparison = match op {
            Some(op) => {
                self.advance();
                Some((op, self.parse_expression()?))
            }
            None => None,
        };

        Ok(Relation::new(left, comparison))
    }

    pub fn parse_expression(&mut self) -> ParseResult<Expression> {
        let first = self.parse_term()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.current.kind {
                TokenKind::Plus => AddOp::Plus,
                TokenKind::Minus => AddOp::Minus,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_term()?));
        }
        Ok(Expression::new(first, rest))
    }

    pub fn parse_term(&mut self) -> ParseResult<Term> {
        let first = self.parse_factor()?;
        let mut rest = Vec::new();
        loop {
            let op = match self.current.kind {
                TokenKind::Star => MulOp::Times,
                TokenKind::Slash => MulOp::Divide,
                _ => break,
            };
            self.advance();
            rest.push((op, self.parse_factor()?));
        }
        Ok(Term::new(first, rest))
    }

    pub fn parse_factor(&mut self) -> ParseResult<Factor> {
        match self.current.kind {
            TokenKind::Identifier => {
                // variable or call: decided by the token after the name
                let name = self.advance();
                if self.at(TokenKind::LeftParen) {
                    Ok(Factor::Call(self.parse_call_tail(name)?))
                } else {
                    Ok(Factor::Variable {
                        name: name.text,
                        position: name.position,
                    })
                }
            }
            TokenKind::IntegerLiteral => Ok(Factor::Integer {
                text: self.advance().text,
            }),
            TokenKind::StringLiteral => Ok(Factor::String {
                text: self.advance().text,
            }),
            TokenKind::True | TokenKind::False => {
                let value = self.advance().kind == TokenKind::True;
                Ok(Factor::Bool { value })
            }
            TokenKind::LeftParen => {
                let inner = self.nested(|parser| {
                    parser.advance();
                    let inner = parser.parse_bexpression()?;
                    parser.expect(TokenKind::RightParen)?;
                    Ok(inner)
                })?;
                Ok(Factor::Group(Box::new(inner)))
            }
            _ => Err(self.unexpected(Expected::Factor)),
        }
    }
}

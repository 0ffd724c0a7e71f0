//! Workflow structural model
//!
//! Nodes are states, transitions are guarded edges between them, and
//! enter/leave actions are the scripts a runtime runs on entry and exit.
//! Nothing here is validated beyond what the grammar enforces: transition
//! targets are unresolved names, and a node may carry several actions for
//! the same phase.

use serde::{Deserialize, Serialize};

use crate::ast::{BExpression, Statement};
use crate::token::Position;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    pub nodes: Vec<Node>,
    pub position: Position,
}

impl Workflow {
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Self {
            name: name.into(),
            nodes: Vec::new(),
            position,
        }
    }

    pub fn add(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// First node with the given name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Node,
    State,
    Join,
}

impl NodeKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            NodeKind::Node => "node",
            NodeKind::State => "state",
            NodeKind::Join => "join",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub kind: NodeKind,
    pub name: String,
    pub actions: Vec<Action>,
    pub transitions: Vec<Transition>,
    pub position: Position,
}

impl Node {
    pub fn new(kind: NodeKind, name: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            name: name.into(),
            actions: Vec::new(),
            transitions: Vec::new(),
            position,
        }
    }

    pub fn add_action(&mut self, action: Action) {
        self.actions.push(action);
    }

    pub fn add_transition(&mut self, transition: Transition) {
        self.transitions.push(transition);
    }

    /// Actions for one phase, in source order
    pub fn actions_for(&self, phase: Phase) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(move |a| a.phase == phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Enter,
    Leave,
}

impl Phase {
    pub fn keyword(&self) -> &'static str {
        match self {
            Phase::Enter => "enter",
            Phase::Leave => "leave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub phase: Phase,
    pub statements: Vec<Statement>,
    pub position: Position,
}

impl Action {
    pub fn new(phase: Phase, position: Position) -> Self {
        Self {
            phase,
            statements: Vec::new(),
            position,
        }
    }

    pub fn add(&mut self, statement: Statement) {
        self.statements.push(statement);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Name of the target node, resolved by whoever consumes the workflow
    pub target: String,
    pub guard: Option<BExpression>,
    pub position: Position,
}

impl Transition {
    pub fn new(target: impl Into<String>, position: Position, guard: Option<BExpression>) -> Self {
        Self {
            target: target.into(),
            guard,
            position,
        }
    }

    pub fn with_condition(mut self, guard: BExpression) -> Self {
        self.guard = Some(guard);
        self
    }
}

//! PMSL front end: scanner, parser, AST rewriting and code generation for
//! the PMSL workflow-scripting language.
//!
//! ```
//! use pmsl_core::{parse, Identity, Verbatim};
//!
//! let workflow = parse("workflow w node a transition to b if x > 1 + 2 end end").unwrap();
//!
//! let mut code = String::new();
//! workflow.nodes[0].transitions[0].generate_guard(&Verbatim, &mut code);
//! assert_eq!(code, "x>(1+2)");
//!
//! let mut source = String::new();
//! workflow.transform(&mut Identity, &mut source);
//! assert!(source.contains("transition to b if x > 1 + 2"));
//! ```

pub mod ast;
pub mod cli;
pub mod config;
pub mod context;
pub mod generate;
pub mod parser;
pub mod scanner;
pub mod token;
pub mod transform;
pub mod workflow;

pub use context::{Context, Scope, SymbolTable, Verbatim};
pub use parser::{
    parse, parse_condition, parse_script, Expected, ParseError, Parser, MAX_NESTING,
};
pub use scanner::Scanner;
pub use token::{Position, Token, TokenKind, TokenSource, TokenStream};
pub use transform::{Identity, Rewriter};
pub use workflow::{Action, Node, NodeKind, Phase, Transition, Workflow};

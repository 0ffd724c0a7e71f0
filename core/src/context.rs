//! Name resolution used during code generation

use std::borrow::Cow;
use std::collections::HashMap;

use crate::config::GenerateConfig;

/// Resolves a PMSL variable name to the text emitted for it.
///
/// Resolution must be deterministic: the same name always yields the same text.
pub trait Context {
    fn resolve<'a>(&'a self, name: &'a str) -> Cow<'a, str>;
}

impl<C: Context + ?Sized> Context for &C {
    fn resolve<'a>(&'a self, name: &'a str) -> Cow<'a, str> {
        (**self).resolve(name)
    }
}

/// Emits every name as written
#[derive(Debug, Clone, Copy, Default)]
pub struct Verbatim;

impl Context for Verbatim {
    fn resolve<'a>(&'a self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }
}

/// Explicit renames first, then an optional prefix for everything else
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, String>,
    prefix: Option<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &GenerateConfig) -> Self {
        Self {
            symbols: config.symbols.clone(),
            prefix: config.prefix.clone(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, target: impl Into<String>) {
        self.symbols.insert(name.into(), target.into());
    }
}

impl Context for SymbolTable {
    fn resolve<'a>(&'a self, name: &'a str) -> Cow<'a, str> {
        if let Some(target) = self.symbols.get(name) {
            return Cow::Borrowed(target.as_str());
        }
        match &self.prefix {
            Some(prefix) => Cow::Owned(format!("{}{}", prefix, name)),
            None => Cow::Borrowed(name),
        }
    }
}

/// Names bound by a definition's parameters, over the enclosing context.
///
/// Bound names are emitted as written; everything else goes to `outer`.
pub struct Scope<'c> {
    outer: &'c dyn Context,
    bound: &'c [String],
}

impl<'c> Scope<'c> {
    pub fn new(outer: &'c dyn Context, bound: &'c [String]) -> Self {
        Self { outer, bound }
    }
}

impl Context for Scope<'_> {
    fn resolve<'a>(&'a self, name: &'a str) -> Cow<'a, str> {
        if self.bound.iter().any(|b| b == name) {
            Cow::Borrowed(name)
        } else {
            self.outer.resolve(name)
        }
    }
}

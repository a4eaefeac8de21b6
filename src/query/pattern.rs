//! Basic graph patterns

use std::collections::BTreeMap;

use serde::Serialize;

use crate::graph::{NamedNode, Node};

/// One position of a triple pattern: a variable or a fixed node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternTerm {
    Var(String),
    Const(Node),
}

impl PatternTerm {
    pub fn var(name: impl Into<String>) -> Self {
        PatternTerm::Var(name.into())
    }

    /// The node this term stands for under `bindings`, if it is fixed or bound
    fn resolve<'a>(&'a self, bindings: &'a Solution) -> Option<&'a Node> {
        match self {
            PatternTerm::Const(node) => Some(node),
            PatternTerm::Var(name) => bindings.get(name),
        }
    }

    fn variable(&self) -> Option<&str> {
        match self {
            PatternTerm::Var(name) => Some(name),
            PatternTerm::Const(_) => None,
        }
    }
}

impl From<Node> for PatternTerm {
    fn from(node: Node) -> Self {
        PatternTerm::Const(node)
    }
}

impl From<NamedNode> for PatternTerm {
    fn from(node: NamedNode) -> Self {
        PatternTerm::Const(Node::Named(node))
    }
}

/// Shorthand for a variable term
pub fn var(name: &str) -> PatternTerm {
    PatternTerm::var(name)
}

/// A triple pattern. Predicates are always fixed: every relationship the
/// engine understands is named by its predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    pub subject: PatternTerm,
    pub predicate: NamedNode,
    pub object: PatternTerm,
}

impl TriplePattern {
    pub fn new(subject: impl Into<PatternTerm>, predicate: NamedNode, object: impl Into<PatternTerm>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Variables mentioned by this pattern
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.subject.variable().into_iter().chain(self.object.variable())
    }

    /// Subject and object nodes under the current bindings (`None` = wildcard)
    pub(crate) fn bound_positions<'a>(&'a self, bindings: &'a Solution) -> (Option<&'a Node>, Option<&'a Node>) {
        (self.subject.resolve(bindings), self.object.resolve(bindings))
    }
}

/// Variable bindings for one solution of a query
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Solution(BTreeMap<String, Node>);

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, variable: &str) -> Option<&Node> {
        self.0.get(variable)
    }

    /// Bind `variable` to `node`. Returns false if it is already bound to a
    /// different node.
    pub fn bind(&mut self, variable: &str, node: &Node) -> bool {
        match self.0.get(variable) {
            Some(existing) => existing == node,
            None => {
                self.0.insert(variable.to_string(), node.clone());
                true
            }
        }
    }

    /// Keep only the named variables
    pub fn project(&self, variables: &[String]) -> Solution {
        Solution(
            self.0
                .iter()
                .filter(|(name, _)| variables.contains(name))
                .map(|(name, node)| (name.clone(), node.clone()))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//! Statements and wildcard patterns

use serde::{Deserialize, Serialize};

use super::node::{NamedNode, Node};

/// A single subject–predicate–object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Node,
    pub predicate: NamedNode,
    pub object: Node,
}

impl Statement {
    pub fn new(subject: impl Into<Node>, predicate: NamedNode, object: impl Into<Node>) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// True when `node` appears in subject or object position
    pub fn mentions(&self, node: &Node) -> bool {
        &self.subject == node || &self.object == node
    }
}

impl std::fmt::Display for Statement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}

/// A statement pattern where any position may be a wildcard (`None`)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    pub subject: Option<Node>,
    pub predicate: Option<NamedNode>,
    pub object: Option<Node>,
}

impl Pattern {
    /// Create a pattern that matches every statement
    pub fn any() -> Self {
        Self::default()
    }

    pub fn subject(mut self, subject: impl Into<Node>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn predicate(mut self, predicate: NamedNode) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn object(mut self, object: impl Into<Node>) -> Self {
        self.object = Some(object.into());
        self
    }

    /// Check whether a statement matches every non-wildcard position
    pub fn matches(&self, statement: &Statement) -> bool {
        self.subject.as_ref().map_or(true, |s| s == &statement.subject)
            && self.predicate.as_ref().map_or(true, |p| p == &statement.predicate)
            && self.object.as_ref().map_or(true, |o| o == &statement.object)
    }
}

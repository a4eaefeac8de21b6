//! Graph: the mutable statement set behind a resource map

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use super::node::{BlankNode, NamedNode, Node};
use super::statement::{Pattern, Statement};
use crate::config::GraphConfig;
use crate::identifier::encode_component;

/// An unordered, duplicate-free set of statements plus the cached resolver
/// base URL under which bare identifiers are dereferenced.
///
/// Statements keep insertion order so that discovery order (and therefore
/// output order) is stable, but no caller may rely on any other ordering.
#[derive(Debug, Clone)]
pub struct Graph {
    config: GraphConfig,
    statements: Vec<Statement>,
    index: HashSet<Statement>,
    resolver_base_url: Option<String>,
}

impl Graph {
    /// Create an empty graph
    pub fn new(config: GraphConfig) -> Self {
        Self {
            config,
            statements: Vec::new(),
            index: HashSet::new(),
            resolver_base_url: None,
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Number of statements
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    /// All statements, in insertion order
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Add a statement unless an identical one already exists.
    ///
    /// Returns true if the graph changed.
    pub fn add(&mut self, subject: impl Into<Node>, predicate: NamedNode, object: impl Into<Node>) -> bool {
        self.insert(Statement::new(subject, predicate, object))
    }

    /// Insert a prebuilt statement (idempotent)
    pub fn insert(&mut self, statement: Statement) -> bool {
        if self.index.contains(&statement) {
            return false;
        }
        self.index.insert(statement.clone());
        self.statements.push(statement);
        true
    }

    pub fn contains(&self, statement: &Statement) -> bool {
        self.index.contains(statement)
    }

    /// All statements whose non-wildcard positions equal the given nodes.
    ///
    /// This is the single query primitive every higher-level component builds on.
    pub fn matching(
        &self,
        subject: Option<&Node>,
        predicate: Option<&NamedNode>,
        object: Option<&Node>,
    ) -> Vec<Statement> {
        // Fully bound patterns are answered from the index
        if let (Some(s), Some(p), Some(o)) = (subject, predicate, object) {
            let probe = Statement::new(s.clone(), p.clone(), o.clone());
            return if self.index.contains(&probe) {
                vec![probe]
            } else {
                Vec::new()
            };
        }

        self.statements
            .iter()
            .filter(|st| {
                subject.map_or(true, |s| s == &st.subject)
                    && predicate.map_or(true, |p| p == &st.predicate)
                    && object.map_or(true, |o| o == &st.object)
            })
            .cloned()
            .collect()
    }

    /// True if at least one statement matches
    pub fn has_match(
        &self,
        subject: Option<&Node>,
        predicate: Option<&NamedNode>,
        object: Option<&Node>,
    ) -> bool {
        self.statements.iter().any(|st| {
            subject.map_or(true, |s| s == &st.subject)
                && predicate.map_or(true, |p| p == &st.predicate)
                && object.map_or(true, |o| o == &st.object)
        })
    }

    /// Remove every statement matching the pattern. Returns how many were
    /// removed; a pattern matching nothing is a no-op.
    pub fn remove(&mut self, pattern: &Pattern) -> usize {
        let before = self.statements.len();
        let index = &mut self.index;
        self.statements.retain(|st| {
            if pattern.matches(st) {
                index.remove(st);
                false
            } else {
                true
            }
        });
        before - self.statements.len()
    }

    /// Remove every statement matching the (possibly wildcard) positions
    pub fn remove_many(
        &mut self,
        subject: Option<&Node>,
        predicate: Option<&NamedNode>,
        object: Option<&Node>,
    ) -> usize {
        let pattern = Pattern {
            subject: subject.cloned(),
            predicate: predicate.cloned(),
            object: object.cloned(),
        };
        self.remove(&pattern)
    }

    /// Remove exactly one statement
    pub fn remove_statement(&mut self, statement: &Statement) -> bool {
        if !self.index.remove(statement) {
            return false;
        }
        self.statements.retain(|st| st != statement);
        true
    }

    /// Allocate a blank node that is unique within this graph
    pub fn blank_node(&mut self) -> BlankNode {
        loop {
            let candidate = BlankNode::new(format!("b{}", Uuid::new_v4().simple()));
            let node = Node::Blank(candidate.clone());
            if !self.statements.iter().any(|st| st.mentions(&node)) {
                return candidate;
            }
        }
    }

    /// The resolver base URL for this graph, computed once and cached.
    ///
    /// When the package has a previous identifier, the base URL is whatever
    /// precedes that identifier (bare or percent-encoded) in the subject of
    /// its identifier statement. Otherwise the configured default is used.
    pub fn resolver_base_url(&mut self, previous_id: Option<&str>) -> String {
        if let Some(url) = &self.resolver_base_url {
            return url.clone();
        }

        let discovered = previous_id.and_then(|id| self.discover_resolver_base_url(id));
        let url = match discovered {
            Some(url) => {
                debug!(resolver = %url, "discovered resolver base URL from identifier statement");
                url
            }
            None => self.config.resolver_base_url.clone(),
        };
        self.resolver_base_url = Some(url.clone());
        url
    }

    /// The cached resolver base URL, if one has been computed
    pub fn cached_resolver_base_url(&self) -> Option<&str> {
        self.resolver_base_url.as_deref()
    }

    fn discover_resolver_base_url(&self, id: &str) -> Option<String> {
        let statement = self.statements.iter().find(|st| {
            st.object
                .as_literal()
                .map_or(false, |lit| lit.value == id)
        })?;
        let subject = statement.subject.as_named()?.as_str();
        let encoded = encode_component(id);

        [id, encoded.as_str()]
            .iter()
            .filter_map(|needle| subject.find(needle))
            .map(|pos| subject[..pos].to_string())
            .find(|prefix| !prefix.is_empty())
    }

    /// Remove all statements and forget the cached resolver base URL
    pub fn clear(&mut self) {
        self.statements.clear();
        self.index.clear();
        self.resolver_base_url = None;
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

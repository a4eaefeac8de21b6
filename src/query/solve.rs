//! Query evaluation

use tracing::trace;

use super::pattern::{PatternTerm, Solution, TriplePattern};
use crate::error::QueryError;
use crate::graph::{Graph, NamedNode, Node};

/// A select query: triple patterns joined on shared variables, projected
/// onto a list of variables
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    /// Name used in logs and errors
    pub name: String,
    pub patterns: Vec<TriplePattern>,
    pub projection: Vec<String>,
}

impl SelectQuery {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Add a triple pattern to the join
    pub fn with_pattern(
        mut self,
        subject: impl Into<PatternTerm>,
        predicate: NamedNode,
        object: impl Into<PatternTerm>,
    ) -> Self {
        self.patterns.push(TriplePattern::new(subject, predicate, object));
        self
    }

    /// Project the result onto these variables
    pub fn select(mut self, variables: &[&str]) -> Self {
        self.projection = variables.iter().map(|v| v.to_string()).collect();
        self
    }

    /// Evaluate against `graph`.
    ///
    /// Patterns are joined in the order they were added. Solutions are
    /// projected and deduplicated, keeping discovery order.
    pub fn execute(&self, graph: &Graph) -> Result<Vec<Solution>, QueryError> {
        self.check_projection()?;

        let mut solutions = vec![Solution::new()];
        for pattern in &self.patterns {
            solutions = join(graph, pattern, &solutions);
            if solutions.is_empty() {
                break;
            }
        }

        let mut projected: Vec<Solution> = Vec::with_capacity(solutions.len());
        for solution in &solutions {
            let row = solution.project(&self.projection);
            if !projected.contains(&row) {
                projected.push(row);
            }
        }

        trace!(query = %self.name, solutions = projected.len(), "query evaluated");
        Ok(projected)
    }

    fn check_projection(&self) -> Result<(), QueryError> {
        for variable in &self.projection {
            let bound = self
                .patterns
                .iter()
                .any(|p| p.variables().any(|v| v == variable.as_str()));
            if !bound {
                return Err(QueryError::UnboundVariable {
                    query: self.name.clone(),
                    variable: variable.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Extend every partial solution with the statements matching `pattern`
fn join(graph: &Graph, pattern: &TriplePattern, partial: &[Solution]) -> Vec<Solution> {
    let mut extended = Vec::new();
    for bindings in partial {
        let (subject, object) = pattern.bound_positions(bindings);
        for statement in graph.matching(subject, Some(&pattern.predicate), object) {
            let mut next = bindings.clone();
            let consistent = bind_term(&mut next, &pattern.subject, &statement.subject)
                && bind_term(&mut next, &pattern.object, &statement.object);
            if consistent {
                extended.push(next);
            }
        }
    }
    extended
}

fn bind_term(bindings: &mut Solution, term: &PatternTerm, node: &Node) -> bool {
    match term {
        PatternTerm::Var(name) => bindings.bind(name, node),
        PatternTerm::Const(_) => true,
    }
}

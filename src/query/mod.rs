//! Pattern queries over a resource map graph
//!
//! A query is a conjunction of triple patterns joined on shared variables,
//! evaluated as a sequence of [`Graph::matching`](crate::graph::Graph::matching)
//! calls. This covers the fixed relationship queries the provenance layer
//! runs; it is not a general query language.

mod pattern;
mod solve;

pub use pattern::{var, PatternTerm, Solution, TriplePattern};
pub use solve::SelectQuery;

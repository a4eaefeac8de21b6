//! Core graph data structures

mod namespace;
mod node;
mod statement;
mod store;

#[cfg(test)]
mod tests;

pub use namespace::{Namespace, ALL as NAMESPACES, CITO, DC, DCTERMS, FOAF, ORE, OWL, PROV, PROVONE, RDF, XSD};
pub use node::{BlankNode, Literal, NamedNode, Node};
pub use statement::{Pattern, Statement};
pub use store::Graph;

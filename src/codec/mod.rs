//! Wire codec: RDF/XML in and out of a [`Graph`](crate::graph::Graph)
//!
//! `oxigraph` does the XML work; this module only converts between its
//! terms and the engine's own [`Node`](crate::graph::Node)s, so nothing
//! outside the codec depends on the RDF library.

mod normalize;
mod rdfxml;

pub use normalize::normalize_coordinating_nodes;
pub use rdfxml::{read_rdfxml, write_rdfxml};

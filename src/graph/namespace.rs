//! Fixed namespace table used by resource maps

use super::node::NamedNode;

/// A prefix-to-IRI mapping used to build typed node references
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Namespace {
    pub prefix: &'static str,
    pub iri: &'static str,
}

impl Namespace {
    pub const fn new(prefix: &'static str, iri: &'static str) -> Self {
        Self { prefix, iri }
    }

    /// Build the named node `<iri><local_name>`
    pub fn term(&self, local_name: &str) -> NamedNode {
        NamedNode::new(format!("{}{}", self.iri, local_name))
    }

    /// True when the node's IRI falls under this namespace
    pub fn contains(&self, node: &NamedNode) -> bool {
        node.in_namespace(self.iri)
    }
}

pub const RDF: Namespace = Namespace::new("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#");
pub const FOAF: Namespace = Namespace::new("foaf", "http://xmlns.com/foaf/0.1/");
pub const OWL: Namespace = Namespace::new("owl", "http://www.w3.org/2002/07/owl#");
pub const DC: Namespace = Namespace::new("dc", "http://purl.org/dc/elements/1.1/");
pub const ORE: Namespace = Namespace::new("ore", "http://www.openarchives.org/ore/terms/");
pub const DCTERMS: Namespace = Namespace::new("dcterms", "http://purl.org/dc/terms/");
pub const CITO: Namespace = Namespace::new("cito", "http://purl.org/spar/cito/");
pub const XSD: Namespace = Namespace::new("xsd", "http://www.w3.org/2001/XMLSchema#");
pub const PROV: Namespace = Namespace::new("prov", "http://www.w3.org/ns/prov#");
pub const PROVONE: Namespace =
    Namespace::new("provone", "http://purl.dataone.org/provone/2015/01/15/ontology#");

/// All namespaces, in the order prefixes are declared on output
pub const ALL: [Namespace; 10] = [RDF, FOAF, OWL, DC, ORE, DCTERMS, CITO, XSD, PROV, PROVONE];

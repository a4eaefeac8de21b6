//! Common test utilities for resource map integration tests
//!
//! Builds RDF/XML resource maps in the shape repositories publish them, so
//! tests can parse, edit and rewrite realistic documents.

#![allow(dead_code)]

use oremap::identifier::encode_component;
use oremap::{Graph, NamedNode, Node, ResourceMap};

/// Default resolver base URL
pub const RESOLVER: &str = "https://cn.dataone.org/cn/v2/resolve/";

/// Modification date written into fixtures
pub const FIXTURE_MODIFIED: &str = "2020-01-01T00:00:00.000Z";

/// Resolver URI for an identifier
pub fn uri(id: &str) -> String {
    format!("{}{}", RESOLVER, encode_component(id))
}

pub fn node(id: &str) -> Node {
    Node::named(uri(id))
}

pub fn has(graph: &Graph, subject: &Node, predicate: NamedNode, object: &Node) -> bool {
    graph.has_match(Some(subject), Some(&predicate), Some(object))
}

/// Builder for an RDF/XML resource map document
#[derive(Debug, Clone)]
pub struct MapFixture {
    id: String,
    members: Vec<String>,
    documents: Vec<(String, String)>,
    extra: Vec<String>,
}

impl MapFixture {
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            members: Vec::new(),
            documents: Vec::new(),
            extra: Vec::new(),
        }
    }

    pub fn member(mut self, id: &str) -> Self {
        self.members.push(id.to_string());
        self
    }

    /// `metadata` documents `data`; both should also be members
    pub fn documents(mut self, metadata: &str, data: &str) -> Self {
        self.documents.push((metadata.to_string(), data.to_string()));
        self
    }

    /// Raw RDF/XML appended inside the document element
    pub fn raw(mut self, xml: &str) -> Self {
        self.extra.push(xml.to_string());
        self
    }

    pub fn to_xml(&self) -> String {
        let map = uri(&self.id);
        let aggregation = format!("{}#aggregation", map);

        let mut xml = String::from(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
    xmlns:ore="http://www.openarchives.org/ore/terms/"
    xmlns:dcterms="http://purl.org/dc/terms/"
    xmlns:dc="http://purl.org/dc/elements/1.1/"
    xmlns:cito="http://purl.org/spar/cito/"
    xmlns:foaf="http://xmlns.com/foaf/0.1/"
    xmlns:prov="http://www.w3.org/ns/prov#"
    xmlns:provone="http://purl.dataone.org/provone/2015/01/15/ontology#">
"#,
        );

        xml.push_str(&format!(
            r#"  <rdf:Description rdf:about="{map}">
    <rdf:type rdf:resource="http://www.openarchives.org/ore/terms/ResourceMap"/>
    <dcterms:identifier rdf:datatype="http://www.w3.org/2001/XMLSchema#string">{id}</dcterms:identifier>
    <dcterms:modified rdf:datatype="http://www.w3.org/2001/XMLSchema#dateTime">{modified}</dcterms:modified>
    <dc:creator rdf:nodeID="creator"/>
    <ore:describes rdf:resource="{aggregation}"/>
  </rdf:Description>
  <rdf:Description rdf:nodeID="creator">
    <rdf:type rdf:resource="http://purl.org/dc/terms/Agent"/>
    <foaf:name>Fixture Author</foaf:name>
  </rdf:Description>
  <rdf:Description rdf:about="{aggregation}">
    <rdf:type rdf:resource="http://www.openarchives.org/ore/terms/Aggregation"/>
    <ore:isDescribedBy rdf:resource="{map}"/>
"#,
            map = map,
            id = self.id,
            modified = FIXTURE_MODIFIED,
            aggregation = aggregation,
        ));
        for member in &self.members {
            xml.push_str(&format!("    <ore:aggregates rdf:resource=\"{}\"/>\n", uri(member)));
        }
        xml.push_str("  </rdf:Description>\n");

        for member in &self.members {
            xml.push_str(&format!(
                "  <rdf:Description rdf:about=\"{}\">\n    <dcterms:identifier>{}</dcterms:identifier>\n    <ore:isAggregatedBy rdf:resource=\"{}\"/>\n",
                uri(member),
                member,
                aggregation
            ));
            for (metadata, data) in &self.documents {
                if metadata == member {
                    xml.push_str(&format!("    <cito:documents rdf:resource=\"{}\"/>\n", uri(data)));
                }
                if data == member {
                    xml.push_str(&format!("    <cito:isDocumentedBy rdf:resource=\"{}\"/>\n", uri(metadata)));
                }
            }
            xml.push_str("  </rdf:Description>\n");
        }

        for extra in &self.extra {
            xml.push_str(extra);
            xml.push('\n');
        }
        xml.push_str("</rdf:RDF>\n");
        xml
    }

    /// Parse the fixture into a fresh resource map
    pub fn parse(&self) -> ResourceMap {
        let mut map = ResourceMap::default();
        let outcome = map.parse(&self.to_xml(), &self.id, None);
        assert!(!outcome.is_indeterminate(), "fixture failed to parse: {:?}", outcome.error());
        map
    }
}

/// A package `old1` where `meta1` documents `data1`
pub fn simple_package() -> MapFixture {
    MapFixture::new("old1")
        .member("meta1")
        .member("data1")
        .documents("meta1", "data1")
}

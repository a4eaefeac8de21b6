//! Aggregation parsing: wire bytes into the graph and a membership list

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::member::{push_unique, DocumentationIndex};
use super::ResourceMap;
use crate::codec::{normalize_coordinating_nodes, read_rdfxml};
use crate::error::ParseError;
use crate::graph::{Graph, CITO, ORE, PROV};
use crate::identifier::pid_from_uri;

/// Members and documentation discovered in a resource map
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Membership {
    /// Member ids, science metadata first, otherwise in discovery order
    pub members: Vec<String>,
    /// Data member id to the metadata ids documenting it
    pub documented_by: DocumentationIndex,
    /// Member id to its `prov:atLocation` value
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub at_location: BTreeMap<String, String>,
}

/// Result of parsing a resource map.
///
/// A failed parse is not the same as an empty package: callers must treat
/// [`ParseOutcome::Indeterminate`] as "membership unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Parsed(Membership),
    Indeterminate(ParseError),
}

impl ParseOutcome {
    /// Discovered member ids; empty when indeterminate
    pub fn members(&self) -> &[String] {
        match self {
            ParseOutcome::Parsed(membership) => &membership.members,
            ParseOutcome::Indeterminate(_) => &[],
        }
    }

    pub fn membership(&self) -> Option<&Membership> {
        match self {
            ParseOutcome::Parsed(membership) => Some(membership),
            ParseOutcome::Indeterminate(_) => None,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, ParseOutcome::Indeterminate(_))
    }

    pub fn error(&self) -> Option<&ParseError> {
        match self {
            ParseOutcome::Parsed(_) => None,
            ParseOutcome::Indeterminate(e) => Some(e),
        }
    }
}

impl ResourceMap {
    /// Parse an RDF/XML resource map into this map's graph.
    ///
    /// `base_url` is the base IRI relative references resolve against. On
    /// success the graph is replaced and the discovered membership becomes
    /// the original membership used by [`ResourceMap::needs_update`]. On
    /// failure the graph is left as it was and the failure is logged.
    pub fn parse(&mut self, document: &str, package_id: &str, base_url: Option<&str>) -> ParseOutcome {
        match self.try_parse(document, package_id, base_url) {
            Ok(membership) => {
                info!(
                    package = package_id,
                    members = membership.members.len(),
                    statements = self.graph.len(),
                    "parsed resource map"
                );
                ParseOutcome::Parsed(membership)
            }
            Err(e) => {
                warn!(package = package_id, error = %e, "resource map could not be parsed, membership unknown");
                ParseOutcome::Indeterminate(e)
            }
        }
    }

    /// Parse raw bytes, rejecting anything that is not UTF-8
    pub fn parse_bytes(&mut self, bytes: &[u8], package_id: &str, base_url: Option<&str>) -> ParseOutcome {
        match std::str::from_utf8(bytes) {
            Ok(document) => self.parse(document, package_id, base_url),
            Err(_) => {
                warn!(package = package_id, "resource map is not valid UTF-8, membership unknown");
                ParseOutcome::Indeterminate(ParseError::Encoding)
            }
        }
    }

    fn try_parse(&mut self, document: &str, package_id: &str, base_url: Option<&str>) -> Result<Membership, ParseError> {
        let normalized = normalize_coordinating_nodes(document, self.graph.config());
        let statements = read_rdfxml(&normalized, base_url)?;

        let mut graph = Graph::new(self.graph.config().clone());
        for statement in statements {
            graph.insert(statement);
        }
        debug!(statements = graph.len(), "loaded statements");

        let membership = discover_membership(&graph);

        self.graph = graph;
        self.package_id = Some(package_id.to_string());
        self.original_members = membership.members.clone();
        self.original_documentation = membership.documented_by.clone();
        self.at_location = membership.at_location.clone();
        self.executions.clear();
        Ok(membership)
    }
}

/// Read aggregated members, documentation and locations out of a graph
pub fn discover_membership(graph: &Graph) -> Membership {
    let mut members: Vec<String> = Vec::new();
    for statement in graph.matching(None, Some(&ORE.term("aggregates")), None) {
        push_unique(&mut members, pid_from_uri(statement.object.value()));
    }

    let mut documented_by = DocumentationIndex::new();
    let mut metadata_ids: Vec<String> = Vec::new();
    for statement in graph.matching(None, Some(&CITO.term("documents")), None) {
        let metadata_id = pid_from_uri(statement.subject.value());
        let data_id = pid_from_uri(statement.object.value());
        let documenters = documented_by.entry(data_id).or_default();
        push_unique(documenters, metadata_id.clone());
        push_unique(&mut metadata_ids, metadata_id);
    }

    let mut at_location = BTreeMap::new();
    for statement in graph.matching(None, Some(&PROV.term("atLocation")), None) {
        at_location.insert(
            pid_from_uri(statement.subject.value()),
            normalize_location(statement.object.value()),
        );
    }

    // Stable partition: science metadata ahead of everything else
    let (mut ordered, rest): (Vec<String>, Vec<String>) = members
        .into_iter()
        .partition(|id| metadata_ids.contains(id));
    ordered.extend(rest);

    Membership {
        members: ordered,
        documented_by,
        at_location,
    }
}

/// Resolve a `prov:atLocation` path against the package root.
///
/// A leading `~` is dropped, `.` and empty segments vanish and `..` pops
/// the previous segment. An empty result is the root, `/`.
pub fn normalize_location(location: &str) -> String {
    let location = match location.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with('/') || rest.starts_with('\\') => rest,
        _ => location,
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in location.split('/') {
        match segment {
            ".." => {
                segments.pop();
            }
            "." | "" => {}
            _ => segments.push(segment),
        }
    }

    if segments.is_empty() {
        "/".to_string()
    } else {
        segments.join("/")
    }
}

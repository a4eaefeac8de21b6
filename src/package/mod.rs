//! Resource map facade
//!
//! [`ResourceMap`] owns the graph for one package together with the state
//! captured when it was parsed, the pending provenance edits and the
//! execution cache. Parsing lives in `parse`, saving in `serialize`, and the
//! provenance operations are implemented on the same type in
//! [`crate::provenance`].

mod member;
mod parse;
mod serialize;

use std::collections::{BTreeMap, BTreeSet};

use crate::config::GraphConfig;
use crate::graph::{Graph, Node, DCTERMS};
use crate::identifier::encode_component;
use crate::provenance::EditLog;

pub use member::{
    DocumentationIndex, FormatIdResolver, MemberKind, MemberKindResolver, PackageMember, SaveRequest,
};
pub use parse::{discover_membership, normalize_location, Membership, ParseOutcome};
pub use serialize::SaveOutcome;

/// One package's resource map graph and its bookkeeping
#[derive(Debug, Clone)]
pub struct ResourceMap {
    pub(crate) graph: Graph,
    /// Identifier the graph currently describes, if it has been parsed or saved
    pub(crate) package_id: Option<String>,
    /// Member ids as first parsed; never changed afterwards
    pub(crate) original_members: Vec<String>,
    /// Documented-by index as first parsed; never changed afterwards
    pub(crate) original_documentation: DocumentationIndex,
    pub(crate) at_location: BTreeMap<String, String>,
    pub(crate) edits: EditLog,
    /// Program id to the execution id that ran it
    pub(crate) executions: BTreeMap<String, String>,
}

impl ResourceMap {
    /// An empty resource map for a package that has never been saved
    pub fn new(config: GraphConfig) -> Self {
        Self::with_graph(Graph::new(config))
    }

    /// Wrap an existing graph
    pub fn with_graph(graph: Graph) -> Self {
        Self {
            graph,
            package_id: None,
            original_members: Vec::new(),
            original_documentation: DocumentationIndex::new(),
            at_location: BTreeMap::new(),
            edits: EditLog::default(),
            executions: BTreeMap::new(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn config(&self) -> &GraphConfig {
        self.graph.config()
    }

    /// The identifier the graph currently describes
    pub fn package_id(&self) -> Option<&str> {
        self.package_id.as_deref()
    }

    /// Member ids in the order they were first parsed
    pub fn original_members(&self) -> &[String] {
        &self.original_members
    }

    pub fn original_documentation(&self) -> &DocumentationIndex {
        &self.original_documentation
    }

    /// Member id to `prov:atLocation` value
    pub fn at_location(&self) -> &BTreeMap<String, String> {
        &self.at_location
    }

    /// Cached execution id for a program, if known
    pub fn execution_for_program(&self, program_id: &str) -> Option<&str> {
        self.executions.get(program_id).map(String::as_str)
    }

    /// The URI the graph uses for `id`: the subject of its identifier
    /// statement if there is one, else the resolver URL plus the encoded id.
    pub fn uri_for(&mut self, id: &str) -> String {
        if let Some(uri) = self.resolved_uri(id) {
            return uri;
        }
        let previous = self.package_id.clone();
        format!(
            "{}{}",
            self.graph.resolver_base_url(previous.as_deref()),
            encode_component(id)
        )
    }

    /// Subject of the identifier statement for `id`, if the graph has one
    pub(crate) fn resolved_uri(&self, id: &str) -> Option<String> {
        self.graph
            .matching(None, Some(&DCTERMS.term("identifier")), Some(&Node::literal(id)))
            .into_iter()
            .find_map(|st| st.subject.as_named().map(|n| n.as_str().to_string()))
    }

    /// Named node for a member id
    pub(crate) fn node_for(&mut self, id: &str) -> Node {
        Node::named(self.uri_for(id))
    }

    /// True when saving `live` would change the resource map: membership
    /// differs from what was parsed, provenance edits are pending, or any
    /// member's documenters changed. Self-documentation is ignored.
    pub fn needs_update(&self, live: &[PackageMember]) -> bool {
        if self.has_pending_edits() {
            return true;
        }

        let original: BTreeSet<&str> = self.original_members.iter().map(String::as_str).collect();
        let current: BTreeSet<&str> = live.iter().map(|m| m.id.as_str()).collect();
        if original != current {
            return true;
        }

        live.iter().any(|member| {
            let now: BTreeSet<&str> = member
                .documented_by
                .iter()
                .map(String::as_str)
                .filter(|id| *id != member.id)
                .collect();
            let before: BTreeSet<&str> = self
                .original_documentation
                .get(&member.id)
                .map(|ids| {
                    ids.iter()
                        .map(String::as_str)
                        .filter(|id| *id != member.id)
                        .collect()
                })
                .unwrap_or_default();
            now != before
        })
    }
}

impl Default for ResourceMap {
    fn default() -> Self {
        Self::new(GraphConfig::default())
    }
}

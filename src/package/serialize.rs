//! Serialization and identity rewriting
//!
//! Saving a resource map either builds the graph from nothing (a new
//! package) or rewrites an existing graph from the old package identifier to
//! the new one, reconciling membership on the way. Either path runs against
//! a snapshot: if anything fails the graph and identifier are restored.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::member::{push_unique, MemberKind, PackageMember, SaveRequest};
use super::ResourceMap;
use crate::codec::write_rdfxml;
use crate::error::SerializationError;
use crate::graph::{Literal, Node, Statement, CITO, DC, DCTERMS, FOAF, ORE, RDF, XSD};
use crate::identifier::{encode_component, AliasSet};
use crate::provenance::EditReport;

/// Result of [`ResourceMap::save`]
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    /// The serialized RDF/XML
    pub document: String,
    /// Provenance edits applied before serializing
    pub edits: EditReport,
}

/// What `add_to_aggregation` needs to know about the save in progress
struct AggregationPlan<'a> {
    request: &'a SaveRequest,
    aggregation: Node,
    /// Ids documentation statements may point at
    live: Vec<String>,
    metadata_only: bool,
}

impl<'a> AggregationPlan<'a> {
    fn new(request: &'a SaveRequest, aggregation: Node) -> Self {
        let metadata_only =
            !request.members.is_empty() && request.members.iter().all(PackageMember::is_metadata);
        Self {
            request,
            aggregation,
            live: request.member_ids(),
            metadata_only,
        }
    }

    fn is_live(&self, id: &str) -> bool {
        self.live.iter().any(|live| live == id)
    }

    /// An undocumented data member documents itself so every member stays
    /// reachable through a documentation edge. Metadata only does so when
    /// the package holds nothing else.
    fn documents_itself(&self, member: &PackageMember) -> bool {
        if !member.is_undocumented() {
            return false;
        }
        match member.kind {
            MemberKind::Data => true,
            MemberKind::Metadata => self.metadata_only,
            MemberKind::Package => false,
        }
    }

    /// Live metadata ids documenting `member`, falling back to the live
    /// successor of an obsoleted documenter
    fn live_documenters(&self, member: &PackageMember) -> Vec<String> {
        let metadata: Vec<&PackageMember> = self
            .request
            .members
            .iter()
            .filter(|m| m.is_metadata())
            .collect();

        let direct: Vec<String> = member
            .documented_by
            .iter()
            .filter(|id| metadata.iter().any(|m| &m.id == *id))
            .cloned()
            .collect();
        if !direct.is_empty() {
            return direct;
        }

        metadata
            .iter()
            .find(|m| {
                m.obsoletes
                    .as_ref()
                    .map_or(false, |previous| member.documented_by.contains(previous))
            })
            .map(|m| vec![m.id.clone()])
            .unwrap_or_default()
    }
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn is_modification_date(statement: &Statement) -> bool {
    statement.predicate == DC.term("modified") || statement.predicate == DCTERMS.term("modified")
}

impl ResourceMap {
    /// Rewrite the graph for `request` and emit it as RDF/XML.
    ///
    /// Fails with [`SerializationError`] if the rewrite or the emission
    /// fails; the graph and package identifier are then exactly as they
    /// were before the call, so the save can be retried.
    pub fn serialize(&mut self, request: &SaveRequest) -> Result<String, SerializationError> {
        self.write(request, false).map(|outcome| outcome.document)
    }

    /// Serialize with the pending provenance edits applied to the rewritten
    /// graph.
    ///
    /// The edit log is kept until [`ResourceMap::confirm_saved`] is called.
    /// A failed serialization also rolls back the applied edits.
    pub fn save(&mut self, request: &SaveRequest) -> Result<SaveOutcome, SerializationError> {
        self.write(request, true)
    }

    fn write(&mut self, request: &SaveRequest, apply_edits: bool) -> Result<SaveOutcome, SerializationError> {
        if request.new_id.trim().is_empty() || request.old_id.as_deref().map_or(false, |id| id.trim().is_empty()) {
            return Err(SerializationError::EmptyIdentifier);
        }

        let graph = self.graph.clone();
        let package_id = self.package_id.clone();
        let executions = self.executions.clone();

        let result = self.rewrite(request, apply_edits).and_then(|edits| {
            write_rdfxml(self.graph.statements(), self.graph.config().prefixes)
                .map(|document| SaveOutcome { document, edits })
        });

        match result {
            Ok(outcome) => {
                info!(
                    package = %request.new_id,
                    previous = request.old_id.as_deref().unwrap_or(""),
                    statements = self.graph.len(),
                    edits = outcome.edits.applied.len(),
                    "serialized resource map"
                );
                self.package_id = Some(request.new_id.clone());
                Ok(outcome)
            }
            Err(e) => {
                warn!(package = %request.new_id, error = %e, "serialization failed, restoring previous identity");
                self.graph = graph;
                self.package_id = package_id;
                self.executions = executions;
                Err(e)
            }
        }
    }

    /// Pending edits apply to the rebuilt graph, before blank node cleanup.
    fn rewrite(&mut self, request: &SaveRequest, apply_edits: bool) -> Result<EditReport, SerializationError> {
        match request.old_id.as_deref() {
            None => self.build_new(request),
            Some(old_id) => self.rewrite_identity(request, old_id)?,
        }
        let edits = if apply_edits {
            self.apply_pending_edits()
        } else {
            EditReport::default()
        };
        let removed = self.remove_orphaned_blank_nodes();
        if removed > 0 {
            debug!(removed, "removed dangling blank node references");
        }
        Ok(edits)
    }

    /// Build the graph for a package that has never been saved
    fn build_new(&mut self, request: &SaveRequest) {
        self.graph.clear();

        let resource_map = self.node_for(&request.new_id);
        let aggregation = Node::named(format!("{}#aggregation", resource_map.value()));

        let creator = Node::Blank(self.graph.blank_node());
        let name = request.creator.clone().unwrap_or_default();
        self.graph.add(creator.clone(), FOAF.term("name"), Node::literal(name));
        self.graph.add(creator.clone(), RDF.term("type"), DCTERMS.term("Agent"));
        self.graph.add(resource_map.clone(), DC.term("creator"), creator);

        self.graph.add(
            resource_map.clone(),
            DCTERMS.term("modified"),
            Node::typed_literal(now(), XSD.term("dateTime")),
        );
        self.graph.add(resource_map.clone(), RDF.term("type"), ORE.term("ResourceMap"));
        self.graph.add(resource_map.clone(), ORE.term("describes"), aggregation.clone());
        self.graph.add(
            resource_map.clone(),
            DCTERMS.term("identifier"),
            Node::literal(request.new_id.as_str()),
        );
        self.graph.add(aggregation.clone(), ORE.term("isDescribedBy"), resource_map);

        let plan = AggregationPlan::new(request, aggregation);
        for id in aggregated_ids(request) {
            self.add_to_aggregation(&id, &plan);
        }
    }

    fn rewrite_identity(&mut self, request: &SaveRequest, old_id: &str) -> Result<(), SerializationError> {
        let new_id = request.new_id.as_str();
        let base = self.graph.resolver_base_url(Some(old_id));

        self.graph.remove_many(None, Some(&ORE.term("describes")), None);
        self.graph.remove_many(None, Some(&ORE.term("isDescribedBy")), None);

        let old_aliases = AliasSet::new(old_id, &base, self.resolved_uri(old_id).as_deref());
        let old_aggregations: Vec<String> = old_aliases.with_suffix("#aggregation").collect();

        let live_ids = aggregated_ids(request);
        let known = self.known_spellings(&base);
        let added: Vec<String> = live_ids
            .iter()
            .filter(|id| !known.contains(id.as_str()) && !old_aliases.contains(id.as_str()))
            .cloned()
            .collect();

        let resource_map = self.replace_identifier_statement(old_id, new_id, &base);
        let aggregation = format!("{}#aggregation", resource_map);

        self.remove_stale_members(&live_ids, &base);
        self.rename_nodes(&old_aggregations, &aggregation, true, true);
        let old_spellings: Vec<String> = old_aliases.iter().map(str::to_string).collect();
        self.rename_nodes(&old_spellings, &resource_map, false, true);

        let resource_map = Node::named(resource_map);
        let aggregation = Node::named(aggregation);
        self.graph.add(resource_map.clone(), ORE.term("describes"), aggregation.clone());
        self.graph.add(aggregation.clone(), ORE.term("isDescribedBy"), resource_map);

        debug!(added = added.len(), "aggregating new members");
        let plan = AggregationPlan::new(request, aggregation);
        for id in &added {
            self.add_to_aggregation(id, &plan);
        }

        if old_id != new_id {
            self.check_no_stale_identity(old_id, &old_spellings, &old_aggregations)?;
        }
        Ok(())
    }

    /// Every spelling of every identifier already recorded in the graph
    fn known_spellings(&self, base: &str) -> HashSet<String> {
        let mut known = HashSet::new();
        for statement in self.graph.matching(None, Some(&DCTERMS.term("identifier")), None) {
            let value = statement.object.value();
            let encoded = encode_component(value);
            known.insert(format!("{}{}", base, encoded));
            known.insert(format!("{}{}", base, value));
            known.insert(encoded);
            known.insert(value.to_string());
        }
        known
    }

    /// Swap the package's identifier statement for one naming `new_id`.
    /// Returns the URI of the new resource map node.
    fn replace_identifier_statement(&mut self, old_id: &str, new_id: &str, base: &str) -> String {
        let fallback = format!("{}{}", base, encode_component(new_id));
        let existing = self
            .graph
            .matching(None, Some(&DCTERMS.term("identifier")), Some(&Node::literal(old_id)))
            .into_iter()
            .next();

        let uri = match existing {
            Some(statement) => {
                self.graph.remove_statement(&statement);
                match statement.subject.as_named() {
                    Some(subject) => {
                        replace_last(subject.as_str(), old_id, new_id)
                            .or_else(|| {
                                replace_last(
                                    subject.as_str(),
                                    &encode_component(old_id),
                                    &encode_component(new_id),
                                )
                            })
                            .unwrap_or(fallback)
                    }
                    None => fallback,
                }
            }
            None => fallback,
        };

        self.graph.add(
            Node::named(uri.as_str()),
            DCTERMS.term("identifier"),
            Node::literal(new_id),
        );
        uri
    }

    /// Drop every member that is aggregated in the graph but not live
    fn remove_stale_members(&mut self, live_ids: &[String], base: &str) {
        let live: Vec<AliasSet> = live_ids
            .iter()
            .map(|id| AliasSet::new(id, base, self.resolved_uri(id).as_deref()))
            .collect();

        let stale: Vec<Node> = self
            .graph
            .matching(None, Some(&ORE.term("isAggregatedBy")), None)
            .into_iter()
            .map(|st| st.subject)
            .filter(|subject| {
                subject
                    .as_named()
                    .map_or(false, |n| !live.iter().any(|aliases| aliases.contains(n.as_str())))
            })
            .collect();

        for node in stale {
            debug!(member = %node, "removing stale member");
            self.remove_node(&node);
        }
    }

    /// Replace every occurrence of the `old` spellings with `new`.
    ///
    /// With `literals`, plain, `xsd:string` and `xsd:anyURI` literals
    /// spelling an old node are rewritten too. With `touch_modified`,
    /// modification dates on the renamed subject are reset to now.
    fn rename_nodes(&mut self, old: &[String], new: &str, literals: bool, touch_modified: bool) {
        let is_old = |node: &Node| match node {
            Node::Named(n) => old.iter().any(|o| o == n.as_str()),
            Node::Literal(l) if literals => spells_uri(l) && old.iter().any(|o| *o == l.value),
            _ => false,
        };

        let affected: Vec<Statement> = self
            .graph
            .statements()
            .iter()
            .filter(|st| is_old(&st.subject) || is_old(&st.object))
            .cloned()
            .collect();
        if affected.is_empty() {
            return;
        }

        let timestamp = now();
        for statement in affected {
            self.graph.remove_statement(&statement);
            let subject_renamed = is_old(&statement.subject);
            let subject = if subject_renamed {
                statement.subject.with_value(new)
            } else {
                statement.subject.clone()
            };
            let object = if is_old(&statement.object) {
                statement.object.with_value(new)
            } else if touch_modified && subject_renamed && is_modification_date(&statement) {
                statement.object.with_value(timestamp.as_str())
            } else {
                statement.object.clone()
            };
            self.graph.add(subject, statement.predicate.clone(), object);
        }
    }

    fn check_no_stale_identity(
        &self,
        old_id: &str,
        old_spellings: &[String],
        old_aggregations: &[String],
    ) -> Result<(), SerializationError> {
        let identifier = DCTERMS.term("identifier");
        for statement in self.graph.statements() {
            for node in [&statement.subject, &statement.object] {
                let stale = match node {
                    Node::Named(n) => {
                        old_spellings.iter().chain(old_aggregations).any(|s| s == n.as_str())
                    }
                    Node::Literal(l) => {
                        (statement.predicate == identifier && l.value == old_id)
                            || (spells_uri(l) && old_aggregations.iter().any(|s| *s == l.value))
                    }
                    Node::Blank(_) => false,
                };
                if stale {
                    return Err(SerializationError::StaleIdentity {
                        alias: node.value().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Aggregate one member and write its documentation statements.
    ///
    /// Every assertion is skipped when already present, so aggregating the
    /// same member twice leaves the graph unchanged.
    fn add_to_aggregation(&mut self, id: &str, plan: &AggregationPlan<'_>) {
        let member_node = self.node_for(id);
        self.graph
            .add(member_node.clone(), ORE.term("isAggregatedBy"), plan.aggregation.clone());
        self.graph
            .add(plan.aggregation.clone(), ORE.term("aggregates"), member_node.clone());
        self.graph
            .add(member_node.clone(), DCTERMS.term("identifier"), Node::literal(id));

        // Child packages carry no documentation
        let Some(member) = plan.request.member(id) else {
            return;
        };

        for metadata_id in plan.live_documenters(member) {
            let metadata_node = self.node_for(&metadata_id);
            self.add_documentation(&metadata_node, &member_node);
        }

        let mut documents = member.documents.clone();
        if plan.documents_itself(member) {
            push_unique(&mut documents, member.id.clone());
        }
        for data_id in documents.iter().filter(|d| plan.is_live(d)) {
            let data_node = self.node_for(data_id);
            self.add_documentation(&member_node, &data_node);
        }
    }

    fn add_documentation(&mut self, metadata: &Node, data: &Node) {
        self.graph.add(metadata.clone(), CITO.term("documents"), data.clone());
        self.graph.add(data.clone(), CITO.term("isDocumentedBy"), metadata.clone());
    }

    /// Remove a member and every statement mentioning it
    pub fn remove_from_aggregation(&mut self, id: &str) -> usize {
        let node = self.node_for(id);
        self.remove_node(&node)
    }

    fn remove_node(&mut self, node: &Node) -> usize {
        self.graph.remove_many(Some(node), None, None) + self.graph.remove_many(None, None, Some(node))
    }

    /// Remove statements pointing at blank nodes that are never described.
    ///
    /// Repeats until no dangling reference is left, since removing one can
    /// leave its own referrer dangling.
    pub fn remove_orphaned_blank_nodes(&mut self) -> usize {
        let mut removed = 0;
        loop {
            let described: HashSet<&Node> = self
                .graph
                .statements()
                .iter()
                .filter(|st| st.subject.is_blank())
                .map(|st| &st.subject)
                .collect();
            let orphaned: Vec<Statement> = self
                .graph
                .statements()
                .iter()
                .filter(|st| st.object.is_blank() && !described.contains(&st.object))
                .cloned()
                .collect();
            if orphaned.is_empty() {
                return removed;
            }
            for statement in &orphaned {
                self.graph.remove_statement(statement);
            }
            removed += orphaned.len();
        }
    }
}

/// Literals that can carry a URI as their text. `xsd:string` is stored
/// without a datatype.
fn spells_uri(literal: &Literal) -> bool {
    match &literal.datatype {
        None => true,
        Some(datatype) => *datatype == XSD.term("anyURI"),
    }
}

/// Live member ids followed by child package ids, without duplicates
fn aggregated_ids(request: &SaveRequest) -> Vec<String> {
    let mut ids = request.member_ids();
    for child in &request.child_packages {
        push_unique(&mut ids, child.clone());
    }
    ids
}

/// Replace the last occurrence of `needle` in `haystack`
fn replace_last(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    haystack.rfind(needle).map(|pos| {
        format!(
            "{}{}{}",
            &haystack[..pos],
            replacement,
            &haystack[pos + needle.len()..]
        )
    })
}

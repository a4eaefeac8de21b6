//! Provenance extraction
//!
//! The extractor runs the query battery and streams each solution to a
//! [`ProvenanceSink`], followed by one completion signal once every query
//! has finished.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, warn};

use super::fields::ProvField;
use super::queries::query_for;
use crate::graph::Graph;
use crate::package::ResourceMap;

/// A provenance field value: another member of this package, or an opaque
/// value such as an agent or a class IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProvValue {
    Member(String),
    Value(String),
}

impl ProvValue {
    pub fn as_str(&self) -> &str {
        match self {
            ProvValue::Member(id) | ProvValue::Value(id) => id,
        }
    }

    pub fn member(&self) -> Option<&str> {
        match self {
            ProvValue::Member(id) => Some(id),
            ProvValue::Value(_) => None,
        }
    }
}

/// One (member, field, value) result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProvSolution {
    pub member: String,
    pub field: ProvField,
    pub value: ProvValue,
}

/// Receives extraction results as they are produced
pub trait ProvenanceSink {
    fn on_solution(&mut self, solution: ProvSolution);

    /// A query finished; called once per field whether it succeeded or not
    fn on_query_done(&mut self, _field: ProvField) {}

    /// Every query finished; called exactly once
    fn on_complete(&mut self);
}

/// Extraction output as a flat event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ProvEvent {
    Solution(ProvSolution),
    QueryDone(ProvField),
    Complete,
}

impl ProvenanceSink for Vec<ProvEvent> {
    fn on_solution(&mut self, solution: ProvSolution) {
        self.push(ProvEvent::Solution(solution));
    }

    fn on_query_done(&mut self, field: ProvField) {
        self.push(ProvEvent::QueryDone(field));
    }

    fn on_complete(&mut self) {
        self.push(ProvEvent::Complete);
    }
}

/// Provenance recorded on one member
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MemberProvenance {
    /// Members this one came from
    pub prov_sources: Vec<String>,
    /// Members that came from this one
    pub prov_derivations: Vec<String>,
    pub fields: BTreeMap<ProvField, Vec<ProvValue>>,
}

impl MemberProvenance {
    /// Values recorded for `field`
    pub fn values(&self, field: ProvField) -> &[ProvValue] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Package-level accumulation of extraction results
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackageProvenance {
    /// Members that are a source of some other member
    pub sources: Vec<String>,
    /// Members derived from some other member
    pub derivations: Vec<String>,
    pub members: BTreeMap<String, MemberProvenance>,
    pub complete: bool,
}

impl PackageProvenance {
    pub fn member(&self, id: &str) -> Option<&MemberProvenance> {
        self.members.get(id)
    }
}

fn push_unique<T: PartialEq>(list: &mut Vec<T>, value: T) {
    if !list.contains(&value) {
        list.push(value);
    }
}

impl ProvenanceSink for PackageProvenance {
    fn on_solution(&mut self, solution: ProvSolution) {
        let ProvSolution { member, field, value } = solution;
        let entry = self.members.entry(member).or_default();

        if let Some(related) = value.member() {
            if field.is_source() {
                push_unique(&mut self.sources, related.to_string());
                push_unique(&mut entry.prov_sources, related.to_string());
            } else if field.is_derivation() {
                push_unique(&mut self.derivations, related.to_string());
                push_unique(&mut entry.prov_derivations, related.to_string());
            }
        }

        push_unique(entry.fields.entry(field).or_default(), value);
    }

    fn on_complete(&mut self) {
        self.complete = true;
    }
}

/// Runs the provenance query battery against one graph
#[derive(Debug)]
pub struct ProvenanceExtractor<'a> {
    graph: &'a Graph,
    members: &'a [String],
    outstanding: usize,
}

impl<'a> ProvenanceExtractor<'a> {
    /// `members` are the ids of this package's members; solutions about
    /// anything else are skipped
    pub fn new(graph: &'a Graph, members: &'a [String]) -> Self {
        Self {
            graph,
            members,
            outstanding: ProvField::ALL.len(),
        }
    }

    /// Queries not yet finished
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn is_complete(&self) -> bool {
        self.outstanding == 0
    }

    fn is_member(&self, id: &str) -> bool {
        self.members.iter().any(|m| m == id)
    }

    /// Run every query, in order. Does nothing if already complete.
    pub fn run<S: ProvenanceSink + ?Sized>(&mut self, sink: &mut S) {
        if self.is_complete() {
            return;
        }
        for field in ProvField::ALL {
            self.run_query(field, sink);
        }
    }

    fn run_query<S: ProvenanceSink + ?Sized>(&mut self, field: ProvField, sink: &mut S) {
        match query_for(field).execute(self.graph) {
            Ok(solutions) => {
                debug!(field = %field, solutions = solutions.len(), "provenance query finished");
                for solution in solutions {
                    let (Some(pid), Some(value)) = (solution.get("pid"), solution.get("value")) else {
                        continue;
                    };
                    let pid = pid.value();
                    if !self.is_member(pid) {
                        warn!(field = %field, pid, "skipping provenance for an object outside this package");
                        continue;
                    }
                    let value = value.value();
                    let value = if self.is_member(value) {
                        ProvValue::Member(value.to_string())
                    } else {
                        ProvValue::Value(value.to_string())
                    };
                    sink.on_solution(ProvSolution {
                        member: pid.to_string(),
                        field,
                        value,
                    });
                }
            }
            Err(e) => {
                warn!(field = %field, error = %e, "provenance query failed, skipping");
            }
        }

        self.outstanding -= 1;
        sink.on_query_done(field);
        if self.outstanding == 0 {
            debug!("provenance extraction complete");
            sink.on_complete();
        }
    }
}

/// Forwards to another sink, remembering which execution ran each program
struct ExecutionCache<'s, S: ?Sized> {
    inner: &'s mut S,
    executions: &'s mut BTreeMap<String, String>,
}

impl<S: ProvenanceSink + ?Sized> ProvenanceSink for ExecutionCache<'_, S> {
    fn on_solution(&mut self, solution: ProvSolution) {
        if solution.field == ProvField::WasExecutedByExecution {
            self.executions
                .entry(solution.member.clone())
                .or_insert_with(|| solution.value.as_str().to_string());
        }
        self.inner.on_solution(solution);
    }

    fn on_query_done(&mut self, field: ProvField) {
        self.inner.on_query_done(field);
    }

    fn on_complete(&mut self) {
        self.inner.on_complete();
    }
}

impl ResourceMap {
    /// Extract provenance for `members` into `sink`.
    ///
    /// Execution ids discovered on the way are cached for the edit engine.
    pub fn extract_provenance<S: ProvenanceSink + ?Sized>(&mut self, members: &[String], sink: &mut S) {
        let mut cache = ExecutionCache {
            inner: sink,
            executions: &mut self.executions,
        };
        ProvenanceExtractor::new(&self.graph, members).run(&mut cache);
    }

    /// Extract provenance for `members` and accumulate it per member
    pub fn provenance(&mut self, members: &[String]) -> PackageProvenance {
        let mut provenance = PackageProvenance::default();
        self.extract_provenance(members, &mut provenance);
        provenance
    }
}

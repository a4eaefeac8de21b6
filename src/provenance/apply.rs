//! Applying provenance edits to the graph
//!
//! Each simplified edit expands into the full PROV/PROVONE statement set.
//! Deletions only remove auxiliary statements (types, executions,
//! associations) once nothing else in the graph relies on them.

use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use super::edit::{EditOp, ProvEdit, ProvPredicate, Recorded};
use crate::error::EditConflictError;
use crate::graph::{NamedNode, Node, Statement, DCTERMS, PROV, PROVONE, RDF};
use crate::package::ResourceMap;

/// An edit that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEdit {
    pub edit: ProvEdit,
    pub error: EditConflictError,
}

/// Outcome of applying the pending edit log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditReport {
    pub applied: Vec<ProvEdit>,
    pub skipped: Vec<SkippedEdit>,
}

impl EditReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Predicates that keep an execution alive
fn execution_references() -> [(NamedNode, bool); 5] {
    // (predicate, execution is the subject)
    [
        (PROV.term("used"), true),
        (PROV.term("wasGeneratedBy"), false),
        (PROV.term("qualifiedGeneration"), true),
        (PROV.term("wasInformedBy"), false),
        (PROV.term("wasPartOf"), false),
    ]
}

impl ResourceMap {
    /// Record an edit from the editor
    pub fn record(&mut self, edit: ProvEdit) -> Recorded {
        let recorded = self.edits.record(edit);
        debug!(?recorded, pending = self.edits.len(), "recorded provenance edit");
        recorded
    }

    /// Record an edit given in the editor's string form
    pub fn record_edit(
        &mut self,
        op: &str,
        subject: &str,
        predicate: &str,
        object: &str,
    ) -> Result<Recorded, EditConflictError> {
        Ok(self.record(ProvEdit::parse(op, subject, predicate, object)?))
    }

    pub fn has_pending_edits(&self) -> bool {
        !self.edits.is_empty()
    }

    pub fn pending_edits(&self) -> &[ProvEdit] {
        self.edits.entries()
    }

    /// Forget pending edits once the caller knows the save succeeded
    pub fn confirm_saved(&mut self) {
        self.edits.clear();
    }

    /// Apply every pending edit in log order.
    ///
    /// Edits that cannot be applied are skipped and reported. The log is
    /// left intact; see [`ResourceMap::confirm_saved`].
    pub fn apply_pending_edits(&mut self) -> EditReport {
        let mut report = EditReport::default();
        let pending = self.edits.entries().to_vec();
        for edit in pending {
            match self.apply_edit(&edit) {
                Ok(()) => report.applied.push(edit),
                Err(error) => {
                    warn!(edit = %edit, error = %error, "skipping provenance edit");
                    report.skipped.push(SkippedEdit { edit, error });
                }
            }
        }
        debug!(
            applied = report.applied.len(),
            skipped = report.skipped.len(),
            "applied provenance edits"
        );
        report
    }

    fn apply_edit(&mut self, edit: &ProvEdit) -> Result<(), EditConflictError> {
        if edit.subject.trim().is_empty() || edit.object.trim().is_empty() {
            return Err(EditConflictError::EmptyIdentifier);
        }

        match edit.predicate {
            ProvPredicate::WasDerivedFrom => {
                self.apply_derivation(edit.op, &edit.subject, &edit.object);
                Ok(())
            }
            ProvPredicate::HasDerivations => {
                self.apply_derivation(edit.op, &edit.object, &edit.subject);
                Ok(())
            }
            ProvPredicate::GeneratedByProgram => {
                self.apply_program_relation(edit.op, &edit.subject, &edit.object, PROV.term("wasGeneratedBy"))
            }
            ProvPredicate::UsedByProgram => {
                self.apply_program_relation(edit.op, &edit.subject, &edit.object, PROV.term("used"))
            }
            ProvPredicate::InstanceOfClass => {
                let subject = self.node_for(&edit.subject);
                let class = PROVONE.term(&edit.object);
                match edit.op {
                    EditOp::Add => {
                        self.graph.add(subject, RDF.term("type"), class);
                    }
                    EditOp::Delete => {
                        self.remove_if_last_ref(&subject, &RDF.term("type"), &Node::Named(class));
                    }
                }
                Ok(())
            }
        }
    }

    fn apply_derivation(&mut self, op: EditOp, derived_id: &str, source_id: &str) {
        let derived = self.node_for(derived_id);
        let source = self.node_for(source_id);
        let rdf_type = RDF.term("type");
        let data = Node::Named(PROVONE.term("Data"));

        match op {
            EditOp::Add => {
                self.graph.add(source.clone(), rdf_type.clone(), data.clone());
                self.graph.add(derived.clone(), rdf_type, data);
                self.graph.add(derived, PROV.term("wasDerivedFrom"), source);
            }
            EditOp::Delete => {
                self.graph.remove_statement(&Statement::new(
                    derived.clone(),
                    PROV.term("wasDerivedFrom"),
                    source.clone(),
                ));
                self.remove_if_last_ref(&source, &rdf_type, &data);
                self.remove_if_last_ref(&derived, &rdf_type, &data);
            }
        }
    }

    /// `relation` is `prov:wasGeneratedBy` (data to execution) or
    /// `prov:used` (execution to data)
    fn apply_program_relation(
        &mut self,
        op: EditOp,
        data_id: &str,
        program_id: &str,
        relation: NamedNode,
    ) -> Result<(), EditConflictError> {
        let data_node = self.node_for(data_id);
        let generated = relation == PROV.term("wasGeneratedBy");
        let rdf_type = RDF.term("type");
        let data_class = Node::Named(PROVONE.term("Data"));

        match op {
            EditOp::Add => {
                let execution = self.add_program_to_graph(program_id);
                self.graph.add(data_node.clone(), rdf_type, data_class);
                if generated {
                    self.graph.add(data_node, relation, execution);
                } else {
                    self.graph.add(execution, relation, data_node);
                }
            }
            EditOp::Delete => {
                let execution = self.find_execution_node(program_id).ok_or_else(|| {
                    EditConflictError::UnresolvedExecution {
                        program: program_id.to_string(),
                    }
                })?;
                let statement = if generated {
                    Statement::new(data_node.clone(), relation, execution)
                } else {
                    Statement::new(execution, relation, data_node.clone())
                };
                self.graph.remove_statement(&statement);
                self.remove_program_from_graph(program_id);
                self.remove_if_last_ref(&data_node, &rdf_type, &data_class);
            }
        }
        Ok(())
    }

    /// Delete a statement unless its subject still takes part in another
    /// PROV or PROVONE statement. Returns true if it was deleted.
    pub fn remove_if_last_ref(&mut self, subject: &Node, predicate: &NamedNode, object: &Node) -> bool {
        let target = Statement::new(subject.clone(), predicate.clone(), object.clone());
        let still_referenced = self.graph.statements().iter().any(|st| {
            st != &target
                && (&st.subject == subject || &st.object == subject)
                && (PROV.contains(&st.predicate) || PROVONE.contains(&st.predicate))
        });
        if still_referenced {
            debug!(statement = %target, "keeping statement still referenced by provenance");
            return false;
        }
        self.graph.remove_statement(&target)
    }

    /// The execution id that ran `program_id`: the cached id, else the
    /// identifier of the execution found by tracing the program's
    /// association back through the graph
    pub fn find_execution_for_program(&mut self, program_id: &str) -> Option<String> {
        if let Some(id) = self.executions.get(program_id) {
            return Some(id.clone());
        }
        let execution = self.trace_execution(program_id)?;
        let id = self
            .graph
            .matching(Some(&execution), Some(&DCTERMS.term("identifier")), None)
            .into_iter()
            .next()
            .map(|st| st.object.value().to_string())
            .unwrap_or_else(|| execution.value().to_string());
        Some(id)
    }

    fn find_execution_node(&mut self, program_id: &str) -> Option<Node> {
        match self.executions.get(program_id).cloned() {
            Some(id) => Some(self.execution_node(&id)),
            None => self.trace_execution(program_id),
        }
    }

    /// Follow `?association prov:hadPlan program` and
    /// `?execution prov:qualifiedAssociation ?association`
    fn trace_execution(&mut self, program_id: &str) -> Option<Node> {
        let program = self.node_for(program_id);
        let associations = self.graph.matching(None, Some(&PROV.term("hadPlan")), Some(&program));
        associations.into_iter().find_map(|association| {
            self.graph
                .matching(None, Some(&PROV.term("qualifiedAssociation")), Some(&association.subject))
                .into_iter()
                .next()
                .map(|st| st.subject)
        })
    }

    /// The node an execution id is written as: the bare id if the graph
    /// already uses it as a subject, else the usual member URI
    fn execution_node(&mut self, execution_id: &str) -> Node {
        let bare = Node::named(execution_id);
        if self.graph.has_match(Some(&bare), None, None) {
            return bare;
        }
        self.node_for(execution_id)
    }

    /// Find or create the execution and association for a program.
    /// Returns the execution node.
    pub fn add_program_to_graph(&mut self, program_id: &str) -> Node {
        let (execution_id, execution) = match self.find_execution_for_program(program_id) {
            Some(id) => {
                let node = self.find_execution_node(program_id).unwrap_or_else(|| self.execution_node(&id));
                (id, node)
            }
            None => {
                let id = format!("urn:uuid:{}", Uuid::new_v4());
                debug!(program = program_id, execution = %id, "created execution");
                let node = self.execution_node(&id);
                (id, node)
            }
        };
        self.executions.insert(program_id.to_string(), execution_id.clone());

        let association = self
            .graph
            .matching(Some(&execution), Some(&PROV.term("qualifiedAssociation")), None)
            .into_iter()
            .next()
            .map(|st| st.object)
            .unwrap_or_else(|| Node::Blank(self.graph.blank_node()));
        let program = self.node_for(program_id);

        self.graph
            .add(execution.clone(), PROV.term("qualifiedAssociation"), association.clone());
        self.graph
            .add(execution.clone(), RDF.term("type"), PROVONE.term("Execution"));
        self.graph
            .add(execution.clone(), DCTERMS.term("identifier"), Node::literal(execution_id));
        self.graph.add(association, PROV.term("hadPlan"), program.clone());
        self.graph.add(program, RDF.term("type"), PROVONE.term("Program"));
        execution
    }

    /// Remove a program's execution and association unless the execution is
    /// still used, generates something, or is part of a larger activity.
    /// Returns true if anything was removed.
    pub fn remove_program_from_graph(&mut self, program_id: &str) -> bool {
        let Some(execution) = self.find_execution_node(program_id) else {
            return false;
        };
        let program = self.node_for(program_id);
        if !self.graph.has_match(None, None, Some(&program)) {
            return false;
        }

        for (predicate, execution_is_subject) in execution_references() {
            let referenced = if execution_is_subject {
                self.graph.has_match(Some(&execution), Some(&predicate), None)
            } else {
                self.graph.has_match(None, Some(&predicate), Some(&execution))
            };
            if referenced {
                debug!(program = program_id, via = %predicate, "execution still referenced, keeping program");
                return false;
            }
        }

        let has_plan = PROV.term("hadPlan");
        let association = self
            .graph
            .matching(Some(&execution), Some(&PROV.term("qualifiedAssociation")), None)
            .into_iter()
            .map(|st| st.object)
            .find(|a| self.graph.has_match(Some(a), Some(&has_plan), Some(&program)))
            .or_else(|| {
                self.graph
                    .matching(None, Some(&has_plan), Some(&program))
                    .into_iter()
                    .next()
                    .map(|st| st.subject)
            });

        let rdf_type = RDF.term("type");
        self.graph.remove_many(
            Some(&program),
            Some(&rdf_type),
            Some(&Node::Named(PROVONE.term("Program"))),
        );
        if let Some(association) = &association {
            self.graph.remove_many(Some(association), Some(&has_plan), Some(&program));
            self.graph.remove_many(
                Some(association),
                Some(&rdf_type),
                Some(&Node::Named(PROV.term("Association"))),
            );
            self.graph.remove_many(Some(association), Some(&PROV.term("agent")), None);
            self.graph.remove_many(
                Some(&execution),
                Some(&PROV.term("qualifiedAssociation")),
                Some(association),
            );
        }
        self.graph.remove_many(
            Some(&execution),
            Some(&rdf_type),
            Some(&Node::Named(PROVONE.term("Execution"))),
        );
        self.graph
            .remove_many(Some(&execution), Some(&DCTERMS.term("identifier")), None);

        self.executions.remove(program_id);
        debug!(program = program_id, "removed program execution");
        true
    }
}

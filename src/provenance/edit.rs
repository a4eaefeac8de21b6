//! Provenance edits in the simplified vocabulary
//!
//! The editor speaks a simplified model where a program directly uses and
//! generates data. Edits are logged here and only expanded into the full
//! PROV/PROVONE statements when applied.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::EditConflictError;

/// Edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditOp {
    Add,
    Delete,
}

impl EditOp {
    /// The operation that cancels this one
    pub fn opposite(&self) -> EditOp {
        match self {
            EditOp::Add => EditOp::Delete,
            EditOp::Delete => EditOp::Add,
        }
    }
}

impl fmt::Display for EditOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOp::Add => f.write_str("add"),
            EditOp::Delete => f.write_str("delete"),
        }
    }
}

impl FromStr for EditOp {
    type Err = EditConflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "add" => Ok(EditOp::Add),
            "delete" | "remove" => Ok(EditOp::Delete),
            _ => Err(EditConflictError::UnknownOperation(s.to_string())),
        }
    }
}

/// Relationships the editor can add or delete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProvPredicate {
    /// subject was derived from object
    #[serde(rename = "prov_wasDerivedFrom")]
    WasDerivedFrom,
    /// subject has object as a derivation
    #[serde(rename = "prov_hasDerivations")]
    HasDerivations,
    /// subject was generated by program object
    #[serde(rename = "prov_generatedByProgram")]
    GeneratedByProgram,
    /// subject was used by program object
    #[serde(rename = "prov_usedByProgram")]
    UsedByProgram,
    /// subject is an instance of the PROVONE class named by object
    #[serde(rename = "prov_instanceOfClass")]
    InstanceOfClass,
}

impl ProvPredicate {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProvPredicate::WasDerivedFrom => "prov_wasDerivedFrom",
            ProvPredicate::HasDerivations => "prov_hasDerivations",
            ProvPredicate::GeneratedByProgram => "prov_generatedByProgram",
            ProvPredicate::UsedByProgram => "prov_usedByProgram",
            ProvPredicate::InstanceOfClass => "prov_instanceOfClass",
        }
    }
}

impl fmt::Display for ProvPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvPredicate {
    type Err = EditConflictError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prov_wasDerivedFrom" => Ok(ProvPredicate::WasDerivedFrom),
            "prov_hasDerivations" => Ok(ProvPredicate::HasDerivations),
            "prov_generatedByProgram" => Ok(ProvPredicate::GeneratedByProgram),
            "prov_usedByProgram" => Ok(ProvPredicate::UsedByProgram),
            "prov_instanceOfClass" => Ok(ProvPredicate::InstanceOfClass),
            _ => Err(EditConflictError::UnknownPredicate(s.to_string())),
        }
    }
}

/// One recorded edit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProvEdit {
    pub op: EditOp,
    pub subject: String,
    pub predicate: ProvPredicate,
    pub object: String,
}

impl ProvEdit {
    pub fn new(op: EditOp, subject: impl Into<String>, predicate: ProvPredicate, object: impl Into<String>) -> Self {
        Self {
            op,
            subject: subject.into(),
            predicate,
            object: object.into(),
        }
    }

    /// Parse an edit from the editor's string form
    pub fn parse(op: &str, subject: &str, predicate: &str, object: &str) -> Result<Self, EditConflictError> {
        Ok(Self::new(op.parse()?, subject, predicate.parse()?, object))
    }

    /// True when `other` is the same triple with the opposite operation
    pub fn cancels(&self, other: &ProvEdit) -> bool {
        self.op == other.op.opposite()
            && self.subject == other.subject
            && self.predicate == other.predicate
            && self.object == other.object
    }
}

impl fmt::Display for ProvEdit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.op, self.subject, self.predicate, self.object)
    }
}

/// What recording an edit did to the log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recorded {
    Appended,
    /// The identical edit was already pending
    Duplicate,
    /// A pending opposite edit was removed instead
    Cancelled,
}

/// Ordered log of pending edits.
///
/// No two entries are identical and no entry is pending alongside its
/// opposite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EditLog {
    entries: Vec<ProvEdit>,
}

impl EditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, edit: ProvEdit) -> Recorded {
        if self.entries.contains(&edit) {
            return Recorded::Duplicate;
        }
        if let Some(pos) = self.entries.iter().position(|pending| pending.cancels(&edit)) {
            self.entries.remove(pos);
            return Recorded::Cancelled;
        }
        self.entries.push(edit);
        Recorded::Appended
    }

    pub fn entries(&self) -> &[ProvEdit] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

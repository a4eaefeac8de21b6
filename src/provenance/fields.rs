//! Provenance fields
//!
//! Each field names one relationship the extractor reports for a member and
//! is backed by exactly one pattern query.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A provenance field reported on package members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ProvField {
    #[serde(rename = "prov_wasDerivedFrom")]
    WasDerivedFrom,
    #[serde(rename = "prov_generated")]
    Generated,
    #[serde(rename = "prov_wasInformedBy")]
    WasInformedBy,
    #[serde(rename = "prov_used")]
    Used,
    #[serde(rename = "prov_generatedByProgram")]
    GeneratedByProgram,
    #[serde(rename = "prov_generatedByExecution")]
    GeneratedByExecution,
    #[serde(rename = "prov_generatedByUser")]
    GeneratedByUser,
    #[serde(rename = "prov_usedByProgram")]
    UsedByProgram,
    #[serde(rename = "prov_usedByExecution")]
    UsedByExecution,
    #[serde(rename = "prov_usedByUser")]
    UsedByUser,
    #[serde(rename = "prov_wasExecutedByExecution")]
    WasExecutedByExecution,
    #[serde(rename = "prov_wasExecutedByUser")]
    WasExecutedByUser,
    #[serde(rename = "prov_hasDerivations")]
    HasDerivations,
    #[serde(rename = "prov_instanceOfClass")]
    InstanceOfClass,
}

impl ProvField {
    /// Every field, in the order the queries run
    pub const ALL: [ProvField; 14] = [
        ProvField::WasDerivedFrom,
        ProvField::Generated,
        ProvField::WasInformedBy,
        ProvField::Used,
        ProvField::GeneratedByProgram,
        ProvField::GeneratedByExecution,
        ProvField::GeneratedByUser,
        ProvField::UsedByProgram,
        ProvField::UsedByExecution,
        ProvField::UsedByUser,
        ProvField::WasExecutedByExecution,
        ProvField::WasExecutedByUser,
        ProvField::HasDerivations,
        ProvField::InstanceOfClass,
    ];

    /// Fields pointing upstream, at what a member came from
    pub const SOURCE_FIELDS: [ProvField; 5] = [
        ProvField::GeneratedByExecution,
        ProvField::GeneratedByProgram,
        ProvField::Used,
        ProvField::WasDerivedFrom,
        ProvField::WasInformedBy,
    ];

    /// Fields pointing downstream, at what came from a member
    pub const DERIVATION_FIELDS: [ProvField; 4] = [
        ProvField::UsedByExecution,
        ProvField::UsedByProgram,
        ProvField::HasDerivations,
        ProvField::Generated,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProvField::WasDerivedFrom => "prov_wasDerivedFrom",
            ProvField::Generated => "prov_generated",
            ProvField::WasInformedBy => "prov_wasInformedBy",
            ProvField::Used => "prov_used",
            ProvField::GeneratedByProgram => "prov_generatedByProgram",
            ProvField::GeneratedByExecution => "prov_generatedByExecution",
            ProvField::GeneratedByUser => "prov_generatedByUser",
            ProvField::UsedByProgram => "prov_usedByProgram",
            ProvField::UsedByExecution => "prov_usedByExecution",
            ProvField::UsedByUser => "prov_usedByUser",
            ProvField::WasExecutedByExecution => "prov_wasExecutedByExecution",
            ProvField::WasExecutedByUser => "prov_wasExecutedByUser",
            ProvField::HasDerivations => "prov_hasDerivations",
            ProvField::InstanceOfClass => "prov_instanceOfClass",
        }
    }

    pub fn is_source(&self) -> bool {
        Self::SOURCE_FIELDS.contains(self)
    }

    pub fn is_derivation(&self) -> bool {
        Self::DERIVATION_FIELDS.contains(self)
    }
}

impl fmt::Display for ProvField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProvField {
    type Err = String;

    /// Accepts the field name with or without its `prov_` prefix
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.strip_prefix("prov_").unwrap_or(s);
        ProvField::ALL
            .iter()
            .copied()
            .find(|field| &field.as_str()["prov_".len()..] == name)
            .ok_or_else(|| format!("unknown provenance field: {}", s))
    }
}

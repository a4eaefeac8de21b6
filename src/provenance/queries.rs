//! The fixed provenance query battery
//!
//! Every query projects `?pid`, the identifier of the member the field is
//! reported on, and `?value`, the field value.

use super::fields::ProvField;
use crate::graph::{DCTERMS, PROV, RDF};
use crate::query::{var, SelectQuery};

/// The pattern query backing `field`
pub fn query_for(field: ProvField) -> SelectQuery {
    let id = || DCTERMS.term("identifier");
    let query = SelectQuery::new(field.as_str());

    let query = match field {
        ProvField::WasDerivedFrom => query
            .with_pattern(var("derived"), PROV.term("wasDerivedFrom"), var("primary"))
            .with_pattern(var("derived"), id(), var("pid"))
            .with_pattern(var("primary"), id(), var("value")),

        ProvField::Generated => query
            .with_pattern(var("result"), PROV.term("wasGeneratedBy"), var("activity"))
            .with_pattern(var("activity"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("result"), id(), var("value"))
            .with_pattern(var("program"), id(), var("pid")),

        ProvField::WasInformedBy => query
            .with_pattern(var("activity"), PROV.term("wasInformedBy"), var("previous"))
            .with_pattern(var("activity"), id(), var("pid"))
            .with_pattern(var("previous"), id(), var("value")),

        ProvField::Used => query
            .with_pattern(var("activity"), PROV.term("used"), var("data"))
            .with_pattern(var("activity"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("program"), id(), var("pid"))
            .with_pattern(var("data"), id(), var("value")),

        ProvField::GeneratedByProgram => query
            .with_pattern(var("derived"), PROV.term("wasGeneratedBy"), var("execution"))
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("program"), id(), var("value"))
            .with_pattern(var("derived"), id(), var("pid")),

        ProvField::GeneratedByExecution => query
            .with_pattern(var("derived"), PROV.term("wasGeneratedBy"), var("execution"))
            .with_pattern(var("execution"), id(), var("value"))
            .with_pattern(var("derived"), id(), var("pid")),

        ProvField::GeneratedByUser => query
            .with_pattern(var("derived"), PROV.term("wasGeneratedBy"), var("execution"))
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("agent"), var("value"))
            .with_pattern(var("derived"), id(), var("pid")),

        ProvField::UsedByProgram => query
            .with_pattern(var("execution"), PROV.term("used"), var("primary"))
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("program"), id(), var("value"))
            .with_pattern(var("primary"), id(), var("pid")),

        ProvField::UsedByExecution => query
            .with_pattern(var("execution"), PROV.term("used"), var("primary"))
            .with_pattern(var("primary"), id(), var("pid"))
            .with_pattern(var("execution"), id(), var("value")),

        ProvField::UsedByUser => query
            .with_pattern(var("execution"), PROV.term("used"), var("primary"))
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("agent"), var("value"))
            .with_pattern(var("primary"), id(), var("pid")),

        ProvField::WasExecutedByExecution => query
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("execution"), id(), var("value"))
            .with_pattern(var("program"), id(), var("pid")),

        ProvField::WasExecutedByUser => query
            .with_pattern(var("execution"), PROV.term("qualifiedAssociation"), var("association"))
            .with_pattern(var("association"), PROV.term("hadPlan"), var("program"))
            .with_pattern(var("association"), PROV.term("agent"), var("value"))
            .with_pattern(var("program"), id(), var("pid")),

        ProvField::HasDerivations => query
            .with_pattern(var("derived"), PROV.term("wasDerivedFrom"), var("source"))
            .with_pattern(var("source"), id(), var("pid"))
            .with_pattern(var("derived"), id(), var("value")),

        ProvField::InstanceOfClass => query
            .with_pattern(var("subject"), RDF.term("type"), var("value"))
            .with_pattern(var("subject"), id(), var("pid")),
    };

    query.select(&["pid", "value"])
}

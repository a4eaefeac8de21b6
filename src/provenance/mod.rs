//! Provenance: extraction from the graph and edits back into it
//!
//! Extraction runs a fixed battery of pattern queries and reports, per
//! member, the simplified provenance fields an editor works with. Edits
//! made in that simplified vocabulary are logged and later expanded into
//! full PROV/PROVONE statements.

mod apply;
mod edit;
mod extract;
mod fields;
mod queries;

pub use apply::{EditReport, SkippedEdit};
pub use edit::{EditLog, EditOp, ProvEdit, ProvPredicate, Recorded};
pub use extract::{
    MemberProvenance, PackageProvenance, ProvEvent, ProvSolution, ProvValue, ProvenanceExtractor,
    ProvenanceSink,
};
pub use fields::ProvField;
pub use queries::query_for;

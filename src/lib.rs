//! oremap: OAI-ORE resource map graph engine
//!
//! Keeps the resource map of one data package as an in-memory graph of
//! statements, and supports the full life of that map: parsing it from
//! RDF/XML, reading membership and PROV/PROVONE provenance out of it,
//! applying provenance edits, and writing it back under a new identifier.
//!
//! # Core Concepts
//!
//! - **Graph**: a duplicate-free set of subject–predicate–object statements
//!   with a single wildcard `matching` primitive
//! - **ResourceMap**: one package's graph plus what was parsed from it,
//!   pending edits, and cached executions
//! - **Aliases**: one member may be spelled as a bare, percent-encoded or
//!   resolver-prefixed identifier; all spellings are treated as one
//!
//! # Example
//!
//! ```
//! use oremap::{PackageMember, ResourceMap, SaveRequest};
//!
//! let mut map = ResourceMap::default();
//! let request = SaveRequest::create("resource_map_1")
//!     .with_member(PackageMember::metadata("metadata_1").documents("data_1"))
//!     .with_member(PackageMember::data("data_1").documented_by("metadata_1"));
//!
//! let xml = map.serialize(&request).unwrap();
//! assert!(xml.contains("aggregates"));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod graph;
pub mod identifier;
pub mod package;
pub mod provenance;
pub mod query;

pub use config::GraphConfig;
pub use error::{
    ConfigError, EditConflictError, OreError, OreResult, ParseError, QueryError, SerializationError,
};
pub use graph::{BlankNode, Graph, Literal, NamedNode, Namespace, Node, Pattern, Statement};
pub use identifier::AliasSet;
pub use package::{
    DocumentationIndex, FormatIdResolver, MemberKind, MemberKindResolver, Membership, PackageMember,
    ParseOutcome, ResourceMap, SaveRequest,
};
pub use provenance::{
    EditLog, EditOp, EditReport, PackageProvenance, ProvEdit, ProvEvent, ProvField, ProvPredicate,
    ProvSolution, ProvValue, ProvenanceSink,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

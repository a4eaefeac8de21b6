//! Error types for oremap
//!
//! Each failure family has its own enum so callers can tell a recoverable
//! parse or query failure apart from a fatal save failure.

use serde::Serialize;
use thiserror::Error;

/// The wire bytes could not be read into a graph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Malformed RDF/XML: {0}")]
    Syntax(String),

    #[error("Invalid base IRI {iri}: {reason}")]
    InvalidBaseIri { iri: String, reason: String },

    #[error("Document is not valid UTF-8")]
    Encoding,
}

/// A provenance pattern query could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Query {query} does not bind projected variable ?{variable}")]
    UnboundVariable { query: String, variable: String },
}

/// A provenance edit could not be applied to the graph
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum EditConflictError {
    #[error("Unknown provenance predicate: {0}")]
    UnknownPredicate(String),

    #[error("Unknown edit operation: {0}")]
    UnknownOperation(String),

    #[error("Edit has an empty subject or object identifier")]
    EmptyIdentifier,

    #[error("No execution found for program {program}")]
    UnresolvedExecution { program: String },
}

/// The identity rewrite or the final emission failed
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("Package identifier must not be empty")]
    EmptyIdentifier,

    #[error("Invalid IRI {iri}: {reason}")]
    InvalidIri { iri: String, reason: String },

    #[error("Old identity still referenced after rewrite: {alias}")]
    StaleIdentity { alias: String },

    #[error("Failed to write RDF/XML: {0}")]
    Write(#[from] std::io::Error),
}

/// Configuration could not be loaded
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid coordinating node pattern: {0}")]
    InvalidPattern(String),
}

/// Any oremap error
#[derive(Debug, Error)]
pub enum OreError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Edit conflict: {0}")]
    EditConflict(#[from] EditConflictError),

    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for oremap operations
pub type OreResult<T> = Result<T, OreError>;

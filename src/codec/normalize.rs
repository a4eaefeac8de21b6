//! Coordinating-node URL normalization

use std::borrow::Cow;
use std::collections::BTreeSet;

use regex::NoExpand;
use tracing::{debug, warn};

use crate::config::GraphConfig;

/// Rewrite coordinating-node resolve URLs to the configured resolver.
///
/// Documents written against a test environment can mix several equivalent
/// resolver hosts. Only when more than one distinct spelling occurs is every
/// occurrence replaced by the configured resolver's host and path; a document
/// that consistently uses a single spelling is returned untouched.
pub fn normalize_coordinating_nodes<'a>(document: &'a str, config: &GraphConfig) -> Cow<'a, str> {
    let pattern = match config.coordinating_node_regex() {
        Ok(pattern) => pattern,
        Err(e) => {
            warn!(error = %e, "skipping coordinating node normalization");
            return Cow::Borrowed(document);
        }
    };

    let spellings: BTreeSet<&str> = pattern.find_iter(document).map(|m| m.as_str()).collect();
    if spellings.len() <= 1 {
        return Cow::Borrowed(document);
    }

    debug!(spellings = spellings.len(), "normalizing coordinating node URLs");
    pattern.replace_all(document, NoExpand(config.resolver_host_path()))
}

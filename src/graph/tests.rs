//! Graph store tests

use super::*;
use crate::config::GraphConfig;

fn member(id: &str) -> Node {
    Node::named(format!("https://cn.dataone.org/cn/v2/resolve/{}", id))
}

fn sample_graph() -> Graph {
    let mut graph = Graph::default();
    let agg = Node::named("https://cn.dataone.org/cn/v2/resolve/pkg1#aggregation");
    graph.add(agg.clone(), ORE.term("aggregates"), member("meta1"));
    graph.add(agg.clone(), ORE.term("aggregates"), member("data1"));
    graph.add(member("meta1"), CITO.term("documents"), member("data1"));
    graph.add(member("data1"), DCTERMS.term("identifier"), Node::literal("data1"));
    graph
}

#[test]
fn add_is_idempotent() {
    let mut graph = sample_graph();
    let before = graph.len();

    let added = graph.add(member("data1"), DCTERMS.term("identifier"), Node::literal("data1"));

    assert!(!added);
    assert_eq!(graph.len(), before);
}

#[test]
fn typed_string_literal_equals_plain_literal() {
    let mut graph = sample_graph();
    let before = graph.len();

    graph.add(
        member("data1"),
        DCTERMS.term("identifier"),
        Node::typed_literal("data1", XSD.term("string")),
    );

    assert_eq!(graph.len(), before);
}

#[test]
fn literals_with_different_datatypes_are_distinct() {
    let mut graph = Graph::default();
    graph.add(member("a"), DC.term("modified"), Node::literal("2020-01-01"));
    graph.add(
        member("a"),
        DC.term("modified"),
        Node::typed_literal("2020-01-01", XSD.term("dateTime")),
    );
    assert_eq!(graph.len(), 2);
}

#[test]
fn matching_with_wildcards() {
    let graph = sample_graph();

    let aggregates = graph.matching(None, Some(&ORE.term("aggregates")), None);
    assert_eq!(aggregates.len(), 2);

    let about_data = graph.matching(Some(&member("data1")), None, None);
    assert_eq!(about_data.len(), 1);

    let everything = graph.matching(None, None, None);
    assert_eq!(everything.len(), graph.len());
}

#[test]
fn fully_bound_match_uses_exact_statement() {
    let graph = sample_graph();
    let hits = graph.matching(
        Some(&member("meta1")),
        Some(&CITO.term("documents")),
        Some(&member("data1")),
    );
    assert_eq!(hits.len(), 1);

    let misses = graph.matching(
        Some(&member("data1")),
        Some(&CITO.term("documents")),
        Some(&member("meta1")),
    );
    assert!(misses.is_empty());
}

#[test]
fn remove_many_with_wildcards() {
    let mut graph = sample_graph();

    let removed = graph.remove_many(None, Some(&ORE.term("aggregates")), None);

    assert_eq!(removed, 2);
    assert_eq!(graph.len(), 2);
    assert!(!graph.has_match(None, Some(&ORE.term("aggregates")), None));
}

#[test]
fn removing_unmatched_pattern_is_noop() {
    let mut graph = sample_graph();
    let before = graph.len();

    let removed = graph.remove(&Pattern::any().subject(member("nope")));

    assert_eq!(removed, 0);
    assert_eq!(graph.len(), before);
}

#[test]
fn removed_statement_can_be_added_again() {
    let mut graph = sample_graph();
    let statement = Statement::new(member("meta1"), CITO.term("documents"), member("data1"));

    assert!(graph.remove_statement(&statement));
    assert!(!graph.contains(&statement));
    assert!(graph.insert(statement.clone()));
    assert!(graph.contains(&statement));
}

#[test]
fn blank_nodes_are_unique() {
    let mut graph = Graph::default();
    let a = graph.blank_node();
    graph.add(a.clone(), FOAF.term("name"), Node::literal("A"));
    let b = graph.blank_node();
    assert_ne!(a, b);
    assert!(a.id().starts_with('b'));
}

#[test]
fn resolver_base_url_falls_back_to_config() {
    let config = GraphConfig {
        resolver_base_url: "https://example.org/resolve/".into(),
        ..Default::default()
    };
    let mut graph = Graph::new(config);
    assert_eq!(graph.resolver_base_url(None), "https://example.org/resolve/");
}

#[test]
fn resolver_base_url_is_discovered_from_previous_identifier() {
    let mut graph = Graph::default();
    graph.add(
        Node::named("https://cn-stage.test.dataone.org/cn/v2/resolve/resource_map_urn%3Auuid%3A1"),
        DCTERMS.term("identifier"),
        Node::literal("resource_map_urn:uuid:1"),
    );

    let url = graph.resolver_base_url(Some("resource_map_urn:uuid:1"));

    assert_eq!(url, "https://cn-stage.test.dataone.org/cn/v2/resolve/");
}

#[test]
fn resolver_base_url_is_cached() {
    let mut graph = Graph::default();
    let first = graph.resolver_base_url(None);

    graph.add(
        Node::named("https://other.example/resolve/old"),
        DCTERMS.term("identifier"),
        Node::literal("old"),
    );

    assert_eq!(graph.resolver_base_url(Some("old")), first);
    assert_eq!(graph.cached_resolver_base_url(), Some(first.as_str()));
}

#[test]
fn clear_resets_statements_and_cache() {
    let mut graph = sample_graph();
    graph.resolver_base_url(None);

    graph.clear();

    assert!(graph.is_empty());
    assert!(graph.cached_resolver_base_url().is_none());
}

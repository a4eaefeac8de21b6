//! Resource map life cycle: parse, save as new, rewrite under a new identity

mod common;

use common::{has, node, simple_package, uri, MapFixture, FIXTURE_MODIFIED, RESOLVER};
use oremap::graph::{CITO, DCTERMS, ORE};
use oremap::{Node, PackageMember, ResourceMap, SaveRequest, SerializationError};

fn modified_values(map: &ResourceMap, id: &str) -> Vec<String> {
    map.graph()
        .matching(Some(&node(id)), Some(&DCTERMS.term("modified")), None)
        .into_iter()
        .map(|st| st.object.value().to_string())
        .collect()
}

#[test]
fn parse_reports_members_metadata_first() {
    let fixture = MapFixture::new("pkg")
        .member("data1")
        .member("data2")
        .member("meta1")
        .documents("meta1", "data1")
        .documents("meta1", "data2");
    let mut map = ResourceMap::default();

    let outcome = map.parse(&fixture.to_xml(), "pkg", None);

    assert_eq!(outcome.members(), &["meta1", "data1", "data2"]);
    let membership = outcome.membership().unwrap();
    assert_eq!(membership.documented_by.get("data2"), Some(&vec!["meta1".to_string()]));
    assert_eq!(map.package_id(), Some("pkg"));
    assert_eq!(map.original_members(), outcome.members());
}

#[test]
fn parse_collapses_identifier_spellings() {
    let fixture = MapFixture::new("pkg").member("urn:uuid:1234").raw(&format!(
        r#"  <rdf:Description rdf:about="{}#aggregation">
    <ore:aggregates rdf:resource="{}urn:uuid:1234"/>
  </rdf:Description>"#,
        uri("pkg"),
        RESOLVER
    ));
    let mut map = ResourceMap::default();

    let outcome = map.parse(&fixture.to_xml(), "pkg", None);

    assert_eq!(outcome.members(), &["urn:uuid:1234"]);
}

#[test]
fn parse_failure_leaves_membership_unknown() {
    let mut map = simple_package().parse();
    let before = map.graph().len();

    let outcome = map.parse("<rdf:RDF xmlns:rdf=\"http://www.w3.org/1999/02/22-rdf-syntax-ns#\">", "old1", None);

    assert!(outcome.is_indeterminate());
    assert!(outcome.error().is_some());
    assert_eq!(map.graph().len(), before);
    assert_eq!(map.original_members(), &["meta1", "data1"]);
}

#[test]
fn non_utf8_bytes_are_indeterminate() {
    let mut map = ResourceMap::default();
    let outcome = map.parse_bytes(&[0xff, 0xfe, 0x00], "pkg", None);
    assert!(outcome.is_indeterminate());
}

#[test]
fn new_package_round_trips_membership() {
    let mut map = ResourceMap::default();
    let request = SaveRequest::create("pkg1")
        .with_creator("Jane Researcher")
        .with_member(PackageMember::metadata("meta1").documents("data1"))
        .with_member(PackageMember::data("data1").documented_by("meta1"))
        .with_member(PackageMember::data("data2"));

    let document = map.serialize(&request).unwrap();
    assert!(document.contains("Jane Researcher"));

    let mut reparsed = ResourceMap::default();
    let outcome = reparsed.parse(&document, "pkg1", None);

    let mut members = outcome.members().to_vec();
    members.sort();
    assert_eq!(members, vec!["data1", "data2", "meta1"]);
    assert_eq!(outcome.members()[0], "meta1");

    let documented_by = &outcome.membership().unwrap().documented_by;
    assert_eq!(documented_by.get("data1"), Some(&vec!["meta1".to_string()]));
    // undocumented data documents itself
    assert_eq!(documented_by.get("data2"), Some(&vec!["data2".to_string()]));
}

#[test]
fn rewrite_renames_package_and_adds_member() {
    let mut map = simple_package().parse();
    let request = SaveRequest::update("new1", "old1")
        .with_member(PackageMember::metadata("meta1").documents("data1").documents("data2"))
        .with_member(PackageMember::data("data1").documented_by("meta1"))
        .with_member(PackageMember::data("data2").documented_by("meta1"));

    let document = map.serialize(&request).unwrap();

    assert!(!document.contains("old1"));
    assert_eq!(map.package_id(), Some("new1"));

    let graph = map.graph();
    let aggregation = Node::named(format!("{}#aggregation", uri("new1")));
    assert!(has(graph, &node("new1"), ORE.term("describes"), &aggregation));
    assert!(has(graph, &aggregation, ORE.term("isDescribedBy"), &node("new1")));
    assert!(has(graph, &aggregation, ORE.term("aggregates"), &node("data2")));
    assert!(has(graph, &node("data2"), ORE.term("isAggregatedBy"), &aggregation));
    assert!(has(graph, &node("meta1"), CITO.term("documents"), &node("data2")));
    assert!(has(graph, &node("data1"), ORE.term("isAggregatedBy"), &aggregation));
    assert!(has(graph, &node("new1"), DCTERMS.term("identifier"), &Node::literal("new1")));

    let modified = modified_values(&map, "new1");
    assert_eq!(modified.len(), 1);
    assert_ne!(modified[0], FIXTURE_MODIFIED);

    let mut reparsed = ResourceMap::default();
    let outcome = reparsed.parse(&document, "new1", None);
    assert_eq!(outcome.members(), &["meta1", "data1", "data2"]);
}

#[test]
fn rewrite_drops_removed_members() {
    let fixture = simple_package().member("data2").documents("meta1", "data2");
    let mut map = fixture.parse();
    let request = SaveRequest::update("new1", "old1")
        .with_member(PackageMember::metadata("meta1").documents("data1"))
        .with_member(PackageMember::data("data1").documented_by("meta1"));

    let document = map.serialize(&request).unwrap();

    assert!(!document.contains(&uri("data2")));
    assert!(!map.graph().has_match(Some(&node("data2")), None, None));
    assert!(!map.graph().has_match(None, None, Some(&node("data2"))));
}

#[test]
fn unchanged_membership_is_stable_across_saves() {
    let mut map = simple_package().parse();
    let members = vec![
        PackageMember::metadata("meta1").documents("data1"),
        PackageMember::data("data1").documented_by("meta1"),
    ];
    assert!(!map.needs_update(&members));

    let first = SaveRequest::update("new1", "old1").with_members(members.clone());
    map.serialize(&first).unwrap();
    let statements = map.graph().len();

    let second = SaveRequest::update("new2", "new1").with_members(members);
    map.serialize(&second).unwrap();

    assert_eq!(map.graph().len(), statements);
    assert!(map.graph().has_match(Some(&node("new2")), Some(&DCTERMS.term("identifier")), None));
}

#[test]
fn failed_save_keeps_previous_identity() {
    let mut map = simple_package().parse();
    let before = map.graph().statements().to_vec();

    let err = map.serialize(&SaveRequest::update("", "old1")).unwrap_err();

    assert!(matches!(err, SerializationError::EmptyIdentifier));
    assert_eq!(map.graph().statements(), &before[..]);
    assert_eq!(map.package_id(), Some("old1"));
}

#[test]
fn rewrite_under_custom_resolver() {
    let xml = simple_package()
        .to_xml()
        .replace(RESOLVER, "https://repository.example.org/objects/");
    let mut map = ResourceMap::default();
    assert!(!map.parse(&xml, "old1", None).is_indeterminate());

    let request = SaveRequest::update("new1", "old1")
        .with_member(PackageMember::metadata("meta1").documents("data1"))
        .with_member(PackageMember::data("data1").documented_by("meta1"))
        .with_member(PackageMember::data("data3").documented_by("meta1"));
    let document = map.serialize(&request).unwrap();

    assert!(document.contains("https://repository.example.org/objects/new1"));
    assert!(document.contains("https://repository.example.org/objects/data3"));
    assert!(!document.contains(RESOLVER));
}

#[test]
fn rewrite_renames_aggregation_uri_held_in_literals() {
    let old_aggregation = format!("{}#aggregation", uri("old1"));
    let fixture = simple_package().raw(&format!(
        r#"  <rdf:Description rdf:about="{data}">
    <dcterms:relation>{agg}</dcterms:relation>
    <dcterms:source rdf:datatype="http://www.w3.org/2001/XMLSchema#string">{agg}</dcterms:source>
    <dcterms:isPartOf rdf:datatype="http://www.w3.org/2001/XMLSchema#anyURI">{agg}</dcterms:isPartOf>
  </rdf:Description>"#,
        data = uri("data1"),
        agg = old_aggregation
    ));
    let mut map = fixture.parse();

    let document = map
        .serialize(
            &SaveRequest::update("new1", "old1")
                .with_member(PackageMember::metadata("meta1").documents("data1"))
                .with_member(PackageMember::data("data1").documented_by("meta1")),
        )
        .unwrap();

    assert!(!document.contains(&old_aggregation));
    let new_aggregation = format!("{}#aggregation", uri("new1"));
    let graph = map.graph();
    assert!(has(graph, &node("data1"), DCTERMS.term("relation"), &Node::literal(new_aggregation.as_str())));
    assert!(has(graph, &node("data1"), DCTERMS.term("source"), &Node::literal(new_aggregation.as_str())));
}

#[test]
fn rewrite_resets_aggregation_modified_date() {
    let fixture = simple_package().raw(&format!(
        r#"  <rdf:Description rdf:about="{}#aggregation">
    <dcterms:modified rdf:datatype="http://www.w3.org/2001/XMLSchema#dateTime">{}</dcterms:modified>
  </rdf:Description>"#,
        uri("old1"),
        FIXTURE_MODIFIED
    ));
    let mut map = fixture.parse();

    map.serialize(
        &SaveRequest::update("new1", "old1")
            .with_member(PackageMember::metadata("meta1").documents("data1"))
            .with_member(PackageMember::data("data1").documented_by("meta1")),
    )
    .unwrap();

    let aggregation = Node::named(format!("{}#aggregation", uri("new1")));
    let modified: Vec<String> = map
        .graph()
        .matching(Some(&aggregation), Some(&DCTERMS.term("modified")), None)
        .into_iter()
        .map(|st| st.object.value().to_string())
        .collect();
    assert_eq!(modified.len(), 1);
    assert_ne!(modified[0], FIXTURE_MODIFIED);
}

#[test]
fn rewrite_with_percent_encoded_identifiers() {
    let fixture = MapFixture::new("urn:uuid:old-pkg")
        .member("urn:uuid:meta-1")
        .member("urn:uuid:data-1")
        .documents("urn:uuid:meta-1", "urn:uuid:data-1")
        .raw(&format!(
            r#"  <rdf:Description rdf:about="{base}urn:uuid:old-pkg#aggregation">
    <dcterms:title>Soil cores</dcterms:title>
  </rdf:Description>
  <rdf:Description rdf:about="{data}">
    <dcterms:references rdf:resource="{base}urn:uuid:old-pkg"/>
  </rdf:Description>"#,
            base = RESOLVER,
            data = uri("urn:uuid:data-1")
        ));
    let mut map = fixture.parse();
    assert_eq!(map.original_members(), &["urn:uuid:meta-1", "urn:uuid:data-1"]);

    let request = SaveRequest::update("urn:uuid:new-pkg", "urn:uuid:old-pkg")
        .with_member(
            PackageMember::metadata("urn:uuid:meta-1")
                .documents("urn:uuid:data-1")
                .documents("urn:uuid:data-2"),
        )
        .with_member(PackageMember::data("urn:uuid:data-1").documented_by("urn:uuid:meta-1"))
        .with_member(PackageMember::data("urn:uuid:data-2").documented_by("urn:uuid:meta-1"));
    let document = map.serialize(&request).unwrap();

    assert!(!document.contains("old-pkg"));
    assert_eq!(map.package_id(), Some("urn:uuid:new-pkg"));

    let graph = map.graph();
    let aggregation = Node::named(format!("{}#aggregation", uri("urn:uuid:new-pkg")));
    assert!(uri("urn:uuid:new-pkg").ends_with("urn%3Auuid%3Anew-pkg"));
    assert!(has(graph, &aggregation, DCTERMS.term("title"), &Node::literal("Soil cores")));
    assert!(has(graph, &node("urn:uuid:data-1"), DCTERMS.term("references"), &node("urn:uuid:new-pkg")));

    let aggregated: Vec<Node> = graph
        .matching(None, Some(&ORE.term("aggregates")), None)
        .into_iter()
        .map(|st| st.object)
        .collect();
    assert_eq!(aggregated.len(), 3);
    assert_eq!(aggregated.iter().filter(|n| **n == node("urn:uuid:data-2")).count(), 1);
    assert!(aggregated.iter().all(|n| n.value().starts_with(RESOLVER)));
    assert!(has(graph, &node("urn:uuid:meta-1"), CITO.term("documents"), &node("urn:uuid:data-2")));

    let mut reparsed = ResourceMap::default();
    let outcome = reparsed.parse(&document, "urn:uuid:new-pkg", None);
    assert_eq!(outcome.members(), &["urn:uuid:meta-1", "urn:uuid:data-1", "urn:uuid:data-2"]);
}

//! RDF/XML reading and writing

use oxigraph::io::{RdfFormat, RdfParser, RdfSerializer};
use oxigraph::model::{
    BlankNode as OxBlankNode, Literal as OxLiteral, NamedNode as OxNamedNode, Subject, Term, Triple,
};

use crate::error::{ParseError, SerializationError};
use crate::graph::{Literal, NamedNode, Node, Statement, NAMESPACES};

/// Parse an RDF/XML document into statements.
///
/// The whole document is parsed before anything is returned, so a syntax
/// error part-way through never yields a partial statement list.
pub fn read_rdfxml(document: &str, base_iri: Option<&str>) -> Result<Vec<Statement>, ParseError> {
    let mut parser = RdfParser::from_format(RdfFormat::RdfXml);
    if let Some(base) = base_iri {
        parser = parser
            .with_base_iri(base)
            .map_err(|e| ParseError::InvalidBaseIri {
                iri: base.to_string(),
                reason: e.to_string(),
            })?;
    }

    let mut statements = Vec::new();
    for quad in parser.for_reader(document.as_bytes()) {
        let quad = quad.map_err(|e| ParseError::Syntax(e.to_string()))?;
        let subject = match quad.subject {
            Subject::NamedNode(n) => Node::named(n.into_string()),
            Subject::BlankNode(b) => Node::blank(b.into_string()),
            #[allow(unreachable_patterns)]
            other => {
                return Err(ParseError::Syntax(format!("unsupported subject {}", other)));
            }
        };
        let object = match quad.object {
            Term::NamedNode(n) => Node::named(n.into_string()),
            Term::BlankNode(b) => Node::blank(b.into_string()),
            Term::Literal(l) => Node::Literal(literal_from_oxigraph(&l)),
            #[allow(unreachable_patterns)]
            other => {
                return Err(ParseError::Syntax(format!("unsupported object {}", other)));
            }
        };
        statements.push(Statement::new(
            subject,
            NamedNode::new(quad.predicate.into_string()),
            object,
        ));
    }
    Ok(statements)
}

fn literal_from_oxigraph(literal: &OxLiteral) -> Literal {
    if let Some(language) = literal.language() {
        return Literal::tagged(literal.value(), language);
    }
    Literal::typed(literal.value(), NamedNode::new(literal.datatype().as_str()))
}

/// Serialize statements as an RDF/XML document
pub fn write_rdfxml(statements: &[Statement], prefixes: bool) -> Result<String, SerializationError> {
    let mut serializer = RdfSerializer::from_format(RdfFormat::RdfXml);
    if prefixes {
        for namespace in NAMESPACES {
            serializer = serializer
                .with_prefix(namespace.prefix, namespace.iri)
                .map_err(|e| SerializationError::InvalidIri {
                    iri: namespace.iri.to_string(),
                    reason: e.to_string(),
                })?;
        }
    }

    let mut writer = serializer.for_writer(Vec::new());
    for statement in statements {
        let triple = triple_to_oxigraph(statement)?;
        writer.serialize_triple(&triple)?;
    }
    let bytes = writer.finish()?;
    String::from_utf8(bytes)
        .map_err(|e| SerializationError::Write(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

fn triple_to_oxigraph(statement: &Statement) -> Result<Triple, SerializationError> {
    let subject: Subject = match &statement.subject {
        Node::Named(n) => named_to_oxigraph(n)?.into(),
        Node::Blank(b) => blank_to_oxigraph(b.id())?.into(),
        Node::Literal(l) => {
            return Err(SerializationError::InvalidIri {
                iri: l.value.clone(),
                reason: "a literal cannot be a statement subject".to_string(),
            });
        }
    };
    let predicate = named_to_oxigraph(&statement.predicate)?;
    let object: Term = match &statement.object {
        Node::Named(n) => named_to_oxigraph(n)?.into(),
        Node::Blank(b) => blank_to_oxigraph(b.id())?.into(),
        Node::Literal(l) => literal_to_oxigraph(l)?.into(),
    };
    Ok(Triple::new(subject, predicate, object))
}

fn named_to_oxigraph(node: &NamedNode) -> Result<OxNamedNode, SerializationError> {
    OxNamedNode::new(node.as_str()).map_err(|e| SerializationError::InvalidIri {
        iri: node.as_str().to_string(),
        reason: e.to_string(),
    })
}

fn blank_to_oxigraph(id: &str) -> Result<OxBlankNode, SerializationError> {
    OxBlankNode::new(id).map_err(|e| SerializationError::InvalidIri {
        iri: format!("_:{}", id),
        reason: e.to_string(),
    })
}

fn literal_to_oxigraph(literal: &Literal) -> Result<OxLiteral, SerializationError> {
    if let Some(language) = &literal.language {
        return OxLiteral::new_language_tagged_literal(literal.value.as_str(), language.as_str())
            .map_err(|e| SerializationError::InvalidIri {
                iri: language.clone(),
                reason: e.to_string(),
            });
    }
    match &literal.datatype {
        Some(datatype) => Ok(OxLiteral::new_typed_literal(
            literal.value.as_str(),
            named_to_oxigraph(datatype)?,
        )),
        None => Ok(OxLiteral::new_simple_literal(literal.value.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{CITO, DCTERMS, ORE, XSD};

    const DOC: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:ore="http://www.openarchives.org/ore/terms/"
         xmlns:dcterms="http://purl.org/dc/terms/"
         xmlns:cito="http://purl.org/spar/cito/">
  <rdf:Description rdf:about="https://cn.dataone.org/cn/v2/resolve/pkg#aggregation">
    <ore:aggregates rdf:resource="https://cn.dataone.org/cn/v2/resolve/data1"/>
  </rdf:Description>
  <rdf:Description rdf:about="https://cn.dataone.org/cn/v2/resolve/data1">
    <dcterms:identifier rdf:datatype="http://www.w3.org/2001/XMLSchema#string">data1</dcterms:identifier>
    <dcterms:title xml:lang="en">Data</dcterms:title>
  </rdf:Description>
</rdf:RDF>"#;

    #[test]
    fn reads_named_nodes_and_literals() {
        let statements = read_rdfxml(DOC, None).unwrap();
        assert_eq!(statements.len(), 3);

        let aggregates = statements
            .iter()
            .find(|st| st.predicate == ORE.term("aggregates"))
            .unwrap();
        assert_eq!(
            aggregates.object,
            Node::named("https://cn.dataone.org/cn/v2/resolve/data1")
        );

        let identifier = statements
            .iter()
            .find(|st| st.predicate == DCTERMS.term("identifier"))
            .unwrap();
        assert_eq!(identifier.object, Node::literal("data1"));

        let title = statements
            .iter()
            .find(|st| st.predicate == DCTERMS.term("title"))
            .unwrap();
        assert_eq!(title.object, Node::Literal(Literal::tagged("Data", "en")));
    }

    #[test]
    fn malformed_document_is_syntax_error() {
        let err = read_rdfxml("<rdf:RDF><unclosed>", None).unwrap_err();
        assert!(matches!(err, ParseError::Syntax(_)));
    }

    #[test]
    fn invalid_base_iri_is_rejected() {
        let err = read_rdfxml(DOC, Some("not an iri")).unwrap_err();
        assert!(matches!(err, ParseError::InvalidBaseIri { .. }));
    }

    #[test]
    fn written_document_reads_back_the_same_statements() {
        let statements = vec![
            Statement::new(
                Node::named("https://example.org/meta"),
                CITO.term("documents"),
                Node::named("https://example.org/data"),
            ),
            Statement::new(
                Node::named("https://example.org/meta"),
                DCTERMS.term("modified"),
                Node::typed_literal("2024-01-01T00:00:00Z", XSD.term("dateTime")),
            ),
            Statement::new(
                Node::blank("b1"),
                DCTERMS.term("identifier"),
                Node::literal("meta"),
            ),
            Statement::new(
                Node::named("https://example.org/meta"),
                DCTERMS.term("creator"),
                Node::blank("b1"),
            ),
        ];

        let xml = write_rdfxml(&statements, true).unwrap();
        assert!(xml.contains("rdf:RDF"));

        let mut read = read_rdfxml(&xml, None).unwrap();
        assert_eq!(read.len(), statements.len());

        // Blank node labels may be renamed on the way through
        read.retain(|st| !st.subject.is_blank() && !st.object.is_blank());
        for st in &read {
            assert!(statements.contains(st), "unexpected statement {}", st);
        }
    }

    #[test]
    fn literal_subject_cannot_be_written() {
        let statements = vec![Statement::new(
            Node::literal("oops"),
            DCTERMS.term("identifier"),
            Node::literal("x"),
        )];
        let err = write_rdfxml(&statements, false).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidIri { .. }));
    }

    #[test]
    fn invalid_iri_cannot_be_written() {
        let statements = vec![Statement::new(
            Node::named("not an iri"),
            DCTERMS.term("identifier"),
            Node::literal("x"),
        )];
        let err = write_rdfxml(&statements, false).unwrap_err();
        assert!(matches!(err, SerializationError::InvalidIri { .. }));
    }
}

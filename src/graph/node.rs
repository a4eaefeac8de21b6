//! Node representation in the resource map graph

use serde::{Deserialize, Serialize};

use super::namespace::XSD;

/// A node identified by an IRI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedNode(String);

impl NamedNode {
    /// Create a named node from an IRI string. The IRI is not validated
    /// until the graph is serialized.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this IRI lives under the given namespace IRI
    pub fn in_namespace(&self, namespace_iri: &str) -> bool {
        self.0.starts_with(namespace_iri)
    }
}

impl std::fmt::Display for NamedNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.0)
    }
}

impl From<&str> for NamedNode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NamedNode {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// An anonymous node, unique within one graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlankNode(String);

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BlankNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal value with an optional datatype or language tag.
///
/// `xsd:string` is the implicit datatype of a plain literal, so it is never
/// stored explicitly: `Literal::typed("x", XSD string)` equals `Literal::plain("x")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<NamedNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Literal {
    /// A plain (`xsd:string`) literal
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// A typed literal
    pub fn typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        let datatype = if datatype == XSD.term("string") {
            None
        } else {
            Some(datatype)
        };
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// A language-tagged literal
    pub fn tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: Some(language.into()),
        }
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.value)?;
        if let Some(language) = &self.language {
            write!(f, "@{}", language)
        } else if let Some(datatype) = &self.datatype {
            write!(f, "^^{}", datatype)
        } else {
            Ok(())
        }
    }
}

/// A node in a statement: named, blank, or literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Node {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl Node {
    pub fn named(iri: impl Into<String>) -> Self {
        Node::Named(NamedNode::new(iri))
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Node::Blank(BlankNode::new(id))
    }

    /// A plain (`xsd:string`) literal node
    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(Literal::plain(value))
    }

    pub fn typed_literal(value: impl Into<String>, datatype: NamedNode) -> Self {
        Node::Literal(Literal::typed(value, datatype))
    }

    /// The lexical value: the IRI, blank node id, or literal value
    pub fn value(&self) -> &str {
        match self {
            Node::Named(n) => n.as_str(),
            Node::Blank(b) => b.id(),
            Node::Literal(l) => &l.value,
        }
    }

    pub fn as_named(&self) -> Option<&NamedNode> {
        match self {
            Node::Named(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_blank(&self) -> Option<&BlankNode> {
        match self {
            Node::Blank(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    /// Copy of this node carrying a different lexical value. Named nodes stay
    /// named, literals keep their datatype and language, and blank nodes are
    /// returned unchanged since their identity is graph-local.
    pub fn with_value(&self, value: impl Into<String>) -> Self {
        match self {
            Node::Named(_) => Node::named(value),
            Node::Blank(_) => self.clone(),
            Node::Literal(l) => Node::Literal(Literal {
                value: value.into(),
                datatype: l.datatype.clone(),
                language: l.language.clone(),
            }),
        }
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Node::Named(n) => n.fmt(f),
            Node::Blank(b) => b.fmt(f),
            Node::Literal(l) => l.fmt(f),
        }
    }
}

impl From<NamedNode> for Node {
    fn from(n: NamedNode) -> Self {
        Node::Named(n)
    }
}

impl From<BlankNode> for Node {
    fn from(b: BlankNode) -> Self {
        Node::Blank(b)
    }
}

impl From<Literal> for Node {
    fn from(l: Literal) -> Self {
        Node::Literal(l)
    }
}

//! The package model's view of its members
//!
//! Members are owned by the surrounding package model. The graph engine only
//! sees what it needs to write a resource map: identifiers, kinds and the
//! documentation relationships between them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Documented-by index: data member id to the metadata ids documenting it
pub type DocumentationIndex = BTreeMap<String, Vec<String>>;

/// What kind of object a member is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberKind {
    /// Science metadata describing other members
    Metadata,
    /// Any other object
    Data,
    /// A nested resource map
    Package,
}

/// Maps an object's format identifier to its [`MemberKind`].
///
/// The package model knows its formats; the engine does not. Closures work
/// as resolvers.
pub trait MemberKindResolver {
    fn resolve_member_kind(&self, format_id: &str) -> MemberKind;
}

impl<F> MemberKindResolver for F
where
    F: Fn(&str) -> MemberKind,
{
    fn resolve_member_kind(&self, format_id: &str) -> MemberKind {
        self(format_id)
    }
}

/// Resolver for the common DataONE format identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatIdResolver;

const PACKAGE_FORMATS: &[&str] = &["http://www.openarchives.org/ore/terms"];

const METADATA_FORMAT_PREFIXES: &[&str] = &[
    "eml://ecoinformatics.org/eml-",
    "https://eml.ecoinformatics.org/eml-",
    "http://www.isotc211.org/2005/gmd",
    "http://www.isotc211.org/2005/gmi",
    "FGDC-STD-",
    "http://ns.dataone.org/metadata/schema/onedcx/",
    "http://purl.org/ornl/schema/mercury/terms/v1.0",
    "http://datacite.org/schema/kernel-",
    "http://www.cuahsi.org/waterML/",
];

impl MemberKindResolver for FormatIdResolver {
    fn resolve_member_kind(&self, format_id: &str) -> MemberKind {
        if PACKAGE_FORMATS.contains(&format_id) {
            MemberKind::Package
        } else if METADATA_FORMAT_PREFIXES
            .iter()
            .any(|prefix| format_id.starts_with(prefix))
        {
            MemberKind::Metadata
        } else {
            MemberKind::Data
        }
    }
}

/// One live member of a package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMember {
    pub id: String,
    pub kind: MemberKind,
    /// Metadata ids documenting this member
    #[serde(default)]
    pub documented_by: Vec<String>,
    /// Member ids this member documents
    #[serde(default)]
    pub documents: Vec<String>,
    /// The previous version of this member, if it replaced one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obsoletes: Option<String>,
}

impl PackageMember {
    pub fn new(id: impl Into<String>, kind: MemberKind) -> Self {
        Self {
            id: id.into(),
            kind,
            documented_by: Vec::new(),
            documents: Vec::new(),
            obsoletes: None,
        }
    }

    pub fn metadata(id: impl Into<String>) -> Self {
        Self::new(id, MemberKind::Metadata)
    }

    pub fn data(id: impl Into<String>) -> Self {
        Self::new(id, MemberKind::Data)
    }

    /// Build a member whose kind comes from its format identifier
    pub fn with_format(id: impl Into<String>, format_id: &str, resolver: &impl MemberKindResolver) -> Self {
        Self::new(id, resolver.resolve_member_kind(format_id))
    }

    pub fn documented_by(mut self, metadata_id: impl Into<String>) -> Self {
        push_unique(&mut self.documented_by, metadata_id.into());
        self
    }

    pub fn documents(mut self, data_id: impl Into<String>) -> Self {
        push_unique(&mut self.documents, data_id.into());
        self
    }

    pub fn obsoletes(mut self, previous_id: impl Into<String>) -> Self {
        self.obsoletes = Some(previous_id.into());
        self
    }

    pub fn is_metadata(&self) -> bool {
        self.kind == MemberKind::Metadata
    }

    /// True when no documentation edge touches this member
    pub fn is_undocumented(&self) -> bool {
        self.documented_by.is_empty() && self.documents.is_empty()
    }
}

/// Everything the serializer needs from the package model for one save
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveRequest {
    /// Identifier the resource map is saved under
    pub new_id: String,
    /// Identifier being replaced, or `None` when creating a new map
    #[serde(default)]
    pub old_id: Option<String>,
    /// Live members to aggregate
    #[serde(default)]
    pub members: Vec<PackageMember>,
    /// Nested resource maps to aggregate
    #[serde(default)]
    pub child_packages: Vec<String>,
    /// Display name recorded as creator of a new map
    #[serde(default)]
    pub creator: Option<String>,
}

impl SaveRequest {
    /// A request creating a new resource map
    pub fn create(new_id: impl Into<String>) -> Self {
        Self {
            new_id: new_id.into(),
            ..Default::default()
        }
    }

    /// A request replacing `old_id` with `new_id`
    pub fn update(new_id: impl Into<String>, old_id: impl Into<String>) -> Self {
        Self {
            new_id: new_id.into(),
            old_id: Some(old_id.into()),
            ..Default::default()
        }
    }

    pub fn with_member(mut self, member: PackageMember) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_members(mut self, members: impl IntoIterator<Item = PackageMember>) -> Self {
        self.members.extend(members);
        self
    }

    pub fn with_child_package(mut self, id: impl Into<String>) -> Self {
        self.child_packages.push(id.into());
        self
    }

    pub fn with_creator(mut self, name: impl Into<String>) -> Self {
        self.creator = Some(name.into());
        self
    }

    /// Build members from bare ids plus a documented-by index.
    ///
    /// Any id that documents another is treated as metadata; the rest are
    /// data. Ids in the index that are not live are kept on the documented
    /// member so an obsoleted documenter can still be matched.
    pub fn with_documentation(mut self, ids: &[String], documented_by: &DocumentationIndex) -> Self {
        for id in ids {
            let mut member = PackageMember::data(id.as_str());
            if let Some(documenters) = documented_by.get(id) {
                for metadata_id in documenters {
                    if metadata_id != id {
                        member = member.documented_by(metadata_id.as_str());
                    }
                }
            }
            for (data_id, documenters) in documented_by {
                if data_id != id && documenters.contains(id) {
                    member = member.documents(data_id.as_str());
                }
            }
            if !member.documents.is_empty() {
                member.kind = MemberKind::Metadata;
            }
            self.members.push(member);
        }
        self
    }

    /// Live member ids, in request order
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.id.clone()).collect()
    }

    pub fn member(&self, id: &str) -> Option<&PackageMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn is_new(&self) -> bool {
        self.old_id.is_none()
    }
}

pub(crate) fn push_unique(list: &mut Vec<String>, value: String) {
    if !list.contains(&value) {
        list.push(value);
    }
}

//! Element shaping: one raw subtree in, one flat record out.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::address::Address;
use crate::config::ADDR_PREFIX;
use crate::error::{Result, WranglerError};
use crate::xml::RawNode;

/// Record field names that free-form tag keys must not clobber.
///
/// The original scripts let a `type` tag silently overwrite the record
/// kind; here the typed slots stay authoritative and colliding tag keys
/// are dropped with a warning.
const RESERVED_FIELDS: [&str; 8] = [
    "type", "id", "pos", "created", "addr", "nd", "member", "FIXME",
];

/// The three element kinds that produce output records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// A point with coordinates.
    Node,
    /// An ordered list of node references.
    Way,
    /// A group of members with roles.
    Relation,
}

impl ElementKind {
    /// Parse from a tag name.
    ///
    /// # Returns
    /// The kind, or `None` for any non-qualifying tag name
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "node" => Some(Self::Node),
            "way" => Some(Self::Way),
            "relation" => Some(Self::Relation),
            _ => None,
        }
    }

    /// Get the string value used in output records.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Way => "way",
            Self::Relation => "relation",
        }
    }
}

/// Provenance sub-record built from element attributes.
///
/// Always present on a record, possibly empty; absent attributes are
/// omitted rather than defaulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Created {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uid: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changeset: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// One relation membership entry.
///
/// Only attributes with non-empty values are copied in; anything beyond
/// the known trio lands in `extra` as a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Member {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Member {
    fn from_node(node: &RawNode) -> Result<Self> {
        let mut member = Self::default();
        for (key, value) in &node.attributes {
            if value.is_empty() {
                continue;
            }
            match key.as_str() {
                "type" => member.kind = Some(value.clone()),
                "ref" => member.reference = Some(parse_integer(key, value)?),
                "role" => member.role = Some(value.clone()),
                _ => {
                    member.extra.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(member)
    }
}

/// Flattened output record for one qualifying element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedRecord {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub id: i64,
    /// `[latitude, longitude]`, present only on `node` records.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f64; 2]>,
    pub created: Created,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nd: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub member: Option<Vec<Member>>,
    #[serde(rename = "FIXME", skip_serializing_if = "Option::is_none")]
    pub fixme: Option<String>,
    /// Free-form tag fields, last-write-wins per key.
    #[serde(flatten)]
    pub tags: BTreeMap<String, String>,
}

/// Shape one raw element into a flat record.
///
/// Returns `Ok(None)` for any element whose kind is not `node`, `way` or
/// `relation`; those are not errors, just non-qualifying. A qualifying
/// element with a missing or unparseable required attribute is a fatal
/// malformed-input error.
///
/// # Arguments
/// * `node` - The raw element with its full subtree attached
pub fn shape(node: &RawNode) -> Result<Option<ShapedRecord>> {
    let Some(kind) = ElementKind::from_tag(&node.kind) else {
        return Ok(None);
    };

    let id = parse_integer_attr(node, "id")?;

    let pos = if kind == ElementKind::Node {
        Some([parse_float_attr(node, "lat")?, parse_float_attr(node, "lon")?])
    } else {
        None
    };

    let mut record = ShapedRecord {
        kind,
        id,
        pos,
        created: created_from_attributes(node)?,
        addr: None,
        nd: None,
        member: None,
        fixme: None,
        tags: BTreeMap::new(),
    };

    let mut node_refs: Vec<i64> = Vec::new();
    let mut members: Vec<Member> = Vec::new();
    let mut address = Address::new();

    for child in node.descendants() {
        match child.kind.as_str() {
            "tag" => {
                let key = required_attr(child, "k")?;
                let value = required_attr(child, "v")?;

                if key.starts_with(ADDR_PREFIX) {
                    address.update(key, value);
                } else if key == "fixme" || key == "FIXME" {
                    match &mut record.fixme {
                        Some(existing) => {
                            existing.push_str("\nFIXME: ");
                            existing.push_str(value);
                        }
                        None => record.fixme = Some(value.to_string()),
                    }
                } else if RESERVED_FIELDS.contains(&key) {
                    tracing::warn!(id, key, "Dropping tag that collides with a record field");
                } else {
                    record.tags.insert(key.to_string(), value.to_string());
                }
            }
            "nd" => {
                let reference = required_attr(child, "ref")?;
                node_refs.push(parse_integer("ref", reference)?);
            }
            "member" => {
                members.push(Member::from_node(child)?);
            }
            _ => {}
        }
    }

    if !node_refs.is_empty() {
        record.nd = Some(node_refs);
    }
    if !members.is_empty() {
        record.member = Some(members);
    }
    if !address.is_empty() {
        record.addr = Some(address);
    }

    Ok(Some(record))
}

/// Populate the `created` sub-record from the element's own attributes.
fn created_from_attributes(node: &RawNode) -> Result<Created> {
    let mut created = Created::default();
    for (key, value) in &node.attributes {
        match key.as_str() {
            "uid" => created.uid = Some(parse_integer(key, value)?),
            "version" => created.version = Some(parse_integer(key, value)?),
            "changeset" => created.changeset = Some(parse_integer(key, value)?),
            "user" => created.user = Some(value.clone()),
            "timestamp" => created.timestamp = Some(value.clone()),
            _ => {}
        }
    }
    Ok(created)
}

fn required_attr<'a>(node: &'a RawNode, attribute: &str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| WranglerError::MissingAttribute {
            attribute: attribute.to_string(),
            kind: node.kind.clone(),
        })
}

fn parse_integer(attribute: &str, value: &str) -> Result<i64> {
    value
        .parse()
        .map_err(|_| WranglerError::InvalidNumber {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

fn parse_integer_attr(node: &RawNode, attribute: &str) -> Result<i64> {
    parse_integer(attribute, required_attr(node, attribute)?)
}

fn parse_float_attr(node: &RawNode, attribute: &str) -> Result<f64> {
    let value = required_attr(node, attribute)?;
    value
        .parse()
        .map_err(|_| WranglerError::InvalidNumber {
            attribute: attribute.to_string(),
            value: value.to_string(),
        })
}

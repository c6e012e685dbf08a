//! Audit pass: inventory the shape and value distribution of an export.
//!
//! The collector observes every element arrival (qualifying or not) and
//! grows four inventories keyed by element kind. The results are read
//! after the full pass and drive the discovery of normalization-table
//! gaps; nothing here feeds the shaping pass.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;

use regex::Regex;

use crate::xml::RawNode;

/// Key used to pull street values out of the key/value inventory.
const STREET_KEY: &str = "addr:street";

/// Characters unsafe in a flat output field name.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static PROBLEM_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[=\+/&<>;'"\?%#\$@,\. \t\r\n]"#).expect("valid regex"));

/// Canadian postal code: letter-digit-letter, optional space, digit-letter-digit.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static POSTAL_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z]\d[a-zA-Z]( )?\d[a-zA-Z]\d)$").expect("valid regex")
});

/// Growing set of observed string values.
pub type ValueSet = BTreeSet<String>;

/// Accumulated inventories for one full pass over an export.
///
/// Built incrementally via [`AuditSummary::observe`]; never reset mid-run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditSummary {
    /// kind -> attribute key -> observed values, from each element's own
    /// attributes.
    pub attributes: BTreeMap<String, BTreeMap<String, ValueSet>>,

    /// kind -> descendant kind -> attribute key -> observed values.
    pub nested_attributes: BTreeMap<String, BTreeMap<String, BTreeMap<String, ValueSet>>>,

    /// kind -> descendant kind -> set of that descendant's child kinds.
    pub shapes: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,

    /// kind -> tag key -> observed tag values, from `tag` descendants.
    pub tag_values: BTreeMap<String, BTreeMap<String, ValueSet>>,

    /// Distinct `user` attribute values seen across all arrivals.
    pub contributors: BTreeSet<String>,
}

impl AuditSummary {
    /// Create an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one element arrival.
    ///
    /// The element's own attributes feed the attribute inventory; its full
    /// subtree (itself included) feeds the shape, nested-attribute and
    /// key/value inventories. Each mapping level is created on first
    /// access, so the inventories only contain kinds actually observed.
    ///
    /// # Arguments
    /// * `node` - The arrived element with its subtree attached
    pub fn observe(&mut self, node: &RawNode) {
        let kind = node.kind.clone();

        for (key, value) in &node.attributes {
            self.attributes
                .entry(kind.clone())
                .or_default()
                .entry(key.clone())
                .or_default()
                .insert(value.clone());
        }

        if let Some(user) = node.attribute("user") {
            self.contributors.insert(user.to_string());
        }

        for descendant in node.descendants() {
            if !descendant.children.is_empty() {
                let child_kinds = self
                    .shapes
                    .entry(kind.clone())
                    .or_default()
                    .entry(descendant.kind.clone())
                    .or_default();
                for child in &descendant.children {
                    child_kinds.insert(child.kind.clone());
                }
            }

            for (key, value) in &descendant.attributes {
                self.nested_attributes
                    .entry(kind.clone())
                    .or_default()
                    .entry(descendant.kind.clone())
                    .or_default()
                    .entry(key.clone())
                    .or_default()
                    .insert(value.clone());
            }

            if descendant.kind == "tag" {
                // Audit is advisory; a tag missing k or v is the shaper's
                // problem, not ours.
                if let (Some(k), Some(v)) = (descendant.attribute("k"), descendant.attribute("v"))
                {
                    self.tag_values
                        .entry(kind.clone())
                        .or_default()
                        .entry(k.to_string())
                        .or_default()
                        .insert(v.to_string());
                }
            }
        }
    }

    /// Union of observed values for a tag key across `node` and `way` kinds.
    ///
    /// # Arguments
    /// * `key` - Tag key to collect (e.g. `addr:street`)
    #[must_use]
    pub fn observed_values(&self, key: &str) -> BTreeSet<&str> {
        ["node", "way"]
            .iter()
            .filter_map(|kind| self.tag_values.get(*kind))
            .filter_map(|keys| keys.get(key))
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// Distinct trailing street-type tokens needing normalization review.
    ///
    /// Inspects every observed `addr:street` value: when the trailing
    /// token is a known directional word the token before it is reported
    /// instead, mirroring the street normalization rule.
    ///
    /// # Arguments
    /// * `directions` - Directional words to look past
    #[must_use]
    pub fn street_types(&self, directions: &BTreeSet<&str>) -> BTreeSet<String> {
        let mut types = BTreeSet::new();
        for street in self.observed_values(STREET_KEY) {
            let tokens: Vec<&str> = street.split_whitespace().collect();
            let Some(&last) = tokens.last() else {
                continue;
            };
            if directions.contains(last) {
                if tokens.len() > 1 {
                    types.insert(tokens[tokens.len() - 2].to_string());
                }
            } else {
                types.insert(last.to_string());
            }
        }
        types
    }

    /// All distinct tag keys observed, across every element kind.
    #[must_use]
    pub fn tag_keys(&self) -> BTreeSet<&str> {
        self.tag_values
            .values()
            .flat_map(|keys| keys.keys())
            .map(String::as_str)
            .collect()
    }
}

/// Flag keys unsafe to promote to free-form output field names.
///
/// A key containing any of `= + / & < > ; ' " ? % # $ @ , .`, space, tab,
/// CR or LF is returned for manual review. Advisory only; never blocks
/// processing.
///
/// # Examples
/// ```
/// use osm_wrangler::audit::problem_keys;
///
/// let flagged = problem_keys(["addr:house number", "addr:housenumber"]);
/// assert_eq!(flagged, vec!["addr:house number"]);
/// ```
pub fn problem_keys<'a, I>(keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    keys.into_iter()
        .filter(|key| PROBLEM_CHARS.is_match(key))
        .collect()
}

/// Check whether a value is a Canadian postal code (`A1A 1A1`, space
/// optional, either case).
#[must_use]
pub fn is_valid_postal_code(value: &str) -> bool {
    POSTAL_CODE.is_match(value)
}

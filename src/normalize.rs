//! Value normalization tables and rules.
//!
//! Fixed, closed lookup tables mapping observed spellings to one canonical
//! form. The tables are known-incomplete by design: a value absent from a
//! table passes through unchanged, and the audit pass exists to find those
//! misses operationally. Table contents were derived from auditing the
//! Kitchener-Waterloo-Cambridge map export.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Compass directions trailing a street name, keyed case-sensitively.
pub static DIRECTIONS: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("S", "South"),
        ("s", "South"),
        ("South", "South"),
        ("E", "East"),
        ("e", "East"),
        ("East", "East"),
        ("W", "West"),
        ("w", "West"),
        ("West", "West"),
        ("N", "North"),
        ("n", "North"),
        ("North", "North"),
    ])
});

/// Street-type abbreviations and misspellings.
///
/// The `Crescent` -> `Cresent` entry is deliberate and must stay as-is:
/// downstream consumers already key off the exact output string.
pub static STREET_TYPES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("AVenue", "Avenue"),
        ("Ave", "Avenue"),
        ("Crescent", "Cresent"),
        ("Dr", "Drive"),
        ("Dr.", "Drive"),
        ("Rd", "Road"),
        ("St", "Street"),
        ("St.", "Street"),
        ("Steet", "Street"),
    ])
});

/// Province spellings, all collapsing to the two-letter code.
pub static PROVINCES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("ON", "ON"),
        ("Ontario", "ON"),
        ("on", "ON"),
        ("ontario", "ON"),
    ])
});

/// Known city aliases, keyed case-sensitively.
pub static CITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("City of Cambridge", "Cambridge"),
        ("City of Kitchener", "Kitchener"),
        ("kitchener", "Kitchener"),
        ("City of Waterloo", "Waterloo"),
        ("waterloo", "Waterloo"),
        ("St. Agatha", "Saint Agatha"),
    ])
});

/// Substitute a value through a lookup table, passing through on a miss.
///
/// # Arguments
/// * `value` - Raw value
/// * `table` - Lookup table to substitute through
///
/// # Returns
/// The canonical form, or `value` unchanged when the table has no entry
#[must_use]
pub fn canonical<'a>(value: &'a str, table: &HashMap<&'static str, &'static str>) -> &'a str {
    table.get(value).copied().unwrap_or(value)
}

/// Normalize a street name.
///
/// Splits on whitespace and inspects the trailing token:
/// - a directional word normalizes to its full spelling, and the token
///   before it is additionally run through the street-type table
///   (pass-through when unrecognized);
/// - otherwise a recognized street-type abbreviation normalizes in place;
/// - otherwise the tokens are left alone.
///
/// Tokens are rejoined with single spaces in every case.
///
/// # Examples
/// ```
/// use osm_wrangler::normalize::normalize_street;
///
/// assert_eq!(normalize_street("123 Main St"), "123 Main Street");
/// assert_eq!(normalize_street("45 Oak Ave S"), "45 Oak Avenue South");
/// assert_eq!(normalize_street("10 King Street"), "10 King Street");
/// ```
#[must_use]
pub fn normalize_street(street: &str) -> String {
    let mut tokens: Vec<&str> = street.split_whitespace().collect();
    let Some(&last) = tokens.last() else {
        return street.to_string();
    };
    let end = tokens.len() - 1;

    if DIRECTIONS.contains_key(last) {
        tokens[end] = canonical(last, &DIRECTIONS);
        if end > 0 {
            tokens[end - 1] = canonical(tokens[end - 1], &STREET_TYPES);
        }
    } else if STREET_TYPES.contains_key(last) {
        tokens[end] = canonical(last, &STREET_TYPES);
    }

    tokens.join(" ")
}

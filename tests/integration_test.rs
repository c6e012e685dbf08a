//! End-to-end integration tests for the wrangling pipeline.
//!
//! Runs the complete pipeline from XML parsing to NDJSON output using
//! fixture data from a Kitchener-Waterloo-Cambridge map extract.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::Value;
use tempfile::tempdir;

use osm_wrangler::normalize::DIRECTIONS;
use osm_wrangler::{audit_map, process_map, ProcessOptions};

/// Copy the fixture export into a scratch directory.
///
/// The output path is derived from the input path, so each test works on
/// its own copy.
fn stage_fixture(dir: &Path) -> PathBuf {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("kw_region.osm");
    let staged = dir.join("kw_region.osm");
    fs::copy(&fixture, &staged)
        .unwrap_or_else(|e| panic!("Failed to stage {}: {}", fixture.display(), e));
    staged
}

/// Run the processing pass and parse every output line.
fn run_pipeline(pretty: bool) -> Vec<Value> {
    let dir = tempdir().expect("tempdir");
    let input = stage_fixture(dir.path());

    let options = ProcessOptions {
        pretty,
        output: None,
    };
    let stats = process_map(&input, &options).expect("pipeline should succeed");
    assert_eq!(stats.output_path, dir.path().join("kw_region.osm.json"));

    let content = fs::read_to_string(&stats.output_path).expect("output readable");
    if pretty {
        // Pretty records span lines; split on the closing brace at column 0.
        content
            .split("\n}\n")
            .filter(|chunk| !chunk.trim().is_empty())
            .map(|chunk| {
                let rejoined = format!("{chunk}\n}}");
                serde_json::from_str(&rejoined).expect("valid JSON record")
            })
            .collect()
    } else {
        content
            .lines()
            .map(|line| serde_json::from_str(line).expect("valid JSON record"))
            .collect()
    }
}

#[test]
fn pipeline_emits_one_record_per_qualifying_element() {
    let records = run_pipeline(false);
    // Three nodes, one way, one relation; bounds and note do not qualify.
    assert_eq!(records.len(), 5);
    let kinds: Vec<&str> = records
        .iter()
        .map(|r| r["type"].as_str().expect("type is a string"))
        .collect();
    assert_eq!(kinds, ["node", "node", "node", "way", "relation"]);
}

#[test]
fn node_records_carry_position_and_provenance() {
    let records = run_pipeline(false);
    let cafe = &records[0];
    assert_eq!(cafe["id"], 316_656);
    assert_eq!(cafe["pos"][0], 43.4516);
    assert_eq!(cafe["pos"][1], -80.4925);
    assert_eq!(cafe["created"]["user"], "alice");
    assert_eq!(cafe["created"]["uid"], 7);
    assert_eq!(cafe["created"]["changeset"], 15_353_816);

    // Ways have no position.
    assert!(records[3].get("pos").is_none());
}

#[test]
fn addresses_are_assembled_and_normalized() {
    let records = run_pipeline(false);
    let cafe = &records[0];
    assert_eq!(cafe["addr"]["street"], "123 Main Street");
    assert_eq!(cafe["addr"]["city"], "Kitchener");
    assert_eq!(cafe["addr"]["province"], "ON");
    assert_eq!(cafe["addr"]["housenumber"], "250");
    assert_eq!(cafe["addr"]["postcode"], "N2L 3G1");
    // Fragments never leak out as top-level fields.
    assert!(cafe.get("addr:street").is_none());

    let oak = &records[2];
    assert_eq!(oak["addr"]["street"], "45 Oak Avenue South");
    assert_eq!(oak["addr"]["city"], "Waterloo");
    assert_eq!(oak["addr"]["province"], "ON");
}

#[test]
fn fixme_spellings_concatenate_in_order() {
    let records = run_pipeline(false);
    let store = &records[1];
    assert_eq!(store["FIXME"], "verify entrance\nFIXME: check hours");
    assert_eq!(store["name"], "Corner Store");
}

#[test]
fn way_preserves_reference_order_and_overwrites_repeated_keys() {
    let records = run_pipeline(false);
    let way = &records[3];
    assert_eq!(way["nd"], serde_json::json!([316_656, 316_658, 316_657]));
    // The second surface value wins.
    assert_eq!(way["surface"], "paved");
}

#[test]
fn relation_members_keep_order_and_drop_empty_roles() {
    let records = run_pipeline(false);
    let relation = &records[4];
    let members = relation["member"].as_array().expect("member list");
    assert_eq!(members.len(), 2);
    assert_eq!(members[0]["type"], "way");
    assert_eq!(members[0]["ref"], 20_217_162);
    assert_eq!(members[0]["role"], "outer");
    assert_eq!(members[1]["ref"], 316_656);
    assert!(members[1].get("role").is_none());
    // The kind slot stays authoritative over the multipolygon tag.
    assert_eq!(relation["type"], "relation");
    assert_eq!(relation["landuse"], "residential");
}

#[test]
fn pretty_mode_produces_equivalent_records() {
    let compact = run_pipeline(false);
    let pretty = run_pipeline(true);
    assert_eq!(compact, pretty);
}

#[test]
fn audit_covers_every_arrival() {
    let dir = tempdir().expect("tempdir");
    let input = stage_fixture(dir.path());
    let summary = audit_map(&input).expect("audit should succeed");

    // Kinds at every depth are observed, not just qualifying ones.
    for kind in ["node", "way", "relation", "bounds", "tag", "nd", "member", "note"] {
        assert!(
            summary.attributes.contains_key(kind) || kind == "note",
            "missing kind {kind}"
        );
    }

    // Set semantics: alice appears once despite multiple contributions.
    let expected: BTreeSet<String> = ["alice", "bob", "carol"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(summary.contributors, expected);

    // Street discovery: trailing tokens past directionals.
    let directions: BTreeSet<&str> = DIRECTIONS.keys().copied().collect();
    let types = summary.street_types(&directions);
    assert!(types.contains("St"));
    assert!(types.contains("Ave"));

    // Tag keys with unsafe characters are flagged, safe ones are not.
    let keys = summary.tag_keys();
    assert!(keys.contains("addr:street"));
    let flagged = osm_wrangler::audit::problem_keys(keys);
    assert!(flagged.is_empty());
}

#[test]
fn shaping_and_audit_read_the_same_stream_independently() {
    let dir = tempdir().expect("tempdir");
    let input = stage_fixture(dir.path());

    let summary = audit_map(&input).expect("audit pass");
    let stats = process_map(&input, &ProcessOptions::default()).expect("process pass");

    // The audit pass sees the same qualifying population the shaper emits.
    let qualifying: u64 = ["node", "way", "relation"]
        .iter()
        .filter_map(|kind| summary.attributes.get(*kind))
        .filter_map(|keys| keys.get("id"))
        .map(|ids| ids.len() as u64)
        .sum();
    assert_eq!(qualifying, stats.records_written);
}

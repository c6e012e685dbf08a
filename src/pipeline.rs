//! Pipeline drivers tying reader, shaper, sink and audit together.

use std::path::{Path, PathBuf};

use crate::audit::AuditSummary;
use crate::config::{output_path_for, validate_input_path};
use crate::error::Result;
use crate::json::{RecordFormat, RecordSink};
use crate::shape::shape;
use crate::xml::ElementReader;

/// Options for a processing run.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Emit indented records instead of compact ones.
    pub pretty: bool,
    /// Override the derived `<input>.json` output path.
    pub output: Option<PathBuf>,
}

/// Outcome of a processing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessStats {
    /// Depth-1 elements read from the input.
    pub elements_seen: u64,
    /// Qualifying records written to the sink.
    pub records_written: u64,
    /// Where the records landed.
    pub output_path: PathBuf,
}

/// Shape a map export into newline-delimited JSON records.
///
/// Streams the input one element subtree at a time, shapes each
/// qualifying element and writes the records in arrival order. A
/// malformed qualifying element aborts the run; the partially written
/// output is discarded rather than left under the expected name.
///
/// # Arguments
/// * `input` - Path to the map export
/// * `options` - Output format and path overrides
///
/// # Returns
/// Counts of elements seen and records written, plus the output path
pub fn process_map(input: &Path, options: &ProcessOptions) -> Result<ProcessStats> {
    validate_input_path(input)?;

    let output_path = options
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(input));
    let format = if options.pretty {
        RecordFormat::Pretty
    } else {
        RecordFormat::Compact
    };

    let mut reader = ElementReader::from_path(input)?;
    let mut sink = RecordSink::create(&output_path, format)?;
    let mut elements_seen: u64 = 0;

    while let Some(element) = reader.next_element()? {
        elements_seen += 1;
        if let Some(record) = shape(&element)? {
            sink.write(&record)?;
        }
        // `element` is dropped here; memory stays bounded by one subtree.
    }

    let records_written = sink.finish()?;
    tracing::info!(
        elements_seen,
        records_written,
        output = %output_path.display(),
        "Processing complete"
    );

    Ok(ProcessStats {
        elements_seen,
        records_written,
        output_path,
    })
}

/// Audit a map export without producing output records.
///
/// Every element of the document (at any depth, qualifying or not) is
/// observed as one arrival, mirroring an event-per-element parse.
///
/// # Arguments
/// * `input` - Path to the map export
///
/// # Returns
/// The accumulated inventories for programmatic inspection
pub fn audit_map(input: &Path) -> Result<AuditSummary> {
    validate_input_path(input)?;

    let mut reader = ElementReader::from_path(input)?;
    let mut summary = AuditSummary::new();

    while let Some(element) = reader.next_element()? {
        for arrival in element.descendants() {
            summary.observe(arrival);
        }
    }

    tracing::info!(
        kinds = summary.attributes.len(),
        contributors = summary.contributors.len(),
        "Audit complete"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::io::Write as _;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <node id="1" lat="43.4516" lon="-80.4925" user="alice" uid="7">
    <tag k="addr:street" v="123 Main St"/>
    <tag k="addr:state" v="on"/>
  </node>
  <node id="2" lat="43.46" lon="-80.52" user="bob" uid="8"/>
  <way id="3" user="alice" uid="7">
    <nd ref="1"/>
    <nd ref="2"/>
    <tag k="highway" v="residential"/>
  </way>
  <bounds minlat="43.0" minlon="-81.0" maxlat="44.0" maxlon="-80.0"/>
</osm>
"#;

    fn write_sample(dir: &Path) -> PathBuf {
        let input = dir.join("map.osm");
        let mut file = fs::File::create(&input).unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();
        input
    }

    #[test]
    fn test_process_map_writes_qualifying_records() {
        let dir = tempdir().unwrap();
        let input = write_sample(dir.path());

        let stats = process_map(&input, &ProcessOptions::default()).unwrap();
        assert_eq!(stats.elements_seen, 4);
        assert_eq!(stats.records_written, 3);
        assert_eq!(stats.output_path, dir.path().join("map.osm.json"));

        let content = fs::read_to_string(&stats.output_path).unwrap();
        let lines: Vec<serde_json::Value> = content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "node");
        assert_eq!(lines[0]["addr"]["street"], "123 Main Street");
        assert_eq!(lines[0]["addr"]["province"], "ON");
        assert_eq!(lines[2]["nd"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_process_map_respects_output_override() {
        let dir = tempdir().unwrap();
        let input = write_sample(dir.path());
        let output = dir.path().join("custom.ndjson");

        let options = ProcessOptions {
            pretty: false,
            output: Some(output.clone()),
        };
        let stats = process_map(&input, &options).unwrap();
        assert_eq!(stats.output_path, output);
        assert!(output.exists());
    }

    #[test]
    fn test_process_map_pretty_mode() {
        let dir = tempdir().unwrap();
        let input = write_sample(dir.path());

        let options = ProcessOptions {
            pretty: true,
            output: None,
        };
        let stats = process_map(&input, &options).unwrap();
        let content = fs::read_to_string(&stats.output_path).unwrap();
        assert!(content.contains("    \"id\": 1"));
    }

    #[test]
    fn test_process_map_fatal_error_leaves_no_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.osm");
        fs::write(
            &input,
            r#"<osm><node id="1" lat="x" lon="y"/></osm>"#,
        )
        .unwrap();

        let result = process_map(&input, &ProcessOptions::default());
        assert!(result.is_err());
        assert!(!dir.path().join("bad.osm.json").exists());
    }

    #[test]
    fn test_process_map_missing_input() {
        let result = process_map(Path::new("nope.osm"), &ProcessOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_audit_map_inventories() {
        let dir = tempdir().unwrap();
        let input = write_sample(dir.path());

        let summary = audit_map(&input).unwrap();
        // Nested elements are observed as arrivals of their own kind too.
        assert!(summary.attributes.contains_key("node"));
        assert!(summary.attributes.contains_key("tag"));
        assert!(summary.attributes.contains_key("bounds"));
        assert!(summary.attributes["node"]["user"].contains("alice"));
        assert_eq!(summary.contributors.len(), 2);
        assert!(summary.tag_values["node"]["addr:street"].contains("123 Main St"));
        assert!(summary.shapes["way"]["way"].contains("nd"));
    }
}

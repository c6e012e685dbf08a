//! Configuration constants and validation functions for the wrangler.

use std::path::{Path, PathBuf};

use crate::error::{Result, WranglerError};

/// Attribute-key prefix marking address fragments (e.g. `addr:street`).
pub const ADDR_PREFIX: &str = "addr:";

/// Indent used for pretty (human-readable) JSON output.
pub const PRETTY_INDENT: &[u8] = b"    ";

/// Extension appended to the input path to name the output file.
///
/// Appended to the full input name, so `map.osm` becomes `map.osm.json`.
/// Document-store import tooling keys off this convention.
pub const OUTPUT_EXTENSION: &str = "json";

/// Derive the output path for an input file.
///
/// # Arguments
/// * `input` - Path to the input map export
///
/// # Returns
/// The input path with `.json` appended to its full name
///
/// # Examples
/// ```
/// use std::path::Path;
/// use osm_wrangler::config::output_path_for;
///
/// let out = output_path_for(Path::new("data/map.osm"));
/// assert_eq!(out, Path::new("data/map.osm.json"));
/// ```
#[must_use]
pub fn output_path_for(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

/// Validate that an input path exists and is a regular file.
///
/// # Arguments
/// * `input` - Path to validate
///
/// # Returns
/// * `Ok(())` if the path is usable
/// * `Err(WranglerError::InputNotFound)` otherwise
pub fn validate_input_path(input: &Path) -> Result<()> {
    if input.is_file() {
        Ok(())
    } else {
        Err(WranglerError::InputNotFound(input.to_path_buf()))
    }
}

//! Newline-delimited JSON sink for shaped records.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::config::PRETTY_INDENT;
use crate::error::Result;
use crate::shape::ShapedRecord;

/// Record serialization mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFormat {
    /// No inter-field whitespace; one compact object per line.
    #[default]
    Compact,
    /// Human-readable, four-space indent.
    Pretty,
}

/// Serialize one record according to the chosen format.
///
/// # Arguments
/// * `record` - The record to serialize
/// * `format` - Compact or pretty output
///
/// # Returns
/// The serialized record, without a trailing newline
pub fn render_record(record: &ShapedRecord, format: RecordFormat) -> Result<String> {
    let rendered = match format {
        RecordFormat::Compact => serde_json::to_string(record)?,
        RecordFormat::Pretty => {
            let mut out = Vec::new();
            let formatter = PrettyFormatter::with_indent(PRETTY_INDENT);
            let mut serializer = Serializer::with_formatter(&mut out, formatter);
            record.serialize(&mut serializer)?;
            String::from_utf8_lossy(&out).into_owned()
        }
    };
    Ok(rendered)
}

/// Newline-delimited record writer with atomic completion.
///
/// Records are written to a hidden temp file next to the final path; the
/// rename happens only in [`RecordSink::finish`]. A run aborted by a fatal
/// shaping error therefore never leaves a half-written output file under
/// the expected name.
#[derive(Debug)]
pub struct RecordSink {
    writer: BufWriter<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
    format: RecordFormat,
    records: u64,
    finished: bool,
}

impl RecordSink {
    /// Create the sink, opening the temp file for writing.
    ///
    /// # Arguments
    /// * `output` - Final output path
    /// * `format` - Serialization mode for every record
    pub fn create(output: &Path, format: RecordFormat) -> Result<Self> {
        let temp_path = temp_path_for(output);
        let writer = BufWriter::new(File::create(&temp_path)?);
        Ok(Self {
            writer,
            temp_path,
            final_path: output.to_path_buf(),
            format,
            records: 0,
            finished: false,
        })
    }

    /// Append one record as a line.
    pub fn write(&mut self, record: &ShapedRecord) -> Result<()> {
        let rendered = render_record(record, self.format)?;
        self.writer.write_all(rendered.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    /// Flush, sync and atomically move the temp file into place.
    ///
    /// # Returns
    /// The number of records written
    pub fn finish(mut self) -> Result<u64> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;

        // On Windows, rename fails if the destination already exists
        #[cfg(target_os = "windows")]
        if self.final_path.exists() {
            fs::remove_file(&self.final_path)?;
        }

        fs::rename(&self.temp_path, &self.final_path)?;
        self.finished = true;
        Ok(self.records)
    }
}

impl Drop for RecordSink {
    fn drop(&mut self) {
        if !self.finished {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

/// Hidden sibling path used while the output is being written.
fn temp_path_for(output: &Path) -> PathBuf {
    let name = output
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!(".{name}.tmp"))
}

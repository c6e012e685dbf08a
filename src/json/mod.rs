//! NDJSON output generation for shaped records.

mod writer;

pub use writer::{render_record, RecordFormat, RecordSink};

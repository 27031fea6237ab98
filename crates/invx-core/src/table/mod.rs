//! Line-items table reconstruction from flattened OCR text.
//!
//! Segment lines, cut out the table region, coalesce wrapped lines into
//! rows, then tokenize each row into fields.

mod coalesce;
mod region;
mod segment;
mod tokenize;

pub use coalesce::{LineCoalescer, MAX_COALESCE_PASSES};
pub use region::{extract_from_lines, extract_table_lines};
pub use segment::segment_lines;
pub use tokenize::{
    tokenizer_for, ChunkTokenizer, NumberScanTokenizer, RowTokenizer, DEFAULT_COLUMN_GAP,
};

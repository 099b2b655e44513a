//! Export of stored rows into JSON documents.
//!
//! Three shapes are supported: batched documents nesting rows under their
//! grouping key, a flat JSON array with a CSV companion, and a raw dump of a
//! whole table that can be imported again.

mod batch;
mod csv;
mod driver;
mod flat;
mod grouping;
mod queries;
mod table;
mod types;
mod writer;

pub use batch::{batch_file_name, BatchPaginator, BatchWindow};
pub use driver::ExportDriver;
pub use flat::{render_flat_cell, FlatColumn, FlatKind, FLAT_COLUMNS};
pub use grouping::{build_batch_document, group_rows};
pub use types::{
    BatchDocument, EntityEnvelope, EntityItem, ExportRow, ExportSummary, FlatExportSummary,
    GroupKey,
};

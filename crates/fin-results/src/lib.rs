//! fin-results: result snapshots, tabular export and profile plots.

pub mod hash;
pub mod plot;
pub mod snapshot;
pub mod table;

pub use hash::compute_run_id;
pub use plot::{export_png, render_profile, write_png};
pub use snapshot::{ResultSnapshot, SnapshotCell};
pub use table::{ParsedTable, export_table, load_table, read_table, to_table_string, write_table};

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No result to export; run the solver first")]
    NoSnapshot,

    #[error("Malformed table at line {line}: {message}")]
    Parse { line: usize, message: String },
}

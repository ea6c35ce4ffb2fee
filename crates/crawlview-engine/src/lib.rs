// Engine module - filtering, sorting, pagination, detail projection and export
// This layer sits between the record store (index) and CLI presentation

pub mod detail;
pub mod export;
mod flatten;
pub mod query;

pub use detail::{DetailRow, DetailValue, SPECIAL_EMAIL_SOURCE, project_detail};
pub use export::{
    EXPORT_META_COLUMNS, ExportError, ExportTable, build_export_table, export_csv,
    export_file_name,
};
pub use flatten::flatten_value;
pub use query::{QueryEngine, QueryState, QueryView, SortDirection, SortKey};

//! Indexes from stored rows and fields to the cells displaying them.
//!
//! All three are rebuilt on reconciliation and only ever extended by the
//! mutation API.

mod main_column;
pub use main_column::MainColumnMapping;

mod main_row;
pub use main_row::MainRowMapping;

mod update;
pub use update::UpdateMapping;

/// The mapping tables of one view.
#[derive(Debug, Clone, Default)]
pub struct Mappings {
    pub update: UpdateMapping,
    pub main_columns: MainColumnMapping,
    pub main_rows: MainRowMapping,
}

mod attributes;
pub use attributes::{BoundAttributesMap, ConvertedBoundMapping};

pub mod handler;
pub use handler::{NoopHandler, ValueUpdate, ViewHandler};

mod loader;
pub use loader::{Builder, ViewLoader, DEFAULT_PER_FETCH};

pub mod mapping;
pub use mapping::{MainColumnMapping, MainRowMapping, UpdateMapping};

mod mutate;

mod pun;
pub use pun::Pun;

mod reconcile;
pub use reconcile::ReconcileInput;

pub mod view;
pub use view::{
    AddedRow, CombinedValue, CombinedView, EmptyRow, ExistingRow, RowLoadState, RowView,
    ValueInfo, ViewContext,
};

pub use gridline_core::{
    async_trait, provider, refs, result, schema, staging, AddedRowId, Error, Result, RowId,
    StagingSnapshot, Value,
};

mod error;
pub use error::{Error, IntoError};

pub mod provider;

pub mod refs;
pub use refs::{AddedRowId, RowId};

pub mod result;

pub mod schema;

pub mod staging;
pub use staging::StagingSnapshot;

pub mod value;
pub use value::Value;

/// A Result type alias that uses gridline's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;

use crate::{async_trait, result::ViewResult, schema::ViewArguments};

use std::fmt::Debug;

/// Range of result rows to fetch.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Chunk {
    pub offset: usize,

    /// `None` fetches every remaining row.
    pub limit: Option<usize>,
}

#[async_trait]
pub trait QueryProvider: Debug + Send + Sync + 'static {
    /// Execute a view and return its metadata together with the requested rows.
    async fn fetch_result(&self, args: &ViewArguments, chunk: Chunk) -> crate::Result<ViewResult>;
}

impl Chunk {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset,
            limit: Some(limit),
        }
    }

    pub fn all() -> Self {
        Self::default()
    }
}

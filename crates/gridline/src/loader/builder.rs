use super::{ViewLoader, DEFAULT_PER_FETCH};

use gridline_core::{
    bail,
    provider::{EntityProvider, LabelCache, QueryProvider},
    Result,
};
use std::sync::Arc;

#[derive(Default)]
pub struct Builder {
    query: Option<Arc<dyn QueryProvider>>,
    labels: Option<Arc<dyn LabelCache>>,
    entities: Option<Arc<dyn EntityProvider>>,

    /// Page size, defaults to [`DEFAULT_PER_FETCH`].
    per_fetch: Option<usize>,

    /// Whether entity metadata is fetched in the background after each load.
    /// On unless disabled.
    prefetch: Option<bool>,
}

impl Builder {
    pub fn query(&mut self, provider: Arc<dyn QueryProvider>) -> &mut Self {
        self.query = Some(provider);
        self
    }

    pub fn labels(&mut self, cache: Arc<dyn LabelCache>) -> &mut Self {
        self.labels = Some(cache);
        self
    }

    /// Prefetching needs an entity provider; without one it is skipped.
    pub fn entities(&mut self, provider: Arc<dyn EntityProvider>) -> &mut Self {
        self.entities = Some(provider);
        self
    }

    pub fn per_fetch(&mut self, rows: usize) -> &mut Self {
        self.per_fetch = Some(rows);
        self
    }

    pub fn prefetch(&mut self, enabled: bool) -> &mut Self {
        self.prefetch = Some(enabled);
        self
    }

    pub fn build(&mut self) -> Result<ViewLoader> {
        let Some(query) = self.query.clone() else {
            bail!("a query provider is required");
        };
        let Some(labels) = self.labels.clone() else {
            bail!("a label cache is required");
        };

        let per_fetch = self.per_fetch.unwrap_or(DEFAULT_PER_FETCH);
        if per_fetch == 0 {
            bail!("per_fetch must be at least 1");
        }

        Ok(ViewLoader {
            query,
            labels,
            entities: self.entities.clone(),
            per_fetch,
            prefetch: self.prefetch.unwrap_or(true),
        })
    }
}

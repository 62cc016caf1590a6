mod builder;
pub use builder::Builder;

use crate::{view::RowLoadState, CombinedView, ReconcileInput, ViewHandler};

use gridline_core::{
    provider::{Chunk, EntityProvider, LabelCache, QueryProvider},
    result::ViewResult,
    schema::{FieldName, ViewArguments},
    Error, Result, StagingSnapshot, Value,
};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Rows requested per page unless configured otherwise.
pub const DEFAULT_PER_FETCH: usize = 50;

/// Loads views from a [`QueryProvider`] and keeps them up to date.
#[derive(Debug, Clone)]
pub struct ViewLoader {
    query: Arc<dyn QueryProvider>,
    labels: Arc<dyn LabelCache>,
    entities: Option<Arc<dyn EntityProvider>>,
    per_fetch: usize,
    prefetch: bool,
}

impl ViewLoader {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn per_fetch(&self) -> usize {
        self.per_fetch
    }

    /// Fetches the first page of a view.
    pub async fn load<H: ViewHandler>(
        &self,
        args: ViewArguments,
        staging: &StagingSnapshot,
        handler: H,
    ) -> Result<CombinedView<H>> {
        self.load_with_defaults(args, IndexMap::new(), staging, handler)
            .await
    }

    /// Like [`load`](Self::load), with raw values for the template row.
    pub async fn load_with_defaults<H: ViewHandler>(
        &self,
        args: ViewArguments,
        default_raw_values: IndexMap<FieldName, Value>,
        staging: &StagingSnapshot,
        handler: H,
    ) -> Result<CombinedView<H>> {
        let limit = self.per_fetch;
        let result = self.fetch(&args, limit).await?;
        let input = ReconcileInput::new(args, result, staging)
            .default_raw_values(default_raw_values);
        let input = self.with_load_state(input, limit);

        let view = CombinedView::new(handler, self.labels.clone(), input);
        self.spawn_prefetch(&view);
        Ok(view)
    }

    /// Re-runs the query of `view` for the rows fetched so far.
    pub async fn reload<H: ViewHandler>(
        &self,
        view: CombinedView<H>,
        staging: &StagingSnapshot,
    ) -> Result<CombinedView<H>> {
        let limit = view
            .context()
            .row_load_state
            .fetched_row_count
            .max(self.per_fetch);
        self.refetch(view, staging, limit).await
    }

    /// Fetches one more page of `view`.
    pub async fn load_more<H: ViewHandler>(
        &self,
        view: CombinedView<H>,
        staging: &StagingSnapshot,
    ) -> Result<CombinedView<H>> {
        let state = view.context().row_load_state;
        if state.complete {
            trace!(fetched = state.fetched_row_count, "all rows already fetched");
            return Ok(view);
        }
        self.refetch(view, staging, state.fetched_row_count + self.per_fetch)
            .await
    }

    async fn refetch<H: ViewHandler>(
        &self,
        view: CombinedView<H>,
        staging: &StagingSnapshot,
        limit: usize,
    ) -> Result<CombinedView<H>> {
        let cx = view.context();
        let args = cx.args.clone();
        let default_raw_values = cx.default_raw_values.clone();

        let result = self.fetch(&args, limit).await?;
        let input = ReconcileInput::new(args, result, staging)
            .default_raw_values(default_raw_values);
        let input = self.with_load_state(input, limit);

        let view = view.reconcile(input);
        self.spawn_prefetch(&view);
        Ok(view)
    }

    async fn fetch(&self, args: &ViewArguments, limit: usize) -> Result<ViewResult> {
        debug!(source = ?args.source, limit, "fetching view");
        self.query
            .fetch_result(args, Chunk::new(0, limit))
            .await
            .map_err(|err| {
                if err.is_provider() {
                    err
                } else {
                    Error::provider(err)
                }
            })
    }

    fn with_load_state<'a>(&self, input: ReconcileInput<'a>, limit: usize) -> ReconcileInput<'a> {
        let fetched_row_count = input.result.rows.as_ref().map_or(0, Vec::len);
        input.row_load_state(RowLoadState {
            per_fetch: self.per_fetch,
            fetched_row_count,
            complete: fetched_row_count < limit,
        })
    }

    /// Warms the entity provider for the entities `view` edits. Failures
    /// only get logged.
    fn spawn_prefetch<H: ViewHandler>(&self, view: &CombinedView<H>) {
        let Some(entities) = self.entities.as_ref().filter(|_| self.prefetch) else {
            return;
        };

        for entity in view.prefetch_targets() {
            let entities = entities.clone();
            let entity = entity.clone();
            tokio::spawn(async move {
                if let Err(err) = entities.get_entity(&entity).await {
                    debug!(%entity, error = %err, "prefetching entity failed");
                }
            });
        }
    }
}

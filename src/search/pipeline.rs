//! Search request pipeline.
//!
//! # States
//! ```text
//! Received ──validate──▶ Validated ──catalog──▶ UpstreamFetched ──map──▶ Transformed ──▶ Responded
//!     │                      │                        │
//!     └──────────────────────┴────────────────────────┴──▶ Failed(SearchError)
//! ```
//!
//! Each call to [`SearchPipeline::step`] consumes one state and returns the
//! next; nothing is carried between requests.

use bytes::Bytes;

use crate::catalog::{CatalogQuery, ProductCatalog, UpstreamProduct};
use crate::search::error::SearchError;
use crate::search::request::{SearchRequest, SearchRequestBody};
use crate::search::transform::{summarize, ProductSummary};

/// Products requested per page when not configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 2;

/// One point in the life of a search request.
#[derive(Debug)]
pub enum PipelineState {
    /// Raw inbound body.
    Received(Bytes),
    Validated(SearchRequest),
    UpstreamFetched {
        request: SearchRequest,
        products: Vec<UpstreamProduct>,
    },
    Transformed(Vec<ProductSummary>),
    /// Terminal: ready to be written as the response body.
    Responded(Vec<ProductSummary>),
    /// Terminal.
    Failed(SearchError),
}

impl PipelineState {
    /// State name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Received(_) => "received",
            PipelineState::Validated(_) => "validated",
            PipelineState::UpstreamFetched { .. } => "upstream_fetched",
            PipelineState::Transformed(_) => "transformed",
            PipelineState::Responded(_) => "responded",
            PipelineState::Failed(_) => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Responded(_) | PipelineState::Failed(_))
    }
}

/// Validation → catalog fetch → transform, over any [`ProductCatalog`].
#[derive(Debug, Clone)]
pub struct SearchPipeline<C> {
    catalog: C,
    page_size: u32,
}

impl<C: ProductCatalog> SearchPipeline<C> {
    pub fn new(catalog: C, page_size: u32) -> Self {
        Self { catalog, page_size }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Advance one transition. Terminal states are returned unchanged.
    pub async fn step(&self, state: PipelineState) -> PipelineState {
        let from = state.name();

        let next = match state {
            PipelineState::Received(raw) => {
                match SearchRequestBody::from_slice(&raw).and_then(|body| body.validate()) {
                    Ok(request) => PipelineState::Validated(request),
                    Err(e) => PipelineState::Failed(e.into()),
                }
            }
            PipelineState::Validated(request) => {
                let query = CatalogQuery::for_page(request.query.clone(), request.page, self.page_size);
                match self.catalog.search(&query).await {
                    Ok(products) => PipelineState::UpstreamFetched { request, products },
                    Err(e) => PipelineState::Failed(e),
                }
            }
            PipelineState::UpstreamFetched { products, .. } => {
                PipelineState::Transformed(summarize(&products))
            }
            PipelineState::Transformed(summaries) => PipelineState::Responded(summaries),
            terminal => return terminal,
        };

        tracing::debug!(from, to = next.name(), "Search pipeline transition");
        next
    }

    /// Drive a raw request body to a terminal state.
    pub async fn run(&self, raw: Bytes) -> Result<Vec<ProductSummary>, SearchError> {
        let mut state = PipelineState::Received(raw);
        loop {
            state = match state {
                PipelineState::Responded(summaries) => return Ok(summaries),
                PipelineState::Failed(error) => return Err(error),
                state => self.step(state).await,
            };
        }
    }
}

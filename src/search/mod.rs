//! Product search subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/products body
//!     → request.rs (parse, validate, default page)
//!     → catalog (one upstream search)
//!     → transform.rs (title, description, final_price)
//!     → pipeline.rs (drives the states above)
//! ```
//!
//! Every failure becomes a [`SearchError`]; the HTTP layer decides how it
//! is rendered.

pub mod error;
pub mod pipeline;
pub mod request;
pub mod transform;

pub use error::{Field, SearchError, UpstreamError, ValidationError};
pub use pipeline::{PipelineState, SearchPipeline, DEFAULT_PAGE_SIZE};
pub use request::{SearchRequest, SearchRequestBody};
pub use transform::{summarize, ProductSummary};

//! Upstream product catalog subsystem.
//!
//! # Data Flow
//! ```text
//! SearchRequest (validated)
//!     → CatalogQuery::for_page (skip = (page-1) * limit)
//!     → client.rs (GET <base>/products/search?q=..&limit=..&skip=..)
//!     → extract_products (payload.products must be an array)
//!     → Vec<UpstreamProduct>
//! ```

pub mod client;
pub mod types;

pub use client::CatalogClient;
pub use types::{CatalogQuery, ProductCatalog, UpstreamProduct};

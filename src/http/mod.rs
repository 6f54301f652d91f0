//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup)
//!     → request.rs (request ID)
//!     → middleware/traffic_log.rs (messageIn, response capture)
//!     → handlers.rs (search pipeline)
//!     → response.rs (error envelope)
//!     → middleware/traffic_log.rs (messageOut)
//!     → Send to client
//! ```

pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::{ErrorEnvelope, ErrorResponse};
pub use server::{AppState, HttpServer};

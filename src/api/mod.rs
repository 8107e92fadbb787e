//! API Module
//!
//! HTTP handlers and routing for the web service.
//!
//! # Endpoints
//! - `GET /` and `GET /api/home` - Aggregated home page sections
//! - `GET /stats` - Feed cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

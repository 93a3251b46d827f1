//! API Module
//!
//! HTTP handlers and routing for the lookup service.
//!
//! # Endpoints
//! - `GET /?person=<title>` - Short description of a person
//! - `GET /stats` - Cache statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

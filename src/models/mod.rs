//! Request and Response models for the lookup API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

pub use requests::DescribeQuery;
pub use responses::{ErrorResponse, HealthResponse, ShortDescription, StatsResponse};

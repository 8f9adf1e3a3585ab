//! API Module
//!
//! HTTP handlers and routing for the object cache gateway.
//!
//! # Endpoints
//! - `PUT /set`, `GET /get/:key`, `DELETE /del/:key` - Scalar documents
//! - `PUT /hset`, `GET /hget/:key/:field`, `DELETE /hdel/:key/:field`,
//!   `GET /hgetall/:key`, `GET /hlen/:key` - Hash fields
//! - `PUT /expire`, `GET /ttl/:key` - Expiration
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;

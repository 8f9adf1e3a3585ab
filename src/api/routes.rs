//! API Routes
//!
//! Configures the Axum router with all gateway endpoints.

use axum::{
    routing::{delete, get, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    delete_handler, expire_handler, get_handler, hdel_handler, health_handler, hget_handler,
    hgetall_handler, hlen_handler, hset_handler, set_handler, ttl_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a document under a key
/// - `GET /get/:key` - Retrieve a document by key
/// - `DELETE /del/:key` - Delete a key
/// - `PUT /hset` - Store a document under a hash field
/// - `GET /hget/:key/:field` - Retrieve a hash field
/// - `DELETE /hdel/:key/:field` - Delete a hash field
/// - `GET /hgetall/:key` - Retrieve every field of a hash
/// - `GET /hlen/:key` - Count the fields of a hash
/// - `PUT /expire` - Set a key's expiration
/// - `GET /ttl/:key` - Remaining lifetime of a key
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/hset", put(hset_handler))
        .route("/hget/:key/:field", get(hget_handler))
        .route("/hdel/:key/:field", delete(hdel_handler))
        .route("/hgetall/:key", get(hgetall_handler))
        .route("/hlen/:key", get(hlen_handler))
        .route("/expire", put(expire_handler))
        .route("/ttl/:key", get(ttl_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

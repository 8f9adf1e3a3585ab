//! API Handlers
//!
//! HTTP request handlers for each gateway endpoint.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::cache::ObjectCache;
use crate::codec::Document;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, ExpireRequest, ExpireResponse, GetResponse, HashDeleteResponse,
    HashGetAllResponse, HashGetResponse, HashLenResponse, HashSetRequest, HashSetResponse,
    HealthResponse, SetRequest, SetResponse, TtlResponse,
};

/// Application state shared across all handlers.
///
/// The cache is shared behind an `Arc`; it needs no lock since every operation
/// is an independent request on the store connection.
#[derive(Clone)]
pub struct AppState {
    /// Object cache over the store connection
    pub cache: Arc<ObjectCache>,
}

impl AppState {
    /// Creates a new AppState with the given cache.
    pub fn new(cache: ObjectCache) -> Self {
        Self {
            cache: Arc::new(cache),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Connects to the configured store.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let cache = ObjectCache::create(&config.redis_url, config.connect_options()).await?;
        Ok(Self::new(cache))
    }
}

/// Handler for PUT /set
///
/// Stores a JSON document under a key with optional TTL.
pub async fn set_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SetRequest>, JsonRejection>,
) -> Result<Json<SetResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ack = state.cache.set(&req.key, &req.value, req.ttl).await?;

    Ok(Json(SetResponse::new(req.key, ack)))
}

/// Handler for GET /get/:key
///
/// Retrieves the document stored under a key.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get::<Document>(&key)
        .await?
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
///
/// Deletes a key, scalar or hash.
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let deleted = state.cache.del(&key).await?;
    if deleted == 0 {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for PUT /hset
///
/// Stores a JSON document under a field of a hash.
pub async fn hset_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<HashSetRequest>, JsonRejection>,
) -> Result<Json<HashSetResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let created = state.cache.hset(&req.key, &req.field, &req.value).await?;

    Ok(Json(HashSetResponse {
        key: req.key,
        field: req.field,
        created: created > 0,
    }))
}

/// Handler for GET /hget/:key/:field
pub async fn hget_handler(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
) -> Result<Json<HashGetResponse>> {
    let value = state
        .cache
        .hget::<Document>(&key, &field)
        .await?
        .ok_or_else(|| CacheError::NotFound(format!("{}/{}", key, field)))?;

    Ok(Json(HashGetResponse { key, field, value }))
}

/// Handler for DELETE /hdel/:key/:field
pub async fn hdel_handler(
    State(state): State<AppState>,
    Path((key, field)): Path<(String, String)>,
) -> Result<Json<HashDeleteResponse>> {
    let deleted = state.cache.hdel(&key, &field).await?;
    if deleted == 0 {
        return Err(CacheError::NotFound(format!("{}/{}", key, field)));
    }

    Ok(Json(HashDeleteResponse::new(key, field, deleted)))
}

/// Handler for GET /hgetall/:key
///
/// Returns every field of a hash; a missing hash has no fields.
pub async fn hgetall_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HashGetAllResponse>> {
    let fields = state.cache.hgetall::<Document>(&key).await?;

    Ok(Json(HashGetAllResponse { key, fields }))
}

/// Handler for GET /hlen/:key
pub async fn hlen_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<HashLenResponse>> {
    let len = state.cache.hlen(&key).await?;

    Ok(Json(HashLenResponse { key, len }))
}

/// Handler for PUT /expire
///
/// Sets or replaces the expiration of an existing key.
pub async fn expire_handler(
    State(state): State<AppState>,
    payload: std::result::Result<Json<ExpireRequest>, JsonRejection>,
) -> Result<Json<ExpireResponse>> {
    let Json(req) = payload?;
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    if !state.cache.expire(&req.key, req.ttl).await? {
        return Err(CacheError::NotFound(req.key));
    }

    Ok(Json(ExpireResponse {
        key: req.key,
        ttl: req.ttl,
    }))
}

/// Handler for GET /ttl/:key
///
/// Missing keys are reported in the body rather than as 404.
pub async fn ttl_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<TtlResponse>> {
    let ttl = state.cache.ttl(&key).await?;

    Ok(Json(TtlResponse::new(key, ttl)))
}

/// Handler for GET /health
///
/// Reports the store connection state.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::from_state(state.cache.state()))
}

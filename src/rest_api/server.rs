//! # REST API HTTP Server
//!
//! Axum router exposing every registered resource:
//!
//! | Method | Path             | Result                            |
//! |--------|------------------|-----------------------------------|
//! | GET    | `/R`             | `{"items": [...], "total": n}`    |
//! | GET    | `/R/schema`      | `{"schema": {...}}`               |
//! | GET    | `/R/{id}`        | record                            |
//! | POST   | `/R`             | 201 + created record              |
//! | PUT    | `/R/{id}`        | merged record                     |
//! | PATCH  | `/R/{id}`        | merged record                     |
//! | DELETE | `/R/{id}`        | 204                               |
//!
//! Write routes are not mounted for read-only resources, so they answer 405.
//! Store calls block on file I/O and locks and run on the blocking pool.

use std::io;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::{HttpServerConfig, Resource, ResourceRegistry};
use crate::schema::validate_payload;
use crate::storage::{Record, StoreResult};

use super::errors::{RestError, RestResult};
use super::filter::run_query;
use super::parser::QueryParams;
use super::response::{ListResponse, SchemaResponse};

/// REST API server over a resource registry
pub struct RestServer {
    registry: Arc<ResourceRegistry>,
}

impl RestServer {
    pub fn new(registry: ResourceRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn registry(&self) -> &ResourceRegistry {
        &self.registry
    }

    /// Build the Axum router
    pub fn router(&self) -> Router {
        let mut router = Router::new();
        for resource in self.registry.iter() {
            router = router.merge(resource_routes(resource.clone()));
        }

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        router
            .fallback(fallback_handler)
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Bind and serve until Ctrl+C.
    pub async fn start(self, config: &HttpServerConfig) -> io::Result<()> {
        let addr = config.socket_addr();
        let listener = TcpListener::bind(&addr).await?;

        info!(addr = %addr, resources = self.registry.len(), "csv-server listening");
        for resource in self.registry.iter() {
            info!(
                resource = %resource.name,
                file = %resource.file_path().display(),
                readonly = resource.readonly,
                "serving /{}",
                resource.name
            );
        }

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

fn resource_routes(resource: Resource) -> Router {
    let base = format!("/{}", resource.name);
    let schema = format!("/{}/schema", resource.name);
    let item = format!("/{}/:id", resource.name);

    let (collection, single) = if resource.readonly {
        (get(list_handler), get(get_handler))
    } else {
        (
            get(list_handler).post(create_handler),
            get(get_handler)
                .put(update_handler)
                .patch(update_handler)
                .delete(delete_handler),
        )
    };

    Router::new()
        .route(&base, collection)
        .route(&schema, get(schema_handler))
        .route(&item, single)
        .with_state(resource)
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("received Ctrl+C, shutting down");
    }
}

/// Runs a store call on the blocking pool.
async fn blocking<T, F>(f: F) -> RestResult<T>
where
    F: FnOnce() -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RestError::Internal(e.to_string()))?
        .map_err(RestError::from)
}

/// List records handler
async fn list_handler(
    State(resource): State<Resource>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> RestResult<Json<ListResponse<Record>>> {
    let params = QueryParams::parse(&pairs)?;
    let store = resource.store.clone();
    let table = blocking(move || store.load()).await?;
    Ok(Json(run_query(table.records, &params)))
}

/// Get single record handler
async fn get_handler(
    State(resource): State<Resource>,
    Path(id): Path<String>,
) -> RestResult<Json<Record>> {
    let store = resource.store.clone();
    let record = blocking(move || store.get(&id)).await?;
    Ok(Json(record))
}

/// Inferred schema handler
async fn schema_handler(State(resource): State<Resource>) -> RestResult<Json<SchemaResponse>> {
    let store = resource.store.clone();
    let schema = blocking(move || store.schema()).await?;
    Ok(Json(SchemaResponse::new(schema)))
}

/// Create record handler
async fn create_handler(
    State(resource): State<Resource>,
    Json(body): Json<Value>,
) -> RestResult<(StatusCode, Json<Record>)> {
    let payload = validated(&resource, body).await?;
    let store = resource.store.clone();
    let record = blocking(move || store.create(payload)).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Update record handler (PUT and PATCH)
async fn update_handler(
    State(resource): State<Resource>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> RestResult<Json<Record>> {
    let payload = validated(&resource, body).await?;
    let store = resource.store.clone();
    let record = blocking(move || store.update(&id, payload)).await?;
    Ok(Json(record))
}

/// Delete record handler
async fn delete_handler(
    State(resource): State<Resource>,
    Path(id): Path<String>,
) -> RestResult<StatusCode> {
    let store = resource.store.clone();
    blocking(move || store.delete(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn fallback_handler() -> RestError {
    RestError::NotFound
}

/// Coerces a request body against the resource's current schema.
async fn validated(resource: &Resource, body: Value) -> RestResult<Record> {
    let store = resource.store.clone();
    let schema = blocking(move || store.schema()).await?;
    Ok(validate_payload(&body, &schema)?)
}

//! REST API for vecstore.
//!
//! Exposes a shared [`Store`] through JSON endpoints. The store lives in
//! `web::Data` for the lifetime of the server; every request names the
//! keyspace it targets.
//!
//! ## Endpoints
//!
//! - `POST /create` - Create and register a keyspace (dimension must be > 0)
//! - `POST /drop` - Remove every keyspace with a name
//! - `GET  /keyspaces` - List registered keyspaces
//! - `POST /insert` - Append a batch of vectors (all or nothing)
//! - `POST /remove` - Remove a vector by index
//! - `POST /get` - Retrieve vectors by index
//! - `POST /nearest` - Nearest neighbor of a query
//! - `POST /threshold` - Neighbors whose similarity meets a threshold
//!
//! Failures answer with `{"error": "..."}` and a status derived from the error
//! kind: 404 for unknown keyspaces, 409 for searches on an empty keyspace and
//! 400 for dimension or index errors.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use actix_web::{web, App, HttpServer};
//! use vecstore::Store;
//!
//! #[actix_web::main]
//! async fn main() -> std::io::Result<()> {
//!     let store = web::Data::new(Store::new("default"));
//!     HttpServer::new(move || {
//!         App::new()
//!             .app_data(store.clone())
//!             .configure(vecstore::server::config)
//!     })
//!     .bind("0.0.0.0:7878")?
//!     .run()
//!     .await
//! }
//! ```

use crate::{Error, Keyspace, Neighbor, Store, Vector};
use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use tracing::debug;


// --- Request structs ---

#[derive(Deserialize)]
struct CreateRequest {
    keyspace: String,
    dimension: usize,
}

#[derive(Deserialize)]
struct DropRequest {
    keyspace: String,
}

#[derive(Deserialize)]
struct InsertRequest {
    keyspace: String,
    vectors: Vec<Vector>,
}

#[derive(Deserialize)]
struct RemoveRequest {
    keyspace: String,
    index: usize,
}

#[derive(Deserialize)]
struct GetRequest {
    keyspace: String,
    indices: Vec<usize>,
}

#[derive(Deserialize)]
struct NearestRequest {
    keyspace: String,
    query: Vector,
}

#[derive(Deserialize)]
struct ThresholdRequest {
    keyspace: String,
    query: Vector,
    threshold: f64,
}

// --- Response structs ---

#[derive(Serialize)]
struct KeyspaceInfo {
    name: String,
    dimension: usize,
    size: usize,
}

#[derive(Serialize)]
struct KeyspacesResponse {
    store: String,
    keyspaces: Vec<KeyspaceInfo>,
}

#[derive(Serialize)]
struct DropResponse {
    removed: usize,
}

#[derive(Serialize)]
struct InsertResponse {
    inserted: usize,
    size: usize,
}

#[derive(Serialize)]
struct RemoveResponse {
    removed: Vector,
    size: usize,
}

#[derive(Serialize)]
struct GetResponse {
    results: Vec<GetResult>,
}

#[derive(Serialize)]
struct GetResult {
    index: usize,
    values: Option<Vector>,
}

#[derive(Serialize)]
struct NearestResponse {
    index: usize,
    distance: f64,
    values: Vector,
}

#[derive(Serialize)]
struct ThresholdResponse {
    matches: Vec<Neighbor>,
}


/// Helper function for turning a core error into a JSON response
fn error_response(error: &Error) -> HttpResponse {
    let body = serde_json::json!({"error": error.to_string()});
    match error {
        Error::NotFound(_) => HttpResponse::NotFound().json(body),
        Error::EmptyCollection(_) => HttpResponse::Conflict().json(body),
        Error::DimensionMismatch { .. } | Error::OutOfRange { .. } => HttpResponse::BadRequest().json(body),
    }
}

fn keyspace_info(ks: &Keyspace) -> KeyspaceInfo {
    KeyspaceInfo { name: ks.name().to_string(), dimension: ks.dimension(), size: ks.size() }
}

// --- Handlers ---

async fn create_handler(store: web::Data<Store>, body: web::Json<CreateRequest>) -> impl Responder {
    if body.dimension == 0 {
        return HttpResponse::BadRequest().json(serde_json::json!({"error": "dimension must be a positive integer"}));
    }

    let ks = store.create_keyspace(body.dimension, body.keyspace.clone());

    HttpResponse::Ok().json(keyspace_info(&ks))
}

async fn drop_handler(store: web::Data<Store>, body: web::Json<DropRequest>) -> impl Responder {
    let removed = store.remove_keyspace(&body.keyspace);

    HttpResponse::Ok().json(DropResponse { removed })
}

async fn keyspaces_handler(store: web::Data<Store>) -> impl Responder {
    let keyspaces = store.keyspaces()
        .iter()
        .map(|ks| keyspace_info(ks))
        .collect();

    HttpResponse::Ok().json(KeyspacesResponse { store: store.name().to_string(), keyspaces })
}

async fn insert_handler(store: web::Data<Store>, body: web::Json<InsertRequest>) -> impl Responder {
    let ks = match store.get_keyspace(&body.keyspace) {
        Ok(ks) => ks,
        Err(e) => return error_response(&e),
    };

    let body = body.into_inner();
    let inserted = body.vectors.len();
    if let Err(e) = ks.batch_add_vectors(body.vectors) {
        return error_response(&e);
    }

    HttpResponse::Ok().json(InsertResponse { inserted, size: ks.size() })
}

async fn remove_handler(store: web::Data<Store>, body: web::Json<RemoveRequest>) -> impl Responder {
    let ks = match store.get_keyspace(&body.keyspace) {
        Ok(ks) => ks,
        Err(e) => return error_response(&e),
    };

    match ks.remove_vector(body.index) {
        Ok(removed) => HttpResponse::Ok().json(RemoveResponse { removed, size: ks.size() }),
        Err(e) => error_response(&e),
    }
}

async fn get_handler(store: web::Data<Store>, body: web::Json<GetRequest>) -> impl Responder {
    let ks = match store.get_keyspace(&body.keyspace) {
        Ok(ks) => ks,
        Err(e) => return error_response(&e),
    };

    let results = body.indices
        .iter()
        .map(|&index| GetResult { index, values: ks.get_vector(index).ok() })
        .collect();

    HttpResponse::Ok().json(GetResponse { results })
}

async fn nearest_handler(store: web::Data<Store>, body: web::Json<NearestRequest>) -> impl Responder {
    let ks = match store.get_keyspace(&body.keyspace) {
        Ok(ks) => ks,
        Err(e) => return error_response(&e),
    };

    match ks.find_nearest_match(&body.query) {
        Ok(m) => {
            debug!(keyspace = %body.keyspace, index = m.index, "nearest neighbor served");
            HttpResponse::Ok().json(NearestResponse { index: m.index, distance: m.distance, values: m.vector })
        }
        Err(e) => error_response(&e),
    }
}

async fn threshold_handler(store: web::Data<Store>, body: web::Json<ThresholdRequest>) -> impl Responder {
    let ks = match store.get_keyspace(&body.keyspace) {
        Ok(ks) => ks,
        Err(e) => return error_response(&e),
    };

    match ks.find_neighbors_above_threshold(&body.query, body.threshold) {
        Ok(matches) => HttpResponse::Ok().json(ThresholdResponse { matches }),
        Err(e) => error_response(&e),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/create").route(web::post().to(create_handler)))
       .service(web::resource("/drop").route(web::post().to(drop_handler)))
       .service(web::resource("/keyspaces").route(web::get().to(keyspaces_handler)))
       .service(web::resource("/insert").route(web::post().to(insert_handler)))
       .service(web::resource("/remove").route(web::post().to(remove_handler)))
       .service(web::resource("/get").route(web::post().to(get_handler)))
       .service(web::resource("/nearest").route(web::post().to(nearest_handler)))
       .service(web::resource("/threshold").route(web::post().to(threshold_handler)));
}

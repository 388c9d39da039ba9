use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::{header::SET_COOKIE, HeaderMap, Method, StatusCode, Uri},
    response::AppendHeaders,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    #[serde(default)]
    pub user_id: u64,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPatch {
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostFilter {
    pub user_id: Option<u64>,
}

/// Everything the server saw about a request, as returned by `/echo`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub path: String,
    pub query: BTreeMap<String, String>,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

#[derive(Default)]
pub struct Store {
    posts: RwLock<BTreeMap<u64, Post>>,
    next_id: AtomicU64,
}

pub type Db = Arc<Store>;

pub fn app() -> Router {
    let db: Db = Arc::new(Store::default());
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{id}",
            get(get_post)
                .put(replace_post)
                .patch(patch_post)
                .delete(delete_post),
        )
        .route("/bulk", get(bulk_posts))
        .route("/echo", any(echo))
        .route("/slow", get(slow))
        .route("/cookies", get(cookies))
        .route("/status/{code}", any(status))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!(%addr, "mock server listening");
    }
    axum::serve(listener, app()).await
}

async fn list_posts(State(db): State<Db>, Query(filter): Query<PostFilter>) -> Json<Vec<Post>> {
    let posts = db.posts.read().await;
    Json(
        posts
            .values()
            .filter(|p| filter.user_id.map_or(true, |uid| p.user_id == uid))
            .cloned()
            .collect(),
    )
}

async fn create_post(State(db): State<Db>, Json(input): Json<NewPost>) -> (StatusCode, Json<Post>) {
    let id = db.next_id.fetch_add(1, Ordering::SeqCst) + 1;
    let post = Post {
        id,
        user_id: input.user_id,
        title: input.title,
        body: input.body,
    };
    db.posts.write().await.insert(id, post.clone());
    tracing::debug!(id, "post created");
    (StatusCode::CREATED, Json(post))
}

async fn get_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Post>, StatusCode> {
    let posts = db.posts.read().await;
    posts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn replace_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<NewPost>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.posts.write().await;
    let post = posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    post.user_id = input.user_id;
    post.title = input.title;
    post.body = input.body;
    Ok(Json(post.clone()))
}

async fn patch_post(
    State(db): State<Db>,
    Path(id): Path<u64>,
    Json(input): Json<PostPatch>,
) -> Result<Json<Post>, StatusCode> {
    let mut posts = db.posts.write().await;
    let post = posts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(user_id) = input.user_id {
        post.user_id = user_id;
    }
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(body) = input.body {
        post.body = body;
    }
    Ok(Json(post.clone()))
}

async fn delete_post(State(db): State<Db>, Path(id): Path<u64>) -> Result<StatusCode, StatusCode> {
    let mut posts = db.posts.write().await;
    posts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or(StatusCode::NOT_FOUND)
}

#[derive(Deserialize)]
struct BulkQuery {
    n: u64,
}

/// `n` generated posts; nothing is stored.
async fn bulk_posts(Query(q): Query<BulkQuery>) -> Json<Vec<Post>> {
    Json(
        (0..q.n)
            .map(|i| Post {
                id: i,
                user_id: i % 10,
                title: format!("Title {i}"),
                body: String::new(),
            })
            .collect(),
    )
}

async fn echo(
    method: Method,
    uri: Uri,
    Query(query): Query<BTreeMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Json<Echo> {
    let headers = headers
        .iter()
        .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
        .collect();
    Json(Echo {
        method: method.to_string(),
        path: uri.path().to_string(),
        query,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

#[derive(Deserialize)]
struct SlowQuery {
    ms: u64,
}

async fn slow(Query(q): Query<SlowQuery>) -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(q.ms)).await;
    Json(serde_json::json!({ "slept_ms": q.ms }))
}

async fn cookies() -> (
    AppendHeaders<[(axum::http::HeaderName, &'static str); 2]>,
    Json<serde_json::Value>,
) {
    (
        AppendHeaders([
            (SET_COOKIE, "session=abc123; Path=/; HttpOnly"),
            (SET_COOKIE, "theme=dark; Path=/; Max-Age=3600"),
        ]),
        Json(serde_json::json!({ "ok": true })),
    )
}

async fn status(Path(code): Path<u16>) -> (StatusCode, String) {
    match StatusCode::from_u16(code) {
        Ok(status) => (status, status.canonical_reason().unwrap_or("").to_string()),
        Err(_) => (StatusCode::BAD_REQUEST, format!("invalid status {code}")),
    }
}

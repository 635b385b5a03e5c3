//! In-memory stand-in for the petstore service, used by integration tests.
//!
//! Mirrors the demo service's tolerant behavior: writes accept odd values
//! (negative pet ids, unknown statuses), missing ids are assigned, lookups of
//! unknown ids answer 404 with a JSON error envelope, and login accepts any
//! credentials. All routes live under `/v2`.

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(default)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub pet_id: i64,
    #[serde(default)]
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default)]
    pub complete: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default)]
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_status: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiMessage {
    pub code: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

impl ApiMessage {
    fn new(code: i32, kind: &str, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            code,
            kind: kind.to_string(),
            message: message.into(),
        })
    }

    fn ok(message: impl Into<String>) -> Json<Self> {
        Self::new(200, "unknown", message)
    }
}

#[derive(Debug, Default)]
pub struct Store {
    pets: BTreeMap<i64, Pet>,
    orders: BTreeMap<i64, Order>,
    users: BTreeMap<String, User>,
    next_id: i64,
    sessions: u64,
}

impl Store {
    fn assign_id(&mut self, id: i64) -> i64 {
        if id != 0 {
            return id;
        }
        self.next_id += 1;
        9_000_000_000 + self.next_id
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let api = Router::new()
        .route("/pet", post(add_pet).put(update_pet))
        .route("/pet/findByStatus", get(find_by_status))
        .route("/pet/findByTags", get(find_by_tags))
        .route("/pet/{id}", get(get_pet).delete(delete_pet))
        .route("/pet/{id}/uploadImage", post(upload_image))
        .route("/store/order", post(place_order))
        .route("/store/order/{id}", get(get_order).delete(delete_order))
        .route("/store/inventory", get(inventory))
        .route("/user", post(create_user))
        .route("/user/createWithList", post(create_users))
        .route("/user/login", get(login))
        .route("/user/logout", get(logout))
        .route(
            "/user/{username}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .with_state(db);
    Router::new().nest("/v2", api)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn add_pet(State(db): State<Db>, Json(mut pet): Json<Pet>) -> Json<Pet> {
    let mut store = db.write().await;
    pet.id = store.assign_id(pet.id);
    debug!(id = pet.id, "stored pet");
    store.pets.insert(pet.id, pet.clone());
    Json(pet)
}

async fn update_pet(State(db): State<Db>, Json(pet): Json<Pet>) -> Json<Pet> {
    add_pet(State(db), Json(pet)).await
}

async fn find_by_status(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Pet>> {
    let wanted: Vec<String> = values_of(&params, "status");
    let store = db.read().await;
    Json(
        store
            .pets
            .values()
            .filter(|pet| pet.status.as_ref().is_some_and(|s| wanted.contains(s)))
            .cloned()
            .collect(),
    )
}

async fn find_by_tags(
    State(db): State<Db>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Pet>> {
    let wanted: Vec<String> = values_of(&params, "tags");
    let store = db.read().await;
    Json(
        store
            .pets
            .values()
            .filter(|pet| {
                pet.tags
                    .iter()
                    .any(|tag| tag.name.as_ref().is_some_and(|n| wanted.contains(n)))
            })
            .cloned()
            .collect(),
    )
}

/// Collect every value of `key`, splitting comma-separated lists.
fn values_of(params: &[(String, String)], key: &str) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .flat_map(|(_, v)| v.split(',').map(str::to_string))
        .collect()
}

async fn get_pet(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    match db.read().await.pets.get(&id) {
        Some(pet) => Json(pet.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            ApiMessage::new(1, "error", "Pet not found"),
        )
            .into_response(),
    }
}

async fn delete_pet(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    match db.write().await.pets.remove(&id) {
        Some(_) => ApiMessage::ok(id.to_string()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn upload_image(Path(id): Path<i64>, mut multipart: Multipart) -> Response {
    let mut metadata = "null".to_string();
    let mut uploaded = None;
    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let name = field.name().unwrap_or_default().to_string();
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let bytes = match field.bytes().await {
                    Ok(bytes) => bytes,
                    Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
                };
                match name.as_str() {
                    "file" => uploaded = Some((file_name, bytes.len())),
                    "additionalMetadata" => {
                        metadata = String::from_utf8_lossy(&bytes).into_owned();
                    }
                    _ => {}
                }
            }
            Ok(None) => break,
            Err(e) => return (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
        }
    }

    match uploaded {
        Some((file_name, len)) => {
            debug!(id, %file_name, len, "received upload");
            ApiMessage::ok(format!(
                "additionalMetadata: {metadata}\nFile uploaded to ./{file_name}, {len} bytes"
            ))
            .into_response()
        }
        None => (
            StatusCode::BAD_REQUEST,
            ApiMessage::new(400, "error", "missing file part"),
        )
            .into_response(),
    }
}

async fn place_order(State(db): State<Db>, Json(mut order): Json<Order>) -> Json<Order> {
    let mut store = db.write().await;
    order.id = store.assign_id(order.id);
    store.orders.insert(order.id, order.clone());
    Json(order)
}

async fn get_order(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    match db.read().await.orders.get(&id) {
        Some(order) => Json(order.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            ApiMessage::new(1, "error", "Order not found"),
        )
            .into_response(),
    }
}

async fn delete_order(State(db): State<Db>, Path(id): Path<i64>) -> Response {
    match db.write().await.orders.remove(&id) {
        Some(_) => ApiMessage::ok(id.to_string()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            ApiMessage::new(404, "unknown", "Order Not Found"),
        )
            .into_response(),
    }
}

async fn inventory(State(db): State<Db>) -> Json<HashMap<String, i64>> {
    let store = db.read().await;
    let mut counts = HashMap::new();
    for pet in store.pets.values() {
        if let Some(status) = &pet.status {
            *counts.entry(status.clone()).or_insert(0) += 1;
        }
    }
    Json(counts)
}

async fn create_user(State(db): State<Db>, Json(mut user): Json<User>) -> Response {
    let mut store = db.write().await;
    user.id = store.assign_id(user.id);
    let id = user.id;
    let key = user.username.clone().unwrap_or_default();
    store.users.insert(key, user);
    ApiMessage::ok(id.to_string()).into_response()
}

async fn create_users(State(db): State<Db>, Json(users): Json<Vec<User>>) -> Json<ApiMessage> {
    let mut store = db.write().await;
    for mut user in users {
        user.id = store.assign_id(user.id);
        let key = user.username.clone().unwrap_or_default();
        store.users.insert(key, user);
    }
    ApiMessage::ok("ok")
}

async fn login(
    State(db): State<Db>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let username = params.get("username").cloned().unwrap_or_default();
    let mut store = db.write().await;
    store.sessions += 1;
    let session = 1_700_000_000_000u64 + store.sessions;
    debug!(%username, session, "login");

    let expires = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() + 3600)
        .unwrap_or_default();
    let mut headers = HeaderMap::new();
    headers.insert("X-Rate-Limit", HeaderValue::from_static("5000"));
    headers.insert("X-Expires-After", HeaderValue::from(expires));
    (
        headers,
        ApiMessage::ok(format!("logged in user session:{session}")),
    )
        .into_response()
}

async fn logout() -> Json<ApiMessage> {
    ApiMessage::ok("ok")
}

async fn get_user(State(db): State<Db>, Path(username): Path<String>) -> Response {
    match db.read().await.users.get(&username) {
        Some(user) => Json(user.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            ApiMessage::new(1, "error", "User not found"),
        )
            .into_response(),
    }
}

async fn update_user(
    State(db): State<Db>,
    Path(username): Path<String>,
    Json(mut user): Json<User>,
) -> Json<ApiMessage> {
    let mut store = db.write().await;
    let previous = store.users.remove(&username);
    user.id = match previous {
        Some(old) if user.id == 0 => old.id,
        _ => store.assign_id(user.id),
    };
    let id = user.id;
    let key = user.username.clone().unwrap_or(username);
    store.users.insert(key, user);
    ApiMessage::ok(id.to_string())
}

async fn delete_user(State(db): State<Db>, Path(username): Path<String>) -> Response {
    match db.write().await.users.remove(&username) {
        Some(_) => ApiMessage::ok(username).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

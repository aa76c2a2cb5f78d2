// tests/common/mod.rs
// Mock tracker backend for integration tests

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use student_tracker::api::{ApiClient, NavigationLog};
use student_tracker::auth::{SessionManager, TokenStore};
use tokio::net::TcpListener;
use url::Url;

pub const PASSWORD: &str = "rahasia";

/// What the mock saw and how it should behave
#[derive(Default)]
pub struct MockState {
    /// Answer every authenticated endpoint with 401
    pub reject_all: AtomicBool,
    /// Issue tokens that are already expired
    pub issue_expired: AtomicBool,
    /// Answer a correct login with this `data` payload instead of a token
    pub login_data: Mutex<Option<Value>>,
    /// Authorization headers received, in order
    pub auth_headers: Mutex<Vec<Option<String>>>,
    pub last_query: Mutex<HashMap<String, String>>,
    pub last_body: Mutex<Option<Value>>,
    pub last_upload: Mutex<Option<(String, usize)>>,
    pub hits: AtomicUsize,
}

pub struct MockBackend {
    pub url: Url,
    pub state: Arc<MockState>,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn sign(sub: &str, id: Value, role: &str, exp: i64) -> String {
    encode(
        &Header::default(),
        &json!({"sub": sub, "id": id, "role": role, "exp": exp}),
        &EncodingKey::from_secret(b"mock-backend-secret"),
    )
    .unwrap()
}

pub fn future_exp() -> i64 {
    chrono::Utc::now().timestamp() + 3600
}

fn role_for(user: &str) -> Option<&'static str> {
    match user {
        "guru" | "guru@sekolah.id" => Some("TEACHER"),
        "ortu" => Some("PARENT"),
        "siswa" => Some("STUDENT"),
        _ => None,
    }
}

fn envelope(data: Value, message: &str) -> Response {
    Json(json!({
        "status": 200,
        "message": message,
        "timestamp": "2024-05-01T08:30:00Z",
        "data": data
    }))
    .into_response()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"status": 401, "message": "Unauthorized"})),
    )
        .into_response()
}

/// Record the bearer header; None means the request may proceed
fn gate(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let has_bearer = auth.as_deref().is_some_and(|a| a.starts_with("Bearer "));
    state.auth_headers.lock().unwrap().push(auth);
    if state.reject_all.load(Ordering::SeqCst) || !has_bearer {
        return Some(unauthorized());
    }
    None
}

async fn login(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let user = body["emailOrUsername"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();
    match role_for(user) {
        Some(_) if password == PASSWORD && state.login_data.lock().unwrap().is_some() => {
            let data = state.login_data.lock().unwrap().clone().unwrap_or_default();
            envelope(data, "Login berhasil")
        }
        Some(role) if password == PASSWORD => {
            let exp = if state.issue_expired.load(Ordering::SeqCst) {
                chrono::Utc::now().timestamp() - 60
            } else {
                future_exp()
            };
            // the real backend issues the id claim as a string
            let token = sign(user, json!("42"), role, exp);
            envelope(json!({"token": token}), "Login berhasil")
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": 401, "message": "Username atau password salah"})),
        )
            .into_response(),
    }
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    envelope(
        json!({
            "id": 42, "name": "Bu Sari", "username": "guru", "email": "guru@sekolah.id",
            "phone": "081234567890", "role": "TEACHER", "createdAt": 1714550400000i64
        }),
        "Profile berhasil diambil",
    )
}

async fn profile_update(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    *state.last_body.lock().unwrap() = Some(body);
    envelope(Value::Null, "Profile berhasil diperbarui")
}

async fn update_password(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    let ok = body["oldPassword"] == PASSWORD;
    *state.last_body.lock().unwrap() = Some(body);
    if ok {
        envelope(Value::Null, "Password berhasil diperbarui")
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"status": 400, "message": "Password lama salah"})),
        )
            .into_response()
    }
}

fn record(id: i64, name: &str, status: Option<&str>) -> Value {
    json!({
        "id": id * 10, "siswaId": id, "namaSiswa": name,
        "nilaiUjianPerMapel": {"Fisika": 80}, "nilaiTugasPerMapel": {"Fisika": 75},
        "nilaiKuisPerMapel": {"Fisika": 90}, "jumlahKetidakhadiran": 1,
        "persentaseTugas": 90, "semester": "Ganjil", "nilaiAkhirRataRata": 81.5,
        "statusPrediksi": status
    })
}

async fn performance_list(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    *state.last_query.lock().unwrap() = query;
    envelope(
        json!([
            record(1, "Andi Wijaya", Some("Stable Performance")),
            record(2, "Budi Santoso", None)
        ]),
        "List Student Performance berhasil diambil",
    )
}

async fn performance_detail(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    if id == 404 {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"status": 404, "message": "Data Student Performance tidak ditemukan"})),
        )
            .into_response();
    }
    envelope(record(id, "Andi Wijaya", Some("Stable Performance")), "ok")
}

async fn performance_create(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    let id = body["siswaId"].as_i64().unwrap_or_default();
    *state.last_body.lock().unwrap() = Some(body);
    envelope(record(id, "Andi Wijaya", None), "Data performa siswa berhasil dibuat")
}

async fn performance_update(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    *state.last_body.lock().unwrap() = Some(body);
    envelope(record(id, "Andi Wijaya", None), "berhasil diperbarui")
}

async fn performance_delete(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    envelope(
        Value::Null,
        &format!("Student Performance dengan id {} berhasil dicancel", id),
    )
}

async fn upload_csv(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            let name = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.unwrap_or_default();
            *state.last_upload.lock().unwrap() = Some((name, bytes.len()));
        }
    }
    envelope(json!([record(7, "Citra", None)]), "Upload berhasil")
}

async fn prediction_batch(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    envelope(
        json!([{
            "predictionId": 1, "siswaId": 1, "semesterSiswa": "Ganjil", "namaSiswa": "Andi",
            "nilaiAkhir": 82, "jumlahKetidakhadiran": 1, "persentaseTugas": 90,
            "statusPrediksi": "Significant Increase Performance"
        }]),
        "Berhasil memprediksi performa seluruh siswa",
    )
}

/// Answers HTTP 200 but reports failure in the envelope
async fn prediction_one(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    Json(json!({
        "status": 400,
        "message": format!("Gagal memprediksi performa siswa {}", id)
    }))
    .into_response()
}

async fn notifications_mine(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Response {
    if let Some(denied) = gate(&state, &headers) {
        return denied;
    }
    envelope(
        json!([
            {"id": 1, "userId": 42, "title": "Nilai baru", "message": "Fisika", "type": "SCORE",
             "isRead": false, "createdAt": "2024-05-01T08:30:00Z"},
            {"id": 2, "userId": 42, "title": "Prediksi", "type": "PREDICTION",
             "isRead": true, "createdAt": "2024-05-02T08:30:00Z"}
        ]),
        "Berhasil mendapatkan notifikasi",
    )
}

pub async fn start() -> MockBackend {
    start_under("").await
}

/// Mock mounted beneath `prefix`, the way a reverse proxy would expose it
pub async fn start_under(prefix: &str) -> MockBackend {
    let state = Arc::new(MockState::default());
    let api = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/profile", get(profile))
        .route("/api/profile/update", post(profile_update))
        .route("/api/profile/update-password", post(update_password))
        .route("/api/student-performance/viewall", get(performance_list))
        .route("/api/student-performance/detail/{id}", get(performance_detail))
        .route("/api/student-performance/create", post(performance_create))
        .route("/api/student-performance/{id}/update", put(performance_update))
        .route("/api/student-performance/delete/{id}", delete(performance_delete))
        .route("/api/student-performance/upload-csv", post(upload_csv))
        .route("/api/prediction/batch", get(prediction_batch))
        .route("/api/prediction/{id}", get(prediction_one))
        .route("/api/notification", get(notifications_mine))
        .with_state(state.clone());
    let app = if prefix.is_empty() {
        api
    } else {
        Router::new().nest(prefix, api)
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(Duration::from_millis(20)).await;

    MockBackend {
        url: Url::parse(&format!("http://{}{}", addr, prefix)).unwrap(),
        state,
        handle,
    }
}

/// Session and client wired against `backend` with the given store
pub fn client(
    backend: &MockBackend,
    store: Arc<dyn TokenStore>,
) -> (Arc<SessionManager>, ApiClient, Arc<NavigationLog>) {
    let http = student_tracker::http::create_shared_client(Duration::from_secs(5));
    let session = Arc::new(SessionManager::new(store, http.clone(), backend.url.clone()));
    let nav = Arc::new(NavigationLog::new());
    let api = ApiClient::new(http, backend.url.clone(), session.clone(), nav.clone());
    (session, api, nav)
}

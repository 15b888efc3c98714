//! In-process stub of the hospital API for integration tests. Serves the
//! documented endpoints with canned data, tracks every request it sees, and
//! validates bearer tokens issued by its own login handler.

use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::thread;

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

pub const PASSWORD: &str = "password123";

#[derive(Clone, Debug)]
pub struct Hit {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct StubState {
    pub tokens: HashSet<String>,
    pub hits: Vec<Hit>,
}

type Shared = Arc<Mutex<StubState>>;

pub struct StubServer {
    pub base_url: String,
    state: Shared,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Drop for StubServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl StubServer {
    pub fn hits(&self) -> Vec<Hit> {
        self.state.lock().unwrap().hits.clone()
    }

    pub fn requests_to(&self, method: &str, path: &str) -> usize {
        self.hits()
            .iter()
            .filter(|h| h.method == method && h.path == path)
            .count()
    }

    pub fn last_authorization(&self, path: &str) -> Option<String> {
        self.hits()
            .iter()
            .rev()
            .find(|h| h.path == path)
            .and_then(|h| h.authorization.clone())
    }
}

pub fn spawn_stub() -> StubServer {
    let state: Shared = Arc::new(Mutex::new(StubState::default()));
    let router_state = state.clone();

    let (addr_tx, addr_rx) = std::sync::mpsc::channel::<SocketAddr>();
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    let handle = thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("build runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                .await
                .expect("bind stub listener");
            addr_tx
                .send(listener.local_addr().expect("local addr"))
                .expect("send addr");
            axum::serve(listener, router(router_state))
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .expect("serve stub");
        });
    });

    let addr = addr_rx.recv().expect("stub address");
    StubServer {
        base_url: format!("http://{}", addr),
        state,
        shutdown: Some(shutdown_tx),
        handle: Some(handle),
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/session", post(login).delete(logout))
        .route("/patients", post(register_patient))
        .route("/doctors", get(list_doctors).post(create_doctor))
        .route("/qualifications", get(list_qualifications).post(create_qualification))
        .route("/schedules", post(create_schedule))
        .route("/doctors/:id/schedules", get(list_schedules))
        .route("/doctors/:id/schedules/:sid", axum::routing::patch(update_schedule))
        .route("/availabilities", post(create_availabilities))
        .route("/schedules/:id/availabilities", get(list_availabilities))
        .route("/appointments", post(book_appointment))
        .with_state(state)
}

fn record(state: &Shared, method: &str, path: &str, headers: &HeaderMap) {
    let authorization = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    state.lock().unwrap().hits.push(Hit {
        method: method.to_string(),
        path: path.to_string(),
        authorization,
    });
}

fn authed(state: &Shared, headers: &HeaderMap) -> Result<(), Response> {
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default();
    if state.lock().unwrap().tokens.contains(token) {
        Ok(())
    } else {
        Err((
            StatusCode::UNAUTHORIZED,
            axum::Json(json!({"message": "Invalid or expired token"})),
        )
            .into_response())
    }
}

fn rejection(message: &str) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        axum::Json(json!({ "message": message })),
    )
        .into_response()
}

fn users() -> Vec<(&'static str, &'static str, &'static str, &'static str, &'static str)> {
    // (id, first, last, email, role)
    vec![
        ("u-admin", "Nina", "Shah", "admin@medibook.test", "admin"),
        ("doc-1", "Meera", "Iyer", "meera@medibook.test", "doctor"),
        ("pat-1", "Ravi", "Kumar", "ravi@medibook.test", "patient"),
    ]
}

async fn login(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/session", &headers);
    let user = &body["user"];
    let email = user["email"].as_str().unwrap_or_default();
    let password = user["password"].as_str().unwrap_or_default();
    let role = user["role"].as_str().unwrap_or_default();

    let Some((id, first, last, email, role)) = users()
        .into_iter()
        .find(|(_, _, _, e, r)| *e == email && *r == role && password == PASSWORD)
    else {
        return rejection("Invalid email or password");
    };

    let token = format!("tok-{}", id);
    state.lock().unwrap().tokens.insert(token.clone());
    axum::Json(json!({
        "user": {
            "id": id,
            "first_name": first,
            "last_name": last,
            "email": email,
            "contact_number": "9876543210",
            "role": role,
            "authentication": {
                "token": token,
                "refresh_token": format!("refresh-{}", id),
                "expires_at": "2026-12-31T00:00:00Z",
            },
        },
    }))
    .into_response()
}

async fn logout(State(state): State<Shared>, headers: HeaderMap) -> Response {
    record(&state, "DELETE", "/session", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let token = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    state.lock().unwrap().tokens.remove(&token);
    axum::Json(json!({"message": "Logged out successfully"})).into_response()
}

async fn register_patient(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/patients", &headers);
    if body["patient"]["email"].as_str().unwrap_or_default().is_empty() {
        return rejection("Email can't be blank");
    }
    axum::Json(json!({"message": "Patient registered successfully"})).into_response()
}

fn page_param(params: &HashMap<String, String>) -> usize {
    params
        .get("page")
        .and_then(|p| p.parse().ok())
        .unwrap_or(1)
}

fn paginate(total: usize, per_page: usize, page: usize) -> Value {
    let pages = total.div_ceil(per_page).max(1);
    json!({
        "page": page,
        "pages": pages,
        "next": if page < pages { Value::from(page + 1) } else { Value::Null },
        "prev": if page > 1 { Value::from(page - 1) } else { Value::Null },
        "count": total,
        "items": per_page,
    })
}

fn doctors() -> Vec<Value> {
    vec![
        json!({
            "id": "doc-1",
            "first_name": "Meera",
            "last_name": "Iyer",
            "email": "meera@medibook.test",
            "contact_number": "9876543210",
            "qualifications": [{"id": "q-1", "degree": "MBBS"}],
        }),
        json!({
            "id": "doc-2",
            "first_name": "Arjun",
            "last_name": "Nair",
            "email": "arjun@medibook.test",
            "contact_number": "9876543211",
            "qualifications": [],
        }),
        json!({
            "id": "doc-3",
            "first_name": "Sara",
            "last_name": "Thomas",
            "email": "sara@medibook.test",
            "contact_number": "9876543212",
            "qualifications": [{"id": "q-2", "degree": "MD"}],
        }),
    ]
}

async fn list_doctors(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", "/doctors", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let all = doctors();
    let page = page_param(&params);
    let per_page = 2;
    let slice: Vec<Value> = all
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    axum::Json(json!({
        "doctors": slice,
        "pagination": paginate(all.len(), per_page, page),
    }))
    .into_response()
}

async fn create_doctor(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/doctors", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    if body["doctor"]["first_name"].as_str().unwrap_or_default().is_empty() {
        return rejection("First name can't be blank");
    }
    axum::Json(json!({"message": "Doctor created successfully"})).into_response()
}

async fn list_qualifications(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(&state, "GET", "/qualifications", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let all = vec![
        json!({"id": "q-1", "degree": "MBBS", "description": "Bachelor of medicine"}),
        json!({"id": "q-2", "degree": "MD", "description": "Doctor of medicine"}),
    ];
    let page = page_param(&params);
    axum::Json(json!({
        "qualifications": all,
        "pagination": paginate(all.len(), 10, page),
    }))
    .into_response()
}

async fn create_qualification(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/qualifications", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    axum::Json(json!({"message": "Qualification created successfully"})).into_response()
}

async fn create_schedule(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/schedules", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    axum::Json(json!({"message": "Schedule created successfully"})).into_response()
}

fn schedules() -> Vec<Value> {
    vec![
        json!({"id": "sch-1", "date": "2026-09-01", "is_holiday": false}),
        json!({"id": "sch-2", "date": "2026-09-02", "is_holiday": true}),
        json!({"id": "sch-3", "date": "2026-09-03", "is_holiday": false}),
    ]
}

async fn list_schedules(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(doctor_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(
        &state,
        "GET",
        &format!("/doctors/{}/schedules", doctor_id),
        &headers,
    );
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let all = schedules();
    let page = page_param(&params);
    let per_page = 2;
    let slice: Vec<Value> = all
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect();
    axum::Json(json!({
        "schedules": slice,
        "pagination": paginate(all.len(), per_page, page),
    }))
    .into_response()
}

async fn update_schedule(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((doctor_id, schedule_id)): Path<(String, String)>,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    record(
        &state,
        "PATCH",
        &format!("/doctors/{}/schedules/{}", doctor_id, schedule_id),
        &headers,
    );
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    axum::Json(json!({"message": "Schedule updated successfully"})).into_response()
}

async fn create_availabilities(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(_body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/availabilities", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    axum::Json(json!({"message": "Availabilities created successfully"})).into_response()
}

async fn list_availabilities(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(schedule_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    record(
        &state,
        "GET",
        &format!("/schedules/{}/availabilities", schedule_id),
        &headers,
    );
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    let page = page_param(&params);
    axum::Json(json!({
        "schedule": {
            "availabilities": [
                {"id": "av-1", "time": "09:30 am"},
                {"id": "av-2", "time": "10:00 am"},
            ],
        },
        "pagination": paginate(2, 10, page),
    }))
    .into_response()
}

async fn book_appointment(
    State(state): State<Shared>,
    headers: HeaderMap,
    axum::Json(body): axum::Json<Value>,
) -> Response {
    record(&state, "POST", "/appointments", &headers);
    if let Err(resp) = authed(&state, &headers) {
        return resp;
    }
    if body["appointment"]["availability_id"].as_str().unwrap_or_default().is_empty() {
        return rejection("Availability can't be blank");
    }
    axum::Json(json!({"message": "Appointment booked successfully"})).into_response()
}

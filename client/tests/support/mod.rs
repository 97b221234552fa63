//! In-process fake of the salon backend for integration tests
//!
//! Serves the subset of the REST API the client uses, keeps its data in
//! memory and records every request so tests can assert on side effects.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use rust_decimal::Decimal;
use salon_inventory::{config::ApiConfig, ApiClient, Services, Session};
use serde::{Deserialize, Serialize};
use shared::{
    AuthResponse, DashboardInfo, Id, LoginCredentials, Material, MaterialCategory, MaterialInput,
    MaterialSupply, MaterialUnit, Page, Role, Supplier, SupplierBrief, SupplyMaterial,
    SupplyStatus, User,
};

pub const PASSWORD: &str = "secret1";
pub const ADMIN_EMAIL: &str = "admin@salon.ua";
pub const EMPLOYEE_EMAIL: &str = "olena@salon.ua";

/// Calls that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fault {
    SupplyStatus,
    Increment,
    Decrement,
    StampSupplier,
    ListSupplies,
}

#[derive(Debug, Default)]
pub struct FakeState {
    pub materials: HashMap<Id, Material>,
    pub suppliers: HashMap<Id, Supplier>,
    pub supplies: Vec<MaterialSupply>,
    pub page_size: usize,
    /// `METHOD path` of every request, in arrival order
    pub requests: Vec<String>,
    /// Authorization header of every authenticated request
    pub authorizations: Vec<Option<String>>,
    pub faults: Vec<Fault>,
    /// Answer 401 to every authenticated request
    pub revoke_tokens: bool,
}

impl FakeState {
    pub fn new() -> Self {
        Self {
            page_size: 2,
            ..Self::default()
        }
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.materials.insert(material.id, material);
        self
    }

    pub fn with_supplier(mut self, supplier: Supplier) -> Self {
        self.suppliers.insert(supplier.id, supplier);
        self
    }

    pub fn with_supply(mut self, supply: MaterialSupply) -> Self {
        self.supplies.push(supply);
        self
    }

    fn fails(&self, fault: Fault) -> bool {
        self.faults.contains(&fault)
    }

    /// Requests other than login
    pub fn backend_calls(&self) -> Vec<String> {
        self.requests
            .iter()
            .filter(|r| !r.contains("/auth/"))
            .cloned()
            .collect()
    }
}

type Shared = Arc<Mutex<FakeState>>;

pub struct FakeBackend {
    pub base_url: String,
    pub state: Shared,
}

impl FakeBackend {
    pub async fn start(state: FakeState) -> Self {
        let state = Arc::new(Mutex::new(state));
        let app = Router::new()
            .route("/api/v1/auth/login", post(login))
            .route("/api/v1/auth/signup", post(signup))
            .route("/api/v1/materials", get(list_materials).post(create_material))
            .route("/api/v1/materials/:id", get(get_material))
            .route("/api/v1/materials/:id/amount/inc", patch(increment))
            .route("/api/v1/materials/:id/amount/dec", patch(decrement))
            .route("/api/v1/suppliers/:id/lastSupplyDate", patch(stamp_supplier))
            .route("/api/v1/supplies", get(list_supplies))
            .route("/api/v1/supplies/:id/status", patch(set_status))
            .route("/api/v1/dashboard/admin", get(admin_dashboard))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}/api/v1", addr),
            state,
        }
    }

    pub fn api_config(&self) -> ApiConfig {
        ApiConfig {
            base_url: self.base_url.clone(),
            timeout_secs: 5,
        }
    }

    /// Services over a fresh in-memory session
    pub fn services(&self) -> (Services, Session) {
        let session = Session::new();
        let api = ApiClient::new(&self.api_config(), session.clone()).unwrap();
        (Services::new(api), session)
    }

    pub async fn signed_in(&self, email: &str) -> (Services, Session) {
        let (services, session) = self.services();
        services
            .auth
            .login(&LoginCredentials {
                email: email.into(),
                password: PASSWORD.into(),
            })
            .await
            .unwrap();
        self.state.lock().unwrap().requests.clear();
        (services, session)
    }

    pub fn fail(&self, fault: Fault) {
        self.state.lock().unwrap().faults.push(fault);
    }

    pub fn material(&self, id: Id) -> Material {
        self.state.lock().unwrap().materials[&id].clone()
    }

    pub fn supplier(&self, id: Id) -> Supplier {
        self.state.lock().unwrap().suppliers[&id].clone()
    }

    pub fn supply(&self, id: Id) -> MaterialSupply {
        let state = self.state.lock().unwrap();
        state.supplies.iter().find(|s| s.id == id).cloned().unwrap()
    }

    pub fn backend_calls(&self) -> Vec<String> {
        self.state.lock().unwrap().backend_calls()
    }
}

// ============================================================================
// Fixtures
// ============================================================================

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

pub fn token_for(user_id: Id, exp: i64) -> String {
    encode(
        &Header::default(),
        &Claims {
            sub: user_id.to_string(),
            exp,
        },
        &EncodingKey::from_secret(b"fake-backend"),
    )
    .unwrap()
}

pub fn material(id: Id, name: &str, amount: i64) -> Material {
    Material {
        id,
        name: name.into(),
        description: None,
        category: MaterialCategory::HairCare,
        unit: MaterialUnit::Ml,
        quantity: Decimal::from(250),
        amount,
        price: Decimal::new(18050, 2),
        min_amount_threshold: 3,
        enough_amount_threshold: 10,
        suppliers: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn supplier(id: Id, name: &str) -> Supplier {
    Supplier {
        id,
        name: name.into(),
        contact_person: "Taras".into(),
        email: "orders@supplier.ua".into(),
        phone_number: "+380501234567".into(),
        address: "Kyiv, Khreshchatyk 1".into(),
        rating: 4.5,
        last_supply_date: None,
        materials: Vec::new(),
        created_at: None,
        updated_at: None,
    }
}

pub fn supply(id: Id, material: &Material, supplier: &Supplier, amount: i64, status: SupplyStatus) -> MaterialSupply {
    MaterialSupply {
        id,
        material: SupplyMaterial {
            id: material.id,
            name: material.name.clone(),
            unit: material.unit,
            quantity: material.quantity,
            amount: material.amount,
            category: material.category,
            price: material.price,
        },
        supplier: SupplierBrief {
            id: supplier.id,
            name: supplier.name.clone(),
            rating: supplier.rating,
        },
        amount,
        supply_date: NaiveDate::from_ymd_opt(2024, 5, 20).unwrap(),
        note: None,
        total_price: material.price * Decimal::from(amount),
        status,
        created_at: None,
        updated_at: None,
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn record(state: &Shared, line: String) {
    state.lock().unwrap().requests.push(line);
}

fn authorize(state: &Shared, headers: &HeaderMap) -> Result<(), StatusCode> {
    let header = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let mut state = state.lock().unwrap();
    state.authorizations.push(header.clone());
    match header {
        Some(h) if h.starts_with("Bearer ") && !state.revoke_tokens => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

fn paginate<T: Clone>(items: Vec<T>, page: u32, size: usize) -> Page<T> {
    let total = items.len();
    let total_pages = ((total + size - 1) / size).max(1) as u32;
    let content: Vec<T> = items.into_iter().skip(page as usize * size).take(size).collect();
    Page {
        content,
        page,
        size: size as u32,
        total_elements: total as u64,
        total_pages,
        has_next: page + 1 < total_pages,
    }
}

async fn login(
    State(state): State<Shared>,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Json<AuthResponse>, StatusCode> {
    record(&state, "POST /auth/login".into());
    if credentials.password != PASSWORD {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let (id, role) = if credentials.email == ADMIN_EMAIL {
        (1, Role::Admin)
    } else {
        (2, Role::Employee)
    };
    Ok(Json(AuthResponse {
        token: token_for(id, Utc::now().timestamp() + 3600),
        user: User {
            id,
            username: credentials.email.split('@').next().unwrap_or_default().into(),
            email: credentials.email,
            role,
        },
    }))
}

async fn signup(State(state): State<Shared>, Json(_body): Json<serde_json::Value>) -> StatusCode {
    record(&state, "POST /auth/signup".into());
    StatusCode::CREATED
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialQuery {
    page: u32,
    category: Option<MaterialCategory>,
}

async fn list_materials(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<MaterialQuery>,
) -> Result<Json<Page<Material>>, StatusCode> {
    record(&state, format!("GET /materials?page={}", query.page));
    authorize(&state, &headers)?;
    let state = state.lock().unwrap();
    let mut items: Vec<Material> = state
        .materials
        .values()
        .filter(|m| query.category.map_or(true, |c| m.category == c))
        .cloned()
        .collect();
    items.sort_by_key(|m| m.id);
    Ok(Json(paginate(items, query.page, state.page_size)))
}

async fn get_material(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Id>,
) -> Result<Json<Material>, StatusCode> {
    record(&state, format!("GET /materials/{}", id));
    authorize(&state, &headers)?;
    let state = state.lock().unwrap();
    state.materials.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn create_material(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(input): Json<MaterialInput>,
) -> Result<Json<Material>, StatusCode> {
    record(&state, "POST /materials".into());
    authorize(&state, &headers)?;
    let mut state = state.lock().unwrap();
    let id = state.materials.keys().max().copied().unwrap_or(0) + 1;
    let created = Material {
        id,
        name: input.name,
        description: input.description,
        category: input.category,
        unit: input.unit,
        quantity: input.quantity,
        amount: input.amount,
        price: input.price,
        min_amount_threshold: input.min_amount_threshold,
        enough_amount_threshold: input.enough_amount_threshold,
        suppliers: Vec::new(),
        created_at: Some(Utc::now()),
        updated_at: None,
    };
    state.materials.insert(id, created.clone());
    Ok(Json(created))
}

async fn increment(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(by): Json<i64>,
) -> StatusCode {
    record(&state, format!("PATCH /materials/{}/amount/inc {}", id, by));
    if let Err(status) = authorize(&state, &headers) {
        return status;
    }
    let mut state = state.lock().unwrap();
    if state.fails(Fault::Increment) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.materials.get_mut(&id) {
        Some(m) => {
            m.amount += by;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn decrement(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(by): Json<i64>,
) -> StatusCode {
    record(&state, format!("PATCH /materials/{}/amount/dec {}", id, by));
    if let Err(status) = authorize(&state, &headers) {
        return status;
    }
    let mut state = state.lock().unwrap();
    if state.fails(Fault::Decrement) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.materials.get_mut(&id) {
        Some(m) => {
            m.amount -= by;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn stamp_supplier(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(at): Json<DateTime<Utc>>,
) -> StatusCode {
    record(&state, format!("PATCH /suppliers/{}/lastSupplyDate", id));
    if let Err(status) = authorize(&state, &headers) {
        return status;
    }
    let mut state = state.lock().unwrap();
    if state.fails(Fault::StampSupplier) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.suppliers.get_mut(&id) {
        Some(s) => {
            s.last_supply_date = Some(at);
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupplyQuery {
    page: u32,
    status: Option<SupplyStatus>,
    material_id: Option<Id>,
    supplier_id: Option<Id>,
}

async fn list_supplies(
    State(state): State<Shared>,
    headers: HeaderMap,
    Query(query): Query<SupplyQuery>,
) -> Result<Json<Page<MaterialSupply>>, StatusCode> {
    record(&state, format!("GET /supplies?page={}", query.page));
    authorize(&state, &headers)?;
    let state = state.lock().unwrap();
    if state.fails(Fault::ListSupplies) {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    let items: Vec<MaterialSupply> = state
        .supplies
        .iter()
        .filter(|s| query.status.map_or(true, |st| s.status == st))
        .filter(|s| query.material_id.map_or(true, |id| s.material.id == id))
        .filter(|s| query.supplier_id.map_or(true, |id| s.supplier.id == id))
        .cloned()
        .collect();
    Ok(Json(paginate(items, query.page, state.page_size)))
}

async fn set_status(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<Id>,
    Json(status): Json<SupplyStatus>,
) -> StatusCode {
    record(&state, format!("PATCH /supplies/{}/status {}", id, status));
    if let Err(code) = authorize(&state, &headers) {
        return code;
    }
    let mut state = state.lock().unwrap();
    if state.fails(Fault::SupplyStatus) {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    match state.supplies.iter_mut().find(|s| s.id == id) {
        Some(s) => {
            s.status = status;
            StatusCode::OK
        }
        None => StatusCode::NOT_FOUND,
    }
}

async fn admin_dashboard(
    State(state): State<Shared>,
    headers: HeaderMap,
) -> Result<Json<DashboardInfo>, StatusCode> {
    record(&state, "GET /dashboard/admin".into());
    authorize(&state, &headers)?;
    let state = state.lock().unwrap();
    let low_stock_materials: Vec<Material> = state
        .materials
        .values()
        .filter(|m| m.amount <= m.min_amount_threshold)
        .cloned()
        .collect();
    Ok(Json(DashboardInfo {
        total_materials: state.materials.len() as u64,
        total_amount_in_stock: state.materials.values().map(|m| m.amount).sum(),
        total_suppliers: state.suppliers.len() as u64,
        total_employees: 2,
        recent_usages: Vec::new(),
        low_stock_materials,
    }))
}

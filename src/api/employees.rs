//! Employee endpoints
//!
//! Records are projected through the request's view before serialization, so
//! internal fields only appear when the caller sent `X-view: internal`.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, MethodRouter},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::employee::{Employee, EmployeeDraft, EmployeeId};
use crate::domain::DomainError;
use crate::domain::visibility::{FieldVisibilityFilter, ViewContext};

type Projected = Map<String, Value>;

/// Identifier query parameter of the `/employee/` routes
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    fn require(self) -> Result<String, ApiError> {
        self.id
            .ok_or_else(|| ApiError::bad_request("Missing 'id' query parameter").with_param("id"))
    }
}

/// Body returned by delete
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub id: String,
    pub deleted: bool,
}

/// RESTful routes under `/employees`
pub fn create_employees_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee_rest))
        .route(
            "/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// Query-parameter routes at `/employee/` and `/employee/all`
///
/// Registered with full paths: a nested `"/"` would only answer `/employee`.
/// The slashless form is kept for clients that drop the trailing slash.
pub fn create_legacy_router() -> Router<AppState> {
    let by_query = || -> MethodRouter<AppState> {
        get(legacy_get_employee)
            .post(create_employee)
            .put(legacy_update_employee)
            .delete(legacy_delete_employee)
    };

    Router::new()
        .route("/employee/", by_query())
        .route("/employee", by_query())
        .route("/employee/all", get(list_employees))
}

fn project(view: &ViewContext, employee: &Employee) -> Result<Projected, ApiError> {
    Ok(FieldVisibilityFilter::new(view).project(employee)?)
}

async fn fetch(state: &AppState, view: &ViewContext, id: &str) -> Result<Json<Projected>, ApiError> {
    debug!(id = %id, view = %view.view(), "Getting employee");

    let employee = state
        .employee_service
        .fetch_one(id)
        .await?
        .ok_or_else(|| ApiError::employee_not_found(id))?;

    Ok(Json(project(view, &employee)?))
}

async fn replace(
    state: &AppState,
    view: &ViewContext,
    id: &str,
    draft: EmployeeDraft,
) -> Result<Json<Projected>, ApiError> {
    debug!(id = %id, "Updating employee");

    let employee = state
        .employee_service
        .update(id, draft)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                ApiError::employee_not_found(id)
            } else {
                e.into()
            }
        })?;

    Ok(Json(project(view, &employee)?))
}

async fn remove(state: &AppState, id: &str) -> Result<Json<DeleteResponse>, ApiError> {
    let id = EmployeeId::new(id).map_err(|e| DomainError::invalid_id(e.to_string()))?;
    debug!(id = %id, "Deleting employee");

    state.employee_service.delete(id.as_str()).await?;

    Ok(Json(DeleteResponse {
        id: id.into(),
        deleted: true,
    }))
}

/// GET /employees, GET /employee/all
pub async fn list_employees(
    State(state): State<AppState>,
    view: ViewContext,
) -> Result<Json<Vec<Projected>>, ApiError> {
    debug!(view = %view.view(), "Listing employees");

    let employees = state.employee_service.fetch_all().await?;
    let projected = FieldVisibilityFilter::new(&view).project_all(&employees)?;

    Ok(Json(projected))
}

/// POST /employee/
pub async fn create_employee(
    State(state): State<AppState>,
    view: ViewContext,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Projected>, ApiError> {
    debug!(name = %draft.name, "Creating employee");

    let employee = state.employee_service.create(draft).await?;

    Ok(Json(project(&view, &employee)?))
}

/// POST /employees
pub async fn create_employee_rest(
    state: State<AppState>,
    view: ViewContext,
    body: Json<EmployeeDraft>,
) -> Result<(StatusCode, Json<Projected>), ApiError> {
    let created = create_employee(state, view, body).await?;
    Ok((StatusCode::CREATED, created))
}

/// GET /employees/{id}
pub async fn get_employee(
    State(state): State<AppState>,
    view: ViewContext,
    Path(id): Path<String>,
) -> Result<Json<Projected>, ApiError> {
    fetch(&state, &view, &id).await
}

/// PUT /employees/{id}
pub async fn update_employee(
    State(state): State<AppState>,
    view: ViewContext,
    Path(id): Path<String>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Projected>, ApiError> {
    replace(&state, &view, &id, draft).await
}

/// DELETE /employees/{id}
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    remove(&state, &id).await
}

/// GET /employee/?id=
pub async fn legacy_get_employee(
    State(state): State<AppState>,
    view: ViewContext,
    Query(query): Query<IdQuery>,
) -> Result<Json<Projected>, ApiError> {
    fetch(&state, &view, &query.require()?).await
}

/// PUT /employee/?id=
pub async fn legacy_update_employee(
    State(state): State<AppState>,
    view: ViewContext,
    Query(query): Query<IdQuery>,
    Json(draft): Json<EmployeeDraft>,
) -> Result<Json<Projected>, ApiError> {
    replace(&state, &view, &query.require()?, draft).await
}

/// DELETE /employee/?id=
pub async fn legacy_delete_employee(
    State(state): State<AppState>,
    Query(query): Query<IdQuery>,
) -> Result<Json<DeleteResponse>, ApiError> {
    remove(&state, &query.require()?).await
}

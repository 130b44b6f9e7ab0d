use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    error::AppError,
    models::{CheckEntryDraft, CheckEntryResponse, MonthView},
    repositories::FrappeAuth,
    services::{CalendarSession, MonthRange},
    state::AppState,
    types::EmployeeId,
    utils::time,
};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Defaults to the current year; must be sent together with `month`.
    pub year: Option<i32>,
    /// 1-12. Defaults to the current month.
    pub month: Option<u32>,
}

impl CalendarQuery {
    pub fn month_range(&self, today: NaiveDate) -> Result<MonthRange, AppError> {
        match (self.year, self.month) {
            (Some(year), Some(month)) => Ok(MonthRange::for_month(year, month)?),
            (None, None) => Ok(MonthRange::containing(today)),
            _ => Err(AppError::BadRequest(
                "year and month must be provided together".to_string(),
            )),
        }
    }
}

fn open_session(
    state: &AppState,
    auth: &FrappeAuth,
    employee_id: &str,
    today: NaiveDate,
) -> Result<CalendarSession, AppError> {
    let employee_id = EmployeeId::parse(employee_id)?;
    Ok(CalendarSession::open(
        state.source_for(auth),
        employee_id,
        state.edit_window(),
        today,
    ))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Extension(auth): Extension<FrappeAuth>,
    Path(employee_id): Path<String>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<MonthView>, AppError> {
    let today = time::today_local(&state.config.time_zone);
    let range = query.month_range(today)?;
    let mut session = open_session(&state, &auth, &employee_id, today)?;
    session.select_month(range);

    let view = session.refresh(today).await?;
    Ok(Json(view.clone()))
}

pub async fn submit_check_entry(
    State(state): State<AppState>,
    Extension(auth): Extension<FrappeAuth>,
    Path(employee_id): Path<String>,
    Json(payload): Json<CheckEntryDraft>,
) -> Result<(StatusCode, Json<CheckEntryResponse>), AppError> {
    payload.validate()?;

    let today = time::today_local(&state.config.time_zone);
    let mut session = open_session(&state, &auth, &employee_id, today)?;
    let response = session.submit_entry(&payload, today).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

//! Daily history handler.
//!
//! ```text
//! GET /api/v1/history?day=YYYY-MM-DD
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{DailyHistory, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_day};

/// Query parameters for the history lookup.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryParams {
    /// UTC calendar day, `YYYY-MM-DD`.
    pub day: Option<String>,
}

/// Usage totals for one day.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    #[schema(example = "2024-05-01")]
    pub day: String,
    pub cars_parked: u64,
    /// Sum of billed hours.
    pub total_parking_time: u64,
    pub total_revenue_earned: u64,
}

impl From<DailyHistory> for HistoryResponse {
    fn from(history: DailyHistory) -> Self {
        Self {
            day: history.day().format("%Y-%m-%d").to_string(),
            cars_parked: history.cars_parked(),
            total_parking_time: history.total_parking_time(),
            total_revenue_earned: history.total_revenue_earned(),
        }
    }
}

/// Usage totals for a day; zero when nothing was recorded.
#[utoipa::path(
    get,
    path = "/api/v1/history",
    params(HistoryParams),
    responses(
        (status = 200, description = "Daily totals", body = HistoryResponse),
        (status = 400, description = "Missing or malformed day", body = ErrorSchema)
    ),
    tags = ["history"],
    operation_id = "getHistory"
)]
#[get("/history")]
pub async fn get_history(
    state: web::Data<HttpState>,
    params: web::Query<HistoryParams>,
) -> ApiResult<web::Json<HistoryResponse>> {
    let field = FieldName::new("day");
    let raw = params.day.as_deref().ok_or_else(|| {
        Error::invalid_request("missing required field: day")
            .with_details(json!({"field": "day", "code": "missing_field"}))
    })?;
    let day = parse_day(raw, field)?;
    let history = state.parking_query.history(day).await?;
    Ok(web::Json(HistoryResponse::from(history)))
}

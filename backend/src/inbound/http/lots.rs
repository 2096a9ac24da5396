//! Parking lot handlers.
//!
//! ```text
//! POST /api/v1/lots
//! GET  /api/v1/lots/{lotId}/status
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::LotId;
use crate::domain::ports::{CreateLotRequest, CreatedLot, SlotStatus};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request payload for creating a lot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLotBody {
    /// Address or name of the lot.
    #[schema(example = "12 Harbour Road")]
    pub location: String,
    /// Number of slots, numbered from 1.
    #[schema(example = 20, minimum = 1, maximum = 10000)]
    pub slots: u32,
}

/// Slot created with a lot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotSummary {
    pub slot_id: String,
    pub relative_id: u32,
}

/// Newly created lot.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotResponse {
    pub id: String,
    pub location: String,
    pub slot_count: u32,
    pub created_at: String,
    pub slots: Vec<SlotSummary>,
}

impl From<CreatedLot> for LotResponse {
    fn from(created: CreatedLot) -> Self {
        let CreatedLot { lot, slots } = created;
        Self {
            id: lot.id().to_string(),
            location: lot.location().to_owned(),
            slot_count: lot.slot_count(),
            created_at: lot.created_at().to_rfc3339(),
            slots: slots
                .iter()
                .map(|slot| SlotSummary {
                    slot_id: slot.id().to_string(),
                    relative_id: slot.relative_id().get(),
                })
                .collect(),
        }
    }
}

/// One slot in a lot status listing.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotStatusResponse {
    pub slot_id: String,
    pub relative_id: u32,
    pub is_booked: bool,
    pub is_in_maintenance: bool,
    pub car_id: Option<String>,
}

impl From<SlotStatus> for SlotStatusResponse {
    fn from(status: SlotStatus) -> Self {
        Self {
            slot_id: status.slot_id.to_string(),
            relative_id: status.relative_id,
            is_booked: status.is_booked,
            is_in_maintenance: status.is_in_maintenance,
            car_id: status.car_id.map(|id| id.to_string()),
        }
    }
}

/// Every slot of a lot, ordered by relative id.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LotStatusResponse {
    pub lot_id: String,
    pub slots: Vec<SlotStatusResponse>,
}

/// Create a lot with all of its slots free.
#[utoipa::path(
    post,
    path = "/api/v1/lots",
    request_body = CreateLotBody,
    responses(
        (status = 201, description = "Lot created", body = LotResponse),
        (status = 400, description = "Invalid location or slot count", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["lots"],
    operation_id = "createLot"
)]
#[post("/lots")]
pub async fn create_lot(
    state: web::Data<HttpState>,
    payload: web::Json<CreateLotBody>,
) -> ApiResult<HttpResponse> {
    let CreateLotBody { location, slots } = payload.into_inner();
    let created = state
        .parking
        .create_lot(CreateLotRequest {
            location,
            slot_count: slots,
        })
        .await?;
    Ok(HttpResponse::Created().json(LotResponse::from(created)))
}

/// List every slot of a lot.
#[utoipa::path(
    get,
    path = "/api/v1/lots/{lotId}/status",
    params(("lotId" = String, Path, description = "Lot identifier")),
    responses(
        (status = 200, description = "Slots ordered by relative id", body = LotStatusResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown lot", body = ErrorSchema)
    ),
    tags = ["lots"],
    operation_id = "getLotStatus"
)]
#[get("/lots/{lot_id}/status")]
pub async fn lot_status(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<LotStatusResponse>> {
    let lot_id: LotId = parse_id(&path, FieldName::new("lotId"))?;
    let slots = state.parking_query.lot_status(lot_id).await?;
    Ok(web::Json(LotStatusResponse {
        lot_id: lot_id.to_string(),
        slots: slots.into_iter().map(SlotStatusResponse::from).collect(),
    }))
}

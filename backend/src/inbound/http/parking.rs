//! Park and unpark handlers.
//!
//! ```text
//! POST /api/v1/lots/{lotId}/park
//! POST /api/v1/cars/{carId}/unpark
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ParkCarRequest, UnparkReceipt};
use crate::domain::{CarId, LotId, Slot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request payload for parking a car.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkBody {
    /// Car to park.
    pub car_id: String,
}

/// Slot booked for a parked car.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParkedResponse {
    /// Booked slot.
    pub slot_id: String,
    /// Lot holding the slot.
    pub lot_id: String,
    /// Position of the slot within its lot, starting at 1.
    pub relative_id: u32,
    /// Car now occupying the slot.
    pub car_id: String,
    /// RFC 3339 time the car arrived.
    pub parked_at: String,
}

impl ParkedResponse {
    fn new(slot: &Slot, car_id: CarId) -> Self {
        Self {
            slot_id: slot.id().to_string(),
            lot_id: slot.lot_id().to_string(),
            relative_id: slot.relative_id().get(),
            car_id: car_id.to_string(),
            parked_at: slot
                .parked_at()
                .map(|at| at.to_rfc3339())
                .unwrap_or_default(),
        }
    }
}

/// Bill for a finished stay.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UnparkResponse {
    /// Slot the car left.
    pub slot_id: String,
    /// Started hours billed.
    pub duration_hours: u64,
    /// Fee charged for the stay.
    pub amount: u64,
    /// RFC 3339 time the car left.
    pub unparked_at: String,
}

impl From<UnparkReceipt> for UnparkResponse {
    fn from(receipt: UnparkReceipt) -> Self {
        Self {
            slot_id: receipt.slot_id.to_string(),
            duration_hours: receipt.duration_hours,
            amount: receipt.amount,
            unparked_at: receipt.unparked_at.to_rfc3339(),
        }
    }
}

/// Park a car in the lowest-numbered free slot of a lot.
#[utoipa::path(
    post,
    path = "/api/v1/lots/{lotId}/park",
    request_body = ParkBody,
    params(("lotId" = String, Path, description = "Lot identifier")),
    responses(
        (status = 200, description = "Booked slot", body = ParkedResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown lot or car", body = ErrorSchema),
        (status = 409, description = "Car already parked or lot full", body = ErrorSchema)
    ),
    tags = ["parking"],
    operation_id = "parkCar"
)]
#[post("/lots/{lot_id}/park")]
pub async fn park_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ParkBody>,
) -> ApiResult<web::Json<ParkedResponse>> {
    let lot_id: LotId = parse_id(&path, FieldName::new("lotId"))?;
    let car_id: CarId = parse_id(&payload.car_id, FieldName::new("carId"))?;
    let slot = state
        .parking
        .park_car(ParkCarRequest { lot_id, car_id })
        .await?;
    Ok(web::Json(ParkedResponse::new(&slot, car_id)))
}

/// Release a car's slot and bill the stay.
#[utoipa::path(
    post,
    path = "/api/v1/cars/{carId}/unpark",
    params(("carId" = String, Path, description = "Car identifier")),
    responses(
        (status = 200, description = "Stay billed", body = UnparkResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown car", body = ErrorSchema),
        (status = 409, description = "Car is not parked", body = ErrorSchema)
    ),
    tags = ["parking"],
    operation_id = "unparkCar"
)]
#[post("/cars/{car_id}/unpark")]
pub async fn unpark_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<UnparkResponse>> {
    let car_id: CarId = parse_id(&path, FieldName::new("carId"))?;
    let receipt = state.parking.unpark_car(car_id).await?;
    Ok(web::Json(UnparkResponse::from(receipt)))
}

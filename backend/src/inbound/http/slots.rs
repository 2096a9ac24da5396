//! Slot maintenance handler.
//!
//! ```text
//! PUT /api/v1/slots/{slotId}/maintenance
//! ```

use actix_web::{put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SetMaintenanceRequest;
use crate::domain::{Slot, SlotId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request payload toggling maintenance.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceBody {
    /// `true` takes the slot out of service; `false` returns it.
    pub enabled: bool,
}

/// Slot state after a maintenance toggle.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SlotResponse {
    pub slot_id: String,
    pub lot_id: String,
    pub relative_id: u32,
    pub is_booked: bool,
    pub is_in_maintenance: bool,
}

impl From<Slot> for SlotResponse {
    fn from(slot: Slot) -> Self {
        Self {
            slot_id: slot.id().to_string(),
            lot_id: slot.lot_id().to_string(),
            relative_id: slot.relative_id().get(),
            is_booked: slot.is_booked(),
            is_in_maintenance: slot.is_in_maintenance(),
        }
    }
}

/// Put a free slot into maintenance or bring it back.
#[utoipa::path(
    put,
    path = "/api/v1/slots/{slotId}/maintenance",
    request_body = MaintenanceBody,
    params(("slotId" = String, Path, description = "Slot identifier")),
    responses(
        (status = 200, description = "Updated slot", body = SlotResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown slot", body = ErrorSchema),
        (status = 409, description = "Slot state forbids the change", body = ErrorSchema)
    ),
    tags = ["slots"],
    operation_id = "setSlotMaintenance"
)]
#[put("/slots/{slot_id}/maintenance")]
pub async fn set_maintenance(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<MaintenanceBody>,
) -> ApiResult<web::Json<SlotResponse>> {
    let slot_id: SlotId = parse_id(&path, FieldName::new("slotId"))?;
    let slot = state
        .parking
        .set_maintenance(SetMaintenanceRequest {
            slot_id,
            enabled: payload.enabled,
        })
        .await?;
    Ok(web::Json(SlotResponse::from(slot)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::test_utils::{api_app, harness};

    #[rstest]
    #[actix_web::test]
    async fn maintenance_toggles_and_reports_conflicts() {
        let harness = harness();
        let lot = harness.lot(1).await.expect("lot");
        let slot_id = lot.slots.first().expect("slot").id();
        let app = api_app!(harness).await;
        let toggle = |enabled: bool| {
            test::TestRequest::put()
                .uri(&format!("/api/v1/slots/{slot_id}/maintenance"))
                .set_json(json!({ "enabled": enabled }))
                .to_request()
        };

        let on = test::call_service(&app, toggle(true)).await;
        assert_eq!(on.status(), StatusCode::OK);
        let on: SlotResponse = test::read_body_json(on).await;
        assert!(on.is_in_maintenance && on.is_booked);

        let twice = test::call_service(&app, toggle(true)).await;
        assert_eq!(twice.status(), StatusCode::CONFLICT);
        let twice: Value = test::read_body_json(twice).await;
        assert_eq!(twice["details"]["reason"], "already_in_maintenance");

        let off = test::call_service(&app, toggle(false)).await;
        assert_eq!(off.status(), StatusCode::OK);
        let off: SlotResponse = test::read_body_json(off).await;
        assert!(!off.is_in_maintenance && !off.is_booked);

        let again = test::call_service(&app, toggle(false)).await;
        let again: Value = test::read_body_json(again).await;
        assert_eq!(again["details"]["reason"], "not_in_maintenance");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_slot_is_not_found() {
        let harness = harness();
        let app = api_app!(harness).await;

        let req = test::TestRequest::put()
            .uri(&format!("/api/v1/slots/{}/maintenance", SlotId::random()))
            .set_json(json!({"enabled": true}))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}

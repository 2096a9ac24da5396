//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the error schema wrappers, so the generated document describes the
//! exact JSON the handlers emit. Export it with
//! `cargo run --bin openapi-dump`.

use crate::inbound::http::accounts::{CarResponse, CreateUserBody, UserResponse};
use crate::inbound::http::history::HistoryResponse;
use crate::inbound::http::lots::{
    CreateLotBody, LotResponse, LotStatusResponse, SlotStatusResponse, SlotSummary,
};
use crate::inbound::http::parking::{ParkBody, ParkedResponse, UnparkResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::slots::{MaintenanceBody, SlotResponse};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Parking lot API",
        description = "Lots, slot allocation, maintenance, billing, and daily usage history.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::accounts::create_user,
        crate::inbound::http::accounts::create_car,
        crate::inbound::http::lots::create_lot,
        crate::inbound::http::lots::lot_status,
        crate::inbound::http::parking::park_car,
        crate::inbound::http::parking::unpark_car,
        crate::inbound::http::slots::set_maintenance,
        crate::inbound::http::history::get_history,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserBody,
        UserResponse,
        CarResponse,
        CreateLotBody,
        SlotSummary,
        LotResponse,
        SlotStatusResponse,
        LotStatusResponse,
        ParkBody,
        ParkedResponse,
        UnparkResponse,
        MaintenanceBody,
        SlotResponse,
        HistoryResponse,
    )),
    tags(
        (name = "accounts", description = "User and car registration"),
        (name = "lots", description = "Lot creation and occupancy"),
        (name = "parking", description = "Parking and unparking cars"),
        (name = "slots", description = "Slot maintenance"),
        (name = "history", description = "Daily usage totals"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

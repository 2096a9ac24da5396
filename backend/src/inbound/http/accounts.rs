//! User and car registration handlers.
//!
//! ```text
//! POST /api/v1/users
//! POST /api/v1/users/{userId}/cars
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Car, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_id};

/// Request payload for registering a user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    /// Display name; trimmed, 1 to 64 characters.
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

/// Registered user.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_owned(),
        }
    }
}

/// Registered car and the slot it occupies, if any.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CarResponse {
    pub id: String,
    pub user_id: String,
    pub slot_id: Option<String>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id().to_string(),
            user_id: car.user_id().to_string(),
            slot_id: car.slot_id().map(|id| id.to_string()),
        }
    }
}

/// Register a user.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let user = state.accounts.create_user(payload.into_inner().name).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Register a car for an existing user.
#[utoipa::path(
    post,
    path = "/api/v1/users/{userId}/cars",
    params(("userId" = String, Path, description = "Owner identifier")),
    responses(
        (status = 201, description = "Car created", body = CarResponse),
        (status = 400, description = "Malformed identifier", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "createCar"
)]
#[post("/users/{user_id}/cars")]
pub async fn create_car(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let user_id: UserId = parse_id(&path, FieldName::new("userId"))?;
    let car = state.accounts.create_car(user_id).await?;
    Ok(HttpResponse::Created().json(CarResponse::from(car)))
}

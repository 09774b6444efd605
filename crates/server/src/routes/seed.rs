use axum::{extract::State, Json};
use service::seed::SeedSummary;

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    get, path = "/api/v2/seed", tag = "seed",
    responses(
        (status = 200, description = "Catalog replaced", body = crate::openapi::SeedSummaryDoc),
        (status = 500, description = "Seed Failed")
    )
)]
pub async fn run(State(state): State<ServerState>) -> Result<Json<SeedSummary>, JsonApiError> {
    Ok(Json(state.seed.seed().await?))
}

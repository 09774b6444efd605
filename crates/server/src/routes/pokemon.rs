use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use models::pokemon::Model;
use service::pagination::Pagination;
use service::pokemon::{CreatePokemon, UpdatePokemon};
use tracing::info;

use crate::{errors::JsonApiError, state::ServerState};

#[utoipa::path(
    post, path = "/api/v2/pokemon", tag = "pokemon",
    request_body = crate::openapi::CreatePokemonDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::PokemonDoc),
        (status = 400, description = "Validation Error"),
        (status = 409, description = "Duplicate no or name"),
        (status = 500, description = "Create Failed")
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    input: Result<Json<CreatePokemon>, JsonRejection>,
) -> Result<(StatusCode, Json<Model>), JsonApiError> {
    let Json(input) = input?;
    let created = state.pokemon.create(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get, path = "/api/v2/pokemon", tag = "pokemon",
    params(crate::openapi::ListQueryDoc),
    responses(
        (status = 200, description = "Page ordered by no", body = [crate::openapi::PokemonDoc]),
        (status = 400, description = "Invalid pagination")
    )
)]
pub async fn list(
    State(state): State<ServerState>,
    page: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<Vec<Model>>, JsonApiError> {
    let Query(page) = page?;
    let items = state.pokemon.list(page).await?;
    info!(count = items.len(), limit = ?page.limit, offset = ?page.offset, "list pokemon");
    Ok(Json(items))
}

#[utoipa::path(
    get, path = "/api/v2/pokemon/{term}", tag = "pokemon",
    params(("term" = String, Path, description = "no, id or name")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::PokemonDoc),
        (status = 404, description = "Not Found")
    )
)]
pub async fn find_one(
    State(state): State<ServerState>,
    Path(term): Path<String>,
) -> Result<Json<Model>, JsonApiError> {
    Ok(Json(state.pokemon.find_one(&term).await?))
}

#[utoipa::path(
    patch, path = "/api/v2/pokemon/{term}", tag = "pokemon",
    params(("term" = String, Path, description = "no, id or name")),
    request_body = crate::openapi::UpdatePokemonDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::PokemonDoc),
        (status = 400, description = "Validation Error"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Duplicate no or name")
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    Path(term): Path<String>,
    input: Result<Json<UpdatePokemon>, JsonRejection>,
) -> Result<Json<Model>, JsonApiError> {
    let Json(input) = input?;
    Ok(Json(state.pokemon.update(&term, input).await?))
}

#[utoipa::path(
    delete, path = "/api/v2/pokemon/{term}", tag = "pokemon",
    params(("term" = String, Path, description = "Datastore id (UUID)")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid or unknown id")
    )
)]
pub async fn remove(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, JsonApiError> {
    state.pokemon.remove(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

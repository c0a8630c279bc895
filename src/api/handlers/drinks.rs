/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は route 側の access middleware で済んでいる (ここでは AuthCtx を監査ログに使うだけ)
 * - Path/Json の rejection は AppError (404/422) に寄せて JSON で返す
 */
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteDrinkResponse, DrinksResponse, LongDrink, ShortDrink,
            UpdateDrinkRequest,
        },
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    repos::drink_repo,
    state::AppState,
};

// Non-integer ids never name a drink.
fn drink_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    path.map(|Path(id)| id).map_err(|_| AppError::NotFound)
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    body.map(|Json(v)| v).map_err(|rejection| {
        // The body limit surfaces here once the body is actually read.
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::unprocessable(rejection.body_text())
        }
    })
}

pub async fn list_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<ShortDrink>>, AppError> {
    let drinks = drink_repo::list(&state.db).await?;
    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(ShortDrink::from).collect(),
    )))
}

pub async fn list_drinks_detail(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let drinks = drink_repo::list(&state.db).await?;
    Ok(Json(DrinksResponse::new(
        drinks.into_iter().map(LongDrink::from).collect(),
    )))
}

pub async fn create_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    body: Result<Json<CreateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let req = json_body(body)?;
    req.validate().map_err(AppError::unprocessable)?;

    let recipe = req.recipe.into_vec();
    let drink = drink_repo::create(&state.db, req.title.trim(), &recipe).await?;

    tracing::info!(drink_id = drink.id, sub = auth.subject(), "drink created");
    Ok(Json(DrinksResponse::new(vec![drink.into()])))
}

pub async fn update_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    path: Result<Path<i64>, PathRejection>,
    body: Result<Json<UpdateDrinkRequest>, JsonRejection>,
) -> Result<Json<DrinksResponse<LongDrink>>, AppError> {
    let id = drink_id(path)?;
    let req = json_body(body)?;
    req.validate().map_err(AppError::unprocessable)?;

    let recipe = req.recipe.map(|r| r.into_vec());
    let drink = drink_repo::update(
        &state.db,
        id,
        req.title.as_deref().map(str::trim),
        recipe.as_deref(),
    )
    .await?
    .ok_or(AppError::NotFound)?;

    tracing::info!(drink_id = id, sub = auth.subject(), "drink updated");
    Ok(Json(DrinksResponse::new(vec![drink.into()])))
}

pub async fn delete_drink(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    path: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteDrinkResponse>, AppError> {
    let id = drink_id(path)?;

    if !drink_repo::delete(&state.db, id).await? {
        return Err(AppError::NotFound);
    }

    tracing::info!(drink_id = id, sub = auth.subject(), "drink deleted");
    Ok(Json(DeleteDrinkResponse {
        success: true,
        delete: id,
    }))
}

/*
 * Responsibility
 * - URL 構造と route → permission の対応表
 * - permission 付きの endpoint には access middleware を一律に掛ける
 */
use axum::{
    Router,
    routing::{MethodRouter, delete, get, patch, post},
};

use crate::{
    api::handlers::{
        drinks::{create_drink, delete_drink, list_drinks, list_drinks_detail, update_drink},
        home::home,
    },
    error::AppError,
    middleware::auth::access,
    state::AppState,
};

pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
pub const POST_DRINKS: &str = "post:drinks";
pub const PATCH_DRINKS: &str = "patch:drinks";
pub const DELETE_DRINKS: &str = "delete:drinks";

pub struct Endpoint {
    pub path: &'static str,
    pub permission: Option<&'static str>,
    handler: MethodRouter<AppState>,
}

impl Endpoint {
    fn public(path: &'static str, handler: MethodRouter<AppState>) -> Self {
        Self {
            path,
            permission: None,
            handler,
        }
    }

    fn protected(
        path: &'static str,
        handler: MethodRouter<AppState>,
        permission: &'static str,
    ) -> Self {
        Self {
            path,
            permission: Some(permission),
            handler,
        }
    }
}

pub fn endpoints() -> Vec<Endpoint> {
    vec![
        Endpoint::public("/", get(home)),
        Endpoint::public("/drinks", get(list_drinks)),
        Endpoint::protected("/drinks-detail", get(list_drinks_detail), GET_DRINKS_DETAIL),
        Endpoint::protected("/drinks", post(create_drink), POST_DRINKS),
        Endpoint::protected("/drinks/{drink_id}", patch(update_drink), PATCH_DRINKS),
        Endpoint::protected("/drinks/{drink_id}", delete(delete_drink), DELETE_DRINKS),
    ]
}

/// Same path on several endpoints is merged by axum (methods must not overlap).
pub fn routes(state: &AppState) -> Router<AppState> {
    endpoints()
        .into_iter()
        .fold(Router::new(), |router, endpoint| {
            let handler = match endpoint.permission {
                Some(permission) => access::apply(endpoint.handler, state, permission),
                None => endpoint.handler,
            };
            router.route(endpoint.path, handler)
        })
        .method_not_allowed_fallback(|| async { AppError::MethodNotAllowed })
        .fallback(|| async { AppError::NotFound })
}

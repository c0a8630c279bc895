//! Bearer token 検証 + permission チェック → AuthCtx を extensions に入れる
//!
//! - route ごとに要求 permission を持たせ、同じ middleware を `route_layer` で掛ける
//! - 検証本体は `AccessGuard::authorize` (同期・状態なし)
//! - 拒否時は handler に到達せず AppError (401/403) を返す

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::api::extractors::AuthCtx;
use crate::error::AppError;
use crate::services::auth::{AccessGuard, AuthError};
use crate::state::AppState;

#[derive(Clone)]
struct Required {
    guard: Arc<AccessGuard>,
    permission: &'static str,
}

/// `handler` を `permission` で保護する。
///
/// 例：
/// ```ignore
/// let create = middleware::auth::access::apply(post(create_drink), &state, "post:drinks");
/// ```
pub fn apply(
    handler: MethodRouter<AppState>,
    state: &AppState,
    permission: &'static str,
) -> MethodRouter<AppState> {
    let required = Required {
        guard: state.guard.clone(),
        permission,
    };
    // route_layer: path/body の extractor より先に guard が走る
    handler.route_layer(middleware::from_fn_with_state(required, access_middleware))
}

async fn access_middleware(
    State(required): State<Required>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let header = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(value.to_str().map_err(|_| AuthError::MalformedHeader)?),
    };

    let claims = match required.guard.authorize(header, required.permission) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                kind = err.kind(),
                required = required.permission,
                method = %req.method(),
                path = %req.uri().path(),
                reason = %err,
                "request rejected by access guard"
            );
            return Err(err.into());
        }
    };

    tracing::debug!(
        sub = ?claims.sub,
        permission = required.permission,
        "request admitted"
    );

    // middleware → extractor への受け渡し
    req.extensions_mut()
        .insert(AuthCtx::new(claims, required.permission));

    Ok(next.run(req).await)
}

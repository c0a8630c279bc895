/*
 * Responsibility
 * - Handler から見える「認可済みコンテキスト」の型
 * - middleware が guard を通して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - JWT の検証ロジックは services/auth (AccessGuard) 側の責務
 */
use crate::services::auth::Claims;

/// 認可を通過したリクエストに付与されるコンテキスト
///
/// - `claims` は検証済みの token payload そのもの
/// - `permission` はこの route が要求し、満たされた permission
#[derive(Debug, Clone)]
pub struct AuthCtx {
    pub claims: Claims,
    pub permission: &'static str,
}

impl AuthCtx {
    pub fn new(claims: Claims, permission: &'static str) -> Self {
        Self { claims, permission }
    }

    pub fn subject(&self) -> &str {
        self.claims.sub.as_deref().unwrap_or("unknown")
    }
}

/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (PgPool / Arc なので Clone は安い)
 */
use std::sync::Arc;

use crate::services::auth::AccessGuard;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub guard: Arc<AccessGuard>,
}

impl AppState {
    pub fn new(db: sqlx::PgPool, guard: Arc<AccessGuard>) -> Self {
        Self { db, guard }
    }
}

/*!
 * Authorization context extractor
 *
 * Responsibility:
 * - guard を通過したリクエストの claims (AuthCtx) を handler に渡す
 * - axum 依存は core に、型定義は types に置く
 */

mod core;
mod types;

pub use core::AuthCtxExtractor;
pub use types::AuthCtx;

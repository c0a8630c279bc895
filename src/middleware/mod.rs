/*
 * Responsibility
 * - middleware の公開インターフェース
 * - auth: route 単位 (permission ごと)
 * - cors / http: Router 全体に掛ける横断的な層
 */
pub mod auth;
pub mod cors;
pub mod http;

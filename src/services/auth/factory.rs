/// Factory: build `AccessGuard` from application `Config`.
use std::sync::Arc;

use crate::config::{Config, JwksSource};
use crate::services::auth::{
    AccessGuard, GuardPolicy,
    keys::{self, KeySetError, TrustedKeys},
};

pub async fn build_access_guard(config: &Config) -> Result<Arc<AccessGuard>, KeySetError> {
    let keys = match &config.auth_jwks {
        JwksSource::Inline(document) => TrustedKeys::from_json(document)?,
        JwksSource::File(path) => TrustedKeys::from_json(&tokio::fs::read_to_string(path).await?)?,
    };
    let policy = GuardPolicy {
        issuer: config.auth_issuer.clone(),
        audience: config.auth_audience.clone(),
        algorithms: config.auth_algorithms.clone(),
        leeway_seconds: config.access_token_leeway_seconds,
    };

    let guard = AccessGuard::new(Arc::new(keys), policy);
    tracing::info!(kids = ?guard.keys().key_ids(), "trusted signing keys loaded");

    if let (JwksSource::File(path), Some(every)) = (&config.auth_jwks, config.auth_jwks_reload) {
        tracing::info!(path = %path.display(), every = ?every, "jwks file reload enabled");
        keys::spawn_reload(guard.keys().clone(), path.clone(), every);
    }

    Ok(Arc::new(guard))
}

//! Trusted signing keys, looked up by `kid`.
//!
//! The key set is an immutable snapshot behind an `ArcSwap`: lookups never
//! block and a refresh replaces the whole set in one store.
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use arc_swap::ArcSwap;
use jsonwebtoken::{
    DecodingKey,
    jwk::{Jwk, JwkSet, PublicKeyUse},
};
use thiserror::Error;
use tokio::task::JoinHandle;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("invalid jwks document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("failed to read jwks file: {0}")]
    Io(#[from] std::io::Error),
    #[error("jwks contains no usable signing keys")]
    Empty,
}

struct Snapshot {
    keys: HashMap<String, DecodingKey>,
}

impl Snapshot {
    fn build(set: &JwkSet) -> Self {
        let keys = set
            .keys
            .iter()
            .filter_map(|jwk| match usable_key(jwk) {
                Ok(entry) => Some(entry),
                Err(reason) => {
                    tracing::warn!(kid = ?jwk.common.key_id, reason, "skipping jwk");
                    None
                }
            })
            .collect();
        Self { keys }
    }
}

fn usable_key(jwk: &Jwk) -> Result<(String, DecodingKey), &'static str> {
    let kid = jwk.common.key_id.clone().ok_or("no kid")?;
    if matches!(
        jwk.common.public_key_use,
        Some(PublicKeyUse::Encryption) | Some(PublicKeyUse::Other(_))
    ) {
        return Err("not a signing key");
    }
    let key = DecodingKey::from_jwk(jwk).map_err(|_| "unsupported key parameters")?;
    Ok((kid, key))
}

/// Key material is not printable via Debug; only key ids are.
pub struct TrustedKeys {
    current: ArcSwap<Snapshot>,
}

impl std::fmt::Debug for TrustedKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrustedKeys")
            .field("kids", &self.key_ids())
            .finish()
    }
}

impl TrustedKeys {
    pub fn from_jwks(set: &JwkSet) -> Result<Self, KeySetError> {
        let snapshot = Snapshot::build(set);
        if snapshot.keys.is_empty() {
            return Err(KeySetError::Empty);
        }
        Ok(Self {
            current: ArcSwap::from_pointee(snapshot),
        })
    }

    pub fn from_json(document: &str) -> Result<Self, KeySetError> {
        let set: JwkSet = serde_json::from_str(document)?;
        Self::from_jwks(&set)
    }

    pub fn resolve(&self, kid: &str) -> Option<DecodingKey> {
        self.current.load().keys.get(kid).cloned()
    }

    /// Swap in a new key set. An empty result keeps the current snapshot.
    pub fn replace(&self, set: &JwkSet) -> Result<usize, KeySetError> {
        let snapshot = Snapshot::build(set);
        if snapshot.keys.is_empty() {
            return Err(KeySetError::Empty);
        }
        let n = snapshot.keys.len();
        self.current.store(Arc::new(snapshot));
        Ok(n)
    }

    pub fn key_ids(&self) -> Vec<String> {
        let mut kids: Vec<String> = self.current.load().keys.keys().cloned().collect();
        kids.sort();
        kids
    }
}

pub async fn reload_from_file(keys: &TrustedKeys, path: &Path) -> Result<usize, KeySetError> {
    let document = tokio::fs::read_to_string(path).await?;
    let set: JwkSet = serde_json::from_str(&document)?;
    keys.replace(&set)
}

/// Re-read the key file on a fixed period. Failures keep the previous keys.
pub fn spawn_reload(keys: Arc<TrustedKeys>, path: PathBuf, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // The first tick completes immediately; keys were loaded at startup.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            match reload_from_file(&keys, &path).await {
                Ok(n) => tracing::debug!(keys = n, path = %path.display(), "jwks reloaded"),
                Err(err) => {
                    tracing::warn!(error = %err, path = %path.display(), "jwks reload failed")
                }
            }
        }
    })
}

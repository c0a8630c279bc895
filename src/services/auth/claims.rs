use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// `aud` may be a single string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    One(String),
    Many(Vec<String>),
}

impl Audience {
    pub fn contains(&self, audience: &str) -> bool {
        match self {
            Audience::One(a) => a == audience,
            Audience::Many(all) => all.iter().any(|a| a == audience),
        }
    }
}

/// Decoded access token payload.
///
/// Signature, `exp`, `iss` and `aud` are already verified by the time a value of
/// this type exists. Members this struct does not name are kept in `extra`, so
/// re-serializing yields the original payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub aud: Audience,
    pub exp: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,

    // Absent is distinct from empty: absence rejects as invalid claims.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Exact string membership, no wildcard or hierarchy matching.
    pub fn grants(&self, permission: &str) -> bool {
        self.permissions
            .as_deref()
            .is_some_and(|granted| granted.iter().any(|p| p == permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_unknown_members() {
        let payload = json!({
            "iss": "https://issuer.example/",
            "aud": ["drinks", "https://issuer.example/userinfo"],
            "exp": 1_900_000_000u64,
            "azp": "client-1",
            "scope": "openid",
            "permissions": ["get:drinks-detail"],
        });

        let claims: Claims = serde_json::from_value(payload.clone()).unwrap();
        assert!(claims.aud.contains("drinks"));
        assert_eq!(claims.extra.get("azp"), Some(&json!("client-1")));
        assert_eq!(serde_json::to_value(&claims).unwrap(), payload);
    }

    #[test]
    fn grants_requires_exact_match() {
        let claims: Claims = serde_json::from_value(json!({
            "iss": "i", "aud": "a", "exp": 1,
            "permissions": ["get:drinks-detail", "post:drinks"],
        }))
        .unwrap();

        assert!(claims.grants("post:drinks"));
        assert!(!claims.grants("post:drink"));
        assert!(!claims.grants("POST:drinks"));
        assert!(!claims.grants("get:drinks"));
    }

    #[test]
    fn missing_permissions_grants_nothing() {
        let claims: Claims =
            serde_json::from_value(json!({"iss": "i", "aud": "a", "exp": 1})).unwrap();
        assert_eq!(claims.permissions, None);
        assert!(!claims.grants("get:drinks-detail"));
    }
}

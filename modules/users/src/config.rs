use serde::{Deserialize, Serialize};

/// Configuration for the users module (`modules.users` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct UsersConfig {
    #[serde(default = "enabled")]
    pub v1_enabled: bool,
    #[serde(default = "enabled")]
    pub v2_enabled: bool,
    #[serde(default = "enabled")]
    pub v3_enabled: bool,
    /// Mount `POST /clean`.
    #[serde(default = "enabled")]
    pub reset_enabled: bool,
}

impl Default for UsersConfig {
    fn default() -> Self {
        Self {
            v1_enabled: true,
            v2_enabled: true,
            v3_enabled: true,
            reset_enabled: true,
        }
    }
}

fn enabled() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_enabled() {
        let cfg: UsersConfig = serde_json::from_value(serde_json::json!({
            "reset_enabled": false
        }))
        .unwrap();
        assert!(cfg.v1_enabled && cfg.v2_enabled && cfg.v3_enabled);
        assert!(!cfg.reset_enabled);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res: Result<UsersConfig, _> =
            serde_json::from_value(serde_json::json!({ "v4_enabled": true }));
        assert!(res.is_err());
    }
}

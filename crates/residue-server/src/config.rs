use residue_api::ConfigResponse;
use serde::Serialize;
use std::collections::BTreeMap;

/// Static service configuration handed to the router at startup.
///
/// Clients poll `/v1/config` for these values, so behavior toggles ship
/// without a client redeploy. There is deliberately no mutable global
/// fallback; whoever builds the `AppState` owns the values.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceConfig {
    pub game_title: String,
    pub min_supported_app_version: String,
    pub feature_flags: BTreeMap<String, bool>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let mut feature_flags = BTreeMap::new();
        feature_flags.insert("use_manifest_assets".to_string(), true);
        feature_flags.insert("enable_timed_choices".to_string(), false);
        feature_flags.insert("enable_cross_world_rewrite".to_string(), true);
        Self {
            game_title: "Residue".to_string(),
            min_supported_app_version: "0.1.0".to_string(),
            feature_flags,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn to_response(&self) -> ConfigResponse {
        ConfigResponse {
            game_title: self.game_title.clone(),
            min_supported_app_version: self.min_supported_app_version.clone(),
            feature_flags: self.feature_flags.clone(),
        }
    }
}

pub fn validate_startup_config_contract(service: &ServiceConfig) -> Result<(), String> {
    if service.game_title.trim().is_empty() {
        return Err("game_title must not be empty".to_string());
    }
    if service.min_supported_app_version.trim().is_empty() {
        return Err("min_supported_app_version must not be empty".to_string());
    }
    if service
        .feature_flags
        .keys()
        .any(|name| name.trim().is_empty())
    {
        return Err("feature flag names must not be empty".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_shipped_deployment() {
        let service = ServiceConfig::default();
        assert_eq!(service.game_title, "Residue");
        assert_eq!(service.feature_flags.get("use_manifest_assets"), Some(&true));
        assert_eq!(service.feature_flags.get("enable_timed_choices"), Some(&false));
        assert_eq!(
            service.feature_flags.get("enable_cross_world_rewrite"),
            Some(&true)
        );
        assert!(validate_startup_config_contract(&service).is_ok());
    }

    #[test]
    fn startup_validation_rejects_blank_title() {
        let service = ServiceConfig {
            game_title: "  ".to_string(),
            ..ServiceConfig::default()
        };
        let err = validate_startup_config_contract(&service).expect_err("blank title");
        assert!(err.contains("game_title"));
    }

    #[test]
    fn startup_validation_rejects_empty_flag_name() {
        let mut service = ServiceConfig::default();
        service.feature_flags.insert(String::new(), true);
        assert!(validate_startup_config_contract(&service).is_err());
    }
}

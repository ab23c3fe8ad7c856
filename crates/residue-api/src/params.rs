use crate::errors::ApiError;
use std::collections::BTreeMap;

pub const PARAM_VALUE_MAX_LEN: usize = 64;

/// Query parameters of `GET /v1/assets/manifest`.
///
/// `platform`, `app_version`, and `locale` are required and validated but not
/// used to filter content yet; they are reserved for future targeting rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestQueryParams {
    pub platform: String,
    pub app_version: String,
    pub locale: String,
    pub last_manifest_version: Option<u64>,
}

pub fn parse_manifest_params(
    query: &BTreeMap<String, String>,
) -> Result<ManifestQueryParams, ApiError> {
    let platform = required_value(query, "platform")?;
    let app_version = required_value(query, "app_version")?;
    let locale = required_value(query, "locale")?;

    let last_manifest_version = if let Some(raw) = query.get("last_manifest_version") {
        Some(
            raw.parse::<u64>()
                .map_err(|_| ApiError::invalid_param("last_manifest_version", raw))?,
        )
    } else {
        None
    };

    Ok(ManifestQueryParams {
        platform,
        app_version,
        locale,
        last_manifest_version,
    })
}

fn required_value(query: &BTreeMap<String, String>, name: &str) -> Result<String, ApiError> {
    let raw = query.get(name).ok_or_else(|| ApiError::missing_param(name))?;
    let value = raw.trim();
    if value.is_empty() {
        return Err(ApiError::invalid_param(name, raw));
    }
    if value.len() > PARAM_VALUE_MAX_LEN {
        return Err(ApiError::invalid_param(name, raw));
    }
    Ok(value.to_string())
}

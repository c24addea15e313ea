use serde::{Deserialize, Serialize};

use crate::domain::service::ServiceConfig;

/// Configuration for the profiles module (`modules.profiles` in the app config).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfilesConfig {
    #[serde(default = "default_max_display_name_length")]
    pub max_display_name_length: usize,
    #[serde(default = "default_max_age")]
    pub max_age: i32,
    #[serde(default = "default_max_years_of_experience")]
    pub max_years_of_experience: i32,
    #[serde(default = "default_max_qualification_length")]
    pub max_qualification_length: usize,
}

impl Default for ProfilesConfig {
    fn default() -> Self {
        Self {
            max_display_name_length: default_max_display_name_length(),
            max_age: default_max_age(),
            max_years_of_experience: default_max_years_of_experience(),
            max_qualification_length: default_max_qualification_length(),
        }
    }
}

impl From<&ProfilesConfig> for ServiceConfig {
    fn from(cfg: &ProfilesConfig) -> Self {
        Self {
            max_display_name_length: cfg.max_display_name_length,
            max_age: cfg.max_age,
            max_years_of_experience: cfg.max_years_of_experience,
            max_qualification_length: cfg.max_qualification_length,
        }
    }
}

fn default_max_display_name_length() -> usize {
    100
}

fn default_max_age() -> i32 {
    150
}

fn default_max_years_of_experience() -> i32 {
    80
}

fn default_max_qualification_length() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: ProfilesConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.max_display_name_length, 100);
        assert_eq!(cfg.max_age, 150);
        assert_eq!(cfg.max_years_of_experience, 80);
        assert_eq!(cfg.max_qualification_length, 200);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<ProfilesConfig, _> =
            serde_json::from_value(serde_json::json!({ "max_page_size": 10 }));
        assert!(res.is_err());
    }

    #[test]
    fn converts_into_service_config() {
        let cfg = ProfilesConfig {
            max_display_name_length: 12,
            ..Default::default()
        };
        let svc = ServiceConfig::from(&cfg);
        assert_eq!(svc.max_display_name_length, 12);
        assert_eq!(svc.max_qualification_length, 200);
    }
}

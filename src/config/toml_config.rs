use crate::core::export::ExportFormat;
use crate::domain::model::TaxonGroup;
use crate::utils::error::{Result, WildlifeError};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

pub const API_KEY_ENV_VARS: [&str; 2] = ["PULZE_API_KEY", "OPENAI_API_KEY"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub inaturalist: InatConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InatConfig {
    #[serde(default = "default_inat_base_url")]
    pub base_url: String,
    #[serde(default = "default_inat_timeout")]
    pub timeout_seconds: u64,
    /// 不設定時沿用 API 預設的分頁大小
    pub per_page: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    pub api_key: Option<String>,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_entries")]
    pub max_entries: u64,
    pub time_to_idle_seconds: Option<u64>,
}

impl CacheConfig {
    pub fn time_to_idle(&self) -> Option<Duration> {
        self.time_to_idle_seconds.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_path")]
    pub path: String,
    #[serde(default = "default_output_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub taxon_group: Option<TaxonGroup>,
}

fn default_inat_base_url() -> String {
    "https://api.inaturalist.org/v1".to_string()
}

fn default_inat_timeout() -> u64 {
    15
}

fn default_llm_base_url() -> String {
    "https://api.pulze.ai/v1".to_string()
}

fn default_llm_model() -> String {
    "pulze-v0".to_string()
}

fn default_llm_timeout() -> u64 {
    60
}

fn default_cache_entries() -> u64 {
    256
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_output_format() -> String {
    "csv".to_string()
}

impl Default for InatConfig {
    fn default() -> Self {
        Self {
            base_url: default_inat_base_url(),
            timeout_seconds: default_inat_timeout(),
            per_page: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            api_key: None,
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_cache_entries(),
            time_to_idle_seconds: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            format: default_output_format(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static env var pattern"))
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WildlifeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| WildlifeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PULZE_API_KEY})，找不到的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// Completion API key: the configured value, else the first set env var.
    pub fn resolve_api_key(&self) -> Result<String> {
        let configured = self
            .llm
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !env_var_pattern().is_match(key));

        if let Some(key) = configured {
            return Ok(key.to_string());
        }

        API_KEY_ENV_VARS
            .iter()
            .find_map(|name| std::env::var(name).ok().filter(|v| !v.trim().is_empty()))
            .ok_or_else(|| WildlifeError::MissingConfigError {
                field: format!("llm.api_key (or env {})", API_KEY_ENV_VARS.join(" / ")),
            })
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("inaturalist.base_url", &self.inaturalist.base_url)?;
        validate_range(
            "inaturalist.timeout_seconds",
            self.inaturalist.timeout_seconds,
            1,
            300,
        )?;
        if let Some(per_page) = self.inaturalist.per_page {
            validate_range("inaturalist.per_page", per_page, 1, 500)?;
        }

        validate_url("llm.base_url", &self.llm.base_url)?;
        validate_non_empty_string("llm.model", &self.llm.model)?;
        validate_range("llm.timeout_seconds", self.llm.timeout_seconds, 1, 600)?;

        validate_range("cache.max_entries", self.cache.max_entries, 1, 100_000)?;

        validate_path("output.path", &self.output.path)?;
        // 與 CLI 的 --format 使用同一個解析規則
        self.output.format.parse::<ExportFormat>()?;

        Ok(())
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();

        assert_eq!(config.inaturalist.base_url, "https://api.inaturalist.org/v1");
        assert_eq!(config.inaturalist.timeout_seconds, 15);
        assert_eq!(config.llm.model, "pulze-v0");
        assert_eq!(config.cache.max_entries, 256);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[inaturalist]
base_url = "http://localhost:9000/v1"
timeout_seconds = 5
per_page = 200

[llm]
base_url = "http://localhost:9001/v1"
model = "gpt-4o-mini"
api_key = "sk-test"
timeout_seconds = 30

[cache]
max_entries = 10
time_to_idle_seconds = 600

[output]
path = "./exports"
format = "json"

[defaults]
taxon_group = "Aves"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.inaturalist.per_page, Some(200));
        assert_eq!(config.llm.model, "gpt-4o-mini");
        assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
        assert_eq!(config.cache.time_to_idle(), Some(Duration::from_secs(600)));
        assert_eq!(config.defaults.taxon_group, Some(TaxonGroup::Aves));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("LOCAL_WILDLIFE_TEST_LLM_URL", "https://llm.example.com/v1");

        let toml_content = r#"
[llm]
base_url = "${LOCAL_WILDLIFE_TEST_LLM_URL}"
"#;

        let config = AppConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.llm.base_url, "https://llm.example.com/v1");

        std::env::remove_var("LOCAL_WILDLIFE_TEST_LLM_URL");
    }

    #[test]
    fn test_config_validation() {
        let config = AppConfig::from_toml_str(
            r#"
[inaturalist]
base_url = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[output]
format = "xlsx"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = AppConfig::from_toml_str(
            r#"
[inaturalist]
per_page = 1000
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    /// 輸出格式大小寫不拘，與 --format 一致
    #[test]
    fn test_output_format_is_case_insensitive() {
        let config = AppConfig::from_toml_str(
            r#"
[output]
format = "CSV"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        let config = AppConfig::from_toml_str(
            r#"
[output]
format = "Json"
"#,
        )
        .unwrap();
        assert!(config.validate().is_ok());

        let err = AppConfig::from_toml_str(
            r#"
[output]
format = "XLSX"
"#,
        )
        .unwrap()
        .validate()
        .unwrap_err();
        match err {
            WildlifeError::InvalidConfigValueError { field, .. } => {
                assert_eq!(field, "output.format")
            }
            other => panic!("expected invalid value error, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_taxon_group_fails_parsing() {
        let result = AppConfig::from_toml_str(
            r#"
[defaults]
taxon_group = "Fungi"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[llm]\nmodel = \"file-model\"\n")
            .unwrap();

        let config = AppConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.llm.model, "file-model");
    }
}

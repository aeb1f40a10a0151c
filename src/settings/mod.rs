use std::env;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

mod error;
pub mod logging;
mod server;

pub use error::SettingsError;
pub use logging::{LogFormat, LogOutput, LogSettings};
pub use server::{parse_env_var, ServerSettings};

pub type Result<T> = std::result::Result<T, SettingsError>;

/// 전체 설정
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// 서버 설정
    pub server: ServerSettings,

    /// 로깅 설정
    pub logging: LogSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            server: ServerSettings::default(),
            logging: LogSettings::default(),
        }
    }
}

impl Settings {
    /// 설정을 로드합니다. `GATEWAY_CONFIG_FILE`이 지정되면 TOML 파일을,
    /// 아니면 환경 변수를 사용합니다.
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("GATEWAY_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env()
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_display = path.as_ref().display().to_string();
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| SettingsError::FileError {
                path: path_display.clone(),
                error: e,
            })?;

        let settings: Settings =
            toml::from_str(&contents).map_err(|e| SettingsError::ParseError { source: e })?;

        info!(path = %path_display, "TOML 설정 로드 완료");
        Ok(settings)
    }

    pub fn from_env() -> Result<Self> {
        Ok(Settings {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
        })
    }
}

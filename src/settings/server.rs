use std::env;

use serde::Deserialize;

use super::SettingsError;

/// 서버 설정
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// 서버 이름. 없으면 번호로부터 기본 이름이 생성됩니다.
    pub name: Option<String>,

    /// HTTP 포트 (기본값: 8080)
    pub port: u16,

    /// 공유 시크릿. 비어 있으면 시크릿 게이트가 비활성화됩니다.
    pub secret: String,

    /// 디버그 모드 여부
    pub debug: bool,

    /// 서버 전역 경로 접두사
    pub path_prefix: String,

    /// 시크릿 게이트 강제 비활성화 여부
    pub ignore_secret: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            name: None,
            port: default_port(),
            secret: String::new(),
            debug: false,
            path_prefix: String::new(),
            ignore_secret: false,
        }
    }
}

fn default_port() -> u16 {
    8080
}

pub fn parse_env_var<T: std::str::FromStr, F: FnOnce() -> T>(
    name: &str,
    default: F,
) -> Result<T, SettingsError>
where
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(val) => val.parse().map_err(|e: T::Err| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: val,
            reason: e.to_string(),
        }),
        Err(env::VarError::NotPresent) => Ok(default()),
        Err(e) => Err(SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: "".to_string(),
            reason: e.to_string(),
        }),
    }
}

impl ServerSettings {
    const MIN_PORT: u32 = 1;
    const MAX_PORT: u32 = 65535;

    fn parse_port(name: &str, value: &str) -> Result<u16, SettingsError> {
        let port: u32 = value.parse().map_err(|_| SettingsError::EnvVarInvalid {
            var_name: name.to_string(),
            value: value.to_string(),
            reason: format!("포트는 {}-{} 범위여야 합니다", Self::MIN_PORT, Self::MAX_PORT),
        })?;

        if port < Self::MIN_PORT || port > Self::MAX_PORT {
            return Err(SettingsError::EnvVarInvalid {
                var_name: name.to_string(),
                value: value.to_string(),
                reason: format!("포트는 {}-{} 범위여야 합니다", Self::MIN_PORT, Self::MAX_PORT),
            });
        }

        Ok(port as u16)
    }

    pub fn from_env() -> Result<Self, SettingsError> {
        let port = match env::var("GATEWAY_PORT") {
            Ok(value) => Self::parse_port("GATEWAY_PORT", &value)?,
            Err(_) => default_port(),
        };

        Ok(ServerSettings {
            name: env::var("GATEWAY_SERVER_NAME").ok(),
            port,
            secret: env::var("GATEWAY_SECRET").unwrap_or_default(),
            debug: parse_env_var("GATEWAY_DEBUG", || false)?,
            path_prefix: env::var("GATEWAY_PATH_PREFIX").unwrap_or_default(),
            ignore_secret: parse_env_var("GATEWAY_IGNORE_SECRET", || false)?,
        })
    }
}

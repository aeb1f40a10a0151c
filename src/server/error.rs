use std::fmt;

use crate::routing::RoutingError;
use crate::settings::SettingsError;

/// 서버 수준 에러입니다.
///
/// `Config`는 시작 단계에서만 발생하는 치명적 오류이며, 잘못된 라우트
/// 테이블로 트래픽을 받는 일이 없도록 리스너를 시작하기 전에 프로세스를
/// 중단시켜야 합니다.
#[derive(Debug)]
pub enum Error {
    Config(RoutingError),
    Settings(SettingsError),
    Io(std::io::Error),
}

impl From<RoutingError> for Error {
    fn from(err: RoutingError) -> Self {
        Error::Config(err)
    }
}

impl From<SettingsError> for Error {
    fn from(err: SettingsError) -> Self {
        Error::Settings(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "설정 오류: {}", e),
            Error::Settings(e) => write!(f, "설정 오류: {}", e),
            Error::Io(e) => write!(f, "IO 오류: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Config(e) => Some(e),
            Error::Settings(e) => Some(e),
            Error::Io(e) => Some(e),
        }
    }
}

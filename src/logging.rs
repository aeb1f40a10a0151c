use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::EnvFilter;

use crate::settings::{LogFormat, LogOutput, LogSettings};

/// 전역 tracing 구독자를 초기화합니다.
///
/// 파일 출력을 쓰는 경우 반환된 가드를 프로세스가 끝날 때까지 보관해야
/// 버퍼가 유실되지 않습니다. 프로세스당 한 번만 호출해야 합니다.
pub fn init_logging(settings: &LogSettings) -> Option<WorkerGuard> {
    let filter = EnvFilter::from_default_env().add_directive(settings.level.into());

    match &settings.output {
        LogOutput::Stdout => {
            match settings.format {
                LogFormat::Text => {
                    tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_target(true)
                        .init();
                }
                LogFormat::Json => {
                    tracing_subscriber::fmt()
                        .json()
                        .with_env_filter(filter)
                        .with_timer(UtcTime::rfc_3339())
                        .with_target(true)
                        .init();
                }
            }
            None
        }
        LogOutput::File(path) => {
            let path = Path::new(path);
            let directory = path.parent().unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "gateway.log".to_string());

            let appender = tracing_appender::rolling::daily(directory, file_name);
            let (writer, guard) = tracing_appender::non_blocking(appender);

            match settings.format {
                LogFormat::Text => {
                    tracing_subscriber::fmt()
                        .with_env_filter(filter)
                        .with_writer(writer)
                        .with_ansi(false)
                        .init();
                }
                LogFormat::Json => {
                    tracing_subscriber::fmt()
                        .json()
                        .with_env_filter(filter)
                        .with_timer(UtcTime::rfc_3339())
                        .with_writer(writer)
                        .init();
                }
            }
            Some(guard)
        }
    }
}

// Logging - 파일 로그 초기화
//
// 터미널은 UI가 점유하므로 로그는 항상 파일로 보낸다.

use crate::config::Config;
use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const LOG_ENV: &str = "ZIPPER_LOG";
const LOG_FILE_NAME: &str = "zipper.log";

/// 설정 또는 기본 위치에서 로그 파일 경로 결정
pub fn log_file_path(config: &Config) -> PathBuf {
    if let Some(path) = &config.log_file {
        return path.clone();
    }
    dirs::data_local_dir()
        .map(|dir| dir.join("zipper"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

fn open_log_file(path: &PathBuf) -> std::io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// 전역 subscriber 설치. 로그 파일을 열 수 없으면 로깅 없이 계속 진행한다.
pub fn init(config: &Config) -> Option<PathBuf> {
    let path = log_file_path(config);
    let file = open_log_file(&path).ok()?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false),
        )
        .try_init()
        .ok()?;

    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_path_prefers_config() {
        let config = Config {
            log_file: Some(PathBuf::from("/tmp/custom-zipper.log")),
            ..Config::default()
        };
        assert_eq!(log_file_path(&config), PathBuf::from("/tmp/custom-zipper.log"));
    }

    #[test]
    fn test_default_log_file_name() {
        let path = log_file_path(&Config::default());
        assert_eq!(path.file_name().and_then(|n| n.to_str()), Some(LOG_FILE_NAME));
    }
}

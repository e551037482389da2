//! 설정 로드
//!
//! 설정 파일은 선택 사항이며 읽기 전용이다. 파일이 없으면 기본값을 사용한다.
//! 탐색 순서: `--config` 인자 → `ZIPPER_CONFIG` 환경변수 → `<config_dir>/zipper/config.toml`

use crate::utils::error::{Result, ZipperError};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CACHE_CAPACITY: usize = 10;
const CONFIG_ENV: &str = "ZIPPER_CONFIG";
const AVAILABLE_THEMES: &[&str] = &["dark", "light"];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// 미리보기 메타데이터 캐시 크기
    pub cache_capacity: usize,
    /// deflate 압축 레벨 (0-9, 없으면 라이브러리 기본값)
    pub compression_level: Option<i64>,
    /// UI 테마 이름
    pub theme: String,
    /// 기본 로그 레벨 (`ZIPPER_LOG` 환경변수가 우선)
    pub log_level: String,
    /// 로그 파일 경로
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            compression_level: None,
            theme: "dark".to_string(),
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// 설정 파일을 찾아 로드한다. 명시한 파일이 없으면 에러, 기본 위치에 없으면 기본값.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Ok(custom) = env::var(CONFIG_ENV) {
            let trimmed = custom.trim();
            if !trimmed.is_empty() {
                return Self::from_file(Path::new(trimmed));
            }
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("zipper").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            ZipperError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(content).map_err(|e| ZipperError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(ZipperError::Config(
                "cache_capacity must be at least 1".to_string(),
            ));
        }
        if let Some(level) = self.compression_level {
            if !(0..=9).contains(&level) {
                return Err(ZipperError::Config(format!(
                    "compression_level must be between 0 and 9, got {}",
                    level
                )));
            }
        }
        if !AVAILABLE_THEMES.contains(&self.theme.as_str()) {
            return Err(ZipperError::Config(format!(
                "unknown theme '{}' (expected one of: {})",
                self.theme,
                AVAILABLE_THEMES.join(", ")
            )));
        }
        Ok(())
    }
}

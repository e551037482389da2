//! 압축/해제 작업 모델
//!
//! 작업 요청, 기본 대상 경로 계산, 진행률 추적, 취소 토큰

use crate::utils::formatter::percent_of;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const ARCHIVE_EXTENSION: &str = "zip";

/// 작업 유형
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// 폴더 압축
    Compress,
    /// 압축 해제
    Extract,
}

impl OperationKind {
    pub fn name(&self) -> &'static str {
        match self {
            OperationKind::Compress => "Compress",
            OperationKind::Extract => "Extract",
        }
    }
}

/// 사용자 동작 하나에 대응하는 작업 요청
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationRequest {
    pub kind: OperationKind,
    pub source: PathBuf,
    pub destination: Option<PathBuf>,
}

impl OperationRequest {
    pub fn compress(source: impl Into<PathBuf>) -> Self {
        Self {
            kind: OperationKind::Compress,
            source: source.into(),
            destination: None,
        }
    }

    pub fn extract(source: impl Into<PathBuf>) -> Self {
        Self {
            kind: OperationKind::Extract,
            source: source.into(),
            destination: None,
        }
    }

    pub fn with_destination(mut self, destination: impl Into<PathBuf>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    /// 상대 경로인 원본과 대상을 `base` 아래로 옮긴다
    pub fn anchored_at(mut self, base: &Path) -> Self {
        self.source = anchor_path(base, self.source);
        self.destination = self.destination.map(|dest| anchor_path(base, dest));
        self
    }

    /// 명시된 대상 또는 작업 유형별 기본 대상
    pub fn resolved_destination(&self) -> PathBuf {
        match (&self.destination, self.kind) {
            (Some(dest), _) => dest.clone(),
            (None, OperationKind::Compress) => default_archive_path(&self.source),
            (None, OperationKind::Extract) => default_extract_dir(&self.source),
        }
    }
}

/// 상대 경로면 `base` 에 붙이고 절대 경로는 그대로
pub fn anchor_path(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

/// 폴더 옆에 `<폴더 이름>.zip` 경로 (확장자는 덧붙임)
pub fn default_archive_path(folder: &Path) -> PathBuf {
    // "." 이나 "dir/.." 처럼 이름이 없는 경로는 실제 경로로 바꿔서 계산
    let folder = match folder.file_name() {
        Some(_) => folder.to_path_buf(),
        None => fs::canonicalize(folder).unwrap_or_else(|_| folder.to_path_buf()),
    };
    let mut name: OsString = folder
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("archive"));
    name.push(".");
    name.push(ARCHIVE_EXTENSION);
    folder.with_file_name(name)
}

/// 압축 파일 확장자를 제거한 형제 폴더 경로
pub fn default_extract_dir(archive: &Path) -> PathBuf {
    let stripped = archive.with_extension("");
    if stripped == archive {
        // 확장자가 없으면 같은 이름의 폴더를 만들 수 없음
        let mut name = archive
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push("_extracted");
        return archive.with_file_name(name);
    }
    stripped
}

/// 협력적 취소 토큰 (엔트리 사이에서만 확인)
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// 바이트 기준 진행률 계산기
///
/// 보고되는 값은 한 작업 안에서 감소하지 않으며, `finish` 이후 항상 100으로 끝난다.
#[derive(Debug, Clone)]
pub struct ProgressTracker {
    total_bytes: u64,
    processed_bytes: u64,
    last_reported: Option<u8>,
}

impl ProgressTracker {
    pub fn new(total_bytes: u64) -> Self {
        Self {
            total_bytes,
            processed_bytes: 0,
            last_reported: None,
        }
    }

    /// 항목 하나 처리 후 호출. 보고할 진행률 반환
    pub fn advance(&mut self, bytes: u64) -> u8 {
        self.processed_bytes = self.processed_bytes.saturating_add(bytes);
        let pct = percent_of(self.processed_bytes, self.total_bytes);
        let pct = self.last_reported.map_or(pct, |last| pct.max(last));
        self.last_reported = Some(pct);
        pct
    }

    /// 아직 100을 보고하지 않았다면 100 반환
    pub fn finish(&mut self) -> Option<u8> {
        if self.last_reported == Some(100) {
            return None;
        }
        self.last_reported = Some(100);
        Some(100)
    }
}

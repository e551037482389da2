//! 압축 파일 엔트리 / 메타데이터 모델

use chrono::NaiveDateTime;

/// 압축 파일 내부의 단일 항목 (파일 또는 디렉토리 마커)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// `/` 구분 상대 경로 (트리 구성 키)
    pub path: String,
    /// 압축 해제 크기 (바이트)
    pub size: u64,
    /// 수정 시각 (초 단위, 없으면 None)
    pub modified: Option<NaiveDateTime>,
    /// 디렉토리 마커 여부
    pub is_dir: bool,
}

/// 한 압축 파일의 엔트리 목록과 집계 정보
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArchiveMetadata {
    /// 압축 파일 내부 저장 순서
    pub entries: Vec<ArchiveEntry>,
    pub total_size: u64,
    pub entry_count: usize,
}

impl ArchiveMetadata {
    pub fn from_entries(entries: Vec<ArchiveEntry>) -> Self {
        let total_size = entries.iter().map(|e| e.size).sum();
        let entry_count = entries.len();
        Self {
            entries,
            total_size,
            entry_count,
        }
    }
}

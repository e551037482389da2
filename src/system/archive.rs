use crate::models::{ArchiveEntry, ArchiveMetadata, CancelToken, OperationKind, OperationRequest, ProgressTracker};
use crate::utils::error::{Result, ZipperError};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use std::fs::{self, File};
use std::io::{self, ErrorKind};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, info, warn};
use zip::result::ZipError;
use zip::write::SimpleFileOptions as ZipFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// ZIP 엔트리 하나가 가질 수 있는 최대 크기 (이보다 크면 ZIP64 필요)
const ZIP32_LIMIT: u64 = u32::MAX as u64;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressOptions {
    /// deflate 레벨 (None = 라이브러리 기본값)
    pub level: Option<i64>,
}

/// 작업 완료 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSummary {
    pub kind: OperationKind,
    /// 생성된 압축 파일 또는 해제 폴더
    pub output: PathBuf,
    pub entries: usize,
    pub total_bytes: u64,
}

#[derive(Debug, Clone)]
struct SourceFile {
    source_path: PathBuf,
    entry_name: String,
    size: u64,
    modified: Option<SystemTime>,
}

/// 요청 종류에 맞는 작업 실행
pub fn run_operation(
    request: &OperationRequest,
    options: CompressOptions,
    progress: &dyn Fn(u8),
    cancel: &CancelToken,
) -> Result<ArchiveSummary> {
    let destination = request.resolved_destination();
    match request.kind {
        OperationKind::Compress => {
            compress_folder(&request.source, &destination, options, progress, cancel)
        }
        OperationKind::Extract => extract_archive(&request.source, &destination, progress, cancel),
    }
}

/// 폴더 아래 모든 일반 파일을 하나의 ZIP 으로 압축한다.
///
/// 기존 파일은 경고 없이 덮어쓴다. 실패 시 만들어진 일부 파일은 그대로 남는다.
pub fn compress_folder(
    source: &Path,
    output: &Path,
    options: CompressOptions,
    progress: &dyn Fn(u8),
    cancel: &CancelToken,
) -> Result<ArchiveSummary> {
    match fs::metadata(source) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(ZipperError::NotFound {
                path: source.to_path_buf(),
            })
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ZipperError::NotFound {
                path: source.to_path_buf(),
            })
        }
        Err(e) => return Err(ZipperError::Io(e)),
    }

    let mut files = Vec::new();
    collect_source_files(source, source, output, &mut files)?;
    let total_bytes = files.iter().map(|f| f.size).sum::<u64>();
    let mut tracker = ProgressTracker::new(total_bytes);
    info!(
        source = %source.display(),
        output = %output.display(),
        files = files.len(),
        total_bytes,
        "compress started"
    );

    let file = File::create(output)?;
    let mut writer = ZipWriter::new(file);
    let base_options = ZipFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(options.level);

    for item in &files {
        if cancel.is_cancelled() {
            warn!(output = %output.display(), "compress cancelled");
            return Err(ZipperError::Cancelled);
        }

        let entry_options = base_options
            .last_modified_time(zip_timestamp(item.modified))
            .large_file(item.size >= ZIP32_LIMIT);
        writer
            .start_file(item.entry_name.as_str(), entry_options)
            .map_err(zip_write_error)?;
        let mut src = File::open(&item.source_path)?;
        io::copy(&mut src, &mut writer)?;
        debug!(entry = %item.entry_name, size = item.size, "entry written");

        progress(tracker.advance(item.size));
    }

    writer.finish().map_err(zip_write_error)?;
    if let Some(pct) = tracker.finish() {
        progress(pct);
    }
    info!(output = %output.display(), "compress finished");

    Ok(ArchiveSummary {
        kind: OperationKind::Compress,
        output: output.to_path_buf(),
        entries: files.len(),
        total_bytes,
    })
}

/// ZIP 파일을 대상 폴더에 푼다.
///
/// 상위 폴더로 벗어나는 엔트리가 하나라도 있으면 아무것도 쓰지 않고 전체를 거부한다.
pub fn extract_archive(
    archive_path: &Path,
    dest_dir: &Path,
    progress: &dyn Fn(u8),
    cancel: &CancelToken,
) -> Result<ArchiveSummary> {
    let mut archive = open_zip(archive_path)?;
    let entries = collect_entries(&mut archive, archive_path)?;

    let mut targets = Vec::with_capacity(entries.len());
    for entry in &entries {
        let Some(dest_path) = sanitize_extract_path(dest_dir, &entry.path) else {
            warn!(entry = %entry.path, "blocked unsafe entry path");
            return Err(ZipperError::UnsafeEntryPath {
                entry: entry.path.clone(),
            });
        };
        targets.push(dest_path);
    }

    let total_bytes = entries.iter().map(|e| e.size).sum::<u64>();
    let mut tracker = ProgressTracker::new(total_bytes);
    info!(
        archive = %archive_path.display(),
        dest = %dest_dir.display(),
        entries = entries.len(),
        total_bytes,
        "extract started"
    );

    fs::create_dir_all(dest_dir)?;
    for (idx, (entry, dest_path)) in entries.iter().zip(&targets).enumerate() {
        if cancel.is_cancelled() {
            warn!(archive = %archive_path.display(), "extract cancelled");
            return Err(ZipperError::Cancelled);
        }

        if entry.is_dir {
            fs::create_dir_all(dest_path)?;
        } else {
            if let Some(parent) = dest_path.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut zip_file = archive
                .by_index(idx)
                .map_err(|e| zip_read_error(archive_path, e))?;
            let mut out = File::create(dest_path)?;
            io::copy(&mut zip_file, &mut out)?;
        }
        debug!(entry = %entry.path, size = entry.size, "entry extracted");

        progress(tracker.advance(entry.size));
    }

    if let Some(pct) = tracker.finish() {
        progress(pct);
    }
    info!(dest = %dest_dir.display(), "extract finished");

    Ok(ArchiveSummary {
        kind: OperationKind::Extract,
        output: dest_dir.to_path_buf(),
        entries: entries.len(),
        total_bytes,
    })
}

/// 압축 파일의 엔트리 목록 (저장 순서)
pub fn list_entries(path: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut archive = open_zip(path)?;
    collect_entries(&mut archive, path)
}

/// 엔트리 목록과 집계 정보
pub fn read_metadata(path: &Path) -> Result<ArchiveMetadata> {
    let entries = list_entries(path)?;
    debug!(archive = %path.display(), entries = entries.len(), "metadata loaded");
    Ok(ArchiveMetadata::from_entries(entries))
}

fn open_zip(path: &Path) -> Result<ZipArchive<File>> {
    // 일부 플랫폼에서는 폴더도 열리므로 먼저 확인
    if path.is_dir() {
        return Err(ZipperError::NotAnArchive {
            path: path.to_path_buf(),
            reason: "is a directory".to_string(),
        });
    }
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ZipperError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ZipperError::Io(e),
    })?;
    ZipArchive::new(file).map_err(|e| zip_read_error(path, e))
}

fn collect_entries(archive: &mut ZipArchive<File>, path: &Path) -> Result<Vec<ArchiveEntry>> {
    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| zip_read_error(path, e))?;
        entries.push(ArchiveEntry {
            path: entry.name().to_string(),
            size: entry.size(),
            modified: entry.last_modified().and_then(naive_timestamp),
            is_dir: entry.is_dir(),
        });
    }
    Ok(entries)
}

/// 디렉토리 우선이 아닌 이름순 재귀 수집 (실행마다 같은 순서)
fn collect_source_files(
    root: &Path,
    dir: &Path,
    output: &Path,
    out: &mut Vec<SourceFile>,
) -> Result<()> {
    let mut children = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    children.sort_by_key(|entry| entry.file_name());

    for child in children {
        let path = child.path();
        let meta = fs::symlink_metadata(&path)?;
        if meta.is_dir() {
            collect_source_files(root, &path, output, out)?;
        } else if meta.is_file() {
            if path == output {
                continue;
            }
            let relative = path.strip_prefix(root).unwrap_or(&path);
            out.push(SourceFile {
                entry_name: archive_entry_name(relative),
                source_path: path.clone(),
                size: meta.len(),
                modified: meta.modified().ok(),
            });
        }
    }
    Ok(())
}

/// OS 경로 구분자와 관계없이 `/` 로 연결한 엔트리 이름
fn archive_entry_name(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(v) => Some(v.to_string_lossy().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn sanitize_extract_path(dest_root: &Path, raw_name: &str) -> Option<PathBuf> {
    let normalized = raw_name.replace('\\', "/");
    let mut clean = PathBuf::new();
    for comp in Path::new(&normalized).components() {
        match comp {
            Component::Normal(v) => clean.push(v),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        return None;
    }
    let out = dest_root.join(clean);
    out.starts_with(dest_root).then_some(out)
}

fn zip_timestamp(modified: Option<SystemTime>) -> zip::DateTime {
    modified
        .map(|t| chrono::DateTime::<chrono::Local>::from(t).naive_local())
        .and_then(|dt| {
            zip::DateTime::from_date_and_time(
                u16::try_from(dt.year()).ok()?,
                dt.month() as u8,
                dt.day() as u8,
                dt.hour() as u8,
                dt.minute() as u8,
                dt.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

fn naive_timestamp(dt: zip::DateTime) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(dt.year() as i32, dt.month() as u32, dt.day() as u32)?.and_hms_opt(
        dt.hour() as u32,
        dt.minute() as u32,
        dt.second() as u32,
    )
}

fn zip_read_error(path: &Path, error: ZipError) -> ZipperError {
    match error {
        ZipError::Io(e) if e.kind() != ErrorKind::UnexpectedEof => ZipperError::Io(e),
        other => ZipperError::NotAnArchive {
            path: path.to_path_buf(),
            reason: other.to_string(),
        },
    }
}

fn zip_write_error(error: ZipError) -> ZipperError {
    match error {
        ZipError::Io(e) => ZipperError::Io(e),
        other => ZipperError::Io(io::Error::other(other)),
    }
}

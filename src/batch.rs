//! 배치 모드 (`--batch`)
//!
//! TUI 없이 작업 하나를 실행하고 진행률은 stderr 의 막대로, 결과는 stdout 으로 출력한다.

use crate::config::Config;
use crate::models::{ArchiveMetadata, OperationKind, OperationRequest};
use crate::system::{
    run_operation, ArchiveMetadataCache, ArchiveSummary, CompressOptions, OperationListener,
    OperationRunner,
};
use crate::utils::formatter::{format_byte_count, format_entry_date, format_file_size, pluralize};
use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::path::Path;

const BAR_TEMPLATE: &str = "{msg} [{bar:40.cyan/blue}] {pos:>3}%";

/// 실행기 이벤트를 진행 막대로 옮기는 리스너
struct BarListener {
    bar: ProgressBar,
    result: Option<std::result::Result<ArchiveSummary, String>>,
}

impl OperationListener<ArchiveSummary> for BarListener {
    fn on_progress(&mut self, percent: u8) {
        self.bar.set_position(u64::from(percent));
    }

    fn on_finished(&mut self, result: std::result::Result<ArchiveSummary, String>) {
        self.bar.finish_and_clear();
        self.result = Some(result);
    }
}

fn progress_bar(message: String) -> Result<ProgressBar> {
    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)?
            .progress_chars("#>-"),
    );
    bar.set_message(message);
    Ok(bar)
}

/// 작업을 실행하고 끝날 때까지 진행 막대를 갱신한다
pub fn run_with_progress(config: &Config, request: OperationRequest) -> Result<ArchiveSummary> {
    let kind = request.kind;
    let options = CompressOptions {
        level: config.compression_level,
    };
    let label = format!("{} {}", kind.name(), request.source.display());
    let bar = progress_bar(label.clone())?;

    let mut runner = OperationRunner::new("batch");
    runner.start(label, move |ctx| {
        run_operation(
            &request,
            options,
            &|percent| ctx.progress(percent),
            ctx.cancel_token(),
        )
    })?;

    let mut listener = BarListener { bar, result: None };
    runner.wait(&mut listener);

    match listener.result {
        Some(Ok(summary)) => Ok(summary),
        Some(Err(reason)) => Err(anyhow!("{} failed: {}", kind.name(), reason)),
        None => Err(anyhow!("{} finished without a result", kind.name())),
    }
}

/// 완료 한 줄 요약
pub fn describe(summary: &ArchiveSummary) -> String {
    let verb = match summary.kind {
        OperationKind::Compress => "Compressed",
        OperationKind::Extract => "Extracted",
    };
    format!(
        "{} {} ({}) -> {}",
        verb,
        pluralize(summary.entries, "file", "files"),
        format_file_size(summary.total_bytes),
        summary.output.display()
    )
}

/// 캐시를 거쳐 압축 파일 메타데이터를 읽는다
pub fn load_metadata(config: &Config, archive: &Path) -> Result<ArchiveMetadata> {
    let mut cache = ArchiveMetadataCache::new(config.cache_capacity);
    Ok(cache.get(archive)?)
}

/// 미리보기 목록: 크기, 날짜, 경로 순
pub fn print_listing(metadata: &ArchiveMetadata, out: &mut dyn Write) -> std::io::Result<()> {
    for entry in &metadata.entries {
        let size = if entry.is_dir {
            String::new()
        } else {
            format_byte_count(entry.size)
        };
        writeln!(
            out,
            "{:>16}  {:<10}  {}",
            size,
            format_entry_date(entry.modified),
            entry.path
        )?;
    }
    writeln!(
        out,
        "{}, {} total",
        pluralize(metadata.entry_count, "entry", "entries"),
        format_byte_count(metadata.total_size)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_folder(base: &Path) -> std::path::PathBuf {
        let docs = base.join("docs");
        fs::create_dir_all(docs.join("sub")).unwrap();
        fs::write(docs.join("a.txt"), b"hello world!").unwrap();
        fs::write(docs.join("sub").join("b.txt"), b"12345678").unwrap();
        docs
    }

    #[test]
    fn test_batch_compress_then_list() {
        let temp = TempDir::new().unwrap();
        let docs = make_folder(temp.path());
        let config = Config::default();

        let summary = run_with_progress(&config, OperationRequest::compress(&docs)).unwrap();
        assert_eq!(summary.output, temp.path().join("docs.zip"));
        assert!(describe(&summary).starts_with("Compressed 2 files (20 B)"));

        let metadata = load_metadata(&config, &summary.output).unwrap();
        let mut out = Vec::new();
        print_listing(&metadata, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("a.txt"));
        assert!(lines[0].contains("12 bytes"));
        assert!(lines[1].ends_with("sub/b.txt"));
        assert_eq!(lines[2], "2 entries, 20 bytes total");
    }

    #[test]
    fn test_batch_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        let config = Config::default();
        let err = run_with_progress(
            &config,
            OperationRequest::extract(temp.path().join("missing.zip")),
        )
        .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Extract failed"), "{}", message);
        assert!(message.contains("missing.zip"));
    }

    #[test]
    fn test_listing_leaves_directory_size_blank() {
        let metadata = ArchiveMetadata::from_entries(vec![crate::models::ArchiveEntry {
            path: "empty/".to_string(),
            size: 0,
            modified: None,
            is_dir: true,
        }]);
        let mut out = Vec::new();
        print_listing(&metadata, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.lines().next(), Some(format!("{:>16}  {:<10}  empty/", "", "-").as_str()));
    }
}

use super::{App, LoadedPreview, PreviewState, ProgressState, StatusMessage};
use crate::models::operation::anchor_path;
use crate::models::{OperationKind, OperationRequest};
use crate::system::{cache, run_operation, ArchiveSummary, CompressOptions, RunnerEvent};
use crate::utils::formatter::{format_file_size, pluralize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

impl App {
    /// 폴더 압축 시작 (`<폴더>.zip`)
    pub fn start_compress(&mut self, folder: PathBuf) {
        self.start_operation(OperationRequest::compress(folder));
    }

    /// 압축 해제 시작 (확장자를 뺀 형제 폴더)
    pub fn start_extract(&mut self, archive: PathBuf) {
        self.start_operation(OperationRequest::extract(archive));
    }

    /// 작업 시작. 상대 경로는 작업 디렉토리 기준
    pub fn start_operation(&mut self, request: OperationRequest) {
        let request = request.anchored_at(&self.base_dir);
        let destination = request.resolved_destination();
        let detail = format!(
            "{} -> {}",
            display_name(&request.source),
            display_name(&destination)
        );
        let options = CompressOptions {
            level: self.config.compression_level,
        };
        let kind = request.kind;
        let label = format!("{} {}", kind.name(), request.source.display());

        let started = self.operations.start(label, move |ctx| {
            run_operation(
                &request,
                options,
                &|percent| ctx.progress(percent),
                ctx.cancel_token(),
            )
        });

        match started {
            Ok(()) => {
                self.progress = Some(ProgressState {
                    kind,
                    percent: 0,
                    detail,
                    cancel_requested: false,
                });
                self.status = StatusMessage::info(format!("{} running...", kind.name()));
            }
            Err(err) => {
                warn!(operation = kind.name(), error = %err, "operation not started");
                self.status = StatusMessage::error(err.to_string());
            }
        }
    }

    /// 압축 파일 내용 미리보기 (캐시 경유)
    pub fn start_preview(&mut self, archive: PathBuf) {
        // 캐시 키와 미리보기 경로가 압축 결과 경로와 같은 형태가 되도록
        let archive = anchor_path(&self.base_dir, archive);
        let shared = Arc::clone(&self.cache);
        let path = archive.clone();
        let started = self.previews.start(
            format!("preview {}", archive.display()),
            move |_ctx| {
                let metadata = cache::fetch(&shared, &path)?;
                Ok(LoadedPreview {
                    archive_path: path,
                    metadata,
                })
            },
        );

        match started {
            Ok(()) => {
                self.status = StatusMessage::info(format!("Loading {}...", display_name(&archive)));
                self.preview_loading = Some(archive);
            }
            Err(err) => self.status = StatusMessage::error(err.to_string()),
        }
    }

    /// 실행 중인 작업 취소 요청
    pub fn cancel_operation(&mut self) {
        if !self.operations.cancel() {
            return;
        }
        if let Some(progress) = self.progress.as_mut() {
            progress.cancel_requested = true;
        }
        self.status = StatusMessage::info("Cancelling...");
    }

    /// 두 실행기의 이벤트 반영 (메인 루프에서 호출)
    pub fn process_events(&mut self) {
        let mut events: Vec<RunnerEvent<ArchiveSummary>> = Vec::new();
        self.operations.poll(&mut events);
        for event in events {
            match event {
                RunnerEvent::Progress(percent) => {
                    if let Some(progress) = self.progress.as_mut() {
                        progress.percent = percent;
                    }
                }
                RunnerEvent::Finished(result) => self.finish_operation(result),
            }
        }

        let mut loaded: Vec<RunnerEvent<LoadedPreview>> = Vec::new();
        self.previews.poll(&mut loaded);
        for event in loaded {
            if let RunnerEvent::Finished(result) = event {
                self.finish_preview(result);
            }
        }
    }

    fn finish_operation(&mut self, result: Result<ArchiveSummary, String>) {
        let Some(progress) = self.progress.take() else {
            return;
        };
        let name = progress.kind.name();

        match result {
            Ok(summary) => {
                info!(output = %summary.output.display(), entries = summary.entries, "{} done", name);
                self.status = StatusMessage::success(format!(
                    "{} done: {} ({}, {})",
                    name,
                    display_name(&summary.output),
                    pluralize(summary.entries, "file", "files"),
                    format_file_size(summary.total_bytes)
                ));
                if summary.kind == OperationKind::Compress {
                    self.after_archive_written(&summary.output);
                }
            }
            Err(reason) => {
                self.status = StatusMessage::error(format!("{} failed: {}", name, reason));
            }
        }
    }

    /// 새로 쓴 압축 파일의 캐시를 버리고, 미리보기 중이면 다시 읽는다
    fn after_archive_written(&mut self, archive: &Path) {
        let removed = cache::lock(&self.cache).invalidate(archive);
        if removed {
            info!(archive = %archive.display(), "metadata cache invalidated");
        }

        let showing = self
            .preview
            .as_ref()
            .is_some_and(|preview| preview.archive_path == archive);
        if showing && !self.previews.is_busy() {
            let status = self.status.clone();
            self.start_preview(archive.to_path_buf());
            self.status = status;
        }
    }

    fn finish_preview(&mut self, result: Result<LoadedPreview, String>) {
        let path = self.preview_loading.take();
        match result {
            Ok(loaded) => {
                let same_archive = self
                    .preview
                    .as_ref()
                    .is_some_and(|preview| preview.archive_path == loaded.archive_path);
                if !same_archive {
                    self.status = StatusMessage::success(format!(
                        "{}: {}, {}",
                        display_name(&loaded.archive_path),
                        pluralize(loaded.metadata.entry_count, "entry", "entries"),
                        format_file_size(loaded.metadata.total_size)
                    ));
                }
                self.preview = Some(PreviewState::new(loaded));
            }
            Err(reason) => {
                let name = path.as_deref().map(display_name).unwrap_or_default();
                self.status = StatusMessage::error(format!("Preview {} failed: {}", name, reason));
            }
        }
    }
}

/// 파일 이름만 (없으면 전체 경로)
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

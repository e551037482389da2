use crate::config::Config;
use crate::core::actions::Action;
use crate::models::{ArchiveMetadata, ArchiveTree, OperationKind, TreeRow};
use crate::system::{ArchiveMetadataCache, ArchiveSummary, OperationRunner, SharedMetadataCache};
use crate::ui::{LayoutManager, StatusLevel, Theme};
use crate::utils::formatter::{format_file_size, pluralize};
use std::env;
use std::path::PathBuf;

mod navigation;
mod operations;
mod prompt;
mod text_edit;


pub use prompt::{PromptPurpose, PromptState};

/// 미리보기 작업 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPreview {
    pub archive_path: PathBuf,
    pub metadata: ArchiveMetadata,
}

/// 현재 미리보기 중인 압축 파일
#[derive(Debug)]
pub struct PreviewState {
    pub archive_path: PathBuf,
    pub metadata: ArchiveMetadata,
    pub tree: ArchiveTree,
    /// 화면에 보이는 행 (펼침 상태가 바뀔 때마다 다시 계산)
    pub rows: Vec<TreeRow>,
    pub selected: usize,
    pub scroll_offset: usize,
}

impl PreviewState {
    fn new(loaded: LoadedPreview) -> Self {
        let mut tree = ArchiveTree::from_entries(&loaded.metadata.entries);
        // 처음에는 최상위 폴더만 펼친다
        tree.expand_to_depth(0);
        let rows = tree.visible_rows();
        Self {
            archive_path: loaded.archive_path,
            metadata: loaded.metadata,
            tree,
            rows,
            selected: 0,
            scroll_offset: 0,
        }
    }

    /// 커서 위치의 트리 노드 인덱스
    pub fn selected_node(&self) -> Option<usize> {
        self.rows.get(self.selected).map(|row| row.node)
    }
}

/// 실행 중인 작업의 진행 상태
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub kind: OperationKind,
    pub percent: u8,
    /// "원본 -> 대상"
    pub detail: String,
    pub cancel_requested: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Info,
        }
    }

    fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Success,
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            level: StatusLevel::Error,
        }
    }
}

/// 앱 상태
pub struct App {
    /// 종료 플래그
    pub should_quit: bool,
    pub layout: LayoutManager,
    pub theme: Theme,
    config: Config,
    /// 상대 경로 입력의 기준 폴더
    base_dir: PathBuf,
    /// 압축/해제 실행기 (슬롯 1개)
    operations: OperationRunner<ArchiveSummary>,
    /// 미리보기 로딩 실행기
    previews: OperationRunner<LoadedPreview>,
    cache: SharedMetadataCache,
    pub progress: Option<ProgressState>,
    pub status: StatusMessage,
    pub preview: Option<PreviewState>,
    /// 로딩 중인 미리보기 경로
    pub preview_loading: Option<PathBuf>,
    pub prompt: Option<PromptState>,
}

impl App {
    /// 설정에 맞춰 실행기와 캐시를 만들어 앱 생성
    pub fn new(config: Config) -> Self {
        let cache = ArchiveMetadataCache::shared(config.cache_capacity);
        Self::with_services(
            config,
            OperationRunner::new("operation"),
            OperationRunner::new("preview"),
            cache,
        )
    }

    /// 실행기와 캐시를 외부에서 주입
    pub fn with_services(
        config: Config,
        operations: OperationRunner<ArchiveSummary>,
        previews: OperationRunner<LoadedPreview>,
        cache: SharedMetadataCache,
    ) -> Self {
        let base_dir = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            should_quit: false,
            layout: LayoutManager::new(),
            theme: Theme::by_name(&config.theme),
            config,
            base_dir,
            operations,
            previews,
            cache,
            progress: None,
            status: StatusMessage::info("Press c to compress, x to extract, p to preview"),
            preview: None,
            preview_loading: None,
            prompt: None,
        }
    }

    pub fn quit(&mut self) {
        if self.operations.is_busy() {
            // 진행 중인 작업은 엔트리 경계에서 멈춘다
            self.operations.cancel();
        }
        self.should_quit = true;
    }

    /// 작업 또는 미리보기 로딩이 진행 중이면 true (이벤트 폴링 간격 결정)
    pub fn is_processing(&self) -> bool {
        self.operations.is_busy() || self.previews.is_busy()
    }

    /// 압축/해제가 실행 중이면 true
    pub fn is_operation_busy(&self) -> bool {
        self.operations.is_busy()
    }

    /// 일반 모드 액션 실행
    pub fn execute_action(&mut self, action: Action) {
        match action {
            Action::MoveUp => self.move_up(),
            Action::MoveDown => self.move_down(),
            Action::PageUp => self.page_up(),
            Action::PageDown => self.page_down(),
            Action::GoToTop => self.go_top(),
            Action::GoToBottom => self.go_bottom(),
            Action::ToggleExpand => self.toggle_selected(),
            Action::Expand => self.expand_selected(),
            Action::Collapse => self.collapse_selected(),
            Action::ExpandAll => self.set_all_expanded(true),
            Action::CollapseAll => self.set_all_expanded(false),
            Action::Compress => self.open_prompt(PromptPurpose::Compress),
            Action::Extract => self.open_prompt(PromptPurpose::Extract),
            Action::Preview => self.open_prompt(PromptPurpose::Preview),
            Action::Cancel => self.cancel_operation(),
            Action::Quit => self.quit(),
        }
    }

    /// 상태바 오른쪽 요약
    pub fn preview_summary(&self) -> String {
        match &self.preview {
            Some(preview) => format!(
                "{} | {}",
                pluralize(preview.metadata.entry_count, "entry", "entries"),
                format_file_size(preview.metadata.total_size)
            ),
            None => String::new(),
        }
    }
}

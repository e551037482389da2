use super::text_edit::TextInput;
use super::{App, StatusMessage};
use crate::utils::error::ZipperError;
use crossterm::event::{KeyCode, KeyModifiers};
use std::path::{Path, PathBuf};

/// 경로 입력 팝업의 용도
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptPurpose {
    Compress,
    Extract,
    Preview,
}

impl PromptPurpose {
    pub fn title(&self) -> &'static str {
        match self {
            PromptPurpose::Compress => "Compress folder",
            PromptPurpose::Extract => "Extract archive",
            PromptPurpose::Preview => "Preview archive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptPurpose::Compress => "Folder to compress:",
            PromptPurpose::Extract | PromptPurpose::Preview => "ZIP archive:",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptState {
    pub purpose: PromptPurpose,
    pub input: TextInput,
}

impl App {
    /// 경로 입력 팝업 열기. 압축/해제는 작업 중이면 열지 않는다.
    pub fn open_prompt(&mut self, purpose: PromptPurpose) {
        if purpose != PromptPurpose::Preview && self.operations.is_busy() {
            self.status = StatusMessage::error(ZipperError::Busy.to_string());
            return;
        }
        let initial = self.prompt_initial_value(purpose);
        self.prompt = Some(PromptState {
            purpose,
            input: TextInput::with_value(initial),
        });
    }

    pub fn close_prompt(&mut self) {
        self.prompt = None;
    }

    /// 미리보기 중인 압축 파일이 있으면 그 경로, 아니면 기준 폴더
    fn prompt_initial_value(&self, purpose: PromptPurpose) -> String {
        if purpose != PromptPurpose::Compress {
            if let Some(preview) = &self.preview {
                return preview.archive_path.display().to_string();
            }
        }
        let mut base = self.base_dir.display().to_string();
        if !base.ends_with(std::path::MAIN_SEPARATOR) {
            base.push(std::path::MAIN_SEPARATOR);
        }
        base
    }

    /// 입력값 확정 후 해당 작업 시작
    pub fn submit_prompt(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let raw = prompt.input.value().trim();
        if raw.is_empty() {
            self.status = StatusMessage::error("No path entered");
            return;
        }
        let path = resolve_input_path(raw, &self.base_dir);
        match prompt.purpose {
            PromptPurpose::Compress => self.start_compress(path),
            PromptPurpose::Extract => self.start_extract(path),
            PromptPurpose::Preview => self.start_preview(path),
        }
    }

    /// 팝업이 열려 있을 때의 키 처리
    pub fn handle_prompt_key(&mut self, modifiers: KeyModifiers, code: KeyCode) {
        if code == KeyCode::Enter {
            self.submit_prompt();
            return;
        }
        if code == KeyCode::Esc {
            self.close_prompt();
            return;
        }
        let Some(prompt) = self.prompt.as_mut() else {
            return;
        };
        let input = &mut prompt.input;
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.quit(),
            (KeyModifiers::CONTROL, KeyCode::Char('w')) => input.delete_prev_word(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => input.clear_to_start(),
            (KeyModifiers::CONTROL, KeyCode::Char('a')) => input.home(),
            (KeyModifiers::CONTROL, KeyCode::Char('e')) => input.end(),
            (_, KeyCode::Backspace) => input.backspace(),
            (_, KeyCode::Delete) => input.delete(),
            (_, KeyCode::Left) => input.left(),
            (_, KeyCode::Right) => input.right(),
            (_, KeyCode::Home) => input.home(),
            (_, KeyCode::End) => input.end(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => input.insert_char(c),
            _ => {}
        }
    }
}

/// `~` 확장 후 상대 경로는 기준 폴더 기준으로 해석
pub(super) fn resolve_input_path(input: &str, base_dir: &Path) -> PathBuf {
    let expanded = if input == "~" {
        dirs::home_dir().unwrap_or_else(|| PathBuf::from(input))
    } else if let Some(rest) = input
        .strip_prefix("~/")
        .or_else(|| input.strip_prefix("~\\"))
    {
        match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => PathBuf::from(input),
        }
    } else {
        PathBuf::from(input)
    };

    if expanded.is_absolute() {
        expanded
    } else {
        base_dir.join(expanded)
    }
}

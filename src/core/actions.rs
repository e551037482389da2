//! 액션 시스템
//!
//! 일반 모드의 키 입력은 모두 이 테이블을 거쳐 `Action`으로 바뀐다.
//! 경로 입력 팝업이 열려 있을 때의 키 처리는 `App::handle_prompt_key`가 맡는다.

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GoToTop,
    GoToBottom,
    // Tree
    ToggleExpand,
    Expand,
    Collapse,
    ExpandAll,
    CollapseAll,
    // Operations
    Compress,
    Extract,
    Preview,
    Cancel,
    // System
    Quit,
}

/// 키 바인딩 정의
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: Option<KeyModifiers>, // None = any modifier
    pub action: Action,
}

fn bind(code: KeyCode, modifiers: Option<KeyModifiers>, action: Action) -> KeyBinding {
    KeyBinding {
        code,
        modifiers,
        action,
    }
}

fn build_key_bindings() -> Vec<KeyBinding> {
    let none = Some(KeyModifiers::NONE);
    let shift = Some(KeyModifiers::SHIFT);
    vec![
        // 종료
        bind(KeyCode::Char('q'), none, Action::Quit),
        bind(KeyCode::Char('c'), Some(KeyModifiers::CONTROL), Action::Quit),
        // 작업
        bind(KeyCode::Char('c'), none, Action::Compress),
        bind(KeyCode::Char('x'), none, Action::Extract),
        bind(KeyCode::Char('p'), none, Action::Preview),
        bind(KeyCode::Esc, None, Action::Cancel),
        // 탐색: Vim
        bind(KeyCode::Char('j'), none, Action::MoveDown),
        bind(KeyCode::Char('k'), none, Action::MoveUp),
        bind(KeyCode::Char('g'), none, Action::GoToTop),
        bind(KeyCode::Char('G'), shift, Action::GoToBottom),
        bind(KeyCode::Char('G'), none, Action::GoToBottom),
        // 탐색: 화살표
        bind(KeyCode::Down, None, Action::MoveDown),
        bind(KeyCode::Up, None, Action::MoveUp),
        bind(KeyCode::PageDown, None, Action::PageDown),
        bind(KeyCode::PageUp, None, Action::PageUp),
        bind(KeyCode::Home, None, Action::GoToTop),
        bind(KeyCode::End, None, Action::GoToBottom),
        // 트리
        bind(KeyCode::Enter, None, Action::ToggleExpand),
        bind(KeyCode::Char(' '), None, Action::ToggleExpand),
        bind(KeyCode::Right, None, Action::Expand),
        bind(KeyCode::Char('l'), none, Action::Expand),
        bind(KeyCode::Left, None, Action::Collapse),
        bind(KeyCode::Char('h'), none, Action::Collapse),
        bind(KeyCode::Char('*'), None, Action::ExpandAll),
        bind(KeyCode::Char('-'), None, Action::CollapseAll),
    ]
}

static KEY_BINDINGS: LazyLock<Vec<KeyBinding>> = LazyLock::new(build_key_bindings);

pub fn key_bindings() -> &'static [KeyBinding] {
    KEY_BINDINGS.as_slice()
}

/// 키 입력으로 액션 조회
pub fn find_action(modifiers: KeyModifiers, code: KeyCode) -> Option<Action> {
    key_bindings()
        .iter()
        .find(|binding| {
            binding.code == code
                && match binding.modifiers {
                    None => true,
                    Some(required) => modifiers == required,
                }
        })
        .map(|binding| binding.action)
}

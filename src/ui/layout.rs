// Layout system - 화면 영역 계산
//
// 제목줄 | 미리보기 트리 | 진행률 | 상태바 | 커맨드바
// 최소 크기보다 작으면 경고 화면만 표시

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// 최소 터미널 크기
pub const MIN_WIDTH: u16 = 40;
pub const MIN_HEIGHT: u16 = 15;

/// 진행률 패널 높이 (테두리 포함)
const PROGRESS_HEIGHT: u16 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Normal,
    /// 터미널이 너무 작음
    TooSmall,
}

/// 레이아웃 영역
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayoutAreas {
    pub title_bar: Rect,
    pub preview: Rect,
    pub progress: Rect,
    pub status_bar: Rect,
    pub command_bar: Rect,
    /// TooSmall 모드에서만 사용
    pub warning: Rect,
}

#[derive(Debug)]
pub struct LayoutManager {
    mode: LayoutMode,
    terminal_size: (u16, u16),
    areas: LayoutAreas,
}

impl Default for LayoutManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutManager {
    pub fn new() -> Self {
        Self {
            mode: LayoutMode::Normal,
            terminal_size: (80, 24),
            areas: LayoutAreas::default(),
        }
    }

    fn determine_mode(width: u16, height: u16) -> LayoutMode {
        if width < MIN_WIDTH || height < MIN_HEIGHT {
            LayoutMode::TooSmall
        } else {
            LayoutMode::Normal
        }
    }

    /// 터미널 크기 업데이트 및 레이아웃 재계산
    pub fn update(&mut self, area: Rect) {
        self.terminal_size = (area.width, area.height);
        self.mode = Self::determine_mode(area.width, area.height);
        self.areas = match self.mode {
            LayoutMode::TooSmall => LayoutAreas {
                warning: area,
                ..Default::default()
            },
            LayoutMode::Normal => Self::calculate_areas(area),
        };
    }

    fn calculate_areas(area: Rect) -> LayoutAreas {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),               // 제목줄
                Constraint::Min(3),                  // 미리보기
                Constraint::Length(PROGRESS_HEIGHT), // 진행률
                Constraint::Length(1),               // 상태바
                Constraint::Length(1),               // 커맨드바
            ])
            .split(area);

        LayoutAreas {
            title_bar: chunks[0],
            preview: chunks[1],
            progress: chunks[2],
            status_bar: chunks[3],
            command_bar: chunks[4],
            warning: Rect::default(),
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn areas(&self) -> &LayoutAreas {
        &self.areas
    }

    pub fn terminal_size(&self) -> (u16, u16) {
        self.terminal_size
    }

    pub fn is_too_small(&self) -> bool {
        self.mode == LayoutMode::TooSmall
    }

    /// 트리에 표시 가능한 행 수 (테두리 2줄 + 헤더 1줄 제외)
    pub fn preview_rows(&self) -> usize {
        self.areas.preview.height.saturating_sub(3) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_determine_mode() {
        assert_eq!(LayoutManager::determine_mode(80, 24), LayoutMode::Normal);
        assert_eq!(LayoutManager::determine_mode(40, 15), LayoutMode::Normal);
        assert_eq!(LayoutManager::determine_mode(39, 24), LayoutMode::TooSmall);
        assert_eq!(LayoutManager::determine_mode(80, 14), LayoutMode::TooSmall);
    }

    #[test]
    fn test_areas_stack_vertically() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 80, 24));

        let areas = manager.areas();
        assert_eq!(areas.title_bar, Rect::new(0, 0, 80, 1));
        assert_eq!(areas.preview, Rect::new(0, 1, 80, 17));
        assert_eq!(areas.progress, Rect::new(0, 18, 80, 4));
        assert_eq!(areas.status_bar, Rect::new(0, 22, 80, 1));
        assert_eq!(areas.command_bar, Rect::new(0, 23, 80, 1));
        assert_eq!(manager.preview_rows(), 14);
    }

    #[test]
    fn test_too_small_uses_whole_area_for_warning() {
        let mut manager = LayoutManager::new();
        manager.update(Rect::new(0, 0, 30, 10));

        assert!(manager.is_too_small());
        assert_eq!(manager.terminal_size(), (30, 10));
        assert_eq!(manager.areas().warning, Rect::new(0, 0, 30, 10));
        assert_eq!(manager.preview_rows(), 0);
    }
}

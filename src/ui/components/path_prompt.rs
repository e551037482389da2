// Path prompt - 경로 입력 팝업
//
// 화면 중앙에 표시. cursor_pos는 바이트 인덱스이고 화면 위치는 표시 너비 기준

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const H_PADDING: u16 = 2;
const V_PADDING: u16 = 1;
const HEIGHT: u16 = 7;

pub struct PathPrompt<'a> {
    title: &'a str,
    prompt: &'a str,
    value: &'a str,
    cursor_pos: usize,
    bg_color: Color,
    fg_color: Color,
    border_color: Color,
    title_color: Color,
    input_bg: Color,
    muted_color: Color,
}

impl<'a> PathPrompt<'a> {
    pub fn new(title: &'a str, value: &'a str, cursor_pos: usize) -> Self {
        Self {
            title,
            prompt: "Path:",
            value,
            cursor_pos: cursor_pos.min(value.len()),
            bg_color: Color::Rgb(45, 45, 48),
            fg_color: Color::Rgb(212, 212, 212),
            border_color: Color::Rgb(0, 120, 212),
            title_color: Color::White,
            input_bg: Color::Rgb(60, 60, 60),
            muted_color: Color::Rgb(100, 100, 100),
        }
    }

    pub fn prompt(mut self, prompt: &'a str) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.command_bar_bg.to_color();
        self.fg_color = theme.fg_primary.to_color();
        self.border_color = theme.accent.to_color();
        self.title_color = theme.panel_title.to_color();
        self.input_bg = theme.input_bg.to_color();
        self.muted_color = theme.muted.to_color();
        self
    }

    /// 팝업 영역 (화면 중앙)
    fn calculate_area(screen: Rect) -> Rect {
        let width = ((screen.width as f32 * 0.72) as u16)
            .clamp(36, 100)
            .min(screen.width.saturating_sub(2));
        let height = HEIGHT.min(screen.height);
        Rect {
            x: screen.x + screen.width.saturating_sub(width) / 2,
            y: screen.y + screen.height.saturating_sub(height) / 2,
            width,
            height,
        }
    }

    /// 커서가 보이도록 잘라낸 표시 문자열과 커서 열
    fn visible_window(&self, max_display: usize) -> (&'a str, usize) {
        let value = self.value;
        let cursor_col: usize = value[..self.cursor_pos].width();
        if cursor_col < max_display {
            return (value, cursor_col);
        }

        // 커서가 오른쪽 끝에 오도록 앞부분을 건너뜀
        let skip_width = cursor_col + 1 - max_display;
        let mut skipped = 0;
        for (i, c) in value.char_indices() {
            if skipped >= skip_width {
                return (&value[i..], cursor_col - skipped);
            }
            skipped += c.width().unwrap_or(0);
        }
        ("", 0)
    }
}

impl Widget for PathPrompt<'_> {
    fn render(self, screen: Rect, buf: &mut Buffer) {
        let area = Self::calculate_area(screen);
        Clear.render(area, buf);

        Block::default()
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(self.title_color)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .style(Style::default().bg(self.bg_color))
            .render(area, buf);

        let inner = Rect {
            x: area.x + H_PADDING,
            y: area.y + V_PADDING,
            width: area.width.saturating_sub(H_PADDING * 2),
            height: area.height.saturating_sub(V_PADDING * 2),
        };
        if inner.height < 2 || inner.width < 4 {
            return;
        }

        buf.set_string(inner.x, inner.y, self.prompt, Style::default().fg(self.fg_color));

        // 입력 필드
        let input_y = inner.y + 1;
        for x in inner.x..inner.x + inner.width {
            if let Some(cell) = buf.cell_mut((x, input_y)) {
                cell.set_bg(self.input_bg);
            }
        }

        let max_display = inner.width as usize - 2;
        let (display, cursor_col) = self.visible_window(max_display);
        buf.set_stringn(
            inner.x + 1,
            input_y,
            display,
            max_display,
            Style::default().fg(self.fg_color).bg(self.input_bg),
        );

        let cursor_x = inner.x + 1 + cursor_col as u16;
        if cursor_x < inner.x + inner.width - 1 {
            if let Some(cell) = buf.cell_mut((cursor_x, input_y)) {
                if self.cursor_pos < self.value.len() {
                    cell.set_style(Style::default().fg(self.input_bg).bg(self.fg_color));
                } else {
                    cell.set_char('▏');
                    cell.set_style(Style::default().fg(self.fg_color).bg(self.input_bg));
                }
            }
        }

        if inner.height >= 4 {
            buf.set_string(
                inner.x,
                inner.y + 3,
                "Enter: run  Esc: cancel",
                Style::default().fg(self.muted_color),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen_text(buf: &Buffer) -> String {
        buf.content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn test_renders_title_and_value() {
        let screen = Rect::new(0, 0, 80, 24);
        let mut buf = Buffer::empty(screen);
        PathPrompt::new("Compress folder", "/tmp/docs", 9).render(screen, &mut buf);

        let text = screen_text(&buf);
        assert!(text.contains("Compress folder"));
        assert!(text.contains("/tmp/docs"));
    }

    #[test]
    fn test_long_value_scrolls_to_cursor() {
        let value = "/very/long/path/segment/that/does/not/fit/in/the/box/archive.zip";
        let prompt = PathPrompt::new("Extract archive", value, value.len());
        let (display, cursor_col) = prompt.visible_window(20);

        assert!(display.ends_with("archive.zip"));
        assert_eq!(cursor_col, 19);
        assert_eq!(display.width(), 19);
    }

    #[test]
    fn test_short_value_is_not_scrolled() {
        let prompt = PathPrompt::new("Preview", "a.zip", 1);
        assert_eq!(prompt.visible_window(20), ("a.zip", 1));
    }

    #[test]
    fn test_area_is_centered() {
        let area = PathPrompt::calculate_area(Rect::new(0, 0, 100, 30));
        assert_eq!(area.width, 72);
        assert_eq!(area.x, 14);
        assert_eq!(area.y, 11);
    }
}

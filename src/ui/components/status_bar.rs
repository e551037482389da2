// Status bar - 상태 메시지와 미리보기 요약 표시

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

/// 상태 메시지 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusLevel {
    #[default]
    Info,
    Success,
    Error,
}

pub struct StatusBar<'a> {
    message: &'a str,
    level: StatusLevel,
    /// 오른쪽 요약 ("3 entries | 1.2 KB")
    summary: &'a str,
    bg_color: Color,
    fg_color: Color,
    success_color: Color,
    error_color: Color,
}

impl Default for StatusBar<'_> {
    fn default() -> Self {
        Self {
            message: "",
            level: StatusLevel::Info,
            summary: "",
            bg_color: Color::Rgb(0, 122, 204),
            fg_color: Color::White,
            success_color: Color::Rgb(78, 201, 176),
            error_color: Color::Rgb(244, 71, 71),
        }
    }
}

impl<'a> StatusBar<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message(mut self, message: &'a str, level: StatusLevel) -> Self {
        self.message = message;
        self.level = level;
        self
    }

    pub fn summary(mut self, summary: &'a str) -> Self {
        self.summary = summary;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.status_bar_bg.to_color();
        self.fg_color = theme.status_bar_fg.to_color();
        self.success_color = theme.success.to_color();
        self.error_color = theme.error.to_color();
        self
    }

    fn message_color(&self) -> Color {
        match self.level {
            StatusLevel::Info | StatusLevel::Success => self.fg_color,
            StatusLevel::Error => self.error_color,
        }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let marker = match self.level {
            StatusLevel::Info => " ",
            StatusLevel::Success => " ✔ ",
            StatusLevel::Error => " ✘ ",
        };
        let right = format!("{} ", self.summary);

        let left_width = marker.width() + self.message.width();
        let padding = (area.width as usize).saturating_sub(left_width + right.width());

        let marker_color = match self.level {
            StatusLevel::Success => self.success_color,
            _ => self.message_color(),
        };

        let line = Line::from(vec![
            Span::styled(marker, Style::default().fg(marker_color)),
            Span::styled(self.message, Style::default().fg(self.message_color())),
            Span::raw(" ".repeat(padding)),
            Span::styled(right, Style::default().fg(self.fg_color)),
        ]);
        Paragraph::new(line).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)).map(|cell| cell.symbol().to_string()))
            .collect()
    }

    #[test]
    fn test_message_left_summary_right() {
        let area = Rect::new(0, 0, 50, 1);
        let mut buf = Buffer::empty(area);
        StatusBar::new()
            .message("Compress done", StatusLevel::Success)
            .summary("2 entries | 20 B")
            .render(area, &mut buf);

        let text = row_text(&buf, 0);
        assert!(text.contains("Compress done"));
        assert!(text.trim_end().ends_with("2 entries | 20 B"));
    }

    #[test]
    fn test_error_uses_error_color() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        let theme = Theme::dark();
        StatusBar::new()
            .message("boom", StatusLevel::Error)
            .theme(&theme)
            .render(area, &mut buf);

        let text = row_text(&buf, 0);
        let byte = text.find("boom").unwrap();
        let col = text[..byte].chars().count() as u16;
        assert_eq!(buf.cell((col, 0)).unwrap().fg, theme.error.to_color());
    }
}

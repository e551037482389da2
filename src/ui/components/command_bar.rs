// Command bar - 하단 단축키 표시
//
// 작업 중에는 압축/해제 항목이 비활성으로 표시된다.

use crate::ui::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandItem {
    pub key: String,
    pub label: String,
    pub enabled: bool,
}

impl CommandItem {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

pub struct CommandBar {
    commands: Vec<CommandItem>,
    bg_color: Color,
    key_fg_color: Color,
    label_fg_color: Color,
    disabled_color: Color,
}

impl Default for CommandBar {
    fn default() -> Self {
        Self {
            commands: Self::commands_for(false),
            bg_color: Color::Rgb(45, 45, 48),
            key_fg_color: Color::Rgb(0, 120, 212),
            label_fg_color: Color::Rgb(204, 204, 204),
            disabled_color: Color::Rgb(100, 100, 100),
        }
    }
}

impl CommandBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 작업 실행 여부에 따른 기본 단축키 목록
    pub fn commands_for(busy: bool) -> Vec<CommandItem> {
        vec![
            CommandItem::new("c", "Compress").enabled(!busy),
            CommandItem::new("x", "Extract").enabled(!busy),
            CommandItem::new("p", "Preview"),
            CommandItem::new("Enter", "Toggle"),
            CommandItem::new("Esc", "Cancel").enabled(busy),
            CommandItem::new("q", "Quit"),
        ]
    }

    pub fn busy(mut self, busy: bool) -> Self {
        self.commands = Self::commands_for(busy);
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.bg_color = theme.command_bar_bg.to_color();
        self.key_fg_color = theme.accent.to_color();
        self.label_fg_color = theme.command_bar_fg.to_color();
        self.disabled_color = theme.muted.to_color();
        self
    }
}

impl Widget for CommandBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Style::default().bg(self.bg_color));

        let mut spans = vec![Span::raw(" ")];
        for (i, cmd) in self.commands.iter().enumerate() {
            let (key_style, label_style) = if cmd.enabled {
                (
                    Style::default()
                        .fg(self.key_fg_color)
                        .add_modifier(Modifier::BOLD),
                    Style::default().fg(self.label_fg_color),
                )
            } else {
                let dim = Style::default().fg(self.disabled_color);
                (dim, dim)
            };

            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(cmd.key.clone(), key_style));
            spans.push(Span::styled(":", label_style));
            spans.push(Span::styled(cmd.label.clone(), label_style));
        }

        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_item_creation() {
        let item = CommandItem::new("c", "Compress");
        assert_eq!(item.key, "c");
        assert_eq!(item.label, "Compress");
        assert!(item.enabled);
    }

    #[test]
    fn test_busy_disables_compress_and_extract() {
        let busy = CommandBar::commands_for(true);
        let enabled = |key: &str| busy.iter().find(|c| c.key == key).map(|c| c.enabled);
        assert_eq!(enabled("c"), Some(false));
        assert_eq!(enabled("x"), Some(false));
        assert_eq!(enabled("p"), Some(true));
        assert_eq!(enabled("Esc"), Some(true));

        let idle = CommandBar::commands_for(false);
        assert!(idle.iter().filter(|c| c.key != "Esc").all(|c| c.enabled));
    }

    #[test]
    fn test_disabled_item_rendered_muted() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        let theme = Theme::dark();
        CommandBar::new().busy(true).theme(&theme).render(area, &mut buf);

        // " c:Compress" 의 'c'
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "c");
        assert_eq!(buf.cell((1, 0)).unwrap().fg, theme.muted.to_color());
    }
}

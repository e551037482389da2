// Progress panel - 실행 중인 작업의 진행률 게이지

use crate::ui::Theme;
use crate::utils::path_display::truncate_middle;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Gauge, Widget},
};

pub struct ProgressPanel<'a> {
    /// 작업 이름 (없으면 대기 상태)
    operation: Option<&'a str>,
    percent: u8,
    detail: &'a str,
    border_color: Color,
    title_color: Color,
    bg_color: Color,
    fg_color: Color,
    filled_color: Color,
    unfilled_color: Color,
    muted_color: Color,
}

impl Default for ProgressPanel<'_> {
    fn default() -> Self {
        Self {
            operation: None,
            percent: 0,
            detail: "",
            border_color: Color::Rgb(60, 60, 60),
            title_color: Color::White,
            bg_color: Color::Rgb(30, 30, 30),
            fg_color: Color::Rgb(212, 212, 212),
            filled_color: Color::Rgb(78, 201, 176),
            unfilled_color: Color::Rgb(60, 60, 60),
            muted_color: Color::Rgb(100, 100, 100),
        }
    }
}

impl<'a> ProgressPanel<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn operation(mut self, name: Option<&'a str>) -> Self {
        self.operation = name;
        self
    }

    pub fn percent(mut self, percent: u8) -> Self {
        self.percent = percent.min(100);
        self
    }

    /// 게이지 아래 한 줄 설명 (원본 → 대상)
    pub fn detail(mut self, detail: &'a str) -> Self {
        self.detail = detail;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.border_color = theme.panel_border.to_color();
        self.title_color = theme.panel_title.to_color();
        self.bg_color = theme.bg_primary.to_color();
        self.fg_color = theme.fg_primary.to_color();
        self.filled_color = theme.progress_filled.to_color();
        self.unfilled_color = theme.progress_unfilled.to_color();
        self.muted_color = theme.muted.to_color();
        self
    }
}

impl Widget for ProgressPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.operation {
            Some(name) => format!(" {} ", name),
            None => " Idle ".to_string(),
        };
        let block = Block::default()
            .title(Span::styled(
                title,
                Style::default()
                    .fg(self.title_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .style(Style::default().bg(self.bg_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let gauge_area = Rect {
            height: 1,
            ..inner
        };
        let (percent, gauge_fg) = match self.operation {
            Some(_) => (self.percent, self.filled_color),
            None => (0, self.muted_color),
        };
        Gauge::default()
            .ratio(f64::from(percent) / 100.0)
            .gauge_style(Style::default().fg(gauge_fg).bg(self.unfilled_color))
            .label(format!("{}%", percent))
            .render(gauge_area, buf);

        if inner.height > 1 && !self.detail.is_empty() {
            let detail = truncate_middle(self.detail, inner.width as usize);
            buf.set_string(
                inner.x,
                inner.y + 1,
                detail,
                Style::default().fg(self.fg_color),
            );
        }
    }
}

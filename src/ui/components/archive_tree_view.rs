// Archive tree view - 압축 파일 미리보기 트리
//
// 펼쳐진 폴더의 행만 표시. 이름 | 크기 | 수정일 컬럼과 스크롤바

use crate::models::{ArchiveTree, TreeNode, TreeRow};
use crate::ui::Theme;
use crate::utils::formatter::{format_entry_date, format_file_size};
use crate::utils::path_display::truncate_middle;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Widget},
};
use unicode_width::UnicodeWidthStr;

const SIZE_WIDTH: usize = 10;
const DATE_WIDTH: usize = 10;
/// 이 너비보다 좁으면 날짜 컬럼 생략
const DATE_MIN_WIDTH: usize = 48;
const INDENT: &str = "  ";

pub struct ArchiveTreeView<'a> {
    title: &'a str,
    tree: Option<&'a ArchiveTree>,
    rows: &'a [TreeRow],
    selected: usize,
    scroll_offset: usize,
    /// 트리가 없을 때 표시할 안내 문구
    placeholder: &'a str,
    border_color: Color,
    title_color: Color,
    bg_color: Color,
    normal_color: Color,
    selected_color: Color,
    selected_bg_color: Color,
    directory_color: Color,
    muted_color: Color,
}

impl Default for ArchiveTreeView<'_> {
    fn default() -> Self {
        Self {
            title: "Preview",
            tree: None,
            rows: &[],
            selected: 0,
            scroll_offset: 0,
            placeholder: "",
            border_color: Color::Rgb(0, 120, 212),
            title_color: Color::White,
            bg_color: Color::Rgb(30, 30, 30),
            normal_color: Color::Rgb(212, 212, 212),
            selected_color: Color::White,
            selected_bg_color: Color::Rgb(0, 120, 212),
            directory_color: Color::Rgb(86, 156, 214),
            muted_color: Color::Rgb(100, 100, 100),
        }
    }
}

impl<'a> ArchiveTreeView<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub fn tree(mut self, tree: &'a ArchiveTree, rows: &'a [TreeRow]) -> Self {
        self.tree = Some(tree);
        self.rows = rows;
        self
    }

    pub fn selected(mut self, index: usize) -> Self {
        self.selected = index;
        self
    }

    pub fn scroll_offset(mut self, offset: usize) -> Self {
        self.scroll_offset = offset;
        self
    }

    pub fn placeholder(mut self, text: &'a str) -> Self {
        self.placeholder = text;
        self
    }

    pub fn theme(mut self, theme: &Theme) -> Self {
        self.border_color = theme.panel_border.to_color();
        self.title_color = theme.panel_title.to_color();
        self.bg_color = theme.bg_primary.to_color();
        self.normal_color = theme.entry_normal.to_color();
        self.selected_color = theme.entry_selected.to_color();
        self.selected_bg_color = theme.entry_selected_bg.to_color();
        self.directory_color = theme.directory.to_color();
        self.muted_color = theme.muted.to_color();
        self
    }

    fn render_header(&self, inner: Rect, buf: &mut Buffer, name_width: usize, show_date: bool) {
        let mut header = format!(
            " {:<name_width$}{:>SIZE_WIDTH$}",
            "Name",
            "Size",
            name_width = name_width
        );
        if show_date {
            header.push_str(&format!(" {:<DATE_WIDTH$}", "Modified"));
        }
        let style = Style::default()
            .fg(self.muted_color)
            .add_modifier(Modifier::BOLD);
        buf.set_stringn(inner.x, inner.y, header, inner.width as usize, style);
    }

    fn render_row(
        &self,
        node: &TreeNode,
        row: &TreeRow,
        is_cursor: bool,
        name_width: usize,
        show_date: bool,
    ) -> Line<'static> {
        let fg = if is_cursor {
            self.selected_color
        } else if node.is_dir {
            self.directory_color
        } else {
            self.normal_color
        };
        let style = if is_cursor {
            Style::default().fg(fg).bg(self.selected_bg_color)
        } else {
            Style::default().fg(fg)
        };

        let marker = match (node.is_dir, node.expanded) {
            (true, true) => "▾ ",
            (true, false) => "▸ ",
            (false, _) => "  ",
        };
        // 들여쓰기는 이름 컬럼의 절반까지만
        let levels = row.depth.min(name_width / (INDENT.len() * 2));
        let prefix = format!(" {}{}", INDENT.repeat(levels), marker);
        let label = if node.is_dir {
            format!("{}/", node.name)
        } else {
            node.name.clone()
        };
        let label_width = name_width.saturating_sub(prefix.width() - 1);
        let label = truncate_middle(&label, label_width);
        let padding = name_width.saturating_sub(prefix.width() - 1 + label.width());

        let mut spans = vec![
            Span::styled(prefix, style),
            Span::styled(label, style),
            Span::styled(" ".repeat(padding), style),
            Span::styled(
                format!("{:>SIZE_WIDTH$}", format_file_size(node.size)),
                style,
            ),
        ];
        if show_date {
            spans.push(Span::styled(
                format!(" {:<DATE_WIDTH$}", format_entry_date(node.modified)),
                style,
            ));
        }
        Line::from(spans)
    }

    fn render_scrollbar(&self, inner: Rect, buf: &mut Buffer, track_height: usize) {
        let total = self.rows.len();
        if track_height == 0 || total <= track_height {
            return;
        }
        let thumb_height = (track_height * track_height / total).max(1);
        let max_scroll = total - track_height;
        let thumb_pos =
            self.scroll_offset.min(max_scroll) * track_height.saturating_sub(thumb_height)
                / max_scroll;

        let x = inner.x + inner.width - 1;
        let track_style = Style::default().fg(Color::Rgb(60, 60, 60));
        let thumb_style = Style::default().fg(Color::Rgb(150, 150, 150));
        for i in 0..track_height {
            let (symbol, style) = if i >= thumb_pos && i < thumb_pos + thumb_height {
                ("┃", thumb_style)
            } else {
                ("│", track_style)
            };
            buf.set_string(x, inner.y + 1 + i as u16, symbol, style);
        }
    }
}

impl Widget for ArchiveTreeView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let title = truncate_middle(self.title, (area.width as usize).saturating_sub(4));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.border_color))
            .title(Span::styled(
                format!(" {} ", title),
                Style::default()
                    .fg(self.title_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .style(Style::default().bg(self.bg_color));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height < 2 || inner.width < 4 {
            return;
        }

        let Some(tree) = self.tree else {
            let hint = Span::styled(
                format!(" {}", self.placeholder),
                Style::default().fg(self.muted_color),
            );
            buf.set_span(inner.x, inner.y, &hint, inner.width);
            return;
        };

        let track_height = (inner.height - 1) as usize;
        let has_scrollbar = self.rows.len() > track_height;
        let usable = (inner.width as usize).saturating_sub(usize::from(has_scrollbar));
        let show_date = usable >= DATE_MIN_WIDTH;
        let fixed = 1 + SIZE_WIDTH + if show_date { DATE_WIDTH + 1 } else { 0 };
        let name_width = usable.saturating_sub(fixed);

        self.render_header(inner, buf, name_width, show_date);

        if self.rows.is_empty() {
            let empty = Span::styled(" (Empty archive)", Style::default().fg(self.muted_color));
            buf.set_span(inner.x, inner.y + 1, &empty, inner.width);
            return;
        }

        let end = (self.scroll_offset + track_height).min(self.rows.len());
        let start = self.scroll_offset.min(end);
        for (offset, row) in self.rows[start..end].iter().enumerate() {
            let Some(node) = tree.node(row.node) else {
                continue;
            };
            let line = self.render_row(
                node,
                row,
                start + offset == self.selected,
                name_width,
                show_date,
            );
            buf.set_line(inner.x, inner.y + 1 + offset as u16, &line, usable as u16);
        }

        if has_scrollbar {
            self.render_scrollbar(inner, buf, track_height);
        }
    }
}

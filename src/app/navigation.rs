use super::{App, PreviewState};

/// 레이아웃 계산 전(테스트 등)에 쓰는 페이지 크기
const FALLBACK_PAGE: usize = 10;

impl App {
    fn page_size(&self) -> usize {
        match self.layout.preview_rows() {
            0 => FALLBACK_PAGE,
            rows => rows,
        }
    }

    /// 커서 이동 후 스크롤 보정
    fn move_cursor(&mut self, target: impl FnOnce(&PreviewState, usize) -> usize) {
        let page = self.page_size();
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        if preview.rows.is_empty() {
            preview.selected = 0;
            preview.scroll_offset = 0;
            return;
        }
        let last = preview.rows.len() - 1;
        preview.selected = target(&*preview, page).min(last);
        adjust_scroll(preview.selected, &mut preview.scroll_offset, page);
    }

    pub fn move_down(&mut self) {
        self.move_cursor(|p, _| p.selected + 1);
    }

    pub fn move_up(&mut self) {
        self.move_cursor(|p, _| p.selected.saturating_sub(1));
    }

    pub fn page_down(&mut self) {
        self.move_cursor(|p, page| p.selected + page);
    }

    pub fn page_up(&mut self) {
        self.move_cursor(|p, page| p.selected.saturating_sub(page));
    }

    pub fn go_top(&mut self) {
        self.move_cursor(|_, _| 0);
    }

    pub fn go_bottom(&mut self) {
        self.move_cursor(|p, _| p.rows.len().saturating_sub(1));
    }

    /// 커서 위치 폴더 펼침/접기
    pub fn toggle_selected(&mut self) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        if let Some(node) = preview.selected_node() {
            preview.tree.toggle(node);
            self.refresh_rows();
        }
    }

    /// 접힌 폴더는 펼치고, 펼친 폴더면 첫 자식으로 이동
    pub fn expand_selected(&mut self) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        let Some(idx) = preview.selected_node() else {
            return;
        };
        let Some(node) = preview.tree.node(idx) else {
            return;
        };
        if !node.is_dir {
            return;
        }
        if node.expanded {
            if node.has_children() {
                self.move_down();
            }
        } else {
            preview.tree.set_expanded(idx, true);
            self.refresh_rows();
        }
    }

    /// 펼친 폴더는 접고, 그 외에는 부모 폴더로 이동
    pub fn collapse_selected(&mut self) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        let Some(idx) = preview.selected_node() else {
            return;
        };
        let expanded_dir = preview
            .tree
            .node(idx)
            .is_some_and(|node| node.is_dir && node.expanded);
        if expanded_dir {
            preview.tree.set_expanded(idx, false);
            self.refresh_rows();
            return;
        }
        if let Some(parent) = preview.tree.parent_of(idx) {
            if let Some(row) = preview.rows.iter().position(|row| row.node == parent) {
                self.move_cursor(|_, _| row);
            }
        }
    }

    pub fn set_all_expanded(&mut self, expanded: bool) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        if expanded {
            preview.tree.expand_all();
        } else {
            preview.tree.collapse_all();
        }
        self.refresh_rows();
    }

    /// 펼침 상태 변경 후 보이는 행을 다시 만들고 커서를 같은 노드에 유지
    fn refresh_rows(&mut self) {
        let Some(preview) = self.preview.as_mut() else {
            return;
        };
        let current = preview.selected_node();
        preview.rows = preview.tree.visible_rows();
        let target = current
            .and_then(|node| preview.rows.iter().position(|row| row.node == node))
            .unwrap_or(0);
        self.move_cursor(|_, _| target);
    }
}

fn adjust_scroll(selected: usize, scroll: &mut usize, visible_height: usize) {
    if visible_height == 0 {
        *scroll = 0;
        return;
    }
    if selected < *scroll {
        *scroll = selected;
    } else if selected >= *scroll + visible_height {
        *scroll = selected + 1 - visible_height;
    }
}

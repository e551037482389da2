//! 미리보기 트리 모델
//!
//! 엔트리 경로를 `/` 로 나눠 폴더 계층을 만든다. 중간 폴더는 처음 등장할 때 생성되고,
//! 자식 순서는 압축 파일 내부의 첫 등장 순서를 따른다.
//! 노드는 이름과 부모 인덱스만 가지므로 경로 길이에 비례한 메모리만 쓴다.

use crate::models::archive_entry::ArchiveEntry;
use chrono::NaiveDateTime;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    /// 경로의 마지막 구성요소
    pub name: String,
    pub is_dir: bool,
    /// 파일은 자신의 크기, 폴더는 하위 파일 합계
    pub size: u64,
    /// 파일 엔트리에만 존재
    pub modified: Option<NaiveDateTime>,
    pub depth: usize,
    pub expanded: bool,
    parent: Option<usize>,
    children: Vec<usize>,
}

impl TreeNode {
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// 화면에 표시되는 한 줄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeRow {
    pub node: usize,
    pub depth: usize,
}

#[derive(Debug, Clone, Default)]
pub struct ArchiveTree {
    nodes: Vec<TreeNode>,
    roots: Vec<usize>,
}

impl ArchiveTree {
    pub fn from_entries(entries: &[ArchiveEntry]) -> Self {
        let mut tree = Self::default();
        // (부모, 이름) -> 노드. 루트의 부모는 None
        let mut lookup: HashMap<(Option<usize>, &str), usize> = HashMap::new();

        for entry in entries {
            let parts: Vec<&str> = entry.path.split('/').filter(|p| !p.is_empty()).collect();
            let mut parent: Option<usize> = None;

            for (i, part) in parts.iter().enumerate() {
                let is_leaf_file = i == parts.len() - 1 && !entry.is_dir;

                let idx = match lookup.get(&(parent, *part)) {
                    Some(&idx) => {
                        if !is_leaf_file {
                            tree.nodes[idx].is_dir = true;
                        }
                        idx
                    }
                    None => {
                        let idx = tree.nodes.len();
                        tree.nodes.push(TreeNode {
                            name: part.to_string(),
                            is_dir: !is_leaf_file,
                            size: if is_leaf_file { entry.size } else { 0 },
                            modified: if is_leaf_file { entry.modified } else { None },
                            depth: i,
                            expanded: false,
                            parent,
                            children: Vec::new(),
                        });
                        match parent {
                            Some(p) => tree.nodes[p].children.push(idx),
                            None => tree.roots.push(idx),
                        }
                        lookup.insert((parent, *part), idx);
                        idx
                    }
                };
                parent = Some(idx);
            }
        }

        tree.aggregate_sizes();
        tree
    }

    /// 폴더 크기 = 하위 파일 합계. 자식은 항상 부모보다 뒤에 생성되므로 역순 한 번이면 된다.
    fn aggregate_sizes(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.is_dir) {
            node.size = 0;
        }
        for idx in (0..self.nodes.len()).rev() {
            let node = &self.nodes[idx];
            let (size, parent) = (node.size, node.parent);
            if let Some(p) = parent {
                self.nodes[p].size += size;
            }
        }
    }

    pub fn node(&self, idx: usize) -> Option<&TreeNode> {
        self.nodes.get(idx)
    }

    /// 펼쳐진 폴더만 따라가며 표시할 줄 목록 생성
    pub fn visible_rows(&self) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut stack: Vec<usize> = self.roots.iter().rev().copied().collect();
        while let Some(idx) = stack.pop() {
            let node = &self.nodes[idx];
            rows.push(TreeRow {
                node: idx,
                depth: node.depth,
            });
            if node.is_dir && node.expanded {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        rows
    }

    pub fn toggle(&mut self, idx: usize) {
        if let Some(node) = self.nodes.get_mut(idx) {
            if node.is_dir {
                node.expanded = !node.expanded;
            }
        }
    }

    pub fn set_expanded(&mut self, idx: usize, expanded: bool) {
        if let Some(node) = self.nodes.get_mut(idx) {
            if node.is_dir {
                node.expanded = expanded;
            }
        }
    }

    /// `max_depth` 이하 깊이의 폴더를 펼친다 (0 = 최상위 폴더만)
    pub fn expand_to_depth(&mut self, max_depth: usize) {
        for node in self
            .nodes
            .iter_mut()
            .filter(|n| n.is_dir && n.depth <= max_depth)
        {
            node.expanded = true;
        }
    }

    pub fn expand_all(&mut self) {
        for node in self.nodes.iter_mut().filter(|n| n.is_dir) {
            node.expanded = true;
        }
    }

    pub fn collapse_all(&mut self) {
        for node in &mut self.nodes {
            node.expanded = false;
        }
    }

    /// 부모 노드 인덱스
    pub fn parent_of(&self, idx: usize) -> Option<usize> {
        self.nodes.get(idx).and_then(|n| n.parent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(path: &str, size: u64) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            size,
            modified: NaiveDate::from_ymd_opt(2024, 1, 2).and_then(|d| d.and_hms_opt(3, 4, 6)),
            is_dir: path.ends_with('/'),
        }
    }

    fn names(tree: &ArchiveTree) -> Vec<String> {
        tree.visible_rows()
            .iter()
            .map(|r| {
                let node = tree.node(r.node).unwrap();
                format!("{}{}", "  ".repeat(r.depth), node.name)
            })
            .collect()
    }

    /// 현재 보이는 행 중 이름이 같은 노드
    fn visible(tree: &ArchiveTree, name: &str) -> usize {
        tree.visible_rows()
            .into_iter()
            .map(|r| r.node)
            .find(|&idx| tree.node(idx).unwrap().name == name)
            .unwrap()
    }

    #[test]
    fn test_build_hierarchy_in_first_appearance_order() {
        let mut tree = ArchiveTree::from_entries(&[
            entry("b.txt", 1),
            entry("docs/z.txt", 2),
            entry("docs/a.txt", 3),
            entry("a.txt", 4),
        ]);
        assert_eq!(names(&tree), vec!["b.txt", "docs", "a.txt"]);

        let docs = visible(&tree, "docs");
        tree.toggle(docs);
        assert_eq!(
            names(&tree),
            vec!["b.txt", "docs", "  z.txt", "  a.txt", "a.txt"]
        );
    }

    #[test]
    fn test_directory_markers_and_intermediate_folders() {
        let mut tree = ArchiveTree::from_entries(&[
            entry("sub/", 0),
            entry("sub/deep/c.txt", 5),
            entry("empty/", 0),
        ]);
        tree.expand_all();
        assert_eq!(names(&tree), vec!["sub", "  deep", "    c.txt", "empty"]);

        let sub = tree.node(visible(&tree, "sub")).unwrap();
        assert!(sub.is_dir);
        assert_eq!(sub.size, 5);
        assert_eq!(sub.modified, None);

        let deep = tree.node(visible(&tree, "deep")).unwrap();
        assert!(deep.is_dir);
        assert_eq!(deep.depth, 1);
        assert_eq!(deep.size, 5);

        let empty = tree.node(visible(&tree, "empty")).unwrap();
        assert!(empty.is_dir);
        assert!(!empty.has_children());
    }

    #[test]
    fn test_file_leaf_carries_size_and_date() {
        let mut tree = ArchiveTree::from_entries(&[entry("a/b.txt", 42)]);
        tree.expand_all();
        let file = tree.node(visible(&tree, "b.txt")).unwrap();
        assert!(!file.is_dir);
        assert_eq!(file.size, 42);
        assert!(file.modified.is_some());
    }

    #[test]
    fn test_empty_segments_are_skipped() {
        let mut tree = ArchiveTree::from_entries(&[entry("a//b.txt", 1)]);
        tree.expand_all();
        assert_eq!(names(&tree), vec!["a", "  b.txt"]);
    }

    #[test]
    fn test_same_name_under_different_parents() {
        let mut tree = ArchiveTree::from_entries(&[
            entry("x/readme", 1),
            entry("y/readme", 2),
            entry("readme", 4),
        ]);
        tree.expand_all();
        assert_eq!(
            names(&tree),
            vec!["x", "  readme", "y", "  readme", "readme"]
        );
        assert_eq!(tree.node(visible(&tree, "y")).unwrap().size, 2);
    }

    #[test]
    fn test_expand_collapse_and_parent() {
        let mut tree = ArchiveTree::from_entries(&[entry("x/y/z.txt", 1)]);
        assert_eq!(tree.visible_rows().len(), 1);
        tree.expand_all();
        assert_eq!(tree.visible_rows().len(), 3);

        let z = visible(&tree, "z.txt");
        let y = tree.parent_of(z).unwrap();
        assert_eq!(tree.node(y).unwrap().name, "y");
        let x = tree.parent_of(y).unwrap();
        assert_eq!(tree.parent_of(x), None);

        tree.set_expanded(y, false);
        assert_eq!(tree.visible_rows().len(), 2);
        tree.collapse_all();
        assert_eq!(tree.visible_rows().len(), 1);
    }

    #[test]
    fn test_expand_to_depth_opens_top_level_only() {
        let mut tree = ArchiveTree::from_entries(&[
            entry("a.txt", 1),
            entry("sub/b.txt", 2),
            entry("sub/inner/c.txt", 3),
        ]);
        tree.expand_to_depth(0);
        assert_eq!(names(&tree), vec!["a.txt", "sub", "  b.txt", "  inner"]);
    }

    #[test]
    fn test_deeply_nested_entry_builds_linear_chain() {
        let path = format!("{}leaf.txt", "a/".repeat(20_000));
        let mut tree = ArchiveTree::from_entries(&[entry(&path, 9)]);
        let root = tree.visible_rows()[0].node;
        assert_eq!(tree.node(root).unwrap().size, 9);

        tree.expand_all();
        let rows = tree.visible_rows();
        assert_eq!(rows.len(), 20_001);
        assert_eq!(rows.last().map(|r| r.depth), Some(20_000));
    }

    #[test]
    fn test_toggle_on_file_is_noop() {
        let mut tree = ArchiveTree::from_entries(&[entry("f.txt", 1)]);
        let f = visible(&tree, "f.txt");
        tree.toggle(f);
        assert!(!tree.node(f).unwrap().expanded);
    }
}

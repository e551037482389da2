use std::path::Path;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: &str = "...";

/// 문자열을 최대 너비에 맞춰 중간 생략한다.
pub fn truncate_middle(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width < 5 {
        return take_prefix_by_width(text, max_width);
    }

    let side_width = (max_width - ELLIPSIS.width()) / 2;
    let start = take_prefix_by_width(text, side_width);
    let end = take_suffix_by_width(text, side_width);
    format!("{}{}{}", start, ELLIPSIS, end)
}

/// 경로 표시용: 앞부분을 잘라 파일 이름 쪽을 남긴다.
pub fn truncate_path(path: &Path, max_width: usize) -> String {
    let text = path.to_string_lossy();
    if text.width() <= max_width {
        return text.into_owned();
    }
    if max_width <= ELLIPSIS.width() {
        return take_prefix_by_width(&text, max_width);
    }
    let suffix = take_suffix_by_width(&text, max_width - ELLIPSIS.width());
    format!("{}{}", ELLIPSIS, suffix)
}

fn take_prefix_by_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

fn take_suffix_by_width(text: &str, max_width: usize) -> String {
    let mut rev_chars: Vec<char> = Vec::new();
    let mut width = 0;
    for ch in text.chars().rev() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        rev_chars.push(ch);
        width += ch_width;
    }
    rev_chars.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_middle() {
        assert_eq!(truncate_middle("short", 10), "short");
        assert_eq!(truncate_middle("verylongstring", 10), "ver...ing");
        assert_eq!(truncate_middle("verylongstring", 4), "very");
    }

    #[test]
    fn test_truncate_middle_wide_chars() {
        let value = "压缩文件夹压缩文件夹压缩文件夹";
        assert!(truncate_middle(value, 12).width() <= 12);
    }

    #[test]
    fn test_truncate_path_keeps_file_name() {
        let path = Path::new("/home/user/projects/reports/2024/archive.zip");
        let truncated = truncate_path(path, 20);
        assert!(truncated.starts_with("..."));
        assert!(truncated.ends_with("archive.zip"));
        assert!(truncated.width() <= 20);
        assert_eq!(truncate_path(Path::new("/tmp/a.zip"), 20), "/tmp/a.zip");
    }
}

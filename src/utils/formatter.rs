// Formatters - 크기, 날짜, 진행률 포맷팅

use chrono::NaiveDateTime;

/// 파일 크기를 읽기 쉬운 형식으로 포맷팅 (숫자와 단위 사이 공백)
///
/// # Examples
/// ```ignore
/// assert_eq!(format_file_size(0), "0 B");
/// assert_eq!(format_file_size(1536), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else if bytes < GB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    }
}

/// 바이트 수를 천 단위 콤마와 함께 표시 (미리보기 크기 컬럼)
pub fn format_byte_count(bytes: u64) -> String {
    format!("{} bytes", format_number_with_commas(bytes))
}

/// 엔트리 수정 날짜 (`YYYY-MM-DD`, 10자 고정)
pub fn format_entry_date(modified: Option<NaiveDateTime>) -> String {
    match modified {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "-".to_string(),
    }
}

/// 개수에 따라 단수/복수형 반환
pub fn pluralize(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// 숫자를 천단위 콤마로 포맷팅
pub fn format_number_with_commas(n: u64) -> String {
    let s = n.to_string();
    let bytes = s.as_bytes();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, &b) in bytes.iter().enumerate() {
        if i > 0 && (bytes.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(b as char);
    }
    result
}

/// 처리 바이트 기준 진행률 (0-100, 내림)
///
/// 전체가 0이면 나눗셈 대신 100을 반환한다.
pub fn percent_of(processed: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (processed.min(total) as u128 * 100) / total as u128;
    pct as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(1023), "1023 B");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(3_670_016), "3.5 MB");
        assert_eq!(format_file_size(2_147_483_648), "2.0 GB");
    }

    #[test]
    fn test_format_byte_count() {
        assert_eq!(format_byte_count(20), "20 bytes");
        assert_eq!(format_byte_count(1_234_567), "1,234,567 bytes");
    }

    #[test]
    fn test_format_entry_date() {
        let dt = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 2)
            .unwrap();
        assert_eq!(format_entry_date(Some(dt)), "2024-03-07");
        assert_eq!(format_entry_date(None), "-");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize(0, "entry", "entries"), "0 entries");
        assert_eq!(pluralize(1, "entry", "entries"), "1 entry");
    }

    #[test]
    fn test_format_number_with_commas() {
        assert_eq!(format_number_with_commas(0), "0");
        assert_eq!(format_number_with_commas(999), "999");
        assert_eq!(format_number_with_commas(1000), "1,000");
        assert_eq!(format_number_with_commas(1000000000), "1,000,000,000");
    }

    #[test]
    fn test_percent_of() {
        assert_eq!(percent_of(0, 150), 0);
        assert_eq!(percent_of(10, 150), 6);
        assert_eq!(percent_of(100, 150), 66);
        assert_eq!(percent_of(150, 150), 100);
        assert_eq!(percent_of(0, 0), 100);
        assert_eq!(percent_of(u64::MAX, u64::MAX), 100);
    }
}

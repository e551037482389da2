use ratatui::style::Color;

/// 색상 테마
///
/// 설정 파일의 `theme` 값(`dark` | `light`)으로 선택한다.
#[derive(Debug, Clone)]
pub struct Theme {
    // 배경/전경
    pub bg_primary: ColorDef,
    pub fg_primary: ColorDef,

    // 패널
    pub panel_border: ColorDef,
    pub panel_title: ColorDef,

    // 트리
    pub entry_normal: ColorDef,
    pub entry_selected: ColorDef,
    pub entry_selected_bg: ColorDef,
    pub directory: ColorDef,
    pub muted: ColorDef,

    // UI 컴포넌트
    pub title_bar_bg: ColorDef,
    pub title_bar_fg: ColorDef,
    pub status_bar_bg: ColorDef,
    pub status_bar_fg: ColorDef,
    pub command_bar_bg: ColorDef,
    pub command_bar_fg: ColorDef,
    pub input_bg: ColorDef,
    pub progress_filled: ColorDef,
    pub progress_unfilled: ColorDef,

    // 강조
    pub accent: ColorDef,
    pub warning: ColorDef,
    pub error: ColorDef,
    pub success: ColorDef,
}

/// 색상 정의. Hex 문자열("#1e1e1e") 또는 색상 이름("Red")
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorDef {
    Hex(String),
    Named(String),
}

impl ColorDef {
    pub fn to_color(&self) -> Color {
        match self {
            ColorDef::Hex(hex) => parse_hex_color(hex),
            ColorDef::Named(name) => parse_named_color(name),
        }
    }
}

impl From<&str> for ColorDef {
    fn from(s: &str) -> Self {
        if s.starts_with('#') {
            ColorDef::Hex(s.to_string())
        } else {
            ColorDef::Named(s.to_string())
        }
    }
}

fn parse_hex_color(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return Color::Reset;
    }
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    Color::Rgb(channel(0..2), channel(2..4), channel(4..6))
}

fn parse_named_color(name: &str) -> Color {
    match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "white" => Color::White,
        _ => Color::Reset,
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// 이름으로 테마 선택. 알 수 없는 이름이면 dark
    pub fn by_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Dark 테마 (기본)
    pub fn dark() -> Self {
        Theme {
            bg_primary: "#1e1e1e".into(),
            fg_primary: "#d4d4d4".into(),

            panel_border: "#0078d4".into(),
            panel_title: "#ffffff".into(),

            entry_normal: "#d4d4d4".into(),
            entry_selected: "#ffffff".into(),
            entry_selected_bg: "#0078d4".into(),
            directory: "#569cd6".into(),
            muted: "#6a6a6a".into(),

            title_bar_bg: "#2d2d30".into(),
            title_bar_fg: "#ffffff".into(),
            status_bar_bg: "#007acc".into(),
            status_bar_fg: "#ffffff".into(),
            command_bar_bg: "#2d2d30".into(),
            command_bar_fg: "#cccccc".into(),
            input_bg: "#3c3c3c".into(),
            progress_filled: "#4ec9b0".into(),
            progress_unfilled: "#3c3c3c".into(),

            accent: "#0078d4".into(),
            warning: "#ffa500".into(),
            error: "#f44747".into(),
            success: "#4ec9b0".into(),
        }
    }

    /// Light 테마
    pub fn light() -> Self {
        Theme {
            bg_primary: "#ffffff".into(),
            fg_primary: "#1e1e1e".into(),

            panel_border: "#0078d4".into(),
            panel_title: "#000000".into(),

            entry_normal: "#1e1e1e".into(),
            entry_selected: "#000000".into(),
            entry_selected_bg: "#add6ff".into(),
            directory: "#0066cc".into(),
            muted: "#8a8a8a".into(),

            title_bar_bg: "#0078d4".into(),
            title_bar_fg: "#ffffff".into(),
            status_bar_bg: "#0078d4".into(),
            status_bar_fg: "#ffffff".into(),
            command_bar_bg: "#f3f3f3".into(),
            command_bar_fg: "#1e1e1e".into(),
            input_bg: "#e8e8e8".into(),
            progress_filled: "#107c10".into(),
            progress_unfilled: "#dddddd".into(),

            accent: "#0078d4".into(),
            warning: "#ff8c00".into(),
            error: "#e51400".into(),
            success: "#107c10".into(),
        }
    }
}

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap());
static FUNC_COLOR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:rgb|rgba|hsl|hsla)\(\s*-?[0-9.]+%?(?:\s*[,\s]\s*-?[0-9.]+%?){2}(?:\s*[,/]\s*[0-9.]+%?)?\s*\)$")
        .unwrap()
});
static NAMED_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z]{3,20}$").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub background: String,
    pub title_color: String,
    pub title_font_size: f32,
    pub header_color: String,
    pub header_font_size: f32,
    pub label_color: String,
    pub label_font_size: f32,
    pub category_color: String,
    pub category_font_size: f32,
    pub desc_color: String,
    pub desc_font_size: f32,
    pub header_fill: String,
    pub header_fill_alt: String,
    pub header_border: String,
    pub grid_color: String,
    pub row_fill: String,
    pub row_border: String,
    pub fallback_color: String,
    pub outline_fallback: String,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "sans-serif".to_string(),
            background: "#fafafa".to_string(),
            title_color: "#333".to_string(),
            title_font_size: 20.0,
            header_color: "#555".to_string(),
            header_font_size: 12.0,
            label_color: "#333".to_string(),
            label_font_size: 12.0,
            category_color: "#222".to_string(),
            category_font_size: 14.0,
            desc_color: "#666".to_string(),
            desc_font_size: 10.0,
            header_fill: "#e8e8e8".to_string(),
            header_fill_alt: "#f5f5f5".to_string(),
            header_border: "#ccc".to_string(),
            grid_color: "#ddd".to_string(),
            row_fill: "#fff".to_string(),
            row_border: "#ddd".to_string(),
            fallback_color: "#6495ed".to_string(),
            outline_fallback: "#333".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            background: "#FFFFFF".to_string(),
            title_color: "#1C2430".to_string(),
            header_color: "#4A5568".to_string(),
            label_color: "#1C2430".to_string(),
            category_color: "#111827".to_string(),
            desc_color: "#6B7280".to_string(),
            header_fill: "#EEF2F8".to_string(),
            header_fill_alt: "#F8FAFF".to_string(),
            header_border: "#C7D2E5".to_string(),
            grid_color: "#D7E0F0".to_string(),
            row_fill: "#FFFFFF".to_string(),
            row_border: "#D7E0F0".to_string(),
            fallback_color: "#6366f1".to_string(),
            outline_fallback: "#1C2430".to_string(),
            ..Self::classic()
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }

    /// CSS for the text classes embedded in every chart document. Every
    /// string value goes through [`css_value`], so theme overrides cannot
    /// close the `<style>` element or open new rules.
    pub fn style_sheet(&self) -> String {
        let font = css_value(&self.font_family);
        format!(
            ".title{{font:bold {}px {font};fill:{}}}.header{{font:bold {}px {font};fill:{}}}.label{{font:{}px {font};fill:{}}}.category{{font:bold {}px {font};fill:{}}}.desc{{font:{}px {font};fill:{}}}",
            self.title_font_size,
            css_value(&self.title_color),
            self.header_font_size,
            css_value(&self.header_color),
            self.label_font_size,
            css_value(&self.label_color),
            self.category_font_size,
            css_value(&self.category_color),
            self.desc_font_size,
            css_value(&self.desc_color),
        )
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}

/// Strips characters that would end a declaration, a rule or the enclosing
/// `<style>` element from a stylesheet value.
pub fn css_value(value: &str) -> String {
    let cleaned: String = value
        .chars()
        .filter(|&ch| !matches!(ch, '<' | '>' | '&' | '{' | '}' | ';' | '\\'))
        .collect();
    if cleaned.len() != value.len() {
        log::warn!("stripped markup characters from theme value {value:?}");
    }
    cleaned.trim().to_string()
}

/// Whether `color` belongs to the subset of the SVG color grammar we accept
/// when color validation is enabled.
pub fn is_valid_color(color: &str) -> bool {
    let color = color.trim();
    HEX_COLOR.is_match(color) || FUNC_COLOR.is_match(color) || NAMED_COLOR.is_match(color)
}

/// Darker variant of a hex color for bar outlines. Non-hex colors are
/// returned unchanged; an empty color maps to `fallback`.
pub fn darken_color(color: &str, fallback: &str) -> String {
    let color = color.trim();
    if color.is_empty() {
        return fallback.to_string();
    }
    match parse_hex_rgb(color) {
        Some((r, g, b)) => {
            let scale = |c: u8| (c as f32 * 0.75).round() as u8;
            format!("#{:02x}{:02x}{:02x}", scale(r), scale(g), scale(b))
        }
        None => color.to_string(),
    }
}

fn parse_hex_rgb(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    match hex.len() {
        3 | 4 => {
            let digit = |idx: usize| u8::from_str_radix(&hex[idx..idx + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        6 | 8 => {
            let pair = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
            Some((pair(0)?, pair(2)?, pair(4)?))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn darkens_hex_colors() {
        assert_eq!(darken_color("#ffffff", "#333"), "#bfbfbf");
        assert_eq!(darken_color("#fff", "#333"), "#bfbfbf");
        assert_eq!(darken_color("#4a90d9", "#333"), "#386ca3");
    }

    #[test]
    fn leaves_other_colors_alone() {
        assert_eq!(darken_color("tomato", "#333"), "tomato");
        assert_eq!(darken_color("hsl(10, 50%, 50%)", "#333"), "hsl(10, 50%, 50%)");
        assert_eq!(darken_color("", "#333"), "#333");
    }

    #[test]
    fn validates_color_grammar() {
        for ok in ["#abc", "#A1B2C3", "#11223344", "rgb(1, 2, 3)", "rgba(1,2,3,0.5)", "hsl(120, 50%, 40%)", "teal"] {
            assert!(is_valid_color(ok), "{ok} should be valid");
        }
        for bad in ["", "#12", "#ggg", "red\" onload=\"x", "url(#x)", "rgb(1,2)"] {
            assert!(!is_valid_color(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn style_sheet_declares_text_classes() {
        let css = Theme::classic().style_sheet();
        for class in [".title{", ".header{", ".label{", ".category{", ".desc{"] {
            assert!(css.contains(class), "missing {class}");
        }
        assert!(css.starts_with(".title{font:bold 20px sans-serif;fill:#333}"));
    }

    #[test]
    fn style_sheet_neutralizes_hostile_values() {
        let mut theme = Theme::classic();
        theme.font_family = "x</style><script>alert(1)</script><style>".to_string();
        theme.title_color = "red}svg{display:none".to_string();
        let css = theme.style_sheet();
        assert!(!css.contains('<'));
        assert!(!css.contains('>'));
        assert!(css.starts_with(".title{font:bold 20px x/stylescriptalert(1)/scriptstyle;fill:redsvgdisplay:none}"));
        assert_eq!(css.matches('{').count(), 5);
        assert_eq!(css.matches('}').count(), 5);
    }

    #[test]
    fn css_value_keeps_font_lists() {
        assert_eq!(css_value("Inter, 'Segoe UI', sans-serif"), "Inter, 'Segoe UI', sans-serif");
        assert_eq!(css_value(" #1C2430 "), "#1C2430");
    }

    #[test]
    fn looks_up_themes_by_name() {
        assert_eq!(Theme::by_name("Modern"), Some(Theme::modern()));
        assert_eq!(Theme::by_name("classic"), Some(Theme::classic()));
        assert!(Theme::by_name("neon").is_none());
    }
}

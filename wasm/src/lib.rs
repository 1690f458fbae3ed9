use quarter_gantt::{Chart, RenderOptions, Theme, parse_chart, render_chart_with_options};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PreviewOptions {
    theme: Option<String>,
    font_family: Option<String>,
    quarter_width: Option<f32>,
    validate_colors: Option<bool>,
}

fn build_render_options(options: PreviewOptions) -> RenderOptions {
    let theme = options
        .theme
        .as_deref()
        .and_then(Theme::by_name)
        .unwrap_or_default();
    let mut render_options = RenderOptions::default().with_theme(theme);

    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(width) = options.quarter_width.filter(|w| *w > 0.0) {
        render_options.layout.quarter_width = width;
    }
    if let Some(validate) = options.validate_colors {
        render_options.layout.validate_colors = validate;
    }

    render_options
}

fn render_preview(chart: &Chart, options_json: Option<&str>) -> Result<String, String> {
    let options = match options_json {
        Some(raw) => serde_json::from_str::<PreviewOptions>(raw).map_err(|e| e.to_string())?,
        None => PreviewOptions::default(),
    };
    Ok(render_chart_with_options(chart, &build_render_options(options)))
}

#[wasm_bindgen]
pub fn render_chart_svg(chart_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let chart = parse_chart(chart_json).map_err(|error| JsValue::from_str(&format!("{error:#}")))?;
    render_preview(&chart, options_json.as_deref()).map_err(|error| JsValue::from_str(&error))
}

#[cfg(test)]
mod tests {
    use quarter_gantt::parse_chart;

    use crate::render_preview;

    const CHART: &str = r##"{
        "title": "Preview",
        "startYear": 2024, "startQuarter": 3,
        "endYear": 2025, "endQuarter": 2,
        "categories": [{
            "id": "ops", "name": "Operations", "color": "#2e8b57",
            "tasks": [{
                "id": "t", "title": "Migrate & verify",
                "startYear": 2024, "startQuarter": 4,
                "endYear": 2025, "endQuarter": 1
            }]
        }]
    }"##;

    #[test]
    fn renders_preview_with_overrides() {
        let chart = parse_chart(CHART).unwrap();
        let svg = render_preview(&chart, Some(r#"{"theme":"modern","fontFamily":"Roboto","quarterWidth":100}"#))
            .expect("preview should render");

        assert!(svg.starts_with("<svg width=\"640\""));
        assert!(svg.contains("Roboto"));
        assert!(svg.contains("Migrate &amp; verify"));
    }

    #[test]
    fn font_family_cannot_escape_style() {
        let chart = parse_chart(CHART).unwrap();
        let svg = render_preview(&chart, Some(r#"{"fontFamily":"a</style><script>x()</script>"}"#))
            .expect("preview should render");
        assert!(!svg.contains("<script>"));
        assert_eq!(svg.matches("</style>").count(), 1);
    }

    #[test]
    fn rejects_malformed_options() {
        let chart = parse_chart(CHART).unwrap();
        assert!(render_preview(&chart, Some("{")).is_err());
    }
}

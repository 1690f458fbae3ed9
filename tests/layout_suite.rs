use std::path::Path;

use quarter_gantt::{
    Chart, Layout, LayoutConfig, Quarter, Theme, build_axis, compute_layout, parse_chart,
    render_svg, wrap_text,
};

fn assert_valid_svg(svg: &str, fixture: &str) {
    assert!(svg.starts_with("<svg"), "{fixture}: missing <svg tag");
    assert!(svg.ends_with("</svg>"), "{fixture}: missing </svg tag");
    assert!(!svg.contains("NaN"), "{fixture}: NaN coordinate");
}

fn load_fixture(rel: &str) -> Chart {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    parse_chart(&input).expect("parse failed")
}

fn layout_fixture(rel: &str) -> (Layout, String) {
    let chart = load_fixture(rel);
    let theme = Theme::classic();
    let config = LayoutConfig::default();
    let layout = compute_layout(&chart, &theme, &config);
    let svg = render_svg(&layout, &theme);
    (layout, svg)
}

fn bar_count(svg: &str) -> usize {
    svg.matches("class=\"task-bar\"").count()
}

#[test]
fn render_all_fixtures() {
    // Keep this list explicit so new fixtures must be added intentionally.
    let fixtures = [
        "single_task.json",
        "out_of_range.json",
        "empty.json",
        "long_category.json",
        "multi_year.json5",
    ];

    for rel in fixtures {
        let (layout, svg) = layout_fixture(rel);
        assert_valid_svg(&svg, rel);
        assert!(
            svg.starts_with(&format!(
                "<svg width=\"{}\" height=\"{}\"",
                layout.width(),
                layout.height()
            )),
            "{rel}: canvas size mismatch"
        );
    }
}

#[test]
fn single_task_canvas_and_bar() {
    let (layout, svg) = layout_fixture("single_task.json");
    let chart = layout.as_chart().expect("chart layout");
    assert_eq!((chart.width, chart.height), (720.0, 195.0));
    assert_eq!(chart.categories[0].height, 35.0);
    assert_eq!(chart.categories[0].tasks[0].height, 40.0);

    let bar = chart.categories[0].tasks[0].bar.as_ref().expect("bar");
    assert_eq!((bar.start_column, bar.end_column), (0, 1));
    assert_eq!(bar_count(&svg), 1);
    for label in ["Q1 2024", "Q2 2024", "Q3 2024", "Q4 2024"] {
        assert!(svg.contains(label), "missing {label}");
    }
}

#[test]
fn out_of_range_task_keeps_row_without_bar() {
    let (layout, svg) = layout_fixture("out_of_range.json");
    let chart = layout.as_chart().expect("chart layout");
    let tasks = &chart.categories[0].tasks;
    assert_eq!(tasks.len(), 2);
    assert!(tasks[0].bar.is_none());
    assert_eq!(tasks[0].height, 40.0);
    assert!(tasks[1].bar.is_some());
    assert_eq!(chart.height, 80.0 + 35.0 + 40.0 + 40.0 + 40.0);
    assert!(svg.contains("Legacy cleanup"));
    assert_eq!(bar_count(&svg), 1);
}

#[test]
fn empty_chart_renders_placeholder() {
    let (layout, svg) = layout_fixture("empty.json");
    assert!(layout.is_placeholder());
    assert!(svg.contains("Add categories and tasks to see your Gantt chart"));
    assert!(svg.contains("Use the sidebar to build your chart"));
    assert!(!svg.contains("Q1 2024"));
    assert_eq!(bar_count(&svg), 0);
}

#[test]
fn long_category_name_grows_header() {
    let (layout, svg) = layout_fixture("long_category.json");
    let chart = layout.as_chart().expect("chart layout");
    let category = &chart.categories[0];
    assert_eq!(category.name.lines.len(), 2);
    assert_eq!(category.height, 46.0);
    assert_eq!(chart.height, 80.0 + 46.0 + 40.0 + 40.0);
    assert!(svg.contains(">Operations.</tspan>"));
}

#[test]
fn multi_year_heights_add_up() {
    let (layout, svg) = layout_fixture("multi_year.json5");
    let chart = layout.as_chart().expect("chart layout");
    assert_eq!(chart.columns.len(), 8);
    assert_eq!(chart.width, 200.0 + 8.0 * 120.0 + 40.0);

    let rows: f32 = chart
        .categories
        .iter()
        .map(|cat| cat.height + cat.tasks.iter().map(|t| t.height).sum::<f32>())
        .sum();
    assert_eq!(chart.height, 80.0 + rows + 40.0);

    let mut y = 80.0;
    for category in &chart.categories {
        assert_eq!(category.y, y);
        y += category.height;
        for task in &category.tasks {
            assert_eq!(task.y, y);
            assert!(task.height >= 40.0);
            y += task.height;
        }
    }

    let ledger = &chart.categories[0].tasks[0];
    assert!(ledger.title.lines.len() > 1);
    assert!(!ledger.description.is_empty());
    assert_eq!(bar_count(&svg), 2);
    assert!(svg.contains("fill=\"rgb(120, 60, 200)\""));
    assert!(svg.contains("Platform &lt;Migration&gt; &amp; &quot;Cleanup&quot;"));
}

#[test]
fn rendering_is_deterministic() {
    for rel in ["single_task.json", "multi_year.json5", "empty.json"] {
        let (_, first) = layout_fixture(rel);
        let (_, second) = layout_fixture(rel);
        assert_eq!(first, second, "{rel}: output differs between runs");
    }
}

#[test]
fn axis_is_contiguous_for_every_range() {
    for start_year in 2023..=2025 {
        for start_quarter in 1..=4u8 {
            for end_year in start_year..=start_year + 2 {
                for end_quarter in 1..=4u8 {
                    let axis = build_axis(start_year, start_quarter, end_year, end_quarter);
                    let expected = (end_year - start_year) * 4 - i32::from(start_quarter)
                        + i32::from(end_quarter)
                        + 1;
                    assert_eq!(axis.len() as i32, expected.max(0));
                    if let Some(first) = axis.first() {
                        assert_eq!(*first, Quarter::new(start_year, start_quarter));
                    }
                    for pair in axis.windows(2) {
                        assert_eq!(pair[0].next(), pair[1]);
                    }
                }
            }
        }
    }
}

#[test]
fn wrapping_preserves_words_and_limits() {
    let text = "Coordinate rollout with partner teams and collect feedback from early adopters \
                before general availability of the internationalization pipeline";
    for limit in [5usize, 12, 28, 36, 80] {
        let lines = wrap_text(Some(text), limit);
        let rejoined = lines.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            text.split_whitespace().collect::<Vec<_>>()
        );
        for line in &lines {
            let fits = line.chars().count() <= limit;
            let single_word = !line.contains(' ');
            assert!(fits || single_word, "line `{line}` exceeds {limit}");
        }
    }
    assert!(wrap_text(Some(""), 30).is_empty());
    assert!(wrap_text(None, 30).is_empty());
}

use crate::chart::{Chart, Quarter};
use crate::config::{Config, load_config};
use crate::edit::{self, ChartCommand, TaskDraft};
use crate::layout::compute_layout;
use crate::layout_dump::write_layout_dump;
#[cfg(feature = "png")]
use crate::render::write_output_png;
use crate::render::{export_file_name, render_svg, write_output_svg};
use crate::store::ChartStore;
use crate::parse_chart;
use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "qgantt", version, about = "Quarter-based Gantt chart renderer")]
pub struct Args {
    /// Chart store file
    #[arg(long = "store", global = true, default_value = "charts.json")]
    pub store: PathBuf,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a chart file without touching the store
    Render {
        /// Chart JSON file or '-' for stdin
        #[arg(short = 'i', long = "input")]
        input: Option<PathBuf>,
        #[command(flatten)]
        output: OutputArgs,
        /// Write computed geometry as JSON
        #[arg(long = "dump-layout")]
        dump_layout: Option<PathBuf>,
    },
    /// List stored charts
    List,
    /// Print a stored chart as JSON
    Show { id: String },
    /// Create an empty chart spanning the current quarter to the end of next year
    New {
        title: String,
        #[arg(long)]
        start: Option<Quarter>,
        #[arg(long)]
        end: Option<Quarter>,
    },
    /// Import a chart file into the store (a missing id gets a fresh one)
    Import { file: PathBuf },
    /// Delete a stored chart
    Delete { id: String },
    /// Render a stored chart
    Export {
        id: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rename a stored chart
    SetTitle { chart: String, title: String },
    /// Change the quarter range shown on the axis
    SetRange {
        chart: String,
        start: Quarter,
        end: Quarter,
    },
    /// Append a category to a chart
    AddCategory {
        chart: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "#4a90d9")]
        color: String,
    },
    /// Rename or recolor a category
    EditCategory {
        chart: String,
        category: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category and all of its tasks
    DeleteCategory { chart: String, category: String },
    /// Add a task to a category (defaults to the chart's first quarter)
    AddTask {
        chart: String,
        category: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Update a task; omitted fields keep their current values
    EditTask {
        chart: String,
        category: String,
        task: String,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Delete a task from a category
    DeleteTask {
        chart: String,
        category: String,
        task: String,
    },
}

#[derive(ClapArgs, Debug)]
pub struct OutputArgs {
    /// Output file. Defaults to stdout for SVG if omitted.
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,

    /// Output format
    #[arg(short = 'e', long = "outputFormat", value_enum, default_value = "svg")]
    pub output_format: OutputFormat,

    /// Config JSON file (theme, themeVariables, layout, render)
    #[arg(short = 'c', long = "configFile")]
    pub config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Default)]
pub struct TaskFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    /// First quarter, e.g. 2024-Q1
    #[arg(long)]
    pub start: Option<Quarter>,
    /// Last quarter (inclusive); defaults to the start quarter
    #[arg(long)]
    pub end: Option<Quarter>,
    /// Bar color; the category color is used when omitted
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum OutputFormat {
    Svg,
    Png,
}

impl OutputFormat {
    fn extension(self) -> &'static str {
        match self {
            OutputFormat::Svg => "svg",
            OutputFormat::Png => "png",
        }
    }
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Render {
            input,
            output,
            dump_layout,
        } => {
            let chart = parse_chart(&read_input(input.as_deref())?)?;
            render_to(&chart, &output, None, dump_layout.as_deref())
        }
        Command::List => {
            let store = ChartStore::open(&args.store)?;
            for chart in store.list() {
                println!(
                    "{}\t{}\t{} - {}\t{} categories\t{} tasks",
                    chart.id,
                    chart.title,
                    chart.start(),
                    chart.end(),
                    chart.categories.len(),
                    chart.task_count()
                );
            }
            Ok(())
        }
        Command::Show { id } => {
            let store = ChartStore::open(&args.store)?;
            println!("{}", serde_json::to_string_pretty(store.get(&id)?)?);
            Ok(())
        }
        Command::New { title, start, end } => {
            let mut chart = edit::new_chart(&title, current_quarter());
            if start.is_some() || end.is_some() {
                chart = edit::apply(
                    &chart,
                    ChartCommand::SetRange {
                        start: start.unwrap_or(chart.start()),
                        end: end.unwrap_or(chart.end()),
                    },
                )?;
            }
            let mut store = ChartStore::open(&args.store)?;
            let id = store.create(chart).id.clone();
            store.save()?;
            println!("{id}");
            Ok(())
        }
        Command::Import { file } => {
            let contents = std::fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let chart = parse_chart(&contents)?;
            let mut store = ChartStore::open(&args.store)?;
            let id = store.create(chart).id.clone();
            store.save()?;
            println!("{id}");
            Ok(())
        }
        Command::Delete { id } => {
            let mut store = ChartStore::open(&args.store)?;
            if store.delete(&id) {
                store.save()?;
            } else {
                log::warn!("no chart with id `{id}`");
            }
            Ok(())
        }
        Command::Export { id, output } => {
            let store = ChartStore::open(&args.store)?;
            render_to(store.get(&id)?, &output, Some(&id), None)
        }
        command => edit_stored(&args.store, command),
    }
}

fn edit_stored(store_path: &Path, command: Command) -> Result<()> {
    let mut store = ChartStore::open(store_path)?;
    let (chart_id, edit) = match command {
        Command::SetTitle { chart, title } => (chart, ChartCommand::SetTitle(title)),
        Command::SetRange { chart, start, end } => (chart, ChartCommand::SetRange { start, end }),
        Command::AddCategory { chart, name, color } => {
            (chart, ChartCommand::AddCategory { name, color })
        }
        Command::EditCategory {
            chart,
            category,
            name,
            color,
        } => {
            let current = store
                .get(&chart)?
                .category(&category)
                .ok_or_else(|| edit::EditError::UnknownCategory(category.clone()))?;
            let command = ChartCommand::UpdateCategory {
                name: name.unwrap_or_else(|| current.name.clone()),
                color: color.unwrap_or_else(|| current.color.clone()),
                id: category,
            };
            (chart, command)
        }
        Command::DeleteCategory { chart, category } => {
            (chart, ChartCommand::DeleteCategory { id: category })
        }
        Command::AddTask {
            chart,
            category,
            fields,
        } => {
            let base = store.get(&chart)?.start();
            let start = fields.start.unwrap_or(base);
            let draft = TaskDraft {
                title: fields.title.unwrap_or_default(),
                description: fields.description,
                start,
                end: fields.end.unwrap_or(start),
                color: fields.color,
            };
            (chart, ChartCommand::AddTask { category, draft })
        }
        Command::EditTask {
            chart,
            category,
            task,
            fields,
        } => {
            let current = store
                .get(&chart)?
                .category(&category)
                .and_then(|cat| cat.tasks.iter().find(|t| t.id == task))
                .ok_or_else(|| edit::EditError::UnknownTask {
                    category: category.clone(),
                    task: task.clone(),
                })?;
            let draft = TaskDraft {
                title: fields.title.unwrap_or_else(|| current.title.clone()),
                description: fields.description.or_else(|| current.description.clone()),
                start: fields.start.unwrap_or(current.start()),
                end: fields.end.unwrap_or(current.end()),
                color: fields.color.or_else(|| current.color.clone()),
            };
            let command = ChartCommand::UpdateTask {
                category,
                id: task,
                draft,
            };
            (chart, command)
        }
        Command::DeleteTask {
            chart,
            category,
            task,
        } => (chart, ChartCommand::DeleteTask { category, id: task }),
        other => anyhow::bail!("{other:?} does not edit a chart"),
    };

    let next = edit::apply(store.get(&chart_id)?, edit)?;
    store.replace(&chart_id, next);
    store.save()?;
    Ok(())
}

fn render_to(
    chart: &Chart,
    output: &OutputArgs,
    chart_id: Option<&str>,
    dump_layout: Option<&Path>,
) -> Result<()> {
    let config: Config = load_config(output.config.as_deref())?;
    let layout = compute_layout(chart, &config.theme, &config.layout);
    if let Some(path) = dump_layout {
        write_layout_dump(path, &layout)?;
    }
    let svg = render_svg(&layout, &config.theme);

    let ext = output.output_format.extension();
    match output.output_format {
        OutputFormat::Svg => {
            let path = output
                .output
                .clone()
                .or_else(|| chart_id.map(|id| PathBuf::from(export_file_name(id, ext))));
            write_output_svg(&svg, path.as_deref())
        }
        OutputFormat::Png => {
            let path = match (&output.output, chart_id) {
                (Some(path), _) => path.clone(),
                (None, Some(id)) => PathBuf::from(export_file_name(id, ext)),
                (None, None) => anyhow::bail!("Output path required for {ext} output"),
            };
            write_png(&svg, &path, &config)
        }
    }
}

#[cfg(feature = "png")]
fn write_png(svg: &str, path: &Path, config: &Config) -> Result<()> {
    write_output_png(svg, path, &config.render)
}

#[cfg(not(feature = "png"))]
fn write_png(_svg: &str, _path: &Path, _config: &Config) -> Result<()> {
    anyhow::bail!("PNG output requires the `png` feature")
}

fn read_input(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path.filter(|p| *p != Path::new("-")) {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let mut buf = String::new();
    io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

fn current_quarter() -> Quarter {
    let today = chrono::Local::now().date_naive();
    Quarter::from_month(today.year(), today.month())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn every_subcommand_has_help() {
        let command = Args::command();
        for sub in command.get_subcommands() {
            assert!(sub.get_about().is_some(), "`{}` has no help text", sub.get_name());
        }
    }

    #[test]
    fn parses_task_subcommand() {
        let args = Args::try_parse_from([
            "qgantt",
            "--store",
            "plans.json",
            "add-task",
            "chart-1",
            "eng",
            "--title",
            "Build API",
            "--start",
            "2024-Q1",
            "--end",
            "Q2 2024",
        ])
        .unwrap();
        assert_eq!(args.store, PathBuf::from("plans.json"));
        let Command::AddTask { fields, .. } = args.command else {
            panic!("expected add-task");
        };
        assert_eq!(fields.start, Some(Quarter::new(2024, 1)));
        assert_eq!(fields.end, Some(Quarter::new(2024, 2)));
    }

    #[test]
    fn rejects_bad_quarter_argument() {
        let err = Args::try_parse_from(["qgantt", "set-range", "c", "2024-Q9", "2025-Q1"]);
        assert!(err.is_err());
    }

    #[test]
    fn edits_stored_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts.json");
        let mut store = ChartStore::open(&path).unwrap();
        let mut chart = Chart::new("Plan", Quarter::new(2024, 1), Quarter::new(2024, 4));
        chart.id = "c".to_string();
        store.create(chart);
        store.save().unwrap();

        edit_stored(
            &path,
            Command::AddCategory {
                chart: "c".to_string(),
                name: "Engineering".to_string(),
                color: "#4a90d9".to_string(),
            },
        )
        .unwrap();
        let store = ChartStore::open(&path).unwrap();
        let category = store.get("c").unwrap().categories[0].id.clone();

        edit_stored(
            &path,
            Command::AddTask {
                chart: "c".to_string(),
                category: category.clone(),
                fields: TaskFields {
                    title: Some("Build".to_string()),
                    ..TaskFields::default()
                },
            },
        )
        .unwrap();
        let store = ChartStore::open(&path).unwrap();
        let task = &store.get("c").unwrap().categories[0].tasks[0];
        assert_eq!(task.title, "Build");
        assert_eq!(task.start(), Quarter::new(2024, 1));
        assert_eq!(task.end(), Quarter::new(2024, 1));

        edit_stored(
            &path,
            Command::EditCategory {
                chart: "c".to_string(),
                category,
                name: None,
                color: Some("tomato".to_string()),
            },
        )
        .unwrap();
        let store = ChartStore::open(&path).unwrap();
        let cat = &store.get("c").unwrap().categories[0];
        assert_eq!((cat.name.as_str(), cat.color.as_str()), ("Engineering", "tomato"));
    }
}

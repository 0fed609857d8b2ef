mod telemetry;
mod view;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{ApiConfig, AppServices, ExerciseSession, GradingOutcome};
use tracing::{info, warn};
use trainer_core::model::ExerciseId;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidExerciseId { raw: String },
    InvalidDbUrl { raw: String },
    InvalidApiUrl { raw: String },
    MissingRunInput { flag: &'static str },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidExerciseId { raw } => write!(f, "invalid --exercise value: {raw:?}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidApiUrl { raw } => write!(f, "invalid --api value: {raw}"),
            ArgsError::MissingRunInput { flag } => write!(f, "run requires {flag}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
    initial_exercise: Option<ExerciseId>,
}

impl UiApp for DesktopApp {
    fn services(&self) -> AppServices {
        self.services.clone()
    }

    fn initial_exercise(&self) -> Option<ExerciseId> {
        self.initial_exercise.clone()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui  [--api <url>] [--db <sqlite_url>] [--exercise <id>]");
    eprintln!("  cargo run -p app -- run [--api <url>] [--db <sqlite_url>] --exercise <id> --file <path>");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --api http://localhost:8000");
    eprintln!("  --db sqlite://trainer.sqlite3");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  TRAINER_API_URL, TRAINER_DB_URL, LOG_LEVEL, LOG_FORMAT=json");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Run,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "run" => Some(Self::Run),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    api: ApiConfig,
    db_url: String,
    exercise: Option<ExerciseId>,
    file: Option<PathBuf>,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut api = ApiConfig::from_env();
        let mut db_url = std::env::var("TRAINER_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| "sqlite://trainer.sqlite3".into(), normalize_sqlite_url);
        let mut exercise = None;
        let mut file = None;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--api" => {
                    let value = require_value(args, "--api")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidApiUrl { raw: value });
                    }
                    api = ApiConfig::new(value);
                }
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--exercise" => {
                    let value = require_value(args, "--exercise")?;
                    let id = ExerciseId::new(value.clone())
                        .map_err(|_| ArgsError::InvalidExerciseId { raw: value })?;
                    exercise = Some(id);
                }
                "--file" => {
                    file = Some(PathBuf::from(require_value(args, "--file")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            api,
            db_url,
            exercise,
            file,
        })
    }

    fn parse_run(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let parsed = Self::parse(args)?;
        if parsed.exercise.is_none() {
            return Err(ArgsError::MissingRunInput { flag: "--exercise" });
        }
        if parsed.file.is_none() {
            return Err(ArgsError::MissingRunInput { flag: "--file" });
        }
        Ok(parsed)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand means the desktop UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = match cmd {
        Command::Ui => Args::parse(&mut iter),
        Command::Run => Args::parse_run(&mut iter),
    }
    .map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    prepare_sqlite_file(&parsed.db_url)?;
    let services = AppServices::new_sqlite(&parsed.db_url, parsed.api.clone()).await?;

    match cmd {
        Command::Ui => {
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
                services,
                initial_exercise: parsed.exercise,
            });
            let context = build_app_context(&app);

            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Exercise Trainer")
                    .with_always_on_top(false),
            );

            info!("launching desktop UI");
            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Run => {
            let (Some(exercise), Some(file)) = (parsed.exercise, parsed.file) else {
                return Err(ArgsError::MissingRunInput { flag: "--exercise" }.into());
            };
            let mut session = services.session();
            grade_file(&mut session, &exercise, &file).await
        }
    }
}

async fn grade_file(
    session: &mut ExerciseSession,
    exercise: &ExerciseId,
    file: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Err(err) = session.load_catalog().await {
        warn!(error = %err, "grading without catalog; category scores unavailable");
    }
    session.load_exercise(exercise).await?;
    let code = tokio::fs::read_to_string(file).await?;
    session.edit(code).await?;

    println!("running...");
    match session.run_code().await? {
        GradingOutcome::Applied(report) => {
            print!("{}", view::feedback(&report.feedback));
            print!("{}", view::scores(&report.scores));
        }
        GradingOutcome::Discarded => println!("result discarded"),
    }
    Ok(())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    telemetry::init_tracing();
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, ArgsError> {
        let mut iter = args.iter().map(|arg| (*arg).to_string());
        Args::parse(&mut iter)
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&[
            "--api",
            "http://grader.local:9000",
            "--db",
            "sqlite::memory:",
            "--exercise",
            "loops-1",
        ])
        .unwrap();
        assert_eq!(args.api.base_url, "http://grader.local:9000");
        assert_eq!(args.db_url, "sqlite::memory:");
        assert_eq!(args.exercise.map(|id| id.to_string()).as_deref(), Some("loops-1"));
        assert!(args.file.is_none());
    }

    #[test]
    fn rejects_bad_flags() {
        assert!(matches!(parse(&["--api", "grader"]), Err(ArgsError::InvalidApiUrl { .. })));
        assert!(matches!(parse(&["--exercise", " "]), Err(ArgsError::InvalidExerciseId { .. })));
        assert!(matches!(parse(&["--db"]), Err(ArgsError::MissingValue { flag: "--db" })));
        assert!(matches!(parse(&["--verbose"]), Err(ArgsError::UnknownArg(_))));
    }

    #[test]
    fn run_needs_exercise_and_file() {
        let mut iter = ["--exercise", "e1"].iter().map(|arg| (*arg).to_string());
        assert!(matches!(
            Args::parse_run(&mut iter),
            Err(ArgsError::MissingRunInput { flag: "--file" })
        ));
    }

    #[test]
    fn relative_sqlite_paths_become_absolute() {
        let url = normalize_sqlite_url("sqlite:data/trainer.sqlite3".into());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/trainer.sqlite3"));
        assert_eq!(
            normalize_sqlite_url("sqlite:///tmp/x.db".into()),
            "sqlite:///tmp/x.db"
        );
    }
}

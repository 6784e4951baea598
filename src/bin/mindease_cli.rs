use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use mindease_engine::api::FusionInput;
use mindease_engine::utils::{init_logging, session_feature_rows};
use mindease_engine::{normalize, EngineConfig, EngineError, EngineResult, RecommendationPersonalizer, Session};

/// Offline tools for the fusion and personalization engine
#[derive(Parser, Debug)]
#[clap(name = "mindease-cli", version)]
struct Cli {
    /// Engine configuration (TOML); defaults are used when omitted
    #[clap(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fuse classifier outputs read as JSON from a file, or stdin with `-`
    Fuse {
        #[clap(long, value_name = "FILE")]
        input: String,
    },
    /// Print the personalized plan for an emotion label
    Recommend {
        #[clap(long)]
        emotion: String,

        /// Historical completion rate; the configured default when omitted
        #[clap(long)]
        avg_completion: Option<f64>,
    },
    /// Validate the file given with `--config`
    CheckConfig,
    /// Turn a JSON array of sessions into clustering feature rows
    ExportDataset {
        #[clap(long, value_name = "FILE")]
        sessions: PathBuf,

        #[clap(long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn load_config(path: Option<&Path>) -> EngineResult<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path),
        None => Ok(EngineConfig::default()),
    }
}

fn read_input(source: &str) -> EngineResult<String> {
    if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(std::fs::read_to_string(source)?)
    }
}

fn run(cli: Cli) -> EngineResult<()> {
    match cli.command {
        Command::Fuse { input } => {
            let config = load_config(cli.config.as_deref())?;
            let engine = mindease_engine::Engine::new(config)?;
            let input: FusionInput = serde_json::from_str(&read_input(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&engine.fuse(&input))?);
        }
        Command::Recommend { emotion, avg_completion } => {
            let config = load_config(cli.config.as_deref())?;
            let completion = match avg_completion {
                Some(value) if !value.is_finite() || !(0.0..=1.0).contains(&value) => {
                    return Err(EngineError::Validation("--avg-completion must be within [0, 1]".to_string()))
                }
                Some(value) => value,
                None => config.personalization.default_completion,
            };

            let canonical = normalize(Some(emotion.as_str()));
            let plan = RecommendationPersonalizer::new(config.personalization).recommend_for_completion(canonical, completion);
            info!(emotion = %canonical, avg_completion = completion, "Plan built");
            println!("{}", serde_json::to_string_pretty(&plan)?);
        }
        Command::CheckConfig => {
            let path = cli
                .config
                .ok_or_else(|| EngineError::Validation("check-config needs --config <FILE>".to_string()))?;
            let config = EngineConfig::from_file(&path)?;
            println!("{} is valid", path.display());
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Command::ExportDataset { sessions, output } => {
            let sessions: Vec<Session> = serde_json::from_str(&std::fs::read_to_string(&sessions)?)?;
            let rows = session_feature_rows(&sessions);
            std::fs::write(&output, serde_json::to_string_pretty(&rows)?)?;
            info!(rows = rows.len(), output = %output.display(), "Dataset exported");
        }
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let level = load_config(cli.config.as_deref())
        .map(|c| c.logging.level)
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&level);

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use extract::CapitalizationTagger;
use ingest::Corpus;
use rank::{
    EvaluationError, EvaluationRequest, Evaluator, MatchPolicy, SearchAlgorithm,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "resume-rank", version, about = "Rank resumes against a set of skills")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory of resumes (overrides the config file and RESUME_RANK_DIR)
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Score every resume and print the best matches as JSON
    Evaluate {
        /// Number of resumes to return
        #[arg(long, allow_negative_numbers = true)]
        top_k: i64,

        /// Comma-separated skills, e.g. "python,sql,docker"
        #[arg(long)]
        skillset: String,

        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Copy a resume out of the corpus
    Download {
        filename: String,

        /// Destination path, defaults to the file name in the working directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    Substring,
    Token,
}

impl From<PolicyArg> for MatchPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Substring => MatchPolicy::Substring,
            PolicyArg::Token => MatchPolicy::Token,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    RabinKarp,
    AhoCorasick,
}

impl From<AlgorithmArg> for SearchAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::RabinKarp => SearchAlgorithm::RabinKarp,
            AlgorithmArg::AhoCorasick => SearchAlgorithm::AhoCorasick,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_status(&e))
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// 2 for a rejected request, 3 for a missing file, 1 for anything else.
fn exit_status(error: &anyhow::Error) -> u8 {
    match error.downcast_ref::<EvaluationError>() {
        Some(EvaluationError::Validation(_)) => 2,
        Some(EvaluationError::NotFound(_)) => 3,
        _ => 1,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_env();
    if let Some(dir) = cli.dir {
        config.corpus.resume_dir = dir;
    }

    match cli.command {
        Command::Evaluate {
            top_k,
            skillset,
            policy,
            algorithm,
            pretty,
        } => {
            if let Some(policy) = policy {
                config.matching.policy = policy.into();
            }
            if let Some(algorithm) = algorithm {
                config.matching.algorithm = algorithm.into();
            }
            evaluate(&config, EvaluationRequest::new(top_k, skillset), pretty).await
        }
        Command::Download { filename, output } => download(&config, &filename, output).await,
    }
}

fn build_evaluator(config: &AppConfig) -> Evaluator {
    Evaluator::new(
        Corpus::new(&config.corpus.resume_dir),
        config.evaluator_config(),
        Arc::new(CapitalizationTagger),
    )
}

async fn evaluate(config: &AppConfig, request: EvaluationRequest, pretty: bool) -> Result<()> {
    let evaluator = build_evaluator(config);
    info!(
        dir = %evaluator.corpus().root().display(),
        policy = ?config.matching.policy,
        algorithm = ?config.matching.algorithm,
        "Evaluating resumes"
    );

    let response = evaluator
        .evaluate_within(&request, config.request_timeout())
        .await?;

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{}", json);

    debug!(metrics = ?evaluator.metrics().snapshot(), "Evaluation metrics");
    Ok(())
}

async fn download(config: &AppConfig, filename: &str, output: Option<PathBuf>) -> Result<()> {
    let evaluator = build_evaluator(config);
    let bytes = evaluator.retrieve(filename).await?;

    let target = output.unwrap_or_else(|| PathBuf::from(filename));
    tokio::fs::write(&target, &bytes)
        .await
        .context(format!("Failed to write {:?}", target))?;

    info!(filename, bytes = bytes.len(), target = %target.display(), "Downloaded resume");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_evaluate() {
        let cli = Cli::try_parse_from([
            "resume-rank",
            "--dir",
            "cvs",
            "evaluate",
            "--top-k",
            "3",
            "--skillset",
            "python,sql",
            "--policy",
            "token",
            "--algorithm",
            "aho-corasick",
        ])
        .unwrap();

        assert_eq!(cli.dir, Some(PathBuf::from("cvs")));
        match cli.command {
            Command::Evaluate {
                top_k,
                skillset,
                policy,
                algorithm,
                pretty,
            } => {
                assert_eq!(top_k, 3);
                assert_eq!(skillset, "python,sql");
                assert_eq!(policy.map(MatchPolicy::from), Some(MatchPolicy::Token));
                assert_eq!(
                    algorithm.map(SearchAlgorithm::from),
                    Some(SearchAlgorithm::AhoCorasick)
                );
                assert!(!pretty);
            }
            Command::Download { .. } => panic!("expected evaluate"),
        }
    }

    #[test]
    fn test_negative_top_k_reaches_validation() {
        let cli = Cli::try_parse_from([
            "resume-rank", "evaluate", "--top-k", "-1", "--skillset", "rust",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Evaluate { top_k: -1, .. }));
    }

    #[test]
    fn test_exit_status() {
        let not_found = anyhow::Error::new(EvaluationError::NotFound("cv.pdf".to_string()));
        assert_eq!(exit_status(&not_found), 3);

        let invalid = anyhow::Error::new(EvaluationError::Validation(
            rank::ValidationError::InvalidTopK("0".to_string()),
        ));
        assert_eq!(exit_status(&invalid), 2);

        assert_eq!(exit_status(&anyhow::anyhow!("boom")), 1);
    }

    #[tokio::test]
    async fn test_download_writes_file() {
        let corpus = tempfile::tempdir().unwrap();
        std::fs::write(corpus.path().join("cv.txt"), "rust").unwrap();
        let out = tempfile::tempdir().unwrap();
        let target = out.path().join("copy.txt");

        let mut config = AppConfig::default();
        config.corpus.resume_dir = corpus.path().to_path_buf();

        download(&config, "cv.txt", Some(target.clone())).await.unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "rust");

        let err = download(&config, "missing.txt", Some(target)).await.unwrap_err();
        assert_eq!(exit_status(&err), 3);
    }
}

mod store;

use clap::{Args, Parser, Subcommand};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use idea_miner::calibration::{tuning::threshold_grid, CalibrationRunner, ThresholdSample, ThresholdTuner};
use idea_miner::config::EngineConfig;
use idea_miner::text::{canonicalize, dice, jaro_winkler, phrase_similarity};
use idea_miner::{
    current_timestamp, format_float, format_number, mine_ideas, synthesize, IdeaCluster,
    ProblemPhrase, RedditPost, SynthesizedIdea,
};

use crate::store::{IdeaStore, StoredRun};

#[derive(Parser)]
#[command(name = "idea-miner", about = "Cluster problem statements into scored ideas")]
struct Cli {
    /// Config file (defaults to IDEA_CONFIG_PATH or config/ideas.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    Mine(MineArgs),
    Show(ShowArgs),
    Canonicalize(CanonicalizeArgs),
    Similarity(SimilarityArgs),
    Calibrate(CalibrateArgs),
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug, Clone)]
struct MineArgs {
    /// JSON array of posts, or `-` for stdin
    #[arg(long)]
    posts: String,
    /// JSON array of pre-extracted problem phrases
    #[arg(long)]
    phrases: Option<PathBuf>,
    #[arg(long)]
    window_days: Option<u32>,
    /// Reference time in unix seconds (defaults to now)
    #[arg(long)]
    now: Option<i64>,
    #[arg(long)]
    synthesize: bool,
    #[arg(long)]
    json: bool,
    /// Replace the stored ideas for this window in the given JSON store
    #[arg(long)]
    store: Option<PathBuf>,
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug, Clone)]
struct ShowArgs {
    #[arg(long)]
    store: PathBuf,
    #[arg(long, default_value_t = 30)]
    window_days: u32,
}

#[derive(Args, Debug, Clone)]
struct CanonicalizeArgs {
    text: String,
}

#[derive(Args, Debug, Clone)]
struct SimilarityArgs {
    left: String,
    right: String,
}

#[derive(Args, Debug, Clone)]
struct CalibrateArgs {
    /// JSON array of labelled phrase pairs
    #[arg(long)]
    samples: PathBuf,
    #[arg(long, default_value_t = 0.6)]
    start: f64,
    #[arg(long, default_value_t = 0.95)]
    end: f64,
    #[arg(long, default_value_t = 0.05)]
    step: f64,
}

#[derive(Args, Debug, Clone)]
struct InitConfigArgs {
    #[arg(long, default_value = "config/ideas.toml")]
    path: PathBuf,
}

#[tokio::main]
async fn main() {
    load_dotenv();
    init_tracing();
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), String> {
    let cli = Cli::parse();
    let (config, config_path) = EngineConfig::load(cli.config)?;
    if let Some(path) = config_path.filter(|path| path.exists()) {
        info!("Loaded config - path={}", path.display());
    }

    match cli.command {
        Command::Mine(args) => run_mine(args, &config).await,
        Command::Show(args) => run_show(args).await,
        Command::Canonicalize(args) => {
            println!("{}", canonicalize(&args.text, &config.vocabulary));
            Ok(())
        }
        Command::Similarity(args) => {
            let left = args.left.to_lowercase();
            let right = args.right.to_lowercase();
            println!("dice: {}", format_float(dice(&left, &right), 4));
            println!("jaro-winkler: {}", format_float(jaro_winkler(&left, &right), 4));
            let combined = phrase_similarity(&left, &right);
            println!(
                "combined: {} (merge at >= {}: {})",
                format_float(combined, 4),
                format_float(config.merge.threshold, 2),
                combined >= config.merge.threshold
            );
            Ok(())
        }
        Command::Calibrate(args) => run_calibrate(args).await,
        Command::InitConfig(args) => {
            EngineConfig::default().write(&args.path)?;
            println!("Wrote default config to {}", args.path.display());
            Ok(())
        }
    }
}

async fn run_mine(args: MineArgs, config: &EngineConfig) -> Result<(), String> {
    let posts: Vec<RedditPost> = parse_json(&read_input(&args.posts).await?, "posts")?;
    let phrases: Option<Vec<ProblemPhrase>> = match args.phrases.as_ref() {
        Some(path) => Some(parse_json(&read_file(path).await?, "phrases")?),
        None => None,
    };

    let window_days = args.window_days.unwrap_or(config.engine.window_days);
    let now = args.now.unwrap_or_else(current_timestamp);
    let ideas = mine_ideas(&posts, phrases.as_deref(), window_days, now, config)?;

    let details: Vec<SynthesizedIdea> = if args.synthesize {
        ideas
            .iter()
            .map(|idea| synthesize(idea, &config.synthesis, &config.vocabulary))
            .collect()
    } else {
        Vec::new()
    };

    if let Some(path) = args.store.clone() {
        let store = IdeaStore::load(path).await?;
        let previous = store
            .replace(StoredRun {
                window_days,
                generated_at: now,
                ideas: ideas.clone(),
                details: details.clone(),
            })
            .await?;
        if let Some(previous) = previous {
            info!(
                "Superseded stored run - window_days={}, previous_ideas={}",
                window_days,
                previous.ideas.len()
            );
        }
    }

    if args.json {
        let payload = serde_json::json!({
            "window_days": window_days,
            "generated_at": now,
            "ideas": ideas,
            "details": details,
        });
        let text = serde_json::to_string_pretty(&payload)
            .map_err(|err| format!("failed to serialize ideas: {}", err))?;
        println!("{}", text);
        return Ok(());
    }

    print_report(&ideas, &details, window_days, args.limit);
    Ok(())
}

async fn run_show(args: ShowArgs) -> Result<(), String> {
    let store = IdeaStore::load(args.store).await?;
    let run = store
        .get(args.window_days)
        .await
        .ok_or_else(|| format!("no stored run for a {}-day window", args.window_days))?;
    println!("Generated at: {}", run.generated_at);
    print_report(&run.ideas, &run.details, run.window_days, usize::MAX);
    Ok(())
}

async fn run_calibrate(args: CalibrateArgs) -> Result<(), String> {
    let samples: Vec<ThresholdSample> = parse_json(&read_file(&args.samples).await?, "samples")?;
    let runner = CalibrationRunner::new(samples.clone());

    println!("threshold  precision  recall  f1     accuracy");
    for metrics in runner.sweep(&threshold_grid(args.start, args.end, args.step)) {
        println!(
            "{}       {}       {}    {}   {}",
            format_float(metrics.threshold, 2),
            format_float(metrics.precision, 2),
            format_float(metrics.recall, 2),
            format_float(metrics.f1, 2),
            format_float(metrics.accuracy, 2)
        );
    }

    let best = ThresholdTuner::new(samples).tune(args.start, args.end, args.step);
    println!(
        "\nBest threshold: {} (f1 {}, {} samples)",
        format_float(best.threshold, 2),
        format_float(best.f1, 2),
        best.sample_count
    );
    Ok(())
}

fn print_report(ideas: &[IdeaCluster], details: &[SynthesizedIdea], window_days: u32, limit: usize) {
    println!("Ideas over the last {} days: {}", window_days, ideas.len());
    for (rank, idea) in ideas.iter().take(limit).enumerate() {
        println!(
            "\n{}. {} (score {})",
            rank + 1,
            idea.title,
            format_float(idea.score, 2)
        );
        println!(
            "   posts {} | communities {} | upvotes {} | comments {} | trend {} {:?}",
            idea.posts_count,
            idea.communities_count,
            format_number(idea.upvotes_sum as f64),
            format_number(idea.comments_sum as f64),
            format_float(idea.trend_slope, 2),
            idea.trend_bins
        );
        if !idea.top_keywords.is_empty() {
            println!("   keywords: {}", idea.top_keywords.join(", "));
        }
        if !idea.sample_snippet.is_empty() {
            println!("   \"{}\"", idea.sample_snippet);
        }
        if let Some(detail) = details.iter().find(|detail| detail.idea_id == idea.id) {
            println!("   for: {}", detail.target_users);
            println!(
                "   build: {} (~{} days) | price: {} | {}",
                detail.complexity_tier.label(),
                detail.effort_days,
                detail.price_band,
                detail.value_proposition
            );
            println!("   needs: {}", detail.requirements.join(", "));
        }
    }
}

fn parse_json<T: serde::de::DeserializeOwned>(data: &str, label: &str) -> Result<T, String> {
    serde_json::from_str(data).map_err(|err| format!("failed to parse {}: {}", label, err))
}

async fn read_input(source: &str) -> Result<String, String> {
    if source != "-" {
        return read_file(Path::new(source)).await;
    }

    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|err| format!("failed reading stdin: {}", err))?;
    if buffer.trim().is_empty() {
        return Err("missing posts: pass --posts FILE or pipe JSON on stdin".to_string());
    }
    Ok(buffer)
}

async fn read_file(path: &Path) -> Result<String, String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|err| format!("failed to read {}: {}", path.display(), err))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_dotenv() {
    let _ = dotenvy::dotenv();
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let manifest_path = Path::new(manifest_dir).join(".env");
    let _ = dotenvy::from_path(manifest_path);
}

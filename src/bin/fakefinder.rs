//! CLI binary for fakefinder.
//!
//! A thin shim over the library crate that maps CLI flags to an
//! `AnalysisRequest`, runs it and prints the result.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use fakefinder::pipeline::extract::content_from_text;
use fakefinder::{
    AnalysisProgressCallback, AnalysisRequest, AnalysisResult, Analyzer, AuthenticityLevel,
    ClientConfig, ExtractedContent, Lean, PipelineStage, ProgressCallback, ServiceClient,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Spinner that names the stage in flight and logs one line per finished stage.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl AnalysisProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: PipelineStage) {
        self.bar.set_message(format!("{stage}…"));
    }

    fn on_stage_complete(&self, stage: PipelineStage, elapsed_ms: u64) {
        self.bar.println(format!(
            "  {} {:<18} {}",
            green("✓"),
            stage.to_string(),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_stage_error(&self, stage: PipelineStage, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };
        self.bar
            .println(format!("  {} {:<18} {}", red("✗"), stage.to_string(), red(&msg)));
    }

    fn on_analysis_complete(&self, _success: bool) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse a headline
  fakefinder --headline "Market rises after rate decision"

  # Headline plus first paragraph, JSON output
  fakefinder --headline "Market rises" --paragraph "Stocks closed higher." --json

  # Scrape and analyse an article
  fakefinder --url https://news.example.org/story

  # OCR a screenshot, skip source corroboration
  fakefinder --image screenshot.png --no-corroboration

  # Run only the emotion classifier
  fakefinder --headline "You won't believe what happened next" --stage emotion

ENVIRONMENT:
  FAKEFINDER_API_URL      Analysis service base URL (default http://localhost:8000)
  FAKEFINDER_TIMEOUT      Per-request timeout in seconds
  RUST_LOG                Overrides the log filter chosen by -v / -q
"#;

/// Check a news item for corroboration, manipulation and political lean.
#[derive(Parser, Debug)]
#[command(
    name = "fakefinder",
    version,
    about = "Check a news headline, article URL or screenshot with FakeFinder",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP,
    group(ArgGroup::new("input").required(true).args(["headline", "url", "image"]))
)]
struct Cli {
    /// Headline to analyse (1–500 characters).
    #[arg(long)]
    headline: Option<String>,

    /// First paragraph accompanying --headline (up to 1000 characters).
    #[arg(long, requires = "headline")]
    paragraph: Option<String>,

    /// Article URL to scrape and analyse.
    #[arg(long)]
    url: Option<String>,

    /// Image file to OCR and analyse.
    #[arg(long)]
    image: Option<PathBuf>,

    /// Do not cross-reference trusted sources.
    #[arg(long, env = "FAKEFINDER_NO_CORROBORATION")]
    no_corroboration: bool,

    /// Run a single assessment endpoint instead of the full pipeline.
    #[arg(long, value_enum)]
    stage: Option<StageArg>,

    /// Analysis service base URL.
    #[arg(long, env = "FAKEFINDER_API_URL", default_value = fakefinder::DEFAULT_API_URL)]
    api_url: String,

    /// Per-request timeout in seconds (default: none).
    #[arg(long, env = "FAKEFINDER_TIMEOUT")]
    timeout: Option<u64>,

    /// Output `{success, data, error}` JSON instead of a summary.
    #[arg(long, env = "FAKEFINDER_JSON")]
    json: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "FAKEFINDER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "FAKEFINDER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "FAKEFINDER_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum StageArg {
    Emotion,
    Authenticity,
    Political,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner already reports stage progress; keep INFO logs out of its way.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && cli.stage.is_none();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build request + config ───────────────────────────────────────────
    let request = build_request(&cli).await?;
    // JSON mode reports invalid input through the outcome object instead.
    if !cli.json {
        request.validate().context("Invalid input")?;
    }

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn AnalysisProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;
    let analyzer = Analyzer::new(&config).context("Failed to initialise analysis client")?;

    // ── Single-stage mode ────────────────────────────────────────────────
    if let Some(stage) = cli.stage {
        request.validate().context("Invalid input")?;
        return run_single_stage(analyzer.client(), &request, stage).await;
    }

    // ── Full pipeline ────────────────────────────────────────────────────
    if cli.json {
        let (json, success) = run_json(&analyzer, &request).await?;
        println!("{json}");
        if !success {
            std::process::exit(1);
        }
        return Ok(());
    }

    let result = analyzer.analyze(&request).await.context("Analysis failed")?;
    print_summary(&result, cli.quiet);
    Ok(())
}

/// Run the pipeline and render the `{success, data?, error?}` outcome.
///
/// Invalid input is reported inside the outcome like any other failure.
async fn run_json(analyzer: &Analyzer, request: &AnalysisRequest) -> Result<(String, bool)> {
    let outcome = analyzer.run(request).await;
    let json = serde_json::to_string_pretty(&outcome).context("Failed to serialise output")?;
    Ok((json, outcome.success))
}

/// Map the input flags to an `AnalysisRequest`.
async fn build_request(cli: &Cli) -> Result<AnalysisRequest> {
    let request = if let Some(ref headline) = cli.headline {
        let mut r = AnalysisRequest::text(headline.clone());
        if let Some(ref p) = cli.paragraph {
            r = r.with_paragraph(p.clone());
        }
        r
    } else if let Some(ref url) = cli.url {
        AnalysisRequest::url(url.clone())
    } else if let Some(ref path) = cli.image {
        AnalysisRequest::image_from_path(path)
            .await
            .with_context(|| format!("Failed to read image {:?}", path))?
    } else {
        anyhow::bail!("One of --headline, --url or --image is required");
    };
    Ok(request.with_corroboration(!cli.no_corroboration))
}

/// Map CLI args to `ClientConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ClientConfig> {
    let mut builder = ClientConfig::builder().base_url(cli.api_url.clone());
    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }
    builder.build().context("Invalid configuration")
}

/// Extract (if needed) and call one assessment endpoint, printing its raw response.
async fn run_single_stage(
    client: &ServiceClient,
    request: &AnalysisRequest,
    stage: StageArg,
) -> Result<()> {
    let content: ExtractedContent = match request {
        AnalysisRequest::Text {
            headline,
            paragraph,
            ..
        } => content_from_text(headline, paragraph.as_deref()),
        AnalysisRequest::Url { url, .. } => client
            .extract_link(url.trim())
            .await
            .context("Extraction failed")?,
        AnalysisRequest::Image { file, .. } => client
            .extract_image(file)
            .await
            .context("Extraction failed")?,
    };

    let json = match stage {
        StageArg::Emotion => serde_json::to_string_pretty(
            &client
                .analyze_emotion(&content)
                .await
                .context("Emotion analysis failed")?,
        ),
        StageArg::Authenticity => serde_json::to_string_pretty(
            &client
                .analyze_authenticity(&content)
                .await
                .context("Authenticity analysis failed")?,
        ),
        StageArg::Political => serde_json::to_string_pretty(
            &client
                .analyze_political(&content)
                .await
                .context("Political analysis failed")?,
        ),
    }
    .context("Failed to serialise output")?;

    println!("{json}");
    Ok(())
}

fn print_summary(r: &AnalysisResult, quiet: bool) {
    let level = r.authentication_level.level;
    let level = match level {
        AuthenticityLevel::High => green(level.as_str()),
        AuthenticityLevel::Moderate => yellow(level.as_str()),
        AuthenticityLevel::Low => red(level.as_str()),
    };

    println!("{}", bold(&r.original_text));
    if !r.topic.is_empty() {
        println!("  Topic:          {}", r.topic);
    }
    println!(
        "  Authenticity:   {}  ({} source{} matched)",
        level,
        r.authentication_level.score,
        if r.authentication_level.score == 1 { "" } else { "s" }
    );
    for source in &r.authentication_level.sources {
        println!("                  {} {}", dim("•"), source);
    }

    let mut flags = Vec::new();
    if r.emotion_level.is_clickbait {
        flags.push(yellow("clickbait"));
    }
    if r.emotion_level.is_ragebait {
        flags.push(red("ragebait"));
    }
    println!(
        "  Emotion:        {} ({:.0}%){}{}",
        r.emotion_level.primary,
        r.emotion_level.confidence * 100.0,
        if flags.is_empty() { "" } else { "  " },
        flags.join(" ")
    );
    println!(
        "  Political tone: {} ({:.0}% extremity)",
        r.political_tone.position,
        r.political_tone.confidence * 100.0
    );
    println!(
        "  Confidence:     {}",
        bold(&format!("{:.0}%", r.confidence_score * 100.0))
    );

    if !quiet {
        if !r.keywords.is_empty() {
            let kw: Vec<&str> = r.keywords.iter().map(String::as_str).collect();
            println!("  Keywords:       {}", dim(&kw.join(", ")));
        }
        println!("  Rewrites:");
        for lean in Lean::ALL {
            println!("    {:<7} {}", format!("{lean:?}"), r.rewrites.get(lean));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use clap::CommandFactory;
    use fakefinder::{ApiError, ApiResult, ImageUpload, Method, Transport};
    use serde_json::Value;

    struct Unreachable;

    #[async_trait]
    impl Transport for Unreachable {
        async fn request(&self, _m: Method, path: &str, _b: Option<Value>) -> ApiResult<Value> {
            Err(ApiError::Network(format!("unexpected call to {path}")))
        }

        async fn upload(&self, path: &str, _f: &ImageUpload) -> ApiResult<Value> {
            Err(ApiError::Network(format!("unexpected upload to {path}")))
        }
    }

    #[tokio::test]
    async fn json_mode_reports_invalid_input_as_outcome() {
        let analyzer = Analyzer::with_transport(Arc::new(Unreachable));
        let request = AnalysisRequest::text("   ");

        let (json, success) = run_json(&analyzer, &request).await.unwrap();

        assert!(!success);
        let value: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"success": false, "error": "Headline is required"})
        );
    }

    #[test]
    fn api_url_defaults_to_library_constant() {
        let cmd = Cli::command();
        let arg = cmd
            .get_arguments()
            .find(|a| a.get_id() == "api_url")
            .unwrap();
        let defaults: Vec<&str> = arg
            .get_default_values()
            .iter()
            .filter_map(|v| v.to_str())
            .collect();
        assert_eq!(defaults, vec![fakefinder::DEFAULT_API_URL]);
    }
}

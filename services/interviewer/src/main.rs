use anyhow::{Context, Result};
use clap::Parser;
use interview_core::{InterviewConfig, InterviewSession, InterviewType};
use interview_service::bootstrap::build_interviewer;
use interview_service::config::Config;
use interview_service::console;
use tokio::io::BufReader;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Practice a mock interview in the terminal.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The role being interviewed for
    #[arg(long, default_value = "Software Engineer")]
    role: String,

    /// technical, behavioral or mixed
    #[arg(long, default_value = "mixed")]
    interview_type: InterviewType,

    /// Number of questions to ask
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(3..=10))]
    max_questions: u32,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    // Logs go to stderr so they do not interleave with the interview on stdout.
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Configuration loaded successfully. Starting interviewer...");

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    let interview = InterviewConfig::new(args.role, args.interview_type, args.max_questions)?;

    // --- 4. Initialize the Interviewer ---
    let interviewer = build_interviewer(&config).await?;

    // --- 5. Run the Session ---
    let mut session = InterviewSession::new(interview);
    let mut stdout = tokio::io::stdout();
    tokio::select! {
        result = console::run(&mut session, &*interviewer, BufReader::new(tokio::io::stdin()), &mut stdout) => result?,
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received Ctrl-C, shutting down...");
        }
    }

    tracing::info!(
        "Session ended: {} answered, {} skipped",
        session.history().len(),
        session.skipped()
    );
    Ok(())
}

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use solace_companion::db::{self, CheckInRepo, HistoryRepo, UserRepo};
use solace_companion::{
    analyze, CompanionClient, Config, ContextBuilder, ContextMessage, ContextRequest, Mood,
    MoodAnalysis, Summarizer, Timeframe, TurnKind, FALLBACK_REPLY,
};

/// Solace - conversational companion with mood tracking
#[derive(Parser)]
#[command(name = "solace", version, about)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Send a message and get a companion reply
    Chat {
        /// User ID (platform-native numeric ID)
        #[arg(short, long)]
        user: i64,
        /// Channel the message arrived on (tags ambient context only)
        #[arg(short, long)]
        channel: Option<String>,
        /// The message text
        message: String,
    },
    /// Record a mood check-in
    CheckIn {
        /// User ID
        #[arg(short, long)]
        user: i64,
        /// Mood label (happy, calm, neutral, sad, anxious, frustrated, tired, confused)
        mood: String,
        /// Intensity 1-5
        #[arg(short, long)]
        intensity: Option<u8>,
        /// What the user was doing
        #[arg(short, long)]
        activity: Option<String>,
    },
    /// Show mood analytics for a timeframe
    Analyze {
        /// User ID
        #[arg(short, long)]
        user: i64,
        /// Timeframe: week, month, or all
        #[arg(short, long, default_value = "week")]
        timeframe: String,
    },
    /// Show the recurring-theme summary of recent conversations
    Summary {
        /// User ID
        #[arg(short, long)]
        user: i64,
        /// Trailing window in days
        #[arg(short, long)]
        days: Option<u32>,
    },
    /// Show recent conversation history
    History {
        /// User ID
        #[arg(short, long)]
        user: i64,
        /// Number of turns to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Delete all conversation history for a user
    ClearHistory {
        /// User ID
        #[arg(short, long)]
        user: i64,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,solace_companion=info",
        1 => "info,solace_companion=debug",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .init();

    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> anyhow::Result<()> {
    let config = Config::load()?;
    std::fs::create_dir_all(&config.data_dir)?;
    let pool = db::init(config.db_path())?;

    match command {
        Command::Chat {
            user,
            channel,
            message,
        } => chat(&config, &pool, user, channel, &message).await,
        Command::CheckIn {
            user,
            mood,
            intensity,
            activity,
        } => {
            let mood = Mood::parse(&mood)
                .ok_or_else(|| anyhow::anyhow!("unknown mood label: {mood}"))?;
            if let Some(i) = intensity {
                anyhow::ensure!((1..=5).contains(&i), "intensity must be 1-5");
            }
            UserRepo::new(pool.clone()).find_or_create(user)?;
            let checkin =
                CheckInRepo::new(pool).add(user, mood, intensity, activity.as_deref())?;
            println!(
                "Logged {} (intensity {})",
                checkin.mood,
                checkin.effective_intensity()
            );
            Ok(())
        }
        Command::Analyze { user, timeframe } => {
            let timeframe = Timeframe::parse(&timeframe)
                .ok_or_else(|| anyhow::anyhow!("unknown timeframe: {timeframe}"))?;
            print_analysis(analyze(user, timeframe, &CheckInRepo::new(pool))?);
            Ok(())
        }
        Command::Summary { user, days } => {
            let summarizer = Summarizer::new(config.summary.clone());
            let summary = summarizer.summarize(
                user,
                days.unwrap_or(config.summary_days),
                &HistoryRepo::new(pool),
            )?;
            if summary.is_empty() {
                println!("Not enough recent conversation to summarize yet.");
            } else {
                println!("{summary}");
            }
            Ok(())
        }
        Command::History { user, limit } => {
            let turns = HistoryRepo::new(pool).recent(user, limit)?;
            if turns.is_empty() {
                println!("No conversation history.");
            }
            for turn in turns {
                println!(
                    "[{}] {:?}: {}",
                    turn.created_at.format("%Y-%m-%d %H:%M"),
                    turn.kind,
                    turn.content
                );
            }
            Ok(())
        }
        Command::ClearHistory { user } => {
            let deleted = HistoryRepo::new(pool).clear(user)?;
            println!("Deleted {deleted} turns.");
            Ok(())
        }
    }
}

/// One chat turn: record, assemble context, call the AI, record the reply
async fn chat(
    config: &Config,
    pool: &db::DbPool,
    user: i64,
    channel: Option<String>,
    message: &str,
) -> anyhow::Result<()> {
    UserRepo::new(pool.clone()).find_or_create(user)?;
    let history = HistoryRepo::new(pool.clone());

    // Window covers prior history only; the inbound message travels as the
    // prompt, so it must not also appear as the window's last item
    let builder = ContextBuilder::new(config.context.clone());
    let request = ContextRequest::new(user, channel, &config.context);
    let mut context = builder.build(&request, &history)?;

    history.append(user, message, TurnKind::UserMessage)?;

    // Long-horizon memory: prepend the thematic digest when one exists
    let summarizer = Summarizer::new(config.summary.clone());
    let summary = summarizer.summarize(user, config.summary_days, &history)?;
    if !summary.is_empty() {
        context.insert(
            0,
            ContextMessage {
                role: "system".to_string(),
                content: summary,
            },
        );
    }

    let reply = match config.ai.api_key.clone() {
        Some(key) => {
            let client = CompanionClient::new(
                config.ai.base_url.clone(),
                key,
                config.ai.model.clone(),
                config.ai.timeout,
            )?;
            match client.chat(&context, message).await {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!(error = %e, "AI service failed, using fallback reply");
                    FALLBACK_REPLY.to_string()
                }
            }
        }
        None => {
            tracing::warn!("no AI key configured, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
    };

    history.append(user, &reply, TurnKind::AiResponse)?;
    println!("{reply}");
    Ok(())
}

fn print_analysis(analysis: MoodAnalysis) {
    match analysis {
        MoodAnalysis::NoData => {
            println!("No check-ins recorded for this timeframe yet.");
        }
        MoodAnalysis::Report(report) => {
            println!(
                "Mood report ({}, {} check-ins)",
                report.timeframe, report.total
            );
            for stat in &report.distribution {
                println!(
                    "  {:<11} {:>3} ({:>3}%)  avg intensity {:.1}",
                    stat.mood, stat.count, stat.percentage, stat.average_intensity
                );
            }
            println!();
            for insight in &report.insights {
                println!("- {insight}");
            }
        }
    }
}

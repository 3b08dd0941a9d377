use std::path::PathBuf;
use clap::{Parser, Subcommand};
use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use oqu::{AppConfig, ContentService, Subject, TopicCatalog};

#[derive(Parser)]
#[command(name = "oqu")]
#[command(about = "Personalized lessons and quizzes with a local content cache", long_about = None)]
struct Cli {
    /// Cache directory (overrides OQU_CACHE_DIR)
    #[arg(long, global = true)]
    cache_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a lesson and print it as JSON
    Lesson {
        /// Topic ID (see `oqu topics`)
        topic_id: String,

        /// Learner interests, e.g. -i Football -i AI (none is a valid set)
        #[arg(short, long = "interest")]
        interests: Vec<String>,
    },

    /// Fetch a quiz and print it as JSON
    Quiz {
        /// Topic ID (see `oqu topics`)
        topic_id: String,

        /// Learner interests, e.g. -i Football -i AI (none is a valid set)
        #[arg(short, long = "interest")]
        interests: Vec<String>,

        /// Number of questions to request (overrides OQU_QUIZ_QUESTIONS)
        #[arg(short = 'n', long)]
        questions: Option<usize>,
    },

    /// List available topics
    Topics,

    /// Show cached topics per content kind
    Cache,

    /// Remove all cached lessons and quizzes
    ClearCache,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "oqu=info,oqu_cache=info".into())
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::from_env().context("Failed to load configuration")?;
    if let Some(dir) = &cli.cache_dir {
        config = config.with_cache_dir(dir);
    }

    match cli.command {
        Commands::Lesson { ref topic_id, ref interests } => {
            let service = ContentService::from_config(&config)?;
            let lesson = service.fetch_lesson(topic_id, interests).await?;
            println!("{}", serde_json::to_string_pretty(&lesson)?);
        }

        Commands::Quiz { ref topic_id, ref interests, questions } => {
            if let Some(n) = questions {
                config.quiz_questions = n;
            }
            let service = ContentService::from_config(&config)?;
            let quiz = service.fetch_quiz(topic_id, interests).await?;
            println!("{}", serde_json::to_string_pretty(&quiz)?);
        }

        Commands::Topics => {
            let service = ContentService::from_config(&config)?;
            let topics = service.catalog().all_topics();
            if topics.is_empty() {
                println!("No topics found.");
            } else {
                println!("Topics:");
                for topic in topics {
                    let subject = match &topic.subject {
                        Subject::Math { grade } => format!("Math, grade {}", grade),
                        Subject::English { level } => format!("English, {}", level),
                        other => other.label().to_string(),
                    };
                    println!("  {:<28} {} ({})", topic.id, topic.title, subject);
                }
            }
        }

        Commands::Cache => {
            let service = ContentService::from_config(&config)?;
            println!("Cache directory: {}", config.cache_dir.display());
            println!(
                "Limits: {} entries per kind, {} day(s) max age",
                config.store.max_entries,
                config.store.max_age.as_secs() / 86_400
            );

            let lessons = service.lesson_store().topics();
            let quizzes = service.quiz_store().topics();
            println!("\nLessons ({}):", lessons.len());
            for topic in lessons {
                println!("  - {}", topic);
            }
            println!("\nQuizzes ({}):", quizzes.len());
            for topic in quizzes {
                println!("  - {}", topic);
            }
        }

        Commands::ClearCache => {
            let service = ContentService::from_config(&config)?;
            service.clear_content_cache();
            println!("Content cache cleared at {}", config.cache_dir.display());
        }
    }

    Ok(())
}

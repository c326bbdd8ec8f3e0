//! docqa - ask questions about your documents from the command line.
//!
//! # Usage
//!
//! ```bash
//! # Rank segments without calling a model
//! docqa search -f report.docx -f notes.md "quarterly revenue"
//!
//! # Grounded answer with citations (needs GROQ_API_KEY)
//! docqa ask -f handbook.md "How many vacation days do I get?"
//!
//! # Study material
//! docqa study -f chapter1.txt quiz --count 5
//!
//! # Spoken overview (needs GOOGLE_API_KEY as well)
//! docqa study -f chapter1.txt audio-script --audio-out overview.mp3
//! ```

mod output;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use docqa_assistant::{
    AssistantConfig, DEFAULT_FLASHCARDS, DEFAULT_QUIZ_QUESTIONS, DocumentAssistant, StudyTool,
};
use docqa_llm::{ChatProvider, GoogleTtsProvider, OpenAiCompatProvider, SpeechProvider};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::output::StudyOutput;

/// Document question answering over local files.
///
/// Files are split into overlapping segments, ranked against your query
/// with Jaccard + TF-IDF similarity, and the best segments are handed to a
/// language model as context.
#[derive(Parser)]
#[command(name = "docqa", version, about)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Rank document segments against a query (no model call)
    Search {
        #[command(flatten)]
        documents: Documents,

        /// Search query
        query: String,

        /// Maximum number of results (default: configured top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Answer a question from the documents, with citations
    Ask {
        #[command(flatten)]
        documents: Documents,

        /// Question to answer
        question: String,

        /// Number of segments given to the model (default: configured top_k)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output the answer as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show document and segment counts
    Stats {
        #[command(flatten)]
        documents: Documents,

        /// Output statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate study material: summary, key_insights, mind_map, quiz,
    /// flashcards, table_of_contents or audio_script
    Study {
        #[command(flatten)]
        documents: Documents,

        /// Study tool to run
        tool: StudyTool,

        /// Number of quiz questions or flashcards
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Speak the audio script and write the audio to this file
        #[arg(long, value_name = "PATH")]
        audio_out: Option<PathBuf>,

        /// Output the result as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct Documents {
    /// Document to load (.txt, .md, .docx); repeat for several
    #[arg(short = 'f', long = "file", required = true)]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AssistantConfig::load_from(path)?,
        None => AssistantConfig::default(),
    };
    let provider = OpenAiCompatProvider::from_config(&config.llm)?;
    let api_key_env = config.llm.api_key_env.clone();
    let assistant = DocumentAssistant::new(config, provider)?;

    let output = match cli.command {
        Command::Search {
            documents,
            query,
            top_k,
            json,
        } => {
            load(&assistant, &documents).await?;
            let top_k = top_k.unwrap_or(assistant.config().retrieval.top_k);
            let results = assistant.session().retrieve(&query, top_k).await?;
            if json {
                output::format_search_json(&query, &results)
            } else {
                output::format_search_human(&query, &results)
            }
        }
        Command::Ask {
            documents,
            question,
            top_k,
            json,
        } => {
            require_provider(&assistant, &api_key_env)?;
            load(&assistant, &documents).await?;
            let top_k = top_k.unwrap_or(assistant.config().retrieval.top_k);
            let answer = assistant.ask_with_top_k(&question, top_k).await?;
            if json {
                output::format_json(&answer)
            } else {
                output::format_answer_human(&answer)
            }
        }
        Command::Stats { documents, json } => {
            load(&assistant, &documents).await?;
            let stats = assistant.stats().await;
            if json {
                output::format_json(&stats)
            } else {
                output::format_stats_human(&stats)
            }
        }
        Command::Study {
            documents,
            tool,
            count,
            audio_out,
            json,
        } => {
            require_provider(&assistant, &api_key_env)?;
            let result = match audio_out {
                Some(path) => {
                    if tool != StudyTool::AudioScript {
                        bail!("--audio-out only applies to the audio_script tool");
                    }
                    let speech = GoogleTtsProvider::from_config(&assistant.config().speech)?;
                    if !speech.is_available() {
                        bail!(
                            "No API key found. Set {} to synthesize audio.",
                            assistant.config().speech.api_key_env
                        );
                    }
                    load(&assistant, &documents).await?;
                    let overview = assistant.audio_overview(&speech).await?;
                    std::fs::write(&path, &overview.audio)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Wrote {} bytes of audio to {}", overview.audio.len(), path.display());
                    StudyOutput::Text(overview.script)
                }
                None => {
                    load(&assistant, &documents).await?;
                    run_study_tool(&assistant, tool, count).await?
                }
            };
            if json {
                output::format_json(&result)
            } else {
                output::format_study_human(&result)
            }
        }
    };

    println!("{output}");
    Ok(())
}

async fn load<P: ChatProvider>(
    assistant: &DocumentAssistant<P>,
    documents: &Documents,
) -> Result<()> {
    for path in &documents.files {
        let added = assistant
            .add_file(path)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        info!(
            "Loaded {} ({}): {} segments",
            added.name, added.metadata, added.segments
        );
    }
    Ok(())
}

fn require_provider<P: ChatProvider>(
    assistant: &DocumentAssistant<P>,
    api_key_env: &str,
) -> Result<()> {
    if !assistant.provider().is_available() {
        bail!("No API key found. Set {api_key_env} to use the language model.");
    }
    Ok(())
}

async fn run_study_tool<P: ChatProvider>(
    assistant: &DocumentAssistant<P>,
    tool: StudyTool,
    count: Option<usize>,
) -> Result<StudyOutput> {
    let output = match tool {
        StudyTool::Summary => StudyOutput::Text(assistant.summary().await?),
        StudyTool::KeyInsights => StudyOutput::List(assistant.key_insights().await?),
        StudyTool::MindMap => StudyOutput::Text(assistant.mind_map().await?),
        StudyTool::Quiz => StudyOutput::Quiz(
            assistant
                .quiz(count.unwrap_or(DEFAULT_QUIZ_QUESTIONS))
                .await?,
        ),
        StudyTool::Flashcards => StudyOutput::Flashcards(
            assistant
                .flashcards(count.unwrap_or(DEFAULT_FLASHCARDS))
                .await?,
        ),
        StudyTool::TableOfContents => StudyOutput::List(assistant.table_of_contents().await?),
        StudyTool::AudioScript => StudyOutput::Text(assistant.audio_script().await?),
    };
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::try_parse_from([
            "docqa", "-v", "search", "-f", "a.txt", "--file", "b.md", "revenue", "-k", "5",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Command::Search {
                documents,
                query,
                top_k,
                json,
            } => {
                assert_eq!(
                    documents.files,
                    vec![PathBuf::from("a.txt"), PathBuf::from("b.md")]
                );
                assert_eq!(query, "revenue");
                assert_eq!(top_k, Some(5));
                assert!(!json);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_parse_study_tool() {
        let cli = Cli::try_parse_from([
            "docqa", "study", "-f", "a.txt", "mind-map", "--config", "docqa.toml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("docqa.toml")));
        match cli.command {
            Command::Study {
                tool,
                count,
                audio_out,
                ..
            } => {
                assert_eq!(tool, StudyTool::MindMap);
                assert_eq!(count, None);
                assert_eq!(audio_out, None);
            }
            _ => panic!("expected study"),
        }

        assert!(Cli::try_parse_from(["docqa", "study", "-f", "a.txt", "podcast"]).is_err());
    }

    #[test]
    fn test_parse_audio_out() {
        let cli = Cli::try_parse_from([
            "docqa",
            "study",
            "-f",
            "a.txt",
            "audio-script",
            "--audio-out",
            "overview.mp3",
        ])
        .unwrap();
        match cli.command {
            Command::Study { tool, audio_out, .. } => {
                assert_eq!(tool, StudyTool::AudioScript);
                assert_eq!(audio_out, Some(PathBuf::from("overview.mp3")));
            }
            _ => panic!("expected study"),
        }
    }

    #[test]
    fn test_files_are_required() {
        assert!(Cli::try_parse_from(["docqa", "ask", "why?"]).is_err());
    }
}

//! Main ask loop orchestration.
//!
//! Coordinates the session lifecycle: index build/reload, welcome
//! banner, input loop with streamed answers, slash commands, and the
//! per-question error handling that keeps the loop alive when a single
//! answer fails.

use std::io::Write;
use std::time::Instant;

use console::style;
use futures_util::StreamExt;
use tracing::info;

use docent_types::error::AskError;
use docent_types::llm::StreamEvent;
use docent_types::retrieval::ScoredChunk;

use crate::state::{AppState, ConcreteAnswerEngine, ConcreteRetriever};

use super::banner::print_welcome_banner;
use super::commands::{self, AskCommand};
use super::input::{AskInput, InputEvent};
use super::renderer::AnswerRenderer;

fn thinking_spinner(message: &str) -> indicatif::ProgressBar {
    let spinner = indicatif::ProgressBar::new_spinner();
    spinner.set_style(
        indicatif::ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Answer a single question non-interactively (`docent ask "..."`).
pub async fn ask_once(state: &AppState, question: &str) -> anyhow::Result<()> {
    let spinner = thinking_spinner("preparing index...");
    let opened = state.open_retriever(false, |_, _| {}).await;
    spinner.finish_and_clear();
    let (retriever, _summary) = opened?;

    let engine = state.answer_engine();
    let renderer = AnswerRenderer::new();

    let spinner = thinking_spinner("thinking...");
    let result = answer_complete(&retriever, &engine, question).await;
    spinner.finish_and_clear();

    let (answer, sources) = result?;
    println!("{}", renderer.render_final(&answer).trim_end());
    print_sources(&sources);
    Ok(())
}

/// Run the interactive ask loop.
pub async fn run_ask_loop(state: &AppState) -> anyhow::Result<()> {
    let spinner = thinking_spinner("preparing index...");
    let opened = state.open_retriever(false, |_, _| {}).await;
    spinner.finish_and_clear();

    // Index failures here are fatal (the empty-corpus-and-no-index case
    // included); per-question failures below are not.
    let (retriever, summary) = opened?;
    let engine = state.answer_engine();

    print_welcome_banner(
        &state.config.corpus.source,
        &state.config.ollama.chat_model,
        &state.config.ollama.embed_model,
        summary.chunk_count,
        summary.reloaded,
    );

    let renderer = AnswerRenderer::new();
    let mut last_sources: Vec<ScoredChunk> = Vec::new();

    let prompt = format!("  {} ", style("You >").green().bold());
    let (mut ask_input, _writer) = AskInput::new(prompt)
        .map_err(|e| anyhow::anyhow!("failed to initialize input: {e}"))?;

    loop {
        match ask_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!(
                    "\n  {}",
                    style("Press Ctrl+D or type 'exit' to leave.").dim()
                );
                continue;
            }
            InputEvent::Line(text) => {
                if text.is_empty() {
                    continue;
                }

                if commands::is_exit_keyword(&text) {
                    println!("\n  {}", style("Session ended.").dim());
                    break;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        AskCommand::Help => commands::print_help(),
                        AskCommand::Clear => ask_input.clear(),
                        AskCommand::Sources => print_sources(&last_sources),
                        AskCommand::Exit => {
                            println!("\n  {}", style("Session ended.").dim());
                            break;
                        }
                        AskCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                // A failed answer never ends the session
                match answer_streamed(&retriever, &engine, &renderer, &text, state).await {
                    Ok(sources) => last_sources = sources,
                    Err(e) => {
                        eprintln!("\n  {} {e}", style("!").red().bold());
                        eprintln!(
                            "  {}",
                            style(format!(
                                "Check that Ollama is running at {} with model '{}' pulled.",
                                state.config.ollama.base_url, state.config.ollama.chat_model
                            ))
                            .dim()
                        );
                        continue;
                    }
                }
            }
        }
    }

    Ok(())
}

/// Retrieve context and stream the answer to the terminal.
///
/// Returns the retrieved chunks for the `/sources` command.
async fn answer_streamed(
    retriever: &ConcreteRetriever,
    engine: &ConcreteAnswerEngine,
    renderer: &AnswerRenderer,
    question: &str,
    state: &AppState,
) -> Result<Vec<ScoredChunk>, AskError> {
    let spinner = thinking_spinner("retrieving...");
    let retrieved = retriever.retrieve(question).await;
    let sources = match retrieved {
        Ok(sources) => sources,
        Err(e) => {
            spinner.finish_and_clear();
            return Err(e.into());
        }
    };
    info!(passages = sources.len(), "context retrieved");

    spinner.set_message("thinking...");
    let start_time = Instant::now();
    let mut stream = engine.answer_stream(question, &sources);

    let mut output_tokens: u32 = 0;
    let mut first_token_received = false;

    while let Some(event_result) = stream.next().await {
        match event_result {
            Ok(StreamEvent::TextDelta { text }) => {
                if !first_token_received {
                    spinner.finish_and_clear();
                    first_token_received = true;
                    print!("\n  {} ", style("docent >").cyan().bold());
                    let _ = std::io::stdout().flush();
                }
                renderer.print_streaming_token(&text);
            }
            Ok(StreamEvent::Usage(usage)) => {
                output_tokens = usage.output_tokens;
            }
            Ok(StreamEvent::Done) => break,
            Ok(_) => {}
            Err(e) => {
                spinner.finish_and_clear();
                if first_token_received {
                    println!();
                }
                return Err(e.into());
            }
        }
    }

    if !first_token_received {
        spinner.finish_and_clear();
    }

    let response_ms = start_time.elapsed().as_millis() as u64;
    println!();
    renderer.print_stats_footer(
        output_tokens,
        sources.len(),
        response_ms,
        &state.config.ollama.chat_model,
    );
    println!();

    Ok(sources)
}

/// Retrieve context and answer in one non-streaming call.
async fn answer_complete(
    retriever: &ConcreteRetriever,
    engine: &ConcreteAnswerEngine,
    question: &str,
) -> Result<(String, Vec<ScoredChunk>), AskError> {
    let sources = retriever.retrieve(question).await?;
    let response = engine.answer(question, &sources).await?;
    Ok((response.content, sources))
}

/// Print the passages behind the previous answer.
fn print_sources(sources: &[ScoredChunk]) {
    if sources.is_empty() {
        println!("\n  {}\n", style("No passages retrieved yet.").dim());
        return;
    }

    println!();
    println!("  {}", style("Passages behind the last answer:").bold());
    println!();
    for (i, scored) in sources.iter().enumerate() {
        let preview: String = scored.chunk.text.chars().take(100).collect();
        let preview = preview.replace('\n', " ");
        println!(
            "  {} {} {}",
            style(format!("[{}]", i + 1)).cyan(),
            style(format!("score {:.3}", scored.score)).dim(),
            style(&scored.chunk.source).dim()
        );
        println!("      {preview}...");
    }
    println!();
}

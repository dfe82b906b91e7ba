//! Forced index rebuild (`docent index`).

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::state::AppState;

/// Drop the persisted index and rebuild it from the corpus source.
pub async fn rebuild_index(state: &AppState) -> anyhow::Result<()> {
    println!();
    println!(
        "  {} Rebuilding index from {}",
        style("*").cyan().bold(),
        style(&state.config.corpus.source).cyan()
    );

    let bar = ProgressBar::new(0);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("  {bar:30.cyan/blue} {pos}/{len} chunks embedded")
            .unwrap(),
    );

    let (retriever, summary) = state
        .open_retriever(true, |done, total| {
            bar.set_length(total as u64);
            bar.set_position(done as u64);
        })
        .await?;
    bar.finish_and_clear();

    if summary.reloaded {
        println!(
            "  {} Corpus produced no chunks; kept the existing index ({} chunks)",
            style("!").yellow().bold(),
            summary.chunk_count
        );
    } else {
        println!(
            "  {} Indexed {} chunks with {}",
            style("\u{2713}").green(),
            retriever.chunk_count(),
            style(&state.config.ollama.embed_model).dim()
        );
    }
    println!();
    Ok(())
}

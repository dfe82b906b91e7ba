//! Status dashboard (`docent status`).

use console::style;
use docent_core::index::ChunkStore;

use crate::state::AppState;

/// Show configuration and index status.
pub async fn status(state: &AppState, json: bool) -> anyhow::Result<()> {
    let store = state.open_store().await?;
    let index_present = store.table_exists().await;
    let chunk_count = store.count().await?;

    if json {
        let value = serde_json::json!({
            "config_origin": state.config_origin,
            "corpus_source": state.config.corpus.source,
            "chat_model": state.config.ollama.chat_model,
            "embed_model": state.config.ollama.embed_model,
            "base_url": state.config.ollama.base_url,
            "index_dir": state.config.index.dir.display().to_string(),
            "index_present": index_present,
            "chunk_count": chunk_count,
            "top_k": state.config.retrieval.top_k,
            "semantic_weight": state.config.retrieval.semantic_weight,
            "keyword_weight": state.config.retrieval.keyword_weight,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    let check_mark = |ok: bool| {
        if ok {
            format!("{}", style("\u{2713}").green())
        } else {
            format!("{}", style("\u{2717}").red())
        }
    };

    println!();
    println!("  {}", style("docent status").cyan().bold());
    println!();
    println!(
        "  {}  {}",
        style("Config:").bold(),
        style(&state.config_origin).dim()
    );
    println!(
        "  {}  {}",
        style("Corpus:").bold(),
        style(&state.config.corpus.source).dim()
    );
    println!(
        "  {}  {} {} {}",
        style("Models:").bold(),
        style(&state.config.ollama.chat_model).dim(),
        style("\u{00b7}").dim(),
        style(&state.config.ollama.embed_model).dim()
    );
    println!(
        "  {}  {}",
        style("Server:").bold(),
        style(&state.config.ollama.base_url).dim()
    );
    println!();
    println!(
        "  {} index at {}",
        check_mark(index_present),
        style(state.config.index.dir.display()).dim()
    );
    if index_present {
        println!("  {} {} chunks indexed", check_mark(chunk_count > 0), chunk_count);
    } else {
        println!(
            "  {}",
            style("Run 'docent index' or 'docent ask' to build it.").dim()
        );
    }
    println!();
    println!(
        "  {} top {} chunks, weights {:.1} semantic / {:.1} keyword",
        style("Retrieval:").bold(),
        state.config.retrieval.top_k,
        state.config.retrieval.semantic_weight,
        state.config.retrieval.keyword_weight
    );
    println!();
    Ok(())
}

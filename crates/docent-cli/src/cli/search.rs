//! Retrieval debugging view (`docent search`).
//!
//! Runs hybrid retrieval for a query and shows the ranked chunks with
//! their fused and per-retriever scores, without calling the chat model.

use comfy_table::{Cell, ContentArrangement, Table, presets::UTF8_FULL_CONDENSED};
use console::style;

use crate::state::AppState;

/// Retrieve for `query` and print the ranked chunks.
pub async fn search(
    state: &AppState,
    query: &str,
    top_k: usize,
    json: bool,
) -> anyhow::Result<()> {
    let mut retrieval = state.config.retrieval.clone();
    retrieval.top_k = top_k;

    let (retriever, _summary) = state
        .open_retriever_with(false, retrieval, |_, _| {})
        .await?;

    let results = retriever.retrieve(query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("\n  {}\n", style("No chunks matched the query.").dim());
        return Ok(());
    }

    let fmt_component = |component: Option<f32>| {
        component.map_or("-".to_string(), |score| format!("{score:.3}"))
    };

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "score", "semantic", "keyword", "source", "text"]);

    for (i, scored) in results.iter().enumerate() {
        let preview: String = scored.chunk.text.chars().take(80).collect();
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(format!("{:.3}", scored.score)),
            Cell::new(fmt_component(scored.semantic_score)),
            Cell::new(fmt_component(scored.keyword_score)),
            Cell::new(&scored.chunk.source),
            Cell::new(preview.replace('\n', " ")),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

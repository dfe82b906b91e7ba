//! Welcome banner for ask sessions.
//!
//! Prints a styled banner when the session starts, showing the corpus
//! source, the models in play, and how the index was obtained.

use console::style;

/// Print the welcome banner at the start of an ask session.
pub fn print_welcome_banner(
    source: &str,
    chat_model: &str,
    embed_model: &str,
    chunk_count: usize,
    reloaded: bool,
) {
    let index_note = if reloaded {
        format!("{chunk_count} chunks (reloaded from disk)")
    } else {
        format!("{chunk_count} chunks (freshly indexed)")
    };

    println!();
    println!("  {}", style("docent").cyan().bold());
    println!(
        "  {}",
        style("Answers come from the indexed corpus only.").dim()
    );
    println!();
    println!("  {}  {}", style("Corpus:").bold(), style(source).dim());
    println!(
        "  {}   {}",
        style("Index:").bold(),
        style(&index_note).dim()
    );
    println!(
        "  {}  {} {} {}",
        style("Models:").bold(),
        style(chat_model).dim(),
        style("\u{00b7}").dim(),
        style(embed_model).dim()
    );
    println!();
    println!(
        "  {}",
        style("Type /help for commands; 'exit', 'quit' or Ctrl+D to leave").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}

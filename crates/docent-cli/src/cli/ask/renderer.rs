//! Terminal markdown rendering with syntax-highlighted code blocks.
//!
//! `AnswerRenderer` combines `termimad` for prose and `syntect` for code
//! block syntax highlighting. During streaming, tokens are printed raw;
//! the full response is re-rendered as formatted markdown only when it
//! contains block structure worth the reflow.

use std::io::Write;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::as_24_bit_terminal_escaped;
use termimad::MadSkin;

/// Terminal markdown renderer with syntax highlighting.
pub struct AnswerRenderer {
    skin: MadSkin,
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl AnswerRenderer {
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.inline_code
            .set_fg(termimad::crossterm::style::Color::Yellow);

        Self {
            skin,
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Render a complete markdown response with syntax-highlighted code
    /// blocks.
    ///
    /// Code fences with a language tag are highlighted via syntect;
    /// everything else is rendered through termimad.
    pub fn render_final(&self, markdown: &str) -> String {
        let mut output = String::new();
        let mut in_code_block = false;
        let mut code_lang = String::new();
        let mut code_buf = String::new();

        for line in markdown.lines() {
            if line.starts_with("```") && !in_code_block {
                in_code_block = true;
                code_lang = line.trim_start_matches('`').trim().to_string();
                code_buf.clear();
            } else if line.starts_with("```") && in_code_block {
                in_code_block = false;
                let highlighted = self.highlight_code(&code_buf, &code_lang);
                output.push_str(&highlighted);
                output.push('\n');
            } else if in_code_block {
                code_buf.push_str(line);
                code_buf.push('\n');
            } else {
                let rendered = self.skin.term_text(line);
                output.push_str(&format!("{rendered}"));
            }
        }

        // Handle unclosed code block
        if in_code_block && !code_buf.is_empty() {
            let highlighted = self.highlight_code(&code_buf, &code_lang);
            output.push_str(&highlighted);
        }

        output
    }

    /// Print a single streaming token (raw, no formatting).
    pub fn print_streaming_token(&self, token: &str) {
        print!("{token}");
        let _ = std::io::stdout().flush();
    }

    /// Print the stats footer after an answer.
    pub fn print_stats_footer(
        &self,
        tokens: u32,
        retrieved: usize,
        response_ms: u64,
        model: &str,
    ) {
        let seconds = response_ms as f64 / 1000.0;
        let footer = format!(
            "\n  {} {} tokens {} {} passages {} {:.1}s {} {}",
            console::style("|").dim(),
            console::style(tokens).dim(),
            console::style("\u{00b7}").dim(),
            console::style(retrieved).dim(),
            console::style("\u{00b7}").dim(),
            console::style(seconds).dim(),
            console::style("\u{00b7}").dim(),
            console::style(model).dim(),
        );
        println!("{footer}");
    }

    /// Highlight a code block using syntect.
    fn highlight_code(&self, code: &str, lang: &str) -> String {
        let syntax = if lang.is_empty() {
            self.syntax_set.find_syntax_plain_text()
        } else {
            self.syntax_set
                .find_syntax_by_token(lang)
                .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
        };

        let theme = &self.theme_set.themes["base16-ocean.dark"];
        let mut h = HighlightLines::new(syntax, theme);

        let mut output = String::new();
        output.push_str(&format!(
            "  {}\n",
            console::style(format!("--- {lang} ---")).dim()
        ));

        for line in code.lines() {
            let ranges: Vec<(Style, &str)> =
                h.highlight_line(line, &self.syntax_set).unwrap_or_default();
            let escaped = as_24_bit_terminal_escaped(&ranges[..], false);
            output.push_str(&format!("  {escaped}\x1b[0m\n"));
        }

        output
    }
}

impl Default for AnswerRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_plain_prose() {
        let renderer = AnswerRenderer::new();
        let out = renderer.render_final("The team is from Monterrey.");
        assert!(out.contains("Monterrey"));
    }

    #[test]
    fn test_render_code_block_keeps_content() {
        let renderer = AnswerRenderer::new();
        let out = renderer.render_final("Before\n```rust\nlet x = 1;\n```\nAfter");
        assert!(out.contains("rust"));
        // The code line survives highlighting (possibly with escapes in between)
        assert!(out.contains('x'));
    }

    #[test]
    fn test_render_unclosed_code_block() {
        let renderer = AnswerRenderer::new();
        let out = renderer.render_final("```python\nprint('hi')");
        assert!(out.contains("python"));
    }
}

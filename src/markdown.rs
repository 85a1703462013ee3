//! Rendering for the small markdown subset articles are written in.
//!
//! Each line is classified on its own, with no state carried between lines:
//! `### `, `## ` and `# ` headings, `* ` list items, blank spacers, and
//! paragraphs. Only paragraphs get inline `**bold**` / `*italic*` handling.

use std::fmt::Write;

/// One display block produced from one input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    /// `level` is 1, 2 or 3
    Heading { level: u8, text: String },
    ListItem(String),
    /// Paragraph text with inline emphasis already substituted
    Paragraph(String),
    Spacer,
}

/// Opening and closing markers used for inline emphasis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InlineMarkup {
    pub bold: (&'static str, &'static str),
    pub italic: (&'static str, &'static str),
    /// Escape `&`, `<`, `>` and `"` in paragraph text before substitution
    pub escape_html: bool,
}

impl InlineMarkup {
    pub const HTML: InlineMarkup = InlineMarkup {
        bold: ("<strong>", "</strong>"),
        italic: ("<em>", "</em>"),
        escape_html: true,
    };

    pub const ANSI: InlineMarkup = InlineMarkup {
        bold: ("\x1b[1m", "\x1b[22m"),
        italic: ("\x1b[3m", "\x1b[23m"),
        escape_html: false,
    };

    /// Strips the emphasis markers and keeps the text
    pub const PLAIN: InlineMarkup = InlineMarkup {
        bold: ("", ""),
        italic: ("", ""),
        escape_html: false,
    };
}

impl Default for InlineMarkup {
    fn default() -> Self {
        Self::HTML
    }
}

/// Line-oriented renderer for article bodies.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownRenderer {
    markup: InlineMarkup,
}

impl MarkdownRenderer {
    pub fn new(markup: InlineMarkup) -> Self {
        Self { markup }
    }

    /// Renderer emitting `<strong>` / `<em>` with HTML escaping
    pub fn html() -> Self {
        Self::new(InlineMarkup::HTML)
    }

    /// Renderer emitting terminal escape codes
    pub fn ansi() -> Self {
        Self::new(InlineMarkup::ANSI)
    }

    pub fn plain() -> Self {
        Self::new(InlineMarkup::PLAIN)
    }

    /// Converts `input` into one block per line. Never fails.
    pub fn render(&self, input: &str) -> Vec<RenderedBlock> {
        input.lines().map(|line| self.render_line(line)).collect()
    }

    /// First matching rule wins.
    fn render_line(&self, line: &str) -> RenderedBlock {
        if let Some(text) = line.strip_prefix("### ") {
            return heading(3, text);
        }
        if let Some(text) = line.strip_prefix("## ") {
            return heading(2, text);
        }
        if let Some(text) = line.strip_prefix("# ") {
            return heading(1, text);
        }
        if let Some(text) = line.strip_prefix("* ") {
            return RenderedBlock::ListItem(text.to_string());
        }
        if line.trim().is_empty() {
            return RenderedBlock::Spacer;
        }

        RenderedBlock::Paragraph(self.render_inline(line))
    }

    /// Bold spans are substituted before italic spans so `**x**` is never
    /// read as two empty italics around `x`.
    pub fn render_inline(&self, line: &str) -> String {
        let text = if self.markup.escape_html {
            escape_html(line)
        } else {
            line.to_string()
        };

        let text = replace_delimited(&text, "**", self.markup.bold);
        replace_delimited(&text, "*", self.markup.italic)
    }
}

fn heading(level: u8, text: &str) -> RenderedBlock {
    RenderedBlock::Heading {
        level,
        text: text.to_string(),
    }
}

/// Replaces every `<delim>X<delim>` span, shortest match first, scanning left
/// to right without overlap. An opener with no closer ends the scan and the
/// rest of the text is kept as is. `X` may be empty.
fn replace_delimited(text: &str, delim: &str, (open, close): (&str, &str)) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(delim) {
        let after_open = &rest[start + delim.len()..];
        let Some(len) = after_open.find(delim) else {
            break;
        };

        out.push_str(&rest[..start]);
        out.push_str(open);
        out.push_str(&after_open[..len]);
        out.push_str(close);
        rest = &after_open[len + delim.len()..];
    }

    out.push_str(rest);
    out
}

/// Minimal HTML escaping for text nodes and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Serializes blocks rendered with [`InlineMarkup::HTML`] into an HTML fragment.
///
/// List items are emitted as bare `<li>` elements, one per block.
pub fn to_html(blocks: &[RenderedBlock]) -> String {
    let mut html = String::from("<div class=\"article-body\">\n");

    for block in blocks {
        // writing into a String cannot fail
        let _ = match block {
            RenderedBlock::Heading { level, text } => {
                writeln!(html, "<h{0}>{1}</h{0}>", level, escape_html(text))
            }
            RenderedBlock::ListItem(text) => writeln!(html, "<li>{}</li>", escape_html(text)),
            RenderedBlock::Paragraph(text) => writeln!(html, "<p>{}</p>", text),
            RenderedBlock::Spacer => writeln!(html, "<br>"),
        };
    }

    html.push_str("</div>");
    html
}

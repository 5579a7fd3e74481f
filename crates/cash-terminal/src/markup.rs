//! Text-to-markup rendering.
//!
//! [`render`] runs a fixed sequence of passes over a raw payload:
//!
//! 1. headings: a run of word/space characters ending in `:` (not a URL
//!    scheme, not inside a URL, not an escaped `\:`)
//! 2. command references: bracketed alias lists such as `[help,h]`
//! 3. links: `https://...`
//! 4. line breaks, plus one trailing break
//!
//! and wraps the result in a single container span. Colors come from the
//! palette, which is read from the environment at render time.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::style::{Palette, Style};

/// Explicit line-break marker.
pub const LINE_BREAK: &str = "<br>";

/// Two-character escape typed for a newline.
pub const ESCAPED_NEWLINE: &str = "\\n";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\w ]+:").expect("heading pattern"));
static COMMAND_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\[\]]+\]").expect("command pattern"));
static LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"https://[^\s<]+").expect("link pattern"));
static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("tag pattern"));

/// Render `text` to markup.
///
/// `command_refs` maps the literal bracketed alias text of every command
/// (`[help,h]`) to its display form (`[help, h]`).
pub fn render(text: &str, palette: &Palette, command_refs: &HashMap<String, String>) -> String {
    let escaped = escape(text).replace(ESCAPED_NEWLINE, "\n");
    let text = headings(&escaped, palette);
    let text = command_references(&text, palette, command_refs);
    let text = links(&text, palette);
    let text = line_breaks(&text);
    format!("<span style=\"word-break: normal; hyphens: none\">{text}</span>")
}

/// Escape the characters that would otherwise be read as markup.
pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Reduce markup to the text a reader would see.
pub fn plain_text(markup: &str) -> String {
    let text = markup.replace(LINE_BREAK, "\n");
    TAG.replace_all(&text, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn headings(text: &str, palette: &Palette) -> String {
    let urls: Vec<Range<usize>> = LINK.find_iter(text).map(|m| m.range()).collect();
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for m in HEADING.find_iter(text) {
        // A match may begin in the tail of a link; the heading starts after it.
        let mut start = m.start();
        for u in &urls {
            if u.start < m.end() && start < u.end {
                start = u.end;
            }
        }
        if start >= m.end() {
            continue;
        }
        let heading = text[start..m.end()].trim_start();
        let run = heading.trim_end_matches(':');
        if run.trim().is_empty() || run.ends_with("http") || run.ends_with("https") {
            continue;
        }
        out.push_str(&text[last..m.end() - heading.len()]);
        out.push_str(&palette.span(Style::Heading, heading));
        last = m.end();
    }
    out.push_str(&text[last..]);
    // An escaped colon never ends a heading; show it as a plain colon.
    out.replace("\\:", ":")
}

fn command_references(
    text: &str,
    palette: &Palette,
    command_refs: &HashMap<String, String>,
) -> String {
    let urls: Vec<Range<usize>> = LINK.find_iter(text).map(|m| m.range()).collect();
    COMMAND_REF
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let found = caps.get(0).map_or(0..0, |m| m.range());
            let in_link = urls.iter().any(|u| u.start < found.end && found.start < u.end);
            match command_refs.get(&caps[0]) {
                Some(pretty) if !in_link => palette.span(Style::Command, pretty),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

fn links(text: &str, palette: &Palette) -> String {
    LINK.replace_all(text, |caps: &regex::Captures<'_>| {
        palette.span(Style::Link, &caps[0])
    })
    .into_owned()
}

fn line_breaks(text: &str) -> String {
    let mut out = text.replace('\n', LINE_BREAK).replace(ESCAPED_NEWLINE, LINE_BREAK);
    out.push_str(LINE_BREAK);
    out
}

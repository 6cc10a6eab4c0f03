//! Article parsing.
//!
//! Splits a Markdown article source into the pieces a page is built from:
//!
//! ```text
//! # Title                      <- title (required)
//!
//! First paragraph.             <- intro; its first paragraph is the description
//!
//! ## Section                   <- body starts at the first level-2 heading
//! ### Subsection                  (level-2/3 headings form the TOC)
//! ```
//!
//! Parsing is pure: relative link targets are joined onto the given document
//! directory, but nothing is read from storage.

use std::collections::HashMap;

use pulldown_cmark::{CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd, html};
use serde::Serialize;

/// Maximum description length in characters.
const DESCRIPTION_MAX_CHARS: usize = 200;

/// Error returned when an article source does not follow the convention.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Source contains nothing but whitespace.
    #[error("article source is empty")]
    Empty,
    /// No non-empty level-1 heading.
    #[error("article has no title heading")]
    MissingTitle,
}

/// Table of contents entry with nested subsections.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (2 or 3).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor id of the heading in the body.
    pub anchor: String,
    /// Level-3 entries under a level-2 entry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TocEntry>,
}

/// A parsed article.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Article {
    /// Article identifier.
    pub id: String,
    /// Title from the level-1 heading.
    pub title: String,
    /// Plain-text summary for meta tags.
    pub description: String,
    /// HTML between the title and the first section.
    pub intro: String,
    /// Sections of the body.
    pub toc: Vec<TocEntry>,
    /// HTML from the first section on.
    pub body: String,
}

impl Article {
    /// Parse an article source.
    ///
    /// # Arguments
    ///
    /// * `id` - Article identifier
    /// * `source` - Raw Markdown source
    /// * `doc_dir` - URL directory relative links are resolved against
    pub fn parse(id: &str, source: &str, doc_dir: &str) -> Result<Self, ParseError> {
        if source.trim().is_empty() {
            return Err(ParseError::Empty);
        }

        let events: Vec<Event<'_>> = Parser::new_ext(source, markdown_options()).collect();

        let (title_start, title_end) = find_heading(&events, HeadingLevel::H1, 0)
            .ok_or(ParseError::MissingTitle)?;
        let title = collapse_whitespace(&plain_text(&events[title_start + 1..title_end]));
        if title.is_empty() {
            return Err(ParseError::MissingTitle);
        }

        let mut rest: Vec<Event<'_>> = events[title_end + 1..]
            .iter()
            .cloned()
            .map(|event| resolve_links(event, doc_dir))
            .collect();

        let toc = assign_anchors(&mut rest);

        let split = find_heading(&rest, HeadingLevel::H2, 0).map_or(rest.len(), |(start, _)| start);
        let body_events = rest.split_off(split);
        let intro_events = rest;

        let description = first_paragraph(&intro_events)
            .map(|text| truncate_chars(&collapse_whitespace(&text), DESCRIPTION_MAX_CHARS))
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| title.clone());

        Ok(Self {
            id: id.to_owned(),
            title,
            description,
            intro: render_html(intro_events),
            toc,
            body: render_html(body_events),
        })
    }
}

fn markdown_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
}

/// Find the first heading of `level` at or after `from`.
///
/// Returns indices of its start and end events.
fn find_heading(events: &[Event<'_>], level: HeadingLevel, from: usize) -> Option<(usize, usize)> {
    let start = events[from..].iter().position(
        |e| matches!(e, Event::Start(Tag::Heading { level: l, .. }) if *l == level),
    )? + from;
    let end = events[start..]
        .iter()
        .position(|e| matches!(e, Event::End(TagEnd::Heading(l)) if *l == level))?
        + start;
    Some((start, end))
}

/// Concatenate the text content of events.
fn plain_text(events: &[Event<'_>]) -> String {
    let mut text = String::new();
    for event in events {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            _ => {}
        }
    }
    text
}

/// Text of the first paragraph, if any.
fn first_paragraph(events: &[Event<'_>]) -> Option<String> {
    let start = events
        .iter()
        .position(|e| matches!(e, Event::Start(Tag::Paragraph)))?;
    let end = events[start..]
        .iter()
        .position(|e| matches!(e, Event::End(TagEnd::Paragraph)))?
        + start;
    Some(plain_text(&events[start + 1..end]))
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].trim_end().to_owned(),
        None => text.to_owned(),
    }
}

/// Give every level-2/3 heading a unique anchor id and collect the TOC.
fn assign_anchors(events: &mut [Event<'_>]) -> Vec<TocEntry> {
    let mut toc: Vec<TocEntry> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    let mut i = 0;
    while i < events.len() {
        let level = match &events[i] {
            Event::Start(Tag::Heading { level, .. })
                if matches!(level, HeadingLevel::H2 | HeadingLevel::H3) =>
            {
                *level
            }
            _ => {
                i += 1;
                continue;
            }
        };

        let end = events[i..]
            .iter()
            .position(|e| matches!(e, Event::End(TagEnd::Heading(_))))
            .map_or(events.len(), |offset| i + offset);
        let title = collapse_whitespace(&plain_text(&events[i + 1..end]));
        let anchor = unique_anchor(&slugify(&title), &mut seen);

        if let Event::Start(Tag::Heading { id, .. }) = &mut events[i] {
            *id = Some(CowStr::from(anchor.clone()));
        }

        let entry = TocEntry {
            level: if level == HeadingLevel::H2 { 2 } else { 3 },
            title,
            anchor,
            children: Vec::new(),
        };
        match (level, toc.last_mut()) {
            (HeadingLevel::H3, Some(parent)) => parent.children.push(entry),
            _ => toc.push(entry),
        }

        i = end + 1;
    }

    toc
}

/// `seen` maps every issued anchor to the last suffix tried for it.
fn unique_anchor(slug: &str, seen: &mut HashMap<String, usize>) -> String {
    let base = if slug.is_empty() { "section" } else { slug };
    let anchor = match seen.get(base).copied() {
        None => base.to_owned(),
        Some(mut suffix) => loop {
            suffix += 1;
            let candidate = format!("{base}-{suffix}");
            if !seen.contains_key(&candidate) {
                seen.insert(base.to_owned(), suffix);
                break candidate;
            }
        },
    };
    seen.insert(anchor.clone(), 0);
    anchor
}

/// Convert heading text to a URL-safe anchor.
fn slugify(text: &str) -> String {
    let mut result = String::new();
    let mut last_was_dash = true; // Prevents leading dash

    for c in text.trim().chars() {
        if c.is_alphanumeric() {
            result.extend(c.to_lowercase());
            last_was_dash = false;
        } else if !last_was_dash && (c.is_whitespace() || c == '-' || c == '_') {
            result.push('-');
            last_was_dash = true;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Join relative link and image targets onto `doc_dir`.
fn resolve_links<'a>(event: Event<'a>, doc_dir: &str) -> Event<'a> {
    match event {
        Event::Start(Tag::Link {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Link {
            link_type,
            dest_url: resolve_url(dest_url, doc_dir),
            title,
            id,
        }),
        Event::Start(Tag::Image {
            link_type,
            dest_url,
            title,
            id,
        }) => Event::Start(Tag::Image {
            link_type,
            dest_url: resolve_url(dest_url, doc_dir),
            title,
            id,
        }),
        other => other,
    }
}

fn resolve_url<'a>(dest: CowStr<'a>, doc_dir: &str) -> CowStr<'a> {
    let doc_dir = doc_dir.trim_end_matches('/');
    if doc_dir.is_empty() || !is_relative_url(&dest) {
        return dest;
    }
    CowStr::from(format!("{doc_dir}/{}", dest.trim_start_matches("./")))
}

fn is_relative_url(url: &str) -> bool {
    if url.is_empty() || url.starts_with('/') || url.starts_with('#') {
        return false;
    }
    // Anything with a scheme (http:, mailto:, ...) before the first path separator
    match url.find(':') {
        Some(colon) => url.find('/').is_some_and(|slash| slash < colon),
        None => true,
    }
}

fn render_html(events: Vec<Event<'_>>) -> String {
    let mut out = String::new();
    html::push_html(&mut out, events.into_iter());
    out
}

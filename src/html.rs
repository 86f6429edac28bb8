//! HTML translator: status content → markup blocks.
//!
//! Mastodon serves status content as a constrained HTML subset. This module
//! parses that subset — and only that subset — into [`Markup`] blocks ready
//! for the compositor. Anything outside the supported vocabulary degrades to
//! its inline text content; translation never fails on bad input.
//!
//! Anchors are flattened into their label with the href appended behind a
//! private control-character separator. A later stage (see
//! [`crate::render`]) calls [`recover_link`] on link-tagged runs to rebuild
//! live hyperlink widgets; content can never forge the separator because the
//! sanitizer strips control characters from incoming text.

use std::sync::OnceLock;

use regex_lite::Regex;
use scraper::{ElementRef, Html, Node};
use unicode_normalization::UnicodeNormalization;

use crate::embed::Embedded;
use crate::error::Result;
use crate::markup::Markup;
use crate::style::StyleTag;
use crate::text;
use crate::widget::{BoxedWidget, Columns, Pile, Spacer};

/// Separator between an anchor's label and href in flattened link runs.
pub const LINK_SEPARATOR: char = '\u{1}';

/// Tags that own vertical space at the top level.
const BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "li",
    "blockquote",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "pre",
    "ul",
    "ol",
];

/// A translated top-level block.
#[derive(Debug)]
pub enum Block {
    /// Flowing markup text.
    Text(Markup),
    /// A tight vertical stack (list items).
    List(Vec<Block>),
    /// Marker column beside nested block content (list items that contain
    /// blocks of their own).
    TwoColumn {
        /// The item marker, e.g. `"12. "`.
        marker: Markup,
        /// Columns reserved for the marker.
        marker_cols: usize,
        /// The item's own blocks.
        content: Vec<Block>,
    },
}

/// Split a flattened link run back into `(label, url)`.
#[must_use]
pub fn recover_link(run: &str) -> Option<(&str, &str)> {
    run.split_once(LINK_SEPARATOR)
}

/// Translate HTML into markup blocks.
///
/// Input is NFKC-normalized first. If the first meaningful top-level node is
/// plain text or an unsupported tag, the whole input is re-wrapped once in a
/// synthetic paragraph and re-parsed; text that arrived through that recovery
/// gets bare `http(s)` URLs tagged as links.
#[must_use]
pub fn translate_blocks(html: &str) -> Vec<Block> {
    let normalized: String = html.nfkc().collect();
    let document = Html::parse_fragment(&normalized);

    if starts_with_block(&document) {
        collect_blocks(&document, false)
    } else {
        tracing::debug!("re-wrapping malformed top-level content in a paragraph");
        let rewrapped = Html::parse_fragment(&format!("<p>{normalized}</p>"));
        collect_blocks(&rewrapped, true)
    }
}

/// Translate HTML into widgets: one per block, single blank spacers between.
pub fn translate(html: &str) -> Result<Vec<BoxedWidget>> {
    translate_with(html, &mut |markup| Ok(markup))
}

/// Like [`translate`], applying `map` to every block's markup first.
///
/// The composition facade uses the hook to swap flattened link runs for live
/// hyperlink widgets before the markup reaches the compositor.
pub fn translate_with(
    html: &str,
    map: &mut dyn FnMut(Markup) -> Result<Markup>,
) -> Result<Vec<BoxedWidget>> {
    let blocks = translate_blocks(html);
    let mut widgets: Vec<BoxedWidget> = Vec::new();
    for block in blocks {
        if !widgets.is_empty() {
            widgets.push(Box::new(Spacer::new(1)));
        }
        widgets.push(realize(block, map)?);
    }
    Ok(widgets)
}

/// Turn one block into a widget.
fn realize(block: Block, map: &mut dyn FnMut(Markup) -> Result<Markup>) -> Result<BoxedWidget> {
    Ok(match block {
        Block::Text(markup) => Box::new(Embedded::new(map(markup)?)?),
        Block::List(items) => {
            let children = items
                .into_iter()
                .map(|item| realize(item, map))
                .collect::<Result<Vec<_>>>()?;
            Box::new(Pile::new(children))
        }
        Block::TwoColumn {
            marker,
            marker_cols,
            content,
        } => {
            let marker = Box::new(Embedded::new(map(marker)?)?);
            let children = content
                .into_iter()
                .map(|item| realize(item, map))
                .collect::<Result<Vec<_>>>()?;
            Box::new(Columns::new(marker_cols, marker, Box::new(Pile::new(children))))
        }
    })
}

/// True when the first meaningful top-level node is a supported block tag.
fn starts_with_block(document: &Html) -> bool {
    for child in document.root_element().children() {
        match child.value() {
            Node::Text(t) => {
                if !t.trim().is_empty() {
                    return false;
                }
            }
            Node::Element(el) => return BLOCK_TAGS.contains(&el.name()),
            _ => {}
        }
    }
    // Nothing meaningful at all; no recovery needed.
    true
}

/// Walk the root's children into blocks.
fn collect_blocks(document: &Html, linkify: bool) -> Vec<Block> {
    let mut blocks = Vec::new();
    for child in document.root_element().children() {
        match child.value() {
            Node::Text(t) => {
                // Stray top-level text after the first block: a paragraph.
                let trimmed = t.trim();
                if !trimmed.is_empty() {
                    blocks.push(Block::Text(Markup::group(inline_text(trimmed, linkify))));
                }
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child)
                    && let Some(block) = element_block(el, linkify)
                {
                    blocks.push(block);
                }
            }
            _ => {}
        }
    }
    blocks
}

/// Translate one element into a block; the default arm degrades unsupported
/// tags to their inline content.
fn element_block(el: ElementRef<'_>, linkify: bool) -> Option<Block> {
    let markup = match el.value().name() {
        // Headings render as plain paragraphs.
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            Markup::group(inline_children(el, linkify))
        }
        "blockquote" => Markup::styled(StyleTag::Blockquote, quoted_markup(el, linkify)),
        "pre" => {
            let raw: String = el.text().collect();
            Markup::styled(StyleTag::Pre, Markup::text(sanitize_pre(&raw)))
        }
        "ul" => return list_block(el, false, linkify),
        "ol" => return list_block(el, true, linkify),
        "li" => {
            // An orphan item outside a list still gets its bullet.
            return Some(list_item(el, "• ", linkify));
        }
        _ => Markup::group(inline_children(el, linkify)),
    };
    if markup.is_empty() {
        None
    } else {
        Some(Block::Text(markup))
    }
}

/// `<blockquote>` content: nested paragraphs joined by hard breaks.
fn quoted_markup(el: ElementRef<'_>, linkify: bool) -> Markup {
    let mut parts: Vec<Markup> = Vec::new();
    for child in el.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if matches!(child_el.value().name(), "p" | "div" | "blockquote") {
                if !parts.is_empty() {
                    parts.push(Markup::text("\n"));
                }
                parts.extend(inline_children(child_el, linkify));
                continue;
            }
            inline_node(child, &mut parts, linkify);
        } else {
            inline_node(child, &mut parts, linkify);
        }
    }
    Markup::group(parts)
}

/// `<ul>`/`<ol>`: a tight stack of items with a running counter.
fn list_block(el: ElementRef<'_>, ordered: bool, linkify: bool) -> Option<Block> {
    let items: Vec<ElementRef<'_>> = el
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|c| c.value().name() == "li")
        .collect();
    if items.is_empty() {
        return None;
    }

    let reversed = ordered && el.value().attr("reversed").is_some();
    let start: i64 = el
        .value()
        .attr("start")
        .and_then(|s| s.parse().ok())
        .unwrap_or(if reversed { items.len() as i64 } else { 1 });

    // Marker strings first, so they can share one aligned width.
    let markers: Vec<String> = if ordered {
        let mut counter = start;
        items
            .iter()
            .map(|item| {
                if let Some(value) = item.value().attr("value").and_then(|s| s.parse().ok()) {
                    counter = value;
                }
                let marker = format!("{counter}. ");
                counter += if reversed { -1 } else { 1 };
                marker
            })
            .collect()
    } else {
        items.iter().map(|_| "• ".to_string()).collect()
    };
    let marker_cols = markers
        .iter()
        .map(|m| text::display_width(m))
        .max()
        .unwrap_or(0);

    let blocks = items
        .iter()
        .zip(&markers)
        .map(|(item, marker)| {
            let aligned = format!("{marker:>marker_cols$}");
            list_item(*item, &aligned, linkify)
        })
        .collect();

    Some(Block::List(blocks))
}

/// One `<li>`: a single markup line, or a (marker, content) two-column
/// layout when the item contains nested block content.
fn list_item(el: ElementRef<'_>, marker: &str, linkify: bool) -> Block {
    let has_nested_blocks = el
        .children()
        .filter_map(ElementRef::wrap)
        .any(|c| BLOCK_TAGS.contains(&c.value().name()));

    if has_nested_blocks {
        let mut content = Vec::new();
        let mut leading: Vec<Markup> = Vec::new();
        let mut flush_leading = |leading: &mut Vec<Markup>, content: &mut Vec<Block>| {
            let markup = Markup::group(std::mem::take(leading));
            if !markup.plain_text().trim().is_empty() {
                content.push(Block::Text(markup));
            }
        };
        for child in el.children() {
            if let Some(child_el) = ElementRef::wrap(child)
                && BLOCK_TAGS.contains(&child_el.value().name())
            {
                flush_leading(&mut leading, &mut content);
                if let Some(block) = element_block(child_el, linkify) {
                    content.push(block);
                }
            } else {
                inline_node(child, &mut leading, linkify);
            }
        }
        flush_leading(&mut leading, &mut content);
        Block::TwoColumn {
            marker: Markup::text(marker),
            marker_cols: text::display_width(marker),
            content,
        }
    } else {
        let mut parts = vec![Markup::text(marker)];
        parts.extend(inline_children(el, linkify));
        Block::Text(Markup::group(parts))
    }
}

/// Inline markup of all of `el`'s children.
fn inline_children(el: ElementRef<'_>, linkify: bool) -> Vec<Markup> {
    let mut out = Vec::new();
    for child in el.children() {
        inline_node(child, &mut out, linkify);
    }
    out
}

/// Inline markup of one node; unsupported elements fall back to their
/// children.
fn inline_node(
    node: ego_tree::NodeRef<'_, Node>,
    out: &mut Vec<Markup>,
    linkify: bool,
) {
    match node.value() {
        Node::Text(t) => out.extend(inline_text(t, linkify)),
        Node::Element(_) => {
            let Some(el) = ElementRef::wrap(node) else {
                return;
            };
            match el.value().name() {
                "br" => out.push(Markup::text("\n")),
                "b" | "strong" => {
                    out.push(Markup::styled(
                        StyleTag::Bold,
                        Markup::group(inline_children(el, linkify)),
                    ));
                }
                "i" | "em" => {
                    out.push(Markup::styled(
                        StyleTag::Italic,
                        Markup::group(inline_children(el, linkify)),
                    ));
                }
                "span" => {
                    let children = Markup::group(inline_children(el, linkify));
                    match resolve_class(el, "span") {
                        Some(tag) => out.push(Markup::styled(tag, children)),
                        None => out.push(children),
                    }
                }
                "a" => out.push(anchor_markup(el, linkify)),
                _ => {
                    for child in el.children() {
                        inline_node(child, out, linkify);
                    }
                }
            }
        }
        _ => {}
    }
}

/// Flatten an anchor to `label SEPARATOR href` under its resolved style.
fn anchor_markup(el: ElementRef<'_>, linkify: bool) -> Markup {
    let label = sanitize_inline(&el.text().collect::<String>());
    let label = label.trim().to_string();
    let tag = resolve_class(el, "a").unwrap_or(StyleTag::Link);

    match el.value().attr("href") {
        Some(href) if !href.is_empty() && !label.is_empty() => Markup::styled(
            tag,
            Markup::text(format!("{label}{LINK_SEPARATOR}{href}")),
        ),
        _ => {
            if label.is_empty() {
                // No usable label; fall back to the children as-is.
                Markup::group(inline_children(el, linkify))
            } else {
                Markup::styled(tag, Markup::text(label))
            }
        }
    }
}

/// Map a `class` attribute to a style, falling back to the tag's own name.
fn resolve_class(el: ElementRef<'_>, tag_name: &str) -> Option<StyleTag> {
    if let Some(classes) = el.value().attr("class") {
        for class in classes.split_whitespace() {
            if let Some(tag) = StyleTag::from_name(class) {
                return Some(tag);
            }
        }
    }
    StyleTag::from_name(tag_name)
}

/// Text-node markup; on the recovery path, bare URLs become link runs.
fn inline_text(raw: &str, linkify: bool) -> Vec<Markup> {
    let cleaned = sanitize_inline(raw);
    if cleaned.is_empty() {
        return Vec::new();
    }
    if !linkify {
        return vec![Markup::text(cleaned)];
    }

    static URL: OnceLock<Option<Regex>> = OnceLock::new();
    let Some(url) = URL.get_or_init(|| Regex::new(r"https?://\S+").ok()) else {
        return vec![Markup::text(cleaned)];
    };

    let mut out = Vec::new();
    let mut last = 0;
    for found in url.find_iter(&cleaned) {
        if found.start() > last {
            out.push(Markup::text(&cleaned[last..found.start()]));
        }
        let target = found.as_str();
        out.push(Markup::styled(
            StyleTag::Link,
            Markup::text(format!("{target}{LINK_SEPARATOR}{target}")),
        ));
        last = found.end();
    }
    if last < cleaned.len() {
        out.push(Markup::text(&cleaned[last..]));
    }
    out
}

/// Collapse HTML whitespace and strip control characters (the separator
/// among them, so content cannot forge flattened links).
fn sanitize_inline(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_whitespace = false;
    for ch in raw.chars() {
        if ch == '\n' || ch == '\r' || ch == '\t' || ch == ' ' {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else if !ch.is_control() {
            out.push(ch);
            in_whitespace = false;
        }
    }
    out
}

/// Pre-formatted text keeps newlines; tabs become spaces, other control
/// characters are stripped.
fn sanitize_pre(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\n' => out.push('\n'),
            '\t' => out.push_str("    "),
            '\r' => {}
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    // A fragment like "<pre>code\n</pre>" should not grow a trailing blank
    // row.
    while out.ends_with('\n') {
        out.pop();
    }
    out
}

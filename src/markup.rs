//! The markup model: a tagged tree of styled text runs and embedded widgets.
//!
//! Markup is immutable once built. Trees come out of the HTML translator (or
//! are assembled directly by application code) and go into the text-embedding
//! compositor, which flattens them into styled runs and placeholder slots.

use std::fmt;

use crate::style::StyleTag;
use crate::widget::BoxedWidget;

/// One node of a markup tree.
pub enum Markup {
    /// A plain text run.
    Text(String),
    /// A styled subtree.
    Styled(StyleTag, Box<Markup>),
    /// A sequence of nodes.
    Group(Vec<Markup>),
    /// An embedded widget reserving exactly `width` cells in the text flow.
    Embed {
        /// Declared width in columns; must be positive.
        width: usize,
        /// The widget to inline; must be box-sized.
        widget: BoxedWidget,
    },
}

impl Markup {
    /// A text node.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// A styled subtree.
    #[must_use]
    pub fn styled(tag: StyleTag, child: Self) -> Self {
        Self::Styled(tag, Box::new(child))
    }

    /// A node sequence.
    #[must_use]
    pub fn group(children: Vec<Self>) -> Self {
        Self::Group(children)
    }

    /// An embedded widget node of the declared width.
    #[must_use]
    pub fn embed(width: usize, widget: BoxedWidget) -> Self {
        Self::Embed { width, widget }
    }

    /// True when the node renders no visible content.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Styled(_, child) => child.is_empty(),
            Self::Group(children) => children.iter().all(Self::is_empty),
            Self::Embed { .. } => false,
        }
    }

    /// The concatenated text content, embedded widgets skipped.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_plain(&mut out);
        out
    }

    fn collect_plain(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Styled(_, child) => child.collect_plain(out),
            Self::Group(children) => {
                for child in children {
                    child.collect_plain(out);
                }
            }
            Self::Embed { .. } => {}
        }
    }
}

impl From<&str> for Markup {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Markup {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<Markup>> for Markup {
    fn from(children: Vec<Markup>) -> Self {
        Self::Group(children)
    }
}

impl fmt::Debug for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Styled(tag, child) => f.debug_tuple("Styled").field(tag).field(child).finish(),
            Self::Group(children) => f.debug_tuple("Group").field(children).finish(),
            Self::Embed { width, .. } => f
                .debug_struct("Embed")
                .field("width", width)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_walks_the_tree() {
        let markup = Markup::group(vec![
            Markup::text("a "),
            Markup::styled(StyleTag::Bold, Markup::text("b")),
            Markup::group(vec![Markup::text(" c")]),
        ]);
        assert_eq!(markup.plain_text(), "a b c");
    }

    #[test]
    fn test_is_empty() {
        assert!(Markup::text("").is_empty());
        assert!(Markup::group(vec![]).is_empty());
        assert!(Markup::styled(StyleTag::Bold, Markup::text("")).is_empty());
        assert!(!Markup::text("x").is_empty());
    }
}

//! The style vocabulary carried by rendered text.
//!
//! Attributes are opaque tags: nothing in the layout engine looks inside
//! them, they only ride along on canvas runs until the theme layer resolves
//! them to concrete colors. The vocabulary is fixed; unknown class names fall
//! back to the enclosing tag's own name, and names that still don't resolve
//! render unstyled.

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

/// A named style from the fixed vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleTag {
    /// Bold text (`<b>`, `<strong>`).
    Bold,
    /// Italic text (`<i>`, `<em>`).
    Italic,
    /// Bold nested in italic (or vice versa), collapsed to one tag.
    BoldItalic,
    /// Anchor text.
    Link,
    /// `#hashtag` anchors.
    Hashtag,
    /// `@mention` anchors.
    Mention,
    /// Quoted block content.
    Blockquote,
    /// Pre-formatted block content.
    Pre,
    /// Status visibility: public.
    VisibilityPublic,
    /// Status visibility: unlisted.
    VisibilityUnlisted,
    /// Status visibility: followers-only.
    VisibilityPrivate,
    /// Status visibility: direct message.
    VisibilityDirect,
}

impl StyleTag {
    /// Resolve a class or tag name to a style, `None` if unrecognized.
    ///
    /// Tag-name aliases (`b`, `em`, `a`, ...) are part of the lookup so that
    /// an unrecognized class can fall back to the element's own name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "bold" | "b" | "strong" => Some(Self::Bold),
            "italic" | "i" | "em" => Some(Self::Italic),
            "bold-italic" => Some(Self::BoldItalic),
            "link" | "a" => Some(Self::Link),
            "hashtag" => Some(Self::Hashtag),
            "mention" => Some(Self::Mention),
            "blockquote" => Some(Self::Blockquote),
            "pre" | "code" => Some(Self::Pre),
            "visibility-public" | "public" => Some(Self::VisibilityPublic),
            "visibility-unlisted" | "unlisted" => Some(Self::VisibilityUnlisted),
            "visibility-private" | "private" => Some(Self::VisibilityPrivate),
            "visibility-direct" | "direct" => Some(Self::VisibilityDirect),
            _ => None,
        }
    }

    /// Combine a nested style with its surrounding one.
    ///
    /// Bold inside italic (either order) collapses to [`StyleTag::BoldItalic`]
    /// rather than nesting; any other combination keeps the inner tag.
    #[must_use]
    pub fn combine(outer: Self, inner: Self) -> Self {
        match (outer, inner) {
            (Self::Bold | Self::BoldItalic, Self::Italic)
            | (Self::Italic | Self::BoldItalic, Self::Bold) => Self::BoldItalic,
            _ => inner,
        }
    }

    /// The canonical kebab-case name for the tag.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bold => "bold",
            Self::Italic => "italic",
            Self::BoldItalic => "bold-italic",
            Self::Link => "link",
            Self::Hashtag => "hashtag",
            Self::Mention => "mention",
            Self::Blockquote => "blockquote",
            Self::Pre => "pre",
            Self::VisibilityPublic => "visibility-public",
            Self::VisibilityUnlisted => "visibility-unlisted",
            Self::VisibilityPrivate => "visibility-private",
            Self::VisibilityDirect => "visibility-direct",
        }
    }
}

/// The attribute attached to a canvas run.
///
/// Used only for styling, never for layout decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attr {
    /// A vocabulary style, resolved through the theme.
    Named(StyleTag),
    /// A direct color pair, emitted by the image adapters.
    Cell {
        /// Foreground color.
        fg: Color,
        /// Background color.
        bg: Color,
    },
}

impl From<StyleTag> for Attr {
    fn from(tag: StyleTag) -> Self {
        Self::Named(tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_vocabulary() {
        assert_eq!(StyleTag::from_name("bold"), Some(StyleTag::Bold));
        assert_eq!(StyleTag::from_name("hashtag"), Some(StyleTag::Hashtag));
        assert_eq!(
            StyleTag::from_name("visibility-direct"),
            Some(StyleTag::VisibilityDirect)
        );
        assert_eq!(StyleTag::from_name("marquee"), None);
    }

    #[test]
    fn test_tag_name_aliases() {
        assert_eq!(StyleTag::from_name("strong"), Some(StyleTag::Bold));
        assert_eq!(StyleTag::from_name("em"), Some(StyleTag::Italic));
        assert_eq!(StyleTag::from_name("a"), Some(StyleTag::Link));
    }

    #[test]
    fn test_bold_italic_collapse() {
        assert_eq!(
            StyleTag::combine(StyleTag::Bold, StyleTag::Italic),
            StyleTag::BoldItalic
        );
        assert_eq!(
            StyleTag::combine(StyleTag::Italic, StyleTag::Bold),
            StyleTag::BoldItalic
        );
        // Unrelated nesting keeps the inner tag.
        assert_eq!(
            StyleTag::combine(StyleTag::Blockquote, StyleTag::Link),
            StyleTag::Link
        );
    }
}

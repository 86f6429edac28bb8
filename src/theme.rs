//! Theme configuration and attribute resolution.
//!
//! The engine never decides colors; canvas runs carry opaque [`StyleTag`]
//! attributes and this layer resolves them to concrete [`Style`] values.
//! Palettes come from the `ratatui-themes` crate.

use ratatui::style::{Color, Modifier, Style};
use ratatui_themes::{ThemeName, ThemePalette};
use serde::{Deserialize, Serialize};

use crate::style::{Attr, StyleTag};

/// Theme wrapper around `ThemeName` from ratatui-themes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Theme(pub ThemeName);

impl Theme {
    /// Get all available theme names.
    #[must_use]
    pub const fn all() -> &'static [ThemeName] {
        ThemeName::all()
    }

    /// Get the next theme in rotation
    #[must_use]
    pub fn next(&self) -> Self {
        Self(self.0.next())
    }

    /// Get the previous theme in rotation
    #[must_use]
    pub fn prev(&self) -> Self {
        Self(self.0.prev())
    }

    /// Get the display name for the theme.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0.display_name()
    }

    /// Get the kebab-case slug for config files
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        self.0.slug()
    }

    /// Get the color mapping for this theme
    #[must_use]
    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_palette(self.0.palette())
    }

    /// Get the raw color palette for this theme.
    #[must_use]
    pub const fn palette(&self) -> ThemePalette {
        self.0.palette()
    }
}

impl From<ThemeName> for Theme {
    fn from(name: ThemeName) -> Self {
        Self(name)
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Resolved colors for the rendering vocabulary.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    /// Primary foreground/text color
    pub fg: Color,
    /// Primary background color
    pub bg: Color,
    /// Muted text color
    pub muted: Color,
    /// Link color
    pub link: Color,
    /// Hashtag color
    pub hashtag: Color,
    /// Mention color
    pub mention: Color,
    /// Blockquote color
    pub blockquote: Color,
    /// Pre-formatted block color
    pub pre: Color,
    /// Visibility badge color: public
    pub visibility_public: Color,
    /// Visibility badge color: unlisted
    pub visibility_unlisted: Color,
    /// Visibility badge color: followers-only
    pub visibility_private: Color,
    /// Visibility badge color: direct
    pub visibility_direct: Color,
}

impl ThemeColors {
    /// Create `ThemeColors` from a `ThemePalette`
    #[must_use]
    pub const fn from_palette(p: ThemePalette) -> Self {
        Self {
            fg: p.fg,
            bg: p.bg,
            muted: p.muted,
            link: p.info,
            hashtag: p.accent,
            mention: p.secondary,
            blockquote: p.muted,
            pre: p.warning,
            visibility_public: p.success,
            visibility_unlisted: p.info,
            visibility_private: p.warning,
            visibility_direct: p.error,
        }
    }

    /// Resolve a vocabulary tag to a concrete style.
    #[must_use]
    pub fn style_for(&self, tag: StyleTag) -> Style {
        match tag {
            StyleTag::Bold => Style::default().add_modifier(Modifier::BOLD),
            StyleTag::Italic => Style::default().add_modifier(Modifier::ITALIC),
            StyleTag::BoldItalic => Style::default()
                .add_modifier(Modifier::BOLD)
                .add_modifier(Modifier::ITALIC),
            StyleTag::Link => Style::default()
                .fg(self.link)
                .add_modifier(Modifier::UNDERLINED),
            StyleTag::Hashtag => Style::default().fg(self.hashtag),
            StyleTag::Mention => Style::default().fg(self.mention),
            StyleTag::Blockquote => Style::default()
                .fg(self.blockquote)
                .add_modifier(Modifier::ITALIC),
            StyleTag::Pre => Style::default().fg(self.pre),
            StyleTag::VisibilityPublic => Style::default().fg(self.visibility_public),
            StyleTag::VisibilityUnlisted => Style::default().fg(self.visibility_unlisted),
            StyleTag::VisibilityPrivate => Style::default().fg(self.visibility_private),
            StyleTag::VisibilityDirect => Style::default().fg(self.visibility_direct),
        }
    }

    /// Resolve a canvas run attribute.
    #[must_use]
    pub fn style_for_attr(&self, attr: Option<Attr>) -> Style {
        match attr {
            None => Style::default(),
            Some(Attr::Named(tag)) => self.style_for(tag),
            Some(Attr::Cell { fg, bg }) => Style::default().fg(fg).bg(bg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_tag_resolves() {
        let colors = Theme::default().colors();
        for tag in [
            StyleTag::Bold,
            StyleTag::Italic,
            StyleTag::BoldItalic,
            StyleTag::Link,
            StyleTag::Hashtag,
            StyleTag::Mention,
            StyleTag::Blockquote,
            StyleTag::Pre,
            StyleTag::VisibilityPublic,
            StyleTag::VisibilityUnlisted,
            StyleTag::VisibilityPrivate,
            StyleTag::VisibilityDirect,
        ] {
            let _ = colors.style_for(tag);
        }
        assert_eq!(colors.style_for(StyleTag::Link).fg, Some(colors.link));
    }

    #[test]
    fn test_cell_attr_maps_directly() {
        let colors = Theme::default().colors();
        let style = colors.style_for_attr(Some(Attr::Cell {
            fg: Color::Rgb(1, 2, 3),
            bg: Color::Rgb(4, 5, 6),
        }));
        assert_eq!(style.fg, Some(Color::Rgb(1, 2, 3)));
        assert_eq!(style.bg, Some(Color::Rgb(4, 5, 6)));
    }
}

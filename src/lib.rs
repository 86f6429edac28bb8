//! # Tern 🐦
//!
//! A rich-text terminal rendering engine for Mastodon clients.
//!
//! ## Overview
//!
//! Tern turns the constrained HTML subset served by Mastodon — plus
//! application markup, hyperlinks and images — into laid-out, styled
//! terminal output. Text wraps by true display width, and arbitrary
//! renderable widgets can be embedded inline in flowing text, spanning
//! wrapped rows when layout demands it.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       StatusRenderer                         │
//! │   domain record → header + content + poll + media widgets    │
//! └──────────────────────────────────────────────────────────────┘
//!                │                                │
//!                ▼                                ▼
//! ┌─────────────────────────┐      ┌─────────────────────────────┐
//! │     HTML Translator     │      │       Image Adapters        │
//! │                         │      │                             │
//! │ • Fixed tag vocabulary  │      │ • Half-block ▀ fallback     │
//! │ • Anchors → link runs   │      │ • Sixel / kitty / iTerm2    │
//! │ • One-shot recovery     │      │ • Cache + async loader      │
//! └─────────────────────────┘      └─────────────────────────────┘
//!                │                                │
//!                ▼                                ▼
//! ┌─────────────────────────┐      ┌─────────────────────────────┐
//! │        Markup           │─────▶│    Embedding Compositor     │
//! │                         │      │                             │
//! │ • Styled text runs      │      │ • Width-aware wrapping      │
//! │ • Embedded widgets      │      │ • Placeholder tail carry    │
//! └─────────────────────────┘      └─────────────────────────────┘
//!                                                 │
//!                                                 ▼
//!                                  ┌─────────────────────────────┐
//!                                  │           Canvas            │
//!                                  │                             │
//!                                  │ • Styled cell runs          │
//!                                  │ • trim / join / combine     │
//!                                  │ • ratatui / ANSI sinks      │
//!                                  └─────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`text`] — display-width lookup and wrap/truncate/pad/fit primitives
//! - [`style`] — the fixed attribute vocabulary
//! - [`markup`] — tagged tree of styled runs and embedded widgets
//! - [`html`] — HTML subset → markup blocks
//! - [`canvas`] — styled cell grid with composition operations
//! - [`widget`] — the box/flow widget protocol
//! - [`embed`] — the text-embedding compositor
//! - [`link`] — OSC 8 hyperlinks with recycled ids
//! - [`images`] — half-block/Sixel/kitty/iTerm adapters, cache, loader
//! - [`models`] — status/account records the engine consumes
//! - [`render`] — status → widget list composition
//! - [`theme`] — attribute resolution via ratatui-themes palettes
//! - [`config`] — renderer configuration
//!
//! ## Example
//!
//! ```no_run
//! use tern::widget::{Size, Widget};
//!
//! fn main() -> anyhow::Result<()> {
//!     let widgets = tern::html::translate("<p>hello <b>world</b></p>")?;
//!     let colors = tern::Theme::default().colors();
//!     for widget in &widgets {
//!         let canvas = widget.render(Size::Flow { cols: 72 }, false);
//!         print!("{}", canvas.to_ansi(&colors));
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Scope
//!
//! The engine receives pre-fetched domain records and a declared graphics
//! capability, and returns canvases; it performs no I/O on the render path.
//! HTTP clients, credential storage, command dispatch and the raw terminal
//! driver are collaborators, not residents.

#![doc(html_root_url = "https://docs.rs/tern/0.2.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod canvas;
pub mod config;
pub mod embed;
pub mod error;
pub mod html;
pub mod images;
pub mod link;
pub mod markup;
pub mod models;
pub mod render;
pub mod style;
pub mod text;
pub mod theme;
pub mod widget;

// Re-export main types for convenience
pub use canvas::{Canvas, Run, RunKind};
pub use config::RenderConfig;
pub use embed::Embedded;
pub use error::RenderError;
pub use images::{CellBox, ImageCache, ImageLoader, Protocol};
pub use link::{Hyperlink, LinkArena};
pub use markup::Markup;
pub use models::{Account, Status, Visibility};
pub use render::StatusRenderer;
pub use style::{Attr, StyleTag};
pub use theme::{Theme, ThemeColors};
pub use widget::{BoxedWidget, Size, Sizing, Widget};

// Re-export theme types from ratatui-themes crate
pub use ratatui_themes::{ThemeName, ThemePalette};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/ricardodantas/tern";

//! Status composition: domain record → widget list.
//!
//! This is the stage downstream of the HTML translator. It recovers the
//! translator's flattened anchors into live [`Hyperlink`] widgets embedded in
//! the flowing text, prefixes a styled header line, and appends poll results
//! and media canvases. The output is a widget list ready for a scrolling
//! host to render row by row.

use crate::config::RenderConfig;
use crate::embed::Embedded;
use crate::error::Result;
use crate::html;
use crate::images::{ImageCache, placeholder_canvas};
use crate::link::{Hyperlink, LinkArena, encode_uri};
use crate::markup::Markup;
use crate::models::{MediaType, Poll, Status};
use crate::style::StyleTag;
use crate::text;
use crate::widget::{BoxedWidget, CanvasWidget, Filler, Spacer};

/// Width of the vote bar in rendered poll options.
const POLL_BAR_CELLS: usize = 10;

/// Renders statuses into widget lists.
pub struct StatusRenderer {
    arena: LinkArena,
    cache: ImageCache,
    config: RenderConfig,
}

impl StatusRenderer {
    /// A renderer drawing link ids from `arena` and images from `cache`.
    #[must_use]
    pub fn new(arena: LinkArena, cache: ImageCache, config: RenderConfig) -> Self {
        Self {
            arena,
            cache,
            config,
        }
    }

    /// Render a status into widgets: header, content blocks, poll, media.
    pub fn status_widgets(&self, status: &Status) -> Result<Vec<BoxedWidget>> {
        let status = status.original();
        let mut widgets: Vec<BoxedWidget> = vec![Box::new(Embedded::new(header_markup(status))?)];

        if !status.spoiler_text.is_empty() {
            widgets.push(Box::new(Embedded::new(Markup::styled(
                StyleTag::Bold,
                Markup::text(format!("CW: {}", status.spoiler_text)),
            ))?));
        }

        widgets.push(Box::new(Spacer::new(1)));
        widgets.extend(self.content_widgets(&status.content)?);

        if let Some(poll) = &status.poll {
            widgets.push(Box::new(Spacer::new(1)));
            widgets.push(Box::new(Embedded::new(poll_markup(poll))?));
        }

        if self.config.show_media {
            for media in &status.media_attachments {
                if media.media_type != MediaType::Image && media.media_type != MediaType::Gifv {
                    continue;
                }
                widgets.push(Box::new(Spacer::new(1)));
                widgets.push(self.media_widget(&media.url));
                if let Some(description) = &media.description
                    && !description.is_empty()
                {
                    widgets.push(Box::new(Embedded::new(Markup::styled(
                        StyleTag::Italic,
                        Markup::text(description.clone()),
                    ))?));
                }
            }
        }

        Ok(widgets)
    }

    /// Translate status HTML with flattened anchors swapped for live
    /// hyperlink widgets.
    pub fn content_widgets(&self, content: &str) -> Result<Vec<BoxedWidget>> {
        let arena = self.arena.clone();
        html::translate_with(content, &mut |markup| attach_links(markup, &arena))
    }

    /// The media preview canvas, or the blank placeholder while the image is
    /// still loading (or failed to decode).
    fn media_widget(&self, url: &str) -> BoxedWidget {
        let canvas = self
            .cache
            .canvas(
                url,
                self.config.protocol,
                self.config.media_cols,
                self.config.media_rows,
                self.config.cell,
            )
            .unwrap_or_else(|| {
                placeholder_canvas(self.config.media_cols, self.config.media_rows)
            });
        Box::new(CanvasWidget::new(canvas))
    }
}

/// `author · time · visibility`, styled.
fn header_markup(status: &Status) -> Markup {
    Markup::group(vec![
        Markup::styled(StyleTag::Bold, Markup::text(status.account.shown_name())),
        Markup::text(" "),
        Markup::styled(StyleTag::Mention, Markup::text(status.account.full_handle())),
        Markup::text(format!(" · {} · ", status.relative_time())),
        Markup::styled(
            status.visibility.style_tag(),
            Markup::text(status.visibility.name()),
        ),
    ])
}

/// Poll options as bar lines plus a totals footer.
fn poll_markup(poll: &Poll) -> Markup {
    let total = poll.votes_count.max(1);
    let mut parts: Vec<Markup> = Vec::new();
    for option in &poll.options {
        let votes = option.votes_count.unwrap_or(0);
        let percent = (votes as usize * 100) / total as usize;
        let filled = (percent * POLL_BAR_CELLS).div_ceil(100).min(POLL_BAR_CELLS);
        let bar: String = "█".repeat(filled) + &"░".repeat(POLL_BAR_CELLS - filled);
        parts.push(Markup::text(format!(
            "{bar} {:>3}% {}\n",
            percent, option.title
        )));
    }
    let state = if poll.expired { ", closed" } else { "" };
    parts.push(Markup::text(format!("{} votes{state}", poll.votes_count)));
    Markup::group(parts)
}

/// Swap flattened `label SEPARATOR url` runs for embedded hyperlink widgets.
fn attach_links(markup: Markup, arena: &LinkArena) -> Result<Markup> {
    Ok(match markup {
        Markup::Styled(tag, child) => match (tag, *child) {
            (
                StyleTag::Link | StyleTag::Hashtag | StyleTag::Mention,
                Markup::Text(run),
            ) => match html::recover_link(&run) {
                Some((label, url)) => {
                    let width = text::display_width(label).max(1);
                    let link =
                        Hyperlink::new(arena, encode_uri(url), Some(tag), label)?;
                    Markup::embed(width, Box::new(Filler::new(Box::new(link))))
                }
                None => Markup::styled(tag, Markup::text(run)),
            },
            (tag, child) => Markup::styled(tag, attach_links(child, arena)?),
        },
        Markup::Group(children) => Markup::group(
            children
                .into_iter()
                .map(|child| attach_links(child, arena))
                .collect::<Result<Vec<_>>>()?,
        ),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RunKind;
    use crate::models::{Account, MediaAttachment, PollOption, Visibility};
    use crate::widget::{Size, Widget};

    fn sample_status() -> Status {
        Status {
            id: "1".into(),
            account: Account {
                id: "9".into(),
                acct: "ada@example.social".into(),
                username: "ada".into(),
                display_name: "Ada".into(),
                avatar: None,
                bot: false,
            },
            content: r#"<p>read <a href="https://x.example/doc">the doc</a></p>"#.into(),
            spoiler_text: String::new(),
            visibility: Visibility::Public,
            created_at: chrono::Utc::now(),
            favourites_count: 0,
            reblogs_count: 0,
            replies_count: 0,
            media_attachments: Vec::new(),
            poll: None,
            reblog: None,
            url: None,
        }
    }

    fn renderer() -> StatusRenderer {
        StatusRenderer::new(LinkArena::new(), ImageCache::new(), RenderConfig::default())
    }

    #[test]
    fn test_anchor_becomes_live_hyperlink() {
        let renderer = renderer();
        let widgets = renderer.content_widgets(&sample_status().content).unwrap();
        let canvas = widgets[0].render(Size::Flow { cols: 30 }, false);

        let row_bytes: String = canvas.row(0).iter().map(|r| r.text.as_str()).collect();
        assert!(row_bytes.contains("\x1b]8;id="));
        assert!(row_bytes.contains("https://x.example/doc"));
        assert!(canvas.row_string(0).contains("the doc"));
    }

    #[test]
    fn test_status_widgets_lead_with_header() {
        let renderer = renderer();
        let widgets = renderer.status_widgets(&sample_status()).unwrap();
        let header = widgets[0].render(Size::Flow { cols: 40 }, false);
        let line = header.row_string(0);
        assert!(line.contains("Ada"));
        assert!(line.contains("@ada@example.social"));
        assert!(line.contains("public"));
    }

    #[test]
    fn test_poll_bars_and_footer() {
        let mut status = sample_status();
        status.poll = Some(Poll {
            id: "7".into(),
            options: vec![
                PollOption {
                    title: "yes".into(),
                    votes_count: Some(3),
                },
                PollOption {
                    title: "no".into(),
                    votes_count: Some(1),
                },
            ],
            votes_count: 4,
            expired: true,
            multiple: false,
        });
        let markup = poll_markup(status.poll.as_ref().unwrap());
        let flat = markup.plain_text();
        assert!(flat.contains(" 75% yes"));
        assert!(flat.contains(" 25% no"));
        assert!(flat.contains("4 votes, closed"));
    }

    #[test]
    fn test_missing_media_renders_placeholder() {
        let mut status = sample_status();
        status.media_attachments.push(MediaAttachment {
            url: "https://files.example/missing.png".into(),
            preview_url: None,
            media_type: MediaType::Image,
            description: Some("alt".into()),
        });
        let renderer = renderer();
        let widgets = renderer.status_widgets(&status).unwrap();

        // The media canvas is the blank placeholder, but rendering proceeds.
        let media = widgets[widgets.len() - 2].render(Size::Flow { cols: 40 }, false);
        assert_eq!(media.rows(), RenderConfig::default().media_rows);
        assert!(media.row_string(0).trim().is_empty());
        assert!(
            media
                .row(0)
                .iter()
                .all(|run| run.kind == RunKind::Text)
        );
    }

    #[test]
    fn test_link_ids_are_drawn_from_the_arena() {
        let arena = LinkArena::new();
        let renderer =
            StatusRenderer::new(arena.clone(), ImageCache::new(), RenderConfig::default());
        let widgets = renderer.content_widgets(&sample_status().content).unwrap();
        assert_eq!(arena.live(), 1);
        drop(widgets);
        assert_eq!(arena.live(), 0);
    }
}

//! Status model and its attachments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::style::StyleTag;

use super::Account;

/// A status, as decoded from the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Status {
    /// Network-specific ID
    pub id: String,
    /// Author of the status
    pub account: Account,
    /// Content as served: the constrained HTML subset
    #[serde(default)]
    pub content: String,
    /// Content warning, empty when absent
    #[serde(default)]
    pub spoiler_text: String,
    /// Who can see the status
    #[serde(default)]
    pub visibility: Visibility,
    /// When the status was created
    pub created_at: DateTime<Utc>,
    /// Number of favourites
    #[serde(default)]
    pub favourites_count: u32,
    /// Number of boosts
    #[serde(default)]
    pub reblogs_count: u32,
    /// Number of replies
    #[serde(default)]
    pub replies_count: u32,
    /// Media attachments
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    /// Attached poll
    #[serde(default)]
    pub poll: Option<Poll>,
    /// The boosted status, when this one is a boost
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    /// URL to the status on the web
    #[serde(default)]
    pub url: Option<String>,
}

impl Status {
    /// The status whose content should render: the boost target if this is a
    /// boost, otherwise the status itself
    #[must_use]
    pub fn original(&self) -> &Status {
        self.reblog.as_deref().unwrap_or(self)
    }

    /// Get relative time string (e.g., "5m", "2h", "3d")
    #[must_use]
    pub fn relative_time(&self) -> String {
        let now = Utc::now();
        let duration = now.signed_duration_since(self.created_at);

        if duration.num_seconds() < 60 {
            format!("{}s", duration.num_seconds())
        } else if duration.num_minutes() < 60 {
            format!("{}m", duration.num_minutes())
        } else if duration.num_hours() < 24 {
            format!("{}h", duration.num_hours())
        } else if duration.num_days() < 7 {
            format!("{}d", duration.num_days())
        } else {
            self.created_at.format("%b %d").to_string()
        }
    }
}

/// Status visibility level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Visible to everyone
    #[default]
    Public,
    /// Public but excluded from timelines
    Unlisted,
    /// Followers only
    Private,
    /// Mentioned accounts only
    Direct,
}

impl Visibility {
    /// The style tag a visibility badge renders with
    #[must_use]
    pub const fn style_tag(self) -> StyleTag {
        match self {
            Self::Public => StyleTag::VisibilityPublic,
            Self::Unlisted => StyleTag::VisibilityUnlisted,
            Self::Private => StyleTag::VisibilityPrivate,
            Self::Direct => StyleTag::VisibilityDirect,
        }
    }

    /// Display name of the level
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Unlisted => "unlisted",
            Self::Private => "private",
            Self::Direct => "direct",
        }
    }
}

/// Media attachment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaAttachment {
    /// Media URL
    pub url: String,
    /// Preview/thumbnail URL
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Media type (image, video, gifv, audio)
    #[serde(rename = "type", default)]
    pub media_type: MediaType,
    /// Alt text description
    #[serde(default)]
    pub description: Option<String>,
}

/// Media type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// Image (JPEG, PNG, GIF, WebP)
    Image,
    /// Video (MP4, WebM)
    Video,
    /// Animated GIF
    Gifv,
    /// Audio file
    Audio,
    /// Unknown or unsupported media type
    #[default]
    #[serde(other)]
    Unknown,
}

/// A poll attached to a status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Poll {
    /// Network-specific ID
    pub id: String,
    /// The poll's options in order
    pub options: Vec<PollOption>,
    /// Total votes cast
    #[serde(default)]
    pub votes_count: u32,
    /// Whether voting has closed
    #[serde(default)]
    pub expired: bool,
    /// Whether multiple options may be chosen
    #[serde(default)]
    pub multiple: bool,
}

/// One poll option
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollOption {
    /// Option label
    pub title: String,
    /// Votes for this option; hidden until the poll closes on some servers
    #[serde(default)]
    pub votes_count: Option<u32>,
}

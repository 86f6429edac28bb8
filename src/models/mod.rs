//! Data models consumed by the rendering engine.
//!
//! These are the pre-fetched domain records the engine renders: decoded from
//! Mastodon-shaped JSON by the API collaborator and handed in as-is. The
//! engine only reads them.

mod account;
mod status;

pub use account::Account;
pub use status::{MediaAttachment, MediaType, Poll, PollOption, Status, Visibility};

//! Mastodon REST entities, as loosely as they can be read. Every field is
//! optional and a field of the wrong shape reads as absent.

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError};

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Status {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub uri: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub created_at: Option<String>,
    /// HTML.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub content: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub account: Option<Account>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub reblog: Option<Box<Status>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub media_attachments: Vec<MediaAttachment>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub mentions: Vec<Mention>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub tags: Vec<Hashtag>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub in_reply_to_id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub application: Option<Application>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Account {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub username: Option<String>,
    /// `user` locally, `user@host` for remote accounts.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub acct: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub created_at: Option<String>,
    /// Bio, HTML.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub note: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One profile metadata row. `value` is HTML.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Field {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub value: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MediaAttachment {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    /// `image`, `video`, `gifv`, `audio` or `unknown`.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub preview_url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub description: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Mention {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub username: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub acct: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Hashtag {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Application {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, alias = "url")]
    pub website: Option<String>,
}

/// Answer of the status context endpoint.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Context {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub ancestors: Vec<Status>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub descendants: Vec<Status>,
}

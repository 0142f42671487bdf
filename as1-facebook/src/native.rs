//! Graph API shapes. Every field is optional and a field of the wrong shape
//! reads as absent.

use serde::Deserialize;
use serde_with::{serde_as, DefaultOnError};
use std::collections::BTreeMap;

/// `{"data": [...]}` wrapper the Graph API puts around lists.
#[serde_as]
#[derive(Clone, Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub count: Option<u64>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            count: None,
        }
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct User {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub username: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub link: Option<String>,
    /// Free text; may hold several urls separated by whitespace.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub website: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub bio: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub updated_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub location: Option<Named>,
}

/// Anything the API hands back as just an id and a name.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Named {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct MessageTag {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    /// `user`, `page`, `event`, `group`...
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    /// UTF-16 code units into the message.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub length: Option<usize>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MessageTagsRepr {
    List(Vec<MessageTag>),
    ByOffset(BTreeMap<String, Vec<MessageTag>>),
}

/// Message tags ordered by offset. Posts key them by offset, comments list
/// them; both read the same.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(from = "MessageTagsRepr")]
pub struct MessageTags(pub Vec<MessageTag>);

impl From<MessageTagsRepr> for MessageTags {
    fn from(repr: MessageTagsRepr) -> Self {
        let mut tags: Vec<MessageTag> = match repr {
            MessageTagsRepr::List(tags) => tags,
            MessageTagsRepr::ByOffset(by_offset) => by_offset.into_values().flatten().collect(),
        };
        tags.sort_by_key(|tag| tag.offset.unwrap_or(0));
        MessageTags(tags)
    }
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Privacy {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub value: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Action {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub link: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Coordinates {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub longitude: Option<f64>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Place {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub location: Option<Coordinates>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Post {
    /// `<owner>_<post>`, or just `<post>`.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub from: Option<User>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub to: Option<Page<User>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub with_tags: Option<Page<User>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub message: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub message_tags: MessageTags,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub story: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub picture: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub link: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub caption: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub description: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub place: Option<Place>,
    /// `status`, `photo`, `link`, `video`...
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub application: Option<Named>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub updated_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub comments: Option<Page<Comment>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub likes: Option<Page<User>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub privacy: Option<Privacy>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Comment {
    /// `<post>_<comment>`; event comments carry only `<comment>`.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub from: Option<User>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub message: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub message_tags: MessageTags,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub privacy: Option<Privacy>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PictureData {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub url: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Picture {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub data: Option<PictureData>,
}

#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Event {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub owner: Option<User>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub description: Option<String>,
    /// Local time with the event's own offset, kept as given.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub location: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub venue: Option<Named>,
    /// `OPEN`, `SECRET`, `FRIENDS`...
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub updated_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub comments: Option<Page<Comment>>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub picture: Option<Picture>,
}

/// One row of an event's invited list.
#[serde_as]
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Rsvp {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub name: Option<String>,
    /// `attending`, `declined`, `unsure` or `not_replied`.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub rsvp_status: Option<String>,
}

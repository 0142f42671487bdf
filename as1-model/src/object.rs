use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::{
    actor::dedupe_urls, merge_urls, Activity, Actor, Audience, Image, Location, ObjectType,
    OneOrList, Ref, Tag, UrlValue, Verb,
};

/// Anything that can be posted, shared, liked or attached.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Object {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<UrlValue>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// `content` is already HTML and must not be escaped again.
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(rename = "content_is_html", default, skip_serializing_if = "is_false")]
    pub content_is_html: bool,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub image: Vec<Image>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stream: Vec<Image>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Object>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub to: Vec<Audience>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_reply_to: Vec<Ref>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replies: Option<Replies>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object: Vec<Object>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attending: Vec<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub not_attending: Vec<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maybe_attending: Vec<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub invited: Vec<Actor>,
}

/// Attachments are objects nested in `attachments`.
pub type Attachment = Object;

fn is_false(value: &bool) -> bool {
    !*value
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Replies {
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default)]
    pub items: Vec<Activity>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u64>,
}

impl Object {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type: Some(object_type),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Object::default()
    }

    pub fn is_type(&self, object_type: ObjectType) -> bool {
        self.object_type == Some(object_type)
    }

    /// Inline tags by ascending start index, then out-of-line tags.
    /// Ties keep their input order.
    pub fn sort_tags(&mut self) {
        self.tags.sort_by_key(|tag| match tag.start_index {
            Some(start) => (false, start),
            None => (true, 0),
        });
    }

    pub fn set_urls<I, S>(&mut self, primary: Option<String>, others: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let (url, urls) = merge_urls(primary, others);
        self.url = url;
        self.urls = urls;
    }

    /// `url` followed by `urls`, without duplicates.
    pub fn all_urls(&self) -> Vec<String> {
        dedupe_urls(self.url.as_deref(), &self.urls)
    }

    /// Weak pointer to this object.
    pub fn to_ref(&self) -> Ref {
        Ref {
            id: self.id.clone(),
            url: self.url.clone(),
        }
    }

    pub fn first_image_url(&self) -> Option<&str> {
        self.image.iter().find_map(|image| image.url.as_deref())
    }

    pub fn first_stream_url(&self) -> Option<&str> {
        self.stream.iter().find_map(|stream| stream.url.as_deref())
    }
}

impl From<&Ref> for Object {
    fn from(target: &Ref) -> Self {
        Object {
            id: target.id.clone(),
            url: target.url.clone(),
            ..Object::default()
        }
    }
}

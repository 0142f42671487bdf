use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::{actor::dedupe_urls, Actor, Image, ObjectType, OneOrList, Ref, UrlValue, Verb};

/// Annotation on an object. With both `start_index` and `length` it covers
/// a span of the object's content, counted in Unicode code points; without
/// them it is out of line.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
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
    pub display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_index: Option<usize>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub object: Vec<Ref>,
}

impl Tag {
    pub fn new(object_type: ObjectType) -> Self {
        Self {
            object_type: Some(object_type),
            ..Self::default()
        }
    }

    pub fn with_span(mut self, start_index: usize, length: usize) -> Self {
        self.start_index = Some(start_index);
        self.length = Some(length);
        self
    }

    /// `(start, length)` when the tag is inline.
    pub fn span(&self) -> Option<(usize, usize)> {
        Some((self.start_index?, self.length?))
    }

    pub fn is_inline(&self) -> bool {
        self.span().is_some()
    }

    /// `url` followed by `urls`, without duplicates.
    pub fn all_urls(&self) -> Vec<String> {
        dedupe_urls(self.url.as_deref(), &self.urls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_span() {
        let tag = Tag::new(ObjectType::Person).with_span(3, 5);
        assert_eq!(tag.span(), Some((3, 5)));
        assert!(tag.is_inline());

        let tag = Tag {
            start_index: Some(3),
            ..Tag::default()
        };
        assert!(!tag.is_inline());
    }

    #[test]
    fn test_short_object_lists_keep_every_ref() {
        for count in [1, 2] {
            let refs: Vec<_> = (0..count)
                .map(|i| json!({"id": format!("tag:x.com,2013:{}", i), "url": format!("http://x/{}", i)}))
                .collect();
            let tag: Tag = serde_json::from_value(json!({"objectType": "activity", "object": refs}))
                .unwrap();
            assert_eq!(tag.object.len(), count);
            assert_eq!(tag.object[count - 1].url, Some(format!("http://x/{}", count - 1)));
            assert_eq!(tag.object[0].id.as_deref(), Some("tag:x.com,2013:0"));
        }
    }

    #[test]
    fn test_like_tag_object_accepts_single_ref() {
        let tag: Tag = serde_json::from_value(json!({
            "objectType": "activity",
            "verb": "like",
            "object": {"url": "https://facebook.com/212038/posts/10100176064482163"},
            "startIndex": "nope",
        }))
        .unwrap();
        assert_eq!(tag.verb, Some(Verb::Like));
        assert_eq!(tag.start_index, None);
        assert_eq!(
            tag.object,
            vec![Ref::from_url(
                "https://facebook.com/212038/posts/10100176064482163"
            )]
        );
    }
}

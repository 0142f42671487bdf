use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::{Image, Location, ObjectType, OneOrList, UrlValue};

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(rename = "numeric_id", default, skip_serializing_if = "Option::is_none")]
    pub numeric_id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<UrlValue>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Image>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Actor {
    pub fn person() -> Self {
        Self {
            object_type: Some(ObjectType::Person),
            ..Self::default()
        }
    }

    /// Sets `url` and `urls` from a primary url and any further urls.
    ///
    /// The merged list keeps input order and drops later exact duplicates.
    /// `urls` is only filled when there is more than one distinct url.
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

    pub fn is_empty(&self) -> bool {
        self == &Actor::default()
    }
}

/// Orders `primary` first and de-duplicates by exact string equality.
pub fn merge_urls<I, S>(primary: Option<String>, others: I) -> (Option<String>, Vec<UrlValue>)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut merged: Vec<String> = Vec::new();
    for url in primary.into_iter().chain(others.into_iter().map(Into::into)) {
        if !url.is_empty() && !merged.contains(&url) {
            merged.push(url);
        }
    }
    let url = merged.first().cloned();
    let urls = if merged.len() > 1 {
        merged.into_iter().map(UrlValue::new).collect()
    } else {
        Vec::new()
    };
    (url, urls)
}

pub(crate) fn dedupe_urls(url: Option<&str>, urls: &[UrlValue]) -> Vec<String> {
    let mut all: Vec<String> = Vec::new();
    for url in url.into_iter().chain(urls.iter().map(|url| url.value.as_str())) {
        if !url.is_empty() && !all.iter().any(|seen| seen == url) {
            all.push(url.to_string());
        }
    }
    all
}

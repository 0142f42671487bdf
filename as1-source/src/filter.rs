use as1_model::Activity;
use serde::{Deserialize, Serialize};

/// Which feed to read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum GroupId {
    /// The user's own posts.
    #[serde(rename = "@self")]
    SelfFeed,
    /// The user's home feed.
    #[default]
    #[serde(rename = "@friends")]
    Friends,
    #[serde(rename = "@all")]
    All,
    #[serde(untagged)]
    Other(String),
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityFilter {
    pub user_id: Option<String>,
    pub group_id: Option<GroupId>,
    pub activity_id: Option<String>,
    pub start_index: Option<usize>,
    pub count: Option<usize>,
    pub etag: Option<String>,
    pub fetch_replies: bool,
    pub fetch_likes: bool,
    pub fetch_shares: bool,
    pub fetch_events: bool,
    pub fetch_mentions: bool,
    pub search_query: Option<String>,
}

impl ActivityFilter {
    pub fn activity(activity_id: impl Into<String>) -> Self {
        Self {
            activity_id: Some(activity_id.into()),
            ..Self::default()
        }
    }

    pub fn group(&self) -> GroupId {
        self.group_id.clone().unwrap_or_default()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivitiesResponse {
    pub items: Vec<Activity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    pub start_index: usize,
    pub items_per_page: usize,
    pub total_results: usize,
}

impl ActivitiesResponse {
    /// Wraps one page of items starting at `start_index`.
    pub fn page(items: Vec<Activity>, start_index: usize) -> Self {
        Self {
            items_per_page: items.len(),
            total_results: start_index + items.len(),
            start_index,
            items,
            etag: None,
        }
    }

    /// Answer to a conditional request whose etag still matches.
    pub fn not_modified(etag: Option<String>, start_index: usize) -> Self {
        Self {
            etag,
            ..Self::page(Vec::new(), start_index)
        }
    }
}

use as1_model::{Activity, Actor, Object, ObjectType, Verb};
use as1_ref::{RefError, TagUri, UrlPatternTable};
use async_trait::async_trait;
use log::trace;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::error::Error as StdError;
use thiserror::Error as ThisError;

mod filter;
mod media;
mod publish;
mod resolve;
pub mod testing;
mod transport;
mod truncate;

pub use filter::{ActivitiesResponse, ActivityFilter, GroupId};
pub use media::{media_refs, upload_all, MediaKind, MediaRef, MediaUploader};
pub use publish::{
    base_object, content_for_create, CreateOptions, CreationResult, IncludeLink, PublishKind,
};
pub use resolve::{Resolution, ResolvedTarget, TargetLookup, TargetResolver};
pub use transport::{HttpResponse, Method, RequestBody, ReqwestTransport, Transport};
pub use truncate::{ellipsize, truncate, TruncateOptions};

#[derive(Debug, ThisError)]
pub enum SourceError {
    #[error("Unsupported activity filter: {0}")]
    UnsupportedFilter(String),
    #[error("Could not find {noun} to {action}.")]
    TargetNotFound { noun: String, action: String },
    #[error("Cannot publish type={object_type}, verb={verb} to {site}")]
    UnsupportedPublishType {
        object_type: String,
        verb: String,
        site: &'static str,
    },
    #[error("{0}")]
    Refused(String),
    #[error("No content text found.")]
    NoContent,
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Transport error, cause: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),
    #[error("Json error, cause: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Ref error, cause: {0}")]
    Ref(#[from] RefError),
    #[error("Invalid response: {0}")]
    Invalid(String),
}

impl SourceError {
    pub fn target_not_found(noun: impl Into<String>, action: impl Into<String>) -> Self {
        SourceError::TargetNotFound {
            noun: noun.into(),
            action: action.into(),
        }
    }

    pub fn unsupported(object: &Object, site: &'static str) -> Self {
        SourceError::UnsupportedPublishType {
            object_type: object
                .object_type
                .as_ref()
                .map(ObjectType::as_str)
                .unwrap_or("None")
                .to_string(),
            verb: object
                .verb
                .as_ref()
                .map(Verb::as_str)
                .unwrap_or("None")
                .to_string(),
            site,
        }
    }

    /// HTTP failure with status code, as opposed to a failure to talk at all.
    pub fn is_http(&self) -> bool {
        matches!(self, SourceError::Http { .. })
    }
}

/// Decodes a native payload, falling back to an empty value when the payload
/// does not have the expected shape.
pub fn parse_native<T>(value: &Value) -> T
where
    T: DeserializeOwned + Default,
{
    match T::deserialize(value) {
        Ok(native) => native,
        Err(err) => {
            trace!("ignoring malformed native payload: {}", err);
            T::default()
        }
    }
}

/// Pure conversions from one platform's native shapes into the canonical
/// model. Every conversion is total: empty input gives an empty canonical
/// value.
pub trait Adapter {
    type Post: DeserializeOwned + Default;
    type Actor: DeserializeOwned + Default;

    /// Domain used for tag URIs and for matching targets to this platform.
    fn domain(&self) -> &str;

    fn to_object(&self, native: &Self::Post) -> Object;

    fn to_activity(&self, native: &Self::Post) -> Activity;

    fn to_actor(&self, native: &Self::Actor) -> Actor;

    fn tag_uri(&self, name: &str) -> String {
        TagUri::new(self.domain(), name).to_string()
    }

    fn activity_from_json(&self, value: &Value) -> Activity {
        self.to_activity(&parse_native(value))
    }

    fn object_from_json(&self, value: &Value) -> Object {
        self.to_object(&parse_native(value))
    }

    fn actor_from_json(&self, value: &Value) -> Actor {
        self.to_actor(&parse_native(value))
    }
}

/// Network side of a platform: reading feeds and publishing.
#[async_trait]
pub trait Source: Adapter + Send + Sync {
    /// Known native URL shapes, most specific first.
    fn url_patterns(&self) -> &UrlPatternTable;

    async fn fetch_activities_response(
        &self,
        filter: &ActivityFilter,
    ) -> Result<ActivitiesResponse, SourceError>;

    async fn fetch_activities(&self, filter: &ActivityFilter) -> Result<Vec<Activity>, SourceError> {
        Ok(self.fetch_activities_response(filter).await?.items)
    }

    async fn create(
        &self,
        object: &Object,
        options: &CreateOptions,
    ) -> Result<CreationResult, SourceError>;

    async fn preview_create(
        &self,
        object: &Object,
        options: &CreateOptions,
    ) -> Result<CreationResult, SourceError>;

    fn resolver(&self) -> TargetResolver<'_> {
        TargetResolver::new(self.domain(), self.url_patterns())
    }
}

use as1_model::{Activity, Object, Replies};
use as1_ref::{domain_from_link, RefError, UrlPattern, UrlPatternTable};
use as1_source::{
    parse_native, ActivitiesResponse, ActivityFilter, Adapter, CreateOptions, CreationResult,
    GroupId, HttpResponse, MediaUploader, RequestBody, Source, SourceError, TargetLookup,
    Transport,
};
use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error as ThisError;
use url::Url;

mod convert;
mod native;
mod publish;

pub use native::{Account, Application, Context, Field, Hashtag, MediaAttachment, Mention, Status};

pub const API_ACCOUNT_STATUSES: &str = "/api/v1/accounts/{}/statuses";
pub const API_CONTEXT: &str = "/api/v1/statuses/{}/context";
pub const API_FAVORITE: &str = "/api/v1/statuses/{}/favourite";
pub const API_MEDIA: &str = "/api/v1/media";
pub const API_REBLOG: &str = "/api/v1/statuses/{}/reblog";
pub const API_STATUS: &str = "/api/v1/statuses/{}";
pub const API_STATUSES: &str = "/api/v1/statuses";
pub const API_VERIFY_CREDENTIALS: &str = "/api/v1/accounts/verify_credentials";

/// Longest alt text the media endpoint accepts.
pub const MAX_ALT_LENGTH: usize = 420;

const URL_PATTERNS_VERSION: u32 = 1;

#[derive(Debug, ThisError)]
pub enum MastodonError {
    #[error("Invalid instance url {instance}, cause: {source}")]
    Instance {
        instance: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Instance url has no host: {0}")]
    NoHost(String),
    #[error("Url pattern error, cause: {0}")]
    Pattern(#[from] RefError),
    #[error("Source error, cause: {0}")]
    Source(#[from] SourceError),
}

/// Where and as whom to talk to an instance.
#[derive(Clone, Debug, Deserialize)]
pub struct MastodonConfig {
    /// Base url, e.g. `https://mastodon.social/`.
    pub instance: String,
    pub access_token: String,
    /// Looked up with the access token when absent.
    #[serde(default)]
    pub user_id: Option<String>,
}

pub struct Mastodon {
    instance: Url,
    domain: String,
    access_token: String,
    user_id: Option<String>,
    transport: Arc<dyn Transport>,
    patterns: UrlPatternTable,
}

impl Mastodon {
    /// Builds the client without any network calls. `user_id` stays unset
    /// unless the config carries it; see [`Mastodon::connect`].
    pub fn new(config: MastodonConfig, transport: Arc<dyn Transport>) -> Result<Self, MastodonError> {
        let instance = Url::parse(&config.instance).map_err(|source| MastodonError::Instance {
            instance: config.instance.clone(),
            source,
        })?;
        let domain = domain_from_link(instance.as_str())
            .ok_or_else(|| MastodonError::NoHost(config.instance.clone()))?;
        let patterns = url_patterns(&domain)?;
        Ok(Self {
            instance,
            domain,
            access_token: config.access_token,
            user_id: config.user_id.filter(|user_id| !user_id.is_empty()),
            transport,
            patterns,
        })
    }

    /// Like [`Mastodon::new`], then asks the instance who the access token
    /// belongs to when the config has no user id.
    pub async fn connect(
        config: MastodonConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, MastodonError> {
        let mut mastodon = Self::new(config, transport)?;
        if mastodon.user_id.is_none() {
            let creds: Account = parse_native(&mastodon.api_get(API_VERIFY_CREDENTIALS, &[]).await?);
            let user_id = creds.id.ok_or_else(|| {
                SourceError::Invalid("verify_credentials returned no account id".to_string())
            })?;
            info!("connected to {} as account {}", mastodon.domain, user_id);
            mastodon.user_id = Some(user_id);
        }
        Ok(mastodon)
    }

    pub fn instance(&self) -> &Url {
        &self.instance
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Profile url for `username` on this instance.
    pub fn user_url(&self, username: &str) -> String {
        self.join(&format!("@{}", username))
    }

    fn join(&self, path: &str) -> String {
        self.instance
            .join(path)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.instance, path.trim_start_matches('/')))
    }

    fn auth_headers(&self) -> Vec<(String, String)> {
        vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.access_token),
        )]
    }

    async fn api_get(&self, path: &str, params: &[(String, String)]) -> Result<Value, SourceError> {
        let url = self.join(path);
        debug!("GET {}", url);
        self.transport
            .get(&url, &self.auth_headers(), params)
            .await?
            .error_for_status()?
            .json()
    }

    async fn api_post(&self, path: &str, body: RequestBody) -> Result<Value, SourceError> {
        let url = self.join(path);
        debug!("POST {}", url);
        self.transport
            .post(&url, &self.auth_headers(), body)
            .await?
            .error_for_status()?
            .json()
    }

    fn statuses(value: &Value) -> Vec<Status> {
        value
            .as_array()
            .map(|statuses| statuses.iter().map(parse_native).collect())
            .unwrap_or_default()
    }
}

/// Native status urls on `domain`, most specific first.
fn url_patterns(domain: &str) -> Result<UrlPatternTable, RefError> {
    let host = format!(r"^https?://(?:www\.)?{}", regex::escape(domain));
    Ok(UrlPatternTable::new(
        URL_PATTERNS_VERSION,
        vec![
            UrlPattern::new(
                "status",
                &format!(r"{}/@(?P<owner>[^/?#]+)/(?P<id>\d+)", host),
            )?,
            UrlPattern::new(
                "user status",
                &format!(r"{}/users/(?P<owner>[^/?#]+)/statuses/(?P<id>\d+)", host),
            )?,
            UrlPattern::new("web status", &format!(r"{}/web/statuses/(?P<id>\d+)", host))?,
        ],
    ))
}

fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

#[async_trait]
impl TargetLookup for Mastodon {
    async fn lookup(&self, id: &str) -> Result<Value, SourceError> {
        self.api_get(&API_STATUS.replace("{}", id), &[]).await
    }
}

#[async_trait]
impl MediaUploader for Mastodon {
    async fn upload(&self, url: &str, alt_text: Option<&str>) -> Result<String, SourceError> {
        debug!("GET {}", url);
        let media: HttpResponse = self.transport.get(url, &[], &[]).await?.error_for_status()?;
        let file_name = Url::parse(url)
            .ok()
            .and_then(|url| {
                url.path_segments()
                    .and_then(|mut segments| segments.next_back().map(String::from))
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| "file".to_string());
        let fields = alt_text
            .filter(|alt| !alt.is_empty())
            .map(|alt| {
                vec![(
                    "description".to_string(),
                    as1_source::ellipsize(alt, MAX_ALT_LENGTH),
                )]
            })
            .unwrap_or_default();

        let body = RequestBody::File {
            field: "file".to_string(),
            file_name,
            content_type: media.header("content-type").map(String::from),
            bytes: media.body,
            fields,
        };
        let uploaded = self.api_post(API_MEDIA, body).await?;
        uploaded
            .get("id")
            .and_then(id_string)
            .ok_or_else(|| SourceError::Invalid(format!("media upload of {} returned no id", url)))
    }
}

#[async_trait]
impl Source for Mastodon {
    fn url_patterns(&self) -> &UrlPatternTable {
        &self.patterns
    }

    /// The user's own toots, newest first. Only `fetch_replies` and paging
    /// are honoured.
    async fn fetch_activities_response(
        &self,
        filter: &ActivityFilter,
    ) -> Result<ActivitiesResponse, SourceError> {
        let unsupported = [
            ("fetch_shares", filter.fetch_shares),
            ("fetch_events", filter.fetch_events),
            ("fetch_mentions", filter.fetch_mentions),
            ("search_query", filter.search_query.is_some()),
            (
                "group_id",
                !matches!(filter.group_id, None | Some(GroupId::SelfFeed)),
            ),
            ("user_id", filter.user_id.is_some()),
            ("activity_id", filter.activity_id.is_some()),
        ];
        if let Some((name, _)) = unsupported.iter().find(|(_, set)| *set) {
            return Err(SourceError::UnsupportedFilter(name.to_string()));
        }

        let user_id = self.user_id.as_deref().ok_or_else(|| {
            SourceError::Invalid("no user id; use Mastodon::connect".to_string())
        })?;
        let mut params = Vec::new();
        if let Some(count) = filter.count {
            params.push(("limit".to_string(), count.to_string()));
        }
        let statuses = self
            .api_get(&API_ACCOUNT_STATUSES.replace("{}", user_id), &params)
            .await?;

        let mut activities: Vec<Activity> = Vec::new();
        for status in Self::statuses(&statuses) {
            let mut activity = self.to_activity(&status);
            if filter.fetch_replies {
                if let Some(id) = &status.id {
                    let context: Context =
                        parse_native(&self.api_get(&API_CONTEXT.replace("{}", id), &[]).await?);
                    let items: Vec<Activity> = context
                        .descendants
                        .iter()
                        .map(|reply| self.to_activity(reply))
                        .collect();
                    activity.object.replies = Some(Replies {
                        total_items: Some(items.len() as u64),
                        items,
                    });
                }
            }
            activities.push(activity);
        }
        Ok(ActivitiesResponse::page(
            activities,
            filter.start_index.unwrap_or(0),
        ))
    }

    async fn create(
        &self,
        object: &Object,
        options: &CreateOptions,
    ) -> Result<CreationResult, SourceError> {
        self.publish(object, options, false).await
    }

    async fn preview_create(
        &self,
        object: &Object,
        options: &CreateOptions,
    ) -> Result<CreationResult, SourceError> {
        self.publish(object, options, true).await
    }
}

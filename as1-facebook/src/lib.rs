use as1_model::{Activity, Actor, Object, Tag, Verb};
use as1_ref::{UrlPattern, UrlPatternTable};
use as1_source::{
    parse_native, ActivitiesResponse, ActivityFilter, Adapter, CreateOptions, CreationResult,
    GroupId, HttpResponse, RequestBody, Source, SourceError, TargetLookup, Transport,
};
use async_trait::async_trait;
use lazy_static::lazy_static;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

mod convert;
mod native;
mod publish;

pub use native::{
    Action, Comment, Coordinates, Event, MessageTag, MessageTags, Named, Page, Picture,
    PictureData, Place, Post, Privacy, Rsvp, User,
};

pub const DOMAIN: &str = "facebook.com";
pub const API_BASE: &str = "https://graph.facebook.com/";
pub const API_COMMENTS: &str = "{}/comments";
pub const API_EVENTS: &str = "{}/events";
pub const API_FEED: &str = "me/feed";
pub const API_HOME: &str = "{}/home";
pub const API_INVITED: &str = "{}/invited";
pub const API_LIKES: &str = "{}/likes";
pub const API_PHOTOS: &str = "me/photos";
pub const API_POSTS: &str = "{}/posts";

const URL_PATTERNS_VERSION: u32 = 1;

fn url_patterns() -> &'static UrlPatternTable {
    lazy_static! {
        static ref PATTERNS: UrlPatternTable = {
            let host = r"^https?://(?:www\.|m\.)?facebook\.com/";
            UrlPatternTable::new(
                URL_PATTERNS_VERSION,
                vec![
                    UrlPattern::new(
                        "post",
                        &format!(r"{}(?P<owner>[^/?#]+)/posts/(?P<id>[^/?#]+)", host),
                    )
                    .unwrap(),
                    UrlPattern::new(
                        "photo",
                        &format!(r"{}photo\.php\?(?:[^#]*&)?fbid=(?P<id>\d+)", host),
                    )
                    .unwrap(),
                    UrlPattern::new(
                        "permalink",
                        &format!(
                            r"{}permalink\.php\?story_fbid=(?P<id>\d+)(?:&id=(?P<owner>\d+))?",
                            host
                        ),
                    )
                    .unwrap(),
                    UrlPattern::new("event", &format!(r"{}events/(?P<id>\d+)", host)).unwrap(),
                    UrlPattern::new("object", &format!(r"{}(?P<id>\d+)/?(?:[?#]|$)", host))
                        .unwrap(),
                ],
            )
        };
    }
    &PATTERNS
}

fn default_api_base() -> String {
    API_BASE.to_string()
}

#[derive(Clone, Debug, Deserialize)]
pub struct FacebookConfig {
    /// Sent as the `access_token` request parameter when present.
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default = "default_api_base")]
    pub api_base: String,
}

impl Default for FacebookConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            api_base: default_api_base(),
        }
    }
}

pub struct Facebook {
    api_base: String,
    access_token: Option<String>,
    transport: Arc<dyn Transport>,
}

impl Facebook {
    pub fn new(config: FacebookConfig, transport: Arc<dyn Transport>) -> Self {
        let mut api_base = config.api_base;
        if !api_base.ends_with('/') {
            api_base.push('/');
        }
        Self {
            api_base,
            access_token: config.access_token.filter(|token| !token.is_empty()),
            transport,
        }
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path.trim_start_matches('/'))
    }

    fn token_param(&self) -> Option<(String, String)> {
        self.access_token
            .as_ref()
            .map(|token| ("access_token".to_string(), token.clone()))
    }

    async fn api_response(
        &self,
        path: &str,
        params: &[(String, String)],
        headers: &[(String, String)],
    ) -> Result<HttpResponse, SourceError> {
        let url = self.api_url(path);
        let mut params = params.to_vec();
        params.extend(self.token_param());
        debug!("GET {}", url);
        self.transport
            .get(&url, headers, &params)
            .await?
            .error_for_status()
    }

    async fn api_get(&self, path: &str) -> Result<Value, SourceError> {
        self.api_response(path, &[], &[]).await?.json()
    }

    /// POSTs a form; the access token rides along as one more field.
    async fn api_post(
        &self,
        path: &str,
        mut fields: Vec<(String, String)>,
    ) -> Result<Value, SourceError> {
        let url = self.api_url(path);
        fields.extend(self.token_param());
        let body = if fields.is_empty() {
            RequestBody::Empty
        } else {
            RequestBody::Form(fields)
        };
        debug!("POST {}", url);
        self.transport
            .post(&url, &[], body)
            .await?
            .error_for_status()?
            .json()
    }

    /// The user's profile; the token's own user when `user_id` is absent.
    pub async fn get_actor(&self, user_id: Option<&str>) -> Result<Actor, SourceError> {
        let user = self.api_get(user_id.unwrap_or("me")).await?;
        Ok(self.actor_from_json(&user))
    }

    /// One comment by id. Ids with an underscore the API rejects are retried
    /// with their last segment.
    pub async fn get_comment(
        &self,
        comment_id: &str,
        post_author_id: Option<&str>,
    ) -> Result<Object, SourceError> {
        let comment = match self.api_get(comment_id).await {
            Ok(comment) => comment,
            Err(err) if err.is_http() && comment_id.contains('_') => {
                let last = comment_id.rsplit('_').next().unwrap_or(comment_id);
                warn!("comment {} failed ({}), retrying as {}", comment_id, err, last);
                self.api_get(last).await?
            }
            Err(err) => return Err(err),
        };
        Ok(self.comment_to_object(&parse_native(&comment), post_author_id))
    }

    /// The like tag `like_user_id` left on `activity_id`, if any.
    pub async fn get_like(
        &self,
        activity_id: &str,
        like_user_id: &str,
    ) -> Result<Option<Tag>, SourceError> {
        let post = self.api_get(activity_id).await?;
        let object = self.object_from_json(&post);
        Ok(object.tags.into_iter().find(|tag| {
            tag.verb == Some(Verb::Like)
                && tag
                    .author
                    .as_ref()
                    .and_then(|author| author.numeric_id.as_deref())
                    == Some(like_user_id)
        }))
    }

    pub async fn get_rsvp(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Object>, SourceError> {
        let path = format!("{}/{}", API_INVITED.replace("{}", event_id), user_id);
        let rsvps: Page<Rsvp> = parse_native(&self.api_get(&path).await?);
        let event = Event {
            id: Some(event_id.to_string()),
            ..Event::default()
        };
        Ok(rsvps
            .data
            .first()
            .map(|rsvp| self.rsvp_to_object(rsvp, Some(&event))))
    }

    async fn fetch_events(&self, user: &str) -> Result<Vec<Activity>, SourceError> {
        let events: Page<Event> =
            parse_native(&self.api_get(&API_EVENTS.replace("{}", user)).await?);
        let mut activities = Vec::with_capacity(events.data.len());
        for event in &events.data {
            let rsvps = match event.id.as_deref() {
                Some(id) => {
                    let invited: Page<Rsvp> =
                        parse_native(&self.api_get(&API_INVITED.replace("{}", id)).await?);
                    invited.data
                }
                None => Vec::new(),
            };
            activities.push(self.event_to_activity(event, &rsvps));
        }
        Ok(activities)
    }
}

#[async_trait]
impl TargetLookup for Facebook {
    async fn lookup(&self, id: &str) -> Result<Value, SourceError> {
        self.api_get(id).await
    }
}

#[async_trait]
impl Source for Facebook {
    fn url_patterns(&self) -> &UrlPatternTable {
        url_patterns()
    }

    /// The home feed by default, the user's own posts for `@self`. An
    /// activity id overrides every other filter.
    async fn fetch_activities_response(
        &self,
        filter: &ActivityFilter,
    ) -> Result<ActivitiesResponse, SourceError> {
        let unsupported = [
            ("fetch_shares", filter.fetch_shares),
            ("fetch_mentions", filter.fetch_mentions),
            ("search_query", filter.search_query.is_some()),
        ];
        if let Some((name, _)) = unsupported.iter().find(|(_, set)| *set) {
            return Err(SourceError::UnsupportedFilter(name.to_string()));
        }
        let start = filter.start_index.unwrap_or(0);

        if let Some(activity_id) = &filter.activity_id {
            let found = self
                .resolver()
                .owner_hint(filter.user_id.as_deref())
                .lookup_id(activity_id, self)
                .await?;
            let items = found
                .and_then(|target| target.object)
                .map(|post| self.activity_from_json(&post))
                .filter(|activity| activity.object.id.is_some())
                .into_iter()
                .collect();
            return Ok(ActivitiesResponse::page(items, start));
        }

        let user = filter.user_id.as_deref().unwrap_or("me");
        let path = match filter.group() {
            GroupId::SelfFeed => API_POSTS.replace("{}", user),
            GroupId::Friends => API_HOME.replace("{}", user),
            _ => return Err(SourceError::UnsupportedFilter("group_id".to_string())),
        };
        let mut params = vec![("offset".to_string(), start.to_string())];
        if let Some(count) = filter.count {
            params.push(("limit".to_string(), count.to_string()));
        }
        let headers: Vec<(String, String)> = filter
            .etag
            .iter()
            .map(|etag| ("If-none-match".to_string(), etag.clone()))
            .collect();

        let response = self.api_response(&path, &params, &headers).await?;
        if response.is_not_modified() {
            debug!("{} not modified", path);
            return Ok(ActivitiesResponse::not_modified(filter.etag.clone(), start));
        }
        let posts: Page<Post> = parse_native(&response.json()?);
        let mut items: Vec<Activity> = posts.data.iter().map(|post| self.to_activity(post)).collect();
        if filter.fetch_events {
            items.extend(self.fetch_events(user).await?);
        }

        let mut page = ActivitiesResponse::page(items, start);
        page.etag = response.header("ETag").map(String::from);
        Ok(page)
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

#[cfg(test)]
mod tests {
    use super::*;
    use as1_model::ObjectType;
    use as1_source::testing::MockTransport;
    use as1_source::Method;
    use serde_json::json;

    pub(crate) fn facebook(transport: &MockTransport) -> Facebook {
        Facebook::new(FacebookConfig::default(), Arc::new(transport.clone()))
    }

    pub(crate) fn tag_uri(name: &str) -> String {
        format!("tag:facebook.com,2013:{}", name)
    }

    pub(crate) fn comment() -> Value {
        json!({
            "id": "547822715231468_6796480",
            "from": {"name": "Ryan Barrett", "id": "212038"},
            "message": "cc Sam G, Michael M",
            "message_tags": [{
                "id": "221330",
                "name": "Sam G",
                "type": "user",
                "offset": 3,
                "length": 5,
            }, {
                "id": "695687650",
                "name": "Michael Mandel",
                "type": "user",
                "offset": 10,
                "length": 9,
            }],
            "created_time": "2012-12-05T00:58:26+0000",
            "privacy": {"value": "FRIENDS"},
        })
    }

    pub(crate) fn post() -> Value {
        json!({
            "id": "212038_10100176064482163",
            "from": {"name": "Ryan Barrett", "id": "212038"},
            "to": {"data": [
                {"name": "Friend 1", "id": "234"},
                {"name": "Friend 2", "id": "345"},
            ]},
            "with_tags": {"data": [
                {"name": "Friend 2", "id": "345"},
                {"name": "Friend 3", "id": "456"},
            ]},
            "story": "Ryan Barrett added a new photo.",
            "picture": "https://fbcdn-photos-a.akamaihd.net/abc_xyz_s.jpg",
            "message": "Checking another side project off my list. portablecontacts-unofficial is live! &3 Super Happy Block Party Hackathon, >\\o/< Daniel M.",
            "message_tags": {
                "84": [{
                    "id": "283938455011303",
                    "name": "Super Happy Block Party Hackathon",
                    "type": "event",
                    "offset": 83,
                    "length": 33,
                }],
                "122": [{
                    "id": "789",
                    "name": "Daniel M",
                    "type": "user",
                    "offset": 124,
                    "length": 8,
                }],
            },
            "link": "http://my.link/",
            "name": "my link name",
            "caption": "my link caption",
            "description": "my link description",
            "place": {
                "id": "113785468632283",
                "name": "Lake Merced",
                "location": {
                    "city": "San Francisco",
                    "latitude": 37.728193717481,
                    "longitude": -122.49336423595,
                },
            },
            "type": "photo",
            "application": {"name": "Facebook for Android", "id": "350685531728"},
            "created_time": "2012-03-04T18:20:37+0000",
            "updated_time": "2012-03-04T19:08:16+0000",
            "comments": {"data": [comment()], "count": 1},
            "likes": {"data": [
                {"id": "100004", "name": "Alice X"},
                {"id": "683713", "name": "Bob Y"},
            ]},
            "privacy": {"value": "EVERYONE"},
        })
    }

    pub(crate) fn event() -> Value {
        json!({
            "id": "145304994",
            "owner": {"name": "Aaron P", "id": "11500"},
            "name": "Homebrew Website Club",
            "description": "you should come maybe, kthxbye",
            "start_time": "2014-01-29T18:30:00-0800",
            "end_time": "2014-01-29T19:30:00-0800",
            "location": "PDX",
            "venue": {"name": "PDX"},
            "privacy": "OPEN",
            "updated_time": "2014-01-22T01:29:15+0000",
            "comments": {"data": [{
                "id": "777",
                "created_time": "2010-10-01T00:23:04+0000",
                "from": {"name": "Mr. Foo", "id": "888"},
                "message": "i hereby comment",
            }]},
            "picture": {"data": {"url": "https://fbcdn-sphotos-a-a.akamaihd.net/abc/pic_n.jpg?xyz"}},
        })
    }

    pub(crate) fn rsvps() -> Value {
        json!([
            {"name": "Aaron P", "rsvp_status": "attending", "id": "11500"},
            {"name": "Ryan B", "rsvp_status": "declined", "id": "212038"},
            {"name": "Foo", "rsvp_status": "unsure", "id": "987"},
            {"name": "Bar", "rsvp_status": "not_replied", "id": "654"},
        ])
    }

    #[test]
    fn test_config_defaults() {
        let config: FacebookConfig = serde_json::from_value(json!({"access_token": "asdf"})).unwrap();
        assert_eq!(config.api_base, API_BASE);
        let facebook = Facebook::new(
            FacebookConfig {
                api_base: "http://graph".to_string(),
                ..config
            },
            Arc::new(MockTransport::new()),
        );
        assert_eq!(facebook.api_url("me/home"), "http://graph/me/home");
    }

    #[test]
    fn test_url_patterns() {
        let patterns = url_patterns();
        let post = patterns
            .extract("https://www.facebook.com/snarfed.org/posts/333")
            .unwrap();
        assert_eq!(post.id, "333");
        assert_eq!(post.owner.as_deref(), Some("snarfed.org"));
        assert_eq!(
            patterns
                .extract("https://www.facebook.com/photo.php?fbid=333&set=a.4.4&permPage=1")
                .unwrap()
                .id,
            "333"
        );
        let permalink = patterns
            .extract("https://m.facebook.com/permalink.php?story_fbid=12&id=34")
            .unwrap();
        assert_eq!((permalink.id.as_str(), permalink.owner.as_deref()), ("12", Some("34")));
        assert_eq!(patterns.extract("https://facebook.com/events/145").unwrap().id, "145");
        assert_eq!(patterns.extract("https://facebook.com/234/").unwrap().id, "234");
        assert_eq!(patterns.extract("https://facebook.com/snarfed.org"), None);
        assert_eq!(patterns.extract("https://foo.com/1234"), None);
    }

    #[tokio::test]
    async fn test_get_actor() {
        let transport = MockTransport::new().with_get(
            "https://graph.facebook.com/me",
            200,
            json!({"id": "212038", "username": "snarfed.org", "name": "Ryan Barrett"}),
        );
        let actor = facebook(&transport).get_actor(None).await.unwrap();
        assert_eq!(actor.id, Some(tag_uri("snarfed.org")));
        assert_eq!(actor.display_name.as_deref(), Some("Ryan Barrett"));
    }

    #[tokio::test]
    async fn test_fetch_home_feed() {
        let transport = MockTransport::new().with_get(
            "https://graph.facebook.com/me/home?offset=0",
            200,
            json!({"data": [
                {"id": "1_2", "message": "foo"},
                {"id": "3_4", "message": "bar"},
            ]}),
        );
        let activities = facebook(&transport)
            .fetch_activities(&ActivityFilter::default())
            .await
            .unwrap();
        assert_eq!(
            serde_json::to_value(&activities).unwrap(),
            json!([{
                "verb": "post",
                "id": tag_uri("2"),
                "url": "https://facebook.com/2",
                "object": {
                    "objectType": "note",
                    "id": tag_uri("2"),
                    "url": "https://facebook.com/2",
                    "content": "foo",
                },
            }, {
                "verb": "post",
                "id": tag_uri("4"),
                "url": "https://facebook.com/4",
                "object": {
                    "objectType": "note",
                    "id": tag_uri("4"),
                    "url": "https://facebook.com/4",
                    "content": "bar",
                },
            }])
        );
    }

    #[tokio::test]
    async fn test_fetch_self_paged_with_token() {
        let transport = MockTransport::new().with_get(
            "https://graph.facebook.com/me/posts?offset=3&limit=5&access_token=asdf",
            200,
            json!({}),
        );
        let facebook = Facebook::new(
            FacebookConfig {
                access_token: Some("asdf".to_string()),
                ..FacebookConfig::default()
            },
            Arc::new(transport.clone()),
        );
        let filter = ActivityFilter {
            group_id: Some(GroupId::SelfFeed),
            start_index: Some(3),
            count: Some(5),
            ..ActivityFilter::default()
        };
        let response = facebook.fetch_activities_response(&filter).await.unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.start_index, 3);
        assert_eq!(
            transport.urls(),
            vec!["https://graph.facebook.com/me/posts?offset=3&limit=5&access_token=asdf"]
        );
    }

    #[tokio::test]
    async fn test_fetch_activity_id_overrides_others() {
        let transport =
            MockTransport::new().with_get("https://graph.facebook.com/000", 200, post());
        let filter = ActivityFilter {
            user_id: Some("123".to_string()),
            group_id: Some(GroupId::Other("456".to_string())),
            start_index: Some(3),
            count: Some(6),
            ..ActivityFilter::activity("000")
        };
        let activities = facebook(&transport).fetch_activities(&filter).await.unwrap();
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].id, Some(tag_uri("10100176064482163")));
        assert_eq!(transport.urls(), vec!["https://graph.facebook.com/000"]);
    }

    #[tokio::test]
    async fn test_fetch_activity_id_not_found() {
        let transport = MockTransport::new()
            .with_response(
                Method::Get,
                "https://graph.facebook.com/0",
                HttpResponse::new(200, "false"),
            );
        let activities = facebook(&transport)
            .fetch_activities(&ActivityFilter::activity("0_0"))
            .await
            .unwrap();
        assert!(activities.is_empty());
        assert_eq!(
            transport.urls(),
            vec!["https://graph.facebook.com/0", "https://graph.facebook.com/0_0"]
        );
    }

    #[tokio::test]
    async fn test_fetch_activity_id_fallbacks() {
        let transport = MockTransport::new()
            .with_get("https://graph.facebook.com/34", 400, json!({}))
            .with_get("https://graph.facebook.com/12_34", 500, json!({}))
            .with_get(
                "https://graph.facebook.com/56_34",
                200,
                json!({"id": "56_34", "message": "found"}),
            );
        let filter = ActivityFilter {
            user_id: Some("56".to_string()),
            ..ActivityFilter::activity("12_34")
        };
        let activities = facebook(&transport).fetch_activities(&filter).await.unwrap();
        assert_eq!(activities[0].object.content.as_deref(), Some("found"));
        assert_eq!(
            transport.urls(),
            vec![
                "https://graph.facebook.com/34",
                "https://graph.facebook.com/12_34",
                "https://graph.facebook.com/56_34",
            ]
        );
    }

    #[tokio::test]
    async fn test_fetch_etags() {
        let transport = MockTransport::new().with_response(
            Method::Get,
            "https://graph.facebook.com/me/home?offset=0",
            HttpResponse::from_json(200, &json!({})).with_header("ETag", "\"new etag\""),
        );
        let filter = ActivityFilter {
            etag: Some("\"my etag\"".to_string()),
            ..ActivityFilter::default()
        };
        let response = facebook(&transport)
            .fetch_activities_response(&filter)
            .await
            .unwrap();
        assert_eq!(response.etag.as_deref(), Some("\"new etag\""));
        assert_eq!(
            transport.calls()[0].headers,
            vec![("If-none-match".to_string(), "\"my etag\"".to_string())]
        );
    }

    #[tokio::test]
    async fn test_fetch_not_modified() {
        let transport = MockTransport::new().with_response(
            Method::Get,
            "https://graph.facebook.com/me/home?offset=0",
            HttpResponse::new(304, ""),
        );
        let filter = ActivityFilter {
            etag: Some("\"my etag\"".to_string()),
            ..ActivityFilter::default()
        };
        let response = facebook(&transport)
            .fetch_activities_response(&filter)
            .await
            .unwrap();
        assert!(response.items.is_empty());
        assert_eq!(response.etag.as_deref(), Some("\"my etag\""));
    }

    #[tokio::test]
    async fn test_fetch_events_with_rsvps() {
        let transport = MockTransport::new()
            .with_get("https://graph.facebook.com/me/home?offset=0", 200, json!({"data": []}))
            .with_get("https://graph.facebook.com/me/events", 200, json!({"data": [event()]}))
            .with_get(
                "https://graph.facebook.com/145304994/invited",
                200,
                json!({"data": rsvps()}),
            );
        let filter = ActivityFilter {
            fetch_events: true,
            ..ActivityFilter::default()
        };
        let activities = facebook(&transport).fetch_activities(&filter).await.unwrap();
        assert_eq!(activities.len(), 1);
        let event = &activities[0].object;
        assert_eq!(event.object_type, Some(ObjectType::Event));
        assert_eq!(event.attending.len(), 1);
        assert_eq!(event.invited[0].display_name.as_deref(), Some("Bar"));
    }

    #[tokio::test]
    async fn test_fetch_unsupported() {
        let facebook = facebook(&MockTransport::new());
        for (filter, name) in [
            (
                ActivityFilter {
                    fetch_mentions: true,
                    ..ActivityFilter::default()
                },
                "fetch_mentions",
            ),
            (
                ActivityFilter {
                    group_id: Some(GroupId::All),
                    ..ActivityFilter::default()
                },
                "group_id",
            ),
        ] {
            match facebook.fetch_activities(&filter).await {
                Err(SourceError::UnsupportedFilter(unsupported)) => assert_eq!(unsupported, name),
                other => panic!("expected unsupported {}, got {:?}", name, other),
            }
        }
    }

    #[tokio::test]
    async fn test_get_comment() {
        let transport =
            MockTransport::new().with_get("https://graph.facebook.com/123_456", 200, comment());
        let facebook = facebook(&transport);
        let object = facebook.get_comment("123_456", None).await.unwrap();
        assert_eq!(
            object.url.as_deref(),
            Some("https://facebook.com/547822715231468?comment_id=6796480")
        );

        let object = facebook
            .get_comment("123_456", Some("my-author"))
            .await
            .unwrap();
        assert_eq!(
            object.url.as_deref(),
            Some("https://facebook.com/my-author/posts/547822715231468?comment_id=6796480")
        );
    }

    #[tokio::test]
    async fn test_get_comment_retries_last_segment() {
        let transport = MockTransport::new()
            .with_get("https://graph.facebook.com/123_456_789", 400, json!({}))
            .with_get("https://graph.facebook.com/789", 200, comment());
        let object = facebook(&transport)
            .get_comment("123_456_789", None)
            .await
            .unwrap();
        assert_eq!(object.id, Some(tag_uri("547822715231468_6796480")));
    }

    #[tokio::test]
    async fn test_get_like() {
        let transport =
            MockTransport::new().with_get("https://graph.facebook.com/000", 200, post());
        let facebook = facebook(&transport);
        let like = facebook.get_like("000", "683713").await.unwrap().unwrap();
        assert_eq!(like.id, Some(tag_uri("10100176064482163_liked_by_683713")));
        assert_eq!(like.display_name.as_deref(), Some("Bob Y likes this."));
        assert_eq!(facebook.get_like("000", "999").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_get_rsvp() {
        let transport = MockTransport::new()
            .with_get(
                "https://graph.facebook.com/145304994/invited/456",
                200,
                json!({"data": [{"name": "Aaron P", "rsvp_status": "attending", "id": "11500"}]}),
            )
            .with_get("https://graph.facebook.com/000/invited/456", 200, json!({"data": []}));
        let facebook = facebook(&transport);
        let rsvp = facebook.get_rsvp("145304994", "456").await.unwrap().unwrap();
        assert_eq!(rsvp.verb, Some(Verb::RsvpYes));
        assert_eq!(rsvp.id, Some(tag_uri("145304994_rsvp_11500")));
        assert_eq!(rsvp.url.as_deref(), Some("https://facebook.com/145304994#11500"));
        assert_eq!(facebook.get_rsvp("000", "456").await.unwrap(), None);
    }
}

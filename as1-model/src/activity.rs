use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::{Actor, Object, ObjectType, OneOrList, Ref, Verb};

/// An actor doing `verb` to exactly one `object`.
///
/// Comments are posts whose object has `objectType: comment`; there is no
/// comment verb.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub verb: Verb,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    pub object: Object,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<Actor>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Context>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub in_reply_to: Vec<Ref>,
}

impl Activity {
    /// Wraps a bare object in a post activity, lifting its identity and
    /// author onto the activity.
    pub fn from_object(object: Object) -> Self {
        Activity {
            verb: Verb::Post,
            id: object.id.clone(),
            url: object.url.clone(),
            published: object.published.clone(),
            updated: object.updated.clone(),
            actor: object.author.clone(),
            object,
            ..Activity::default()
        }
    }

    pub fn is_reaction(&self) -> bool {
        matches!(self.verb, Verb::Like | Verb::React | Verb::Share)
    }

    /// Reply targets from the object, then from the activity context.
    pub fn in_reply_to(&self) -> Vec<&Ref> {
        self.object
            .in_reply_to
            .iter()
            .chain(self.context.iter().flat_map(|context| context.in_reply_to.iter()))
            .collect()
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Activity verb. Verbs outside the known set keep their name in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Verb {
    #[default]
    Post,
    Like,
    Share,
    RsvpYes,
    RsvpNo,
    RsvpMaybe,
    RsvpInterested,
    Invite,
    React,
    Tag,
    Give,
    Listen,
    Other(String),
}

impl Verb {
    pub fn as_str(&self) -> &str {
        match self {
            Verb::Post => "post",
            Verb::Like => "like",
            Verb::Share => "share",
            Verb::RsvpYes => "rsvp-yes",
            Verb::RsvpNo => "rsvp-no",
            Verb::RsvpMaybe => "rsvp-maybe",
            Verb::RsvpInterested => "rsvp-interested",
            Verb::Invite => "invite",
            Verb::React => "react",
            Verb::Tag => "tag",
            Verb::Give => "give",
            Verb::Listen => "listen",
            Verb::Other(verb) => verb,
        }
    }

    pub fn is_rsvp(&self) -> bool {
        matches!(
            self,
            Verb::RsvpYes | Verb::RsvpNo | Verb::RsvpMaybe | Verb::RsvpInterested
        )
    }

    /// `yes` for `rsvp-yes` and so on.
    pub fn rsvp_value(&self) -> Option<&'static str> {
        match self {
            Verb::RsvpYes => Some("yes"),
            Verb::RsvpNo => Some("no"),
            Verb::RsvpMaybe => Some("maybe"),
            Verb::RsvpInterested => Some("interested"),
            _ => None,
        }
    }

    pub fn from_rsvp_value(value: &str) -> Option<Verb> {
        match value.trim().to_lowercase().as_str() {
            "yes" => Some(Verb::RsvpYes),
            "no" => Some(Verb::RsvpNo),
            "maybe" => Some(Verb::RsvpMaybe),
            "interested" => Some(Verb::RsvpInterested),
            _ => None,
        }
    }
}

impl From<&str> for Verb {
    fn from(verb: &str) -> Self {
        match verb {
            "post" => Verb::Post,
            "like" => Verb::Like,
            "share" => Verb::Share,
            "rsvp-yes" => Verb::RsvpYes,
            "rsvp-no" => Verb::RsvpNo,
            "rsvp-maybe" => Verb::RsvpMaybe,
            "rsvp-interested" => Verb::RsvpInterested,
            "invite" => Verb::Invite,
            "react" => Verb::React,
            "tag" => Verb::Tag,
            "give" => Verb::Give,
            "listen" => Verb::Listen,
            other => Verb::Other(other.to_string()),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Verb {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Verb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let verb = String::deserialize(deserializer)?;
        Ok(Verb::from(verb.as_str()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Note,
    Article,
    Comment,
    Image,
    Video,
    Audio,
    Event,
    Activity,
    Product,
    Place,
    Person,
    Group,
    Mention,
    Hashtag,
    Collection,
    Other(String),
}

impl ObjectType {
    pub fn as_str(&self) -> &str {
        match self {
            ObjectType::Note => "note",
            ObjectType::Article => "article",
            ObjectType::Comment => "comment",
            ObjectType::Image => "image",
            ObjectType::Video => "video",
            ObjectType::Audio => "audio",
            ObjectType::Event => "event",
            ObjectType::Activity => "activity",
            ObjectType::Product => "product",
            ObjectType::Place => "place",
            ObjectType::Person => "person",
            ObjectType::Group => "group",
            ObjectType::Mention => "mention",
            ObjectType::Hashtag => "hashtag",
            ObjectType::Collection => "collection",
            ObjectType::Other(object_type) => object_type,
        }
    }
}

impl From<&str> for ObjectType {
    fn from(object_type: &str) -> Self {
        match object_type {
            "note" => ObjectType::Note,
            "article" => ObjectType::Article,
            "comment" => ObjectType::Comment,
            "image" => ObjectType::Image,
            "video" => ObjectType::Video,
            "audio" => ObjectType::Audio,
            "event" => ObjectType::Event,
            "activity" => ObjectType::Activity,
            "product" => ObjectType::Product,
            "place" => ObjectType::Place,
            "person" => ObjectType::Person,
            "group" => ObjectType::Group,
            "mention" => ObjectType::Mention,
            "hashtag" => ObjectType::Hashtag,
            "collection" => ObjectType::Collection,
            other => ObjectType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ObjectType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ObjectType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let object_type = String::deserialize(deserializer)?;
        Ok(ObjectType::from(object_type.as_str()))
    }
}

use serde::{
    de::{self, MapAccess, Visitor},
    Deserialize, Deserializer, Serialize,
};
use serde_with::{serde_as, DefaultOnError};
use std::{convert::Infallible, fmt, str::FromStr};

use crate::ObjectType;

/// Image or stream link. Accepts either a bare URL string or a map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Image {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            display_name: None,
        }
    }
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageFields {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    display_name: Option<String>,
}

impl FromStr for Image {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Image::new(s))
    }
}

// https://serde.rs/string-or-struct.html
impl<'de> Deserialize<'de> for Image {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DeserializeImage;

        impl<'de> Visitor<'de> for DeserializeImage {
            type Value = Image;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("string or map")
            }

            fn visit_str<E>(self, value: &str) -> Result<Image, E>
            where
                E: de::Error,
            {
                Ok(Image::new(value))
            }

            fn visit_map<M>(self, map: M) -> Result<Image, M::Error>
            where
                M: MapAccess<'de>,
            {
                let fields = ImageFields::deserialize(de::value::MapAccessDeserializer::new(map))?;
                Ok(Image {
                    url: fields.url,
                    display_name: fields.display_name,
                })
            }
        }

        deserializer.deserialize_any(DeserializeImage)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct UrlValue {
    pub value: String,
}

impl UrlValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Weak pointer to another entity, resolved by lookup rather than traversal.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Ref {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Ref {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: Some(url.into()),
        }
    }

    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            url: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.url.is_none()
    }
}

pub const PUBLIC_ALIAS: &str = "@public";
pub const PRIVATE_ALIAS: &str = "@private";

/// Audience group in `to`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Audience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl Audience {
    pub fn group(alias: impl Into<String>) -> Self {
        Self {
            object_type: Some(ObjectType::Group),
            alias: Some(alias.into()),
            display_name: None,
        }
    }

    pub fn public() -> Self {
        Self::group(PUBLIC_ALIAS)
    }

    pub fn private(value: impl Into<String>) -> Self {
        Self {
            display_name: Some(value.into()),
            ..Self::group(PRIVATE_ALIAS)
        }
    }

    /// Empty or absent privacy is public; platform spellings of "everyone"
    /// are public too; any other value is private, tagged with that value.
    pub fn from_privacy(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::public(),
            Some(value)
                if value.eq_ignore_ascii_case("EVERYONE") || value.eq_ignore_ascii_case("OPEN") =>
            {
                Self::public()
            }
            Some(value) => Self::private(value),
        }
    }

    pub fn is_public(&self) -> bool {
        self.alias.as_deref() == Some(PUBLIC_ALIAS)
    }
}

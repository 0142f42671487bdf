use as1_model::OneOrList;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use serde_with::{serde_as, DefaultOnError};
use std::collections::BTreeMap;

/// One microformats2 item: `{type, properties, children, value}`.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct Item {
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(rename = "type", default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    #[serde_as(deserialize_as = "DefaultOnError<BTreeMap<_, OneOrList>>")]
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, Vec<PropertyValue>>,
    #[serde_as(deserialize_as = "DefaultOnError<OneOrList>")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Item>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

/// A property value: plain text, embedded markup, or a nested item.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Text(String),
    Item(Item),
    Embedded {
        #[serde(skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        html: Option<String>,
    },
}

impl<'de> Deserialize<'de> for PropertyValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(PropertyValue::Text(text)),
            Value::Null => Ok(PropertyValue::Text(String::new())),
            Value::Array(_) => Err(D::Error::custom("expected a single property value")),
            Value::Object(map) if map.contains_key("type") || map.contains_key("properties") => {
                Item::deserialize(Value::Object(map))
                    .map(PropertyValue::Item)
                    .map_err(D::Error::custom)
            }
            Value::Object(map) => {
                let field = |name: &str| map.get(name).and_then(Value::as_str).map(String::from);
                Ok(PropertyValue::Embedded {
                    value: field("value"),
                    html: field("html"),
                })
            }
            other => Ok(PropertyValue::Text(other.to_string())),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(text: &str) -> Self {
        PropertyValue::Text(text.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(text: String) -> Self {
        PropertyValue::Text(text)
    }
}

impl From<Item> for PropertyValue {
    fn from(item: Item) -> Self {
        PropertyValue::Item(item)
    }
}

impl PropertyValue {
    /// Plain text of the value. For nested items this is the item's `value`.
    pub fn text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(text) => Some(text),
            PropertyValue::Embedded { value, .. } => value.as_deref(),
            PropertyValue::Item(item) => item.value.as_deref(),
        }
    }

    pub fn html(&self) -> Option<&str> {
        match self {
            PropertyValue::Embedded { html, .. } => html.as_deref(),
            _ => None,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            PropertyValue::Item(item) => Some(item),
            _ => None,
        }
    }
}

impl Item {
    pub fn new<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn has_type(&self, item_type: &str) -> bool {
        self.types.iter().any(|t| t == item_type)
    }

    /// Has at least one `h-*` root class.
    pub fn is_h(&self) -> bool {
        self.types.iter().any(|t| t.starts_with("h-"))
    }

    pub fn get(&self, name: &str) -> &[PropertyValue] {
        self.properties
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool {
        !self.get(name).is_empty()
    }

    pub fn first(&self, name: &str) -> Option<&PropertyValue> {
        self.get(name).first()
    }

    /// Text of the first value of `name`, when it is not blank.
    pub fn first_text(&self, name: &str) -> Option<&str> {
        self.first(name)
            .and_then(PropertyValue::text)
            .filter(|text| !text.trim().is_empty())
    }

    /// Appends `value` to property `name`.
    pub fn push(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.properties
            .entry(name.to_string())
            .or_default()
            .push(value.into());
    }

    /// Appends each value, skipping blank text.
    pub fn extend<I, V>(&mut self, name: &str, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<PropertyValue>,
    {
        for value in values {
            let value = value.into();
            if value.text().map_or(false, str::is_empty) && value.as_item().is_none() {
                continue;
            }
            self.push(name, value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty() && self.properties.is_empty() && self.children.is_empty()
    }
}

/// String URLs in `values`, descending into nested `h-*` items until a
/// string is found. Items without an `h-*` type are skipped.
pub fn get_string_urls(values: &[PropertyValue]) -> Vec<String> {
    let mut urls = Vec::new();
    for value in values {
        match value {
            PropertyValue::Text(text) => urls.push(text.clone()),
            PropertyValue::Embedded { value: Some(text), .. } => urls.push(text.clone()),
            PropertyValue::Embedded { value: None, .. } => {}
            PropertyValue::Item(item) if item.is_h() => urls.extend(get_string_urls(item.get("url"))),
            PropertyValue::Item(_) => {}
        }
    }
    urls
}

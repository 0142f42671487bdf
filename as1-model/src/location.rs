use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DefaultOnError};

use crate::ObjectType;

/// A place. `position` is derived from the coordinates and cannot be set
/// directly; it is recomputed on every coordinate change and on
/// deserialization.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "LocationFields")]
pub struct Location {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_type: Option<ObjectType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    position: Option<String>,
}

impl Location {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn place() -> Self {
        Self {
            object_type: Some(ObjectType::Place),
            ..Self::default()
        }
    }

    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.set_coordinates(latitude, longitude);
        self
    }

    pub fn set_coordinates(&mut self, latitude: f64, longitude: f64) {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self.position = Some(iso_6709(latitude, longitude));
    }

    pub fn latitude(&self) -> Option<f64> {
        self.latitude
    }

    pub fn longitude(&self) -> Option<f64> {
        self.longitude
    }

    pub fn position(&self) -> Option<&str> {
        self.position.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none()
            && self.display_name.is_none()
            && self.url.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
    }
}

/// `+37.728194-122.493364/`
pub fn iso_6709(latitude: f64, longitude: f64) -> String {
    fn sign(value: f64) -> char {
        if value < 0.0 {
            '-'
        } else {
            '+'
        }
    }
    format!(
        "{}{:09.6}{}{:010.6}/",
        sign(latitude),
        latitude.abs(),
        sign(longitude),
        longitude.abs()
    )
}

#[serde_as]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LocationFields {
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    object_type: Option<ObjectType>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    id: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    display_name: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    url: Option<String>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    latitude: Option<f64>,
    #[serde_as(deserialize_as = "DefaultOnError")]
    #[serde(default)]
    longitude: Option<f64>,
}

impl From<LocationFields> for Location {
    fn from(fields: LocationFields) -> Self {
        let mut location = Location {
            object_type: fields.object_type,
            id: fields.id,
            display_name: fields.display_name,
            url: fields.url,
            ..Location::default()
        };
        if let (Some(latitude), Some(longitude)) = (fields.latitude, fields.longitude) {
            location.set_coordinates(latitude, longitude);
        }
        location
    }
}

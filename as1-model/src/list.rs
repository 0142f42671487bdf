use serde::{de::Error as _, Deserialize, Deserializer};
use serde_json::Value;
use serde_with::{de::DeserializeAsWrap, DeserializeAs, Same};
use std::marker::PhantomData;

/// Reads either a JSON array or a single value into a `Vec`.
///
/// Unlike `serde_with::OneOrMany`, arrays are always read as the list, so a
/// short array of structs is never taken for one struct in sequence form.
/// Array elements that fail to parse are skipped.
pub struct OneOrList<T = Same>(PhantomData<T>);

impl<'de, T, U> DeserializeAs<'de, Vec<T>> for OneOrList<U>
where
    U: DeserializeAs<'de, T>,
{
    fn deserialize_as<D>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| DeserializeAsWrap::<T, U>::deserialize(item).ok())
                .map(DeserializeAsWrap::into_inner)
                .collect()),
            Value::Null => Ok(Vec::new()),
            one => DeserializeAsWrap::<T, U>::deserialize(one)
                .map(|one| vec![one.into_inner()])
                .map_err(D::Error::custom),
        }
    }
}

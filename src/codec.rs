//! Serde support: a `SkipDict` serializes as a map in ascending key order.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::policy::{KeyPolicy, OwnershipHooks};
use crate::SkipDict;

impl<K, V, G, P, H> Serialize for SkipDict<K, V, G, P, H>
where
    K: Serialize,
    V: Serialize,
    P: KeyPolicy<K>,
    H: OwnershipHooks<K, V>,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value.as_ref())?;
        }
        map.end()
    }
}

struct SkipDictVisitor<K, V> {
    _phantom: PhantomData<(K, V)>,
}

impl<'de, K, V> Visitor<'de> for SkipDictVisitor<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    type Value = SkipDict<K, V>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut dict = SkipDict::new();
        while let Some((key, value)) = access.next_entry::<K, V>()? {
            dict.set(key, value).map_err(de::Error::custom)?;
        }
        Ok(dict)
    }
}

impl<'de, K, V> Deserialize<'de> for SkipDict<K, V>
where
    K: Deserialize<'de> + Ord,
    V: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(SkipDictVisitor {
            _phantom: PhantomData,
        })
    }
}

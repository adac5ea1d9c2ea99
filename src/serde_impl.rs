//! Serde support (feature `serde`). Both map types serialize as plain maps
//! in insertion order; deserializing applies the same last-value-wins rule
//! as construction.

use core::fmt;
use core::hash::Hash;
use core::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::store::Store;
use crate::{FrozenDict, HashableFrozenDict};

impl<K, V> Serialize for FrozenDict<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<K, V> Serialize for HashableFrozenDict<K, V>
where
    K: Serialize,
    V: Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_frozen().serialize(serializer)
    }
}

struct FrozenDictVisitor<K, V> {
    _pd: PhantomData<fn() -> (K, V)>,
}

impl<'de, K, V> Visitor<'de> for FrozenDictVisitor<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    type Value = FrozenDict<K, V>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut store = Store::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((k, v)) = access.next_entry()? {
            store.insert(k, v);
        }
        Ok(FrozenDict::from_store(store))
    }
}

impl<'de, K, V> Deserialize<'de> for FrozenDict<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(FrozenDictVisitor { _pd: PhantomData })
    }
}

impl<'de, K, V> Deserialize<'de> for HashableFrozenDict<K, V>
where
    K: Deserialize<'de> + Eq + Hash,
    V: Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        FrozenDict::deserialize(deserializer).map(HashableFrozenDict::from)
    }
}

#[cfg(test)]
mod tests {
    use crate::{FrozenDict, HashableFrozenDict, HashState};

    #[test]
    fn json_round_trip_keeps_order() {
        let m = FrozenDict::from_pairs([("b".to_string(), 2), ("a".to_string(), 1)]);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, r#"{"b":2,"a":1}"#);
        let back: FrozenDict<String, i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
        assert_eq!(back.to_pairs(), m.to_pairs());
    }

    #[test]
    fn duplicate_json_keys_keep_last_value() {
        let m: FrozenDict<String, i32> = serde_json::from_str(r#"{"a":1,"b":2,"a":3}"#).unwrap();
        assert_eq!(m.len(), 2);
        assert_eq!(m["a"], 3);
        assert_eq!(m.first(), Some((&"a".to_string(), &3)));
    }

    #[test]
    fn hashable_round_trip_starts_unset() {
        let m = HashableFrozenDict::from_pairs([("x".to_string(), 1u8)]);
        let h = m.try_hash().unwrap();
        let back: HashableFrozenDict<String, u8> =
            serde_json::from_str(&serde_json::to_string(&m).unwrap()).unwrap();
        assert_eq!(back.hash_state(), HashState::Unset);
        assert_eq!(back.try_hash(), Ok(h));
    }
}

use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

/// `text_map.json`: an object keyed by stringified position.
///
/// Serialises in numeric key order so identical input gives identical bytes.
/// Deserialising accepts any key order but requires exactly `"0".."n-1"`.
pub(crate) struct TextMap<'a>(pub &'a [String]);

impl Serialize for TextMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (i, text) in self.0.iter().enumerate() {
            map.serialize_entry(&i.to_string(), text)?;
        }
        map.end()
    }
}

pub(crate) struct OwnedTextMap(pub Vec<String>);

impl<'de> Deserialize<'de> for OwnedTextMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: HashMap<String, String> = HashMap::deserialize(deserializer)?;
        let mut slots: Vec<Option<String>> = vec![None; raw.len()];
        for (key, text) in raw {
            let idx: usize = key.parse().map_err(|_| D::Error::custom(format!("text map key {key:?} is not an index")))?;
            let slot = slots.get_mut(idx).ok_or_else(|| D::Error::custom(format!("text map key {idx} out of range")))?;
            *slot = Some(text);
        }
        slots
            .into_iter()
            .enumerate()
            .map(|(i, s)| s.ok_or_else(|| D::Error::custom(format!("text map is missing key {i}"))))
            .collect::<Result<Vec<_>, _>>()
            .map(OwnedTextMap)
    }
}

use serde::ser::{Error as _, SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::Result;

use super::node::ValueData;
use super::{ArrayId, Document, ObjectId, ValueId};

struct ObjectView<'a> {
    doc: &'a Document,
    id: ObjectId,
}

struct ArrayView<'a> {
    doc: &'a Document,
    id: ArrayId,
}

struct ValueView<'a> {
    doc: &'a Document,
    id: ValueId,
}

impl Serialize for ObjectView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.doc.object_entries(self.id).map_err(S::Error::custom)?;
        let mut map = serializer.serialize_map(Some(entries.len()))?;
        for &entry in entries {
            let key = self.doc.named_entry_key(entry).map_err(S::Error::custom)?;
            let value = self.doc.named_entry_value(entry).map_err(S::Error::custom)?;
            map.serialize_entry(
                key,
                &ValueView {
                    doc: self.doc,
                    id: value,
                },
            )?;
        }
        map.end()
    }
}

impl Serialize for ArrayView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let entries = self.doc.array_entries(self.id).map_err(S::Error::custom)?;
        let mut seq = serializer.serialize_seq(Some(entries.len()))?;
        for &entry in entries {
            let value = self.doc.unnamed_entry_value(entry).map_err(S::Error::custom)?;
            seq.serialize_element(&ValueView {
                doc: self.doc,
                id: value,
            })?;
        }
        seq.end()
    }
}

impl Serialize for ValueView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let node = self.doc.value_node(self.id).map_err(S::Error::custom)?;
        match &node.data {
            ValueData::Object(id) => ObjectView { doc: self.doc, id: *id }.serialize(serializer),
            ValueData::Array(id) => ArrayView { doc: self.doc, id: *id }.serialize(serializer),
            ValueData::Integer(integer) => serializer.serialize_i64(*integer),
            ValueData::Double(double) => serializer.serialize_f64(*double),
            ValueData::String(string) => serializer.serialize_str(string),
            ValueData::Boolean(boolean) => serializer.serialize_bool(*boolean),
            ValueData::Null => serializer.serialize_unit(),
        }
    }
}

/// Serializes the root object; duplicate keys are emitted as-is.
impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ObjectView {
            doc: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

impl Document {
    /// Later duplicate keys overwrite earlier ones in the returned map.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ValueType;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn test_export_preserves_order_and_types() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        doc.add_string(root, "title", "It").unwrap();
        doc.add_boolean(root, "seen", true).unwrap();
        let tags = doc.add_array(root, "tags", ValueType::String).unwrap();
        doc.array_add_value(tags, "clown").unwrap();
        doc.add_double(root, "rating", 7.8).unwrap();
        doc.add_null(root, "poster").unwrap();

        let value = doc.to_json_value().unwrap();
        assert_eq!(
            value,
            json!({"title": "It", "seen": true, "tags": ["clown"], "rating": 7.8, "poster": null})
        );
        assert_eq!(
            doc.to_json_string().unwrap(),
            r#"{"title":"It","seen":true,"tags":["clown"],"rating":7.8,"poster":null}"#
        );
    }
}

//! JSON text to document, through the builder API only.
//!
//! Input is parsed into an intermediate tree that keeps every object member,
//! duplicate keys included, in input order. The tree is checked in full
//! before the first builder call, so a rejected input never leaves a
//! partial document behind.

mod parsed;
mod shape;

use std::io::Read;

use serde::Deserialize;
use serde_json::Value;

use crate::doc::{ArrayId, Document, ObjectId, Scalar, ValueType};
use crate::error::{Error, Result};
use crate::options::DocumentOptions;
use parsed::Parsed;

pub fn from_str(input: &str) -> Result<Document> {
    from_str_with_options(input, DocumentOptions::default())
}

pub fn from_str_with_options(input: &str, options: DocumentOptions) -> Result<Document> {
    let parsed: Parsed = serde_json::from_str(input)?;
    from_parsed(&parsed, options)
}

pub fn from_slice(input: &[u8]) -> Result<Document> {
    from_slice_with_options(input, DocumentOptions::default())
}

pub fn from_slice_with_options(input: &[u8], options: DocumentOptions) -> Result<Document> {
    let parsed: Parsed = serde_json::from_slice(input)?;
    from_parsed(&parsed, options)
}

pub fn from_reader<R: Read>(reader: R) -> Result<Document> {
    from_reader_with_options(reader, DocumentOptions::default())
}

pub fn from_reader_with_options<R: Read>(reader: R, options: DocumentOptions) -> Result<Document> {
    let parsed: Parsed = serde_json::from_reader(reader)?;
    from_parsed(&parsed, options)
}

pub fn from_value(value: &Value) -> Result<Document> {
    from_value_with_options(value, DocumentOptions::default())
}

pub fn from_value_with_options(value: &Value, options: DocumentOptions) -> Result<Document> {
    let parsed = Parsed::deserialize(value)?;
    from_parsed(&parsed, options)
}

fn from_parsed(parsed: &Parsed, options: DocumentOptions) -> Result<Document> {
    let Parsed::Object(members) = parsed else {
        return Err(Error::decode(format!(
            "document root must be an object, found {}",
            shape::value_type(parsed)
        )));
    };
    shape::check_object(members, "$")?;

    let mut doc = Document::with_options(options)?;
    let root = doc.root();
    build_object(&mut doc, root, members)?;
    let stats = doc.arena().stats();
    tracing::debug!(
        arena = doc.arena().id(),
        objects = stats.objects,
        arrays = stats.arrays,
        values = stats.values,
        "decoded document"
    );
    Ok(doc)
}

fn build_object(doc: &mut Document, object: ObjectId, members: &[(String, Parsed)]) -> Result<()> {
    for (key, value) in members {
        match value {
            Parsed::Object(child) => {
                let child_id = doc.add_object(object, key)?;
                build_object(doc, child_id, child)?;
            }
            Parsed::Array(items) => {
                let element_type = shape::element_type(items, key)?;
                let array = doc.add_array(object, key, element_type)?;
                build_array(doc, array, element_type, items)?;
            }
            scalar => {
                doc.add_scalar(object, key, to_scalar(scalar, ValueType::None)?)?;
            }
        }
    }
    Ok(())
}

fn build_array(doc: &mut Document, array: ArrayId, element_type: ValueType, items: &[Parsed]) -> Result<()> {
    for item in items {
        match item {
            Parsed::Object(members) => {
                let child = doc.array_add_object(array)?;
                build_object(doc, child, members)?;
            }
            Parsed::Array(inner) => {
                let inner_type = shape::element_type(inner, "$")?;
                let child = doc.array_add_array(array, inner_type)?;
                build_array(doc, child, inner_type, inner)?;
            }
            scalar => {
                doc.array_add_value(array, to_scalar(scalar, element_type)?)?;
            }
        }
    }
    Ok(())
}

/// `declared` widens integers inside double arrays.
fn to_scalar(value: &Parsed, declared: ValueType) -> Result<Scalar<'_>> {
    Ok(match value {
        Parsed::Null => Scalar::Null,
        Parsed::Boolean(boolean) => Scalar::Boolean(*boolean),
        Parsed::Integer(integer) if declared == ValueType::Double => Scalar::Double(*integer as f64),
        Parsed::Integer(integer) => Scalar::Integer(*integer),
        Parsed::Double(double) => Scalar::Double(*double),
        Parsed::String(string) => Scalar::String(string.as_str()),
        Parsed::Array(_) | Parsed::Object(_) => {
            return Err(Error::Internal("container passed as scalar".into()));
        }
    })
}

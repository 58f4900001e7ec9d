use super::parsed::Parsed;
use crate::doc::ValueType;
use crate::error::{Error, Result};

pub(crate) fn value_type(value: &Parsed) -> ValueType {
    match value {
        Parsed::Null => ValueType::Null,
        Parsed::Boolean(_) => ValueType::Boolean,
        Parsed::Integer(_) => ValueType::Integer,
        Parsed::Double(_) => ValueType::Double,
        Parsed::String(_) => ValueType::String,
        Parsed::Array(_) => ValueType::Array,
        Parsed::Object(_) => ValueType::Object,
    }
}

/// Declared element type of a JSON array.
///
/// Integers mixed with doubles widen to doubles; an empty array is an
/// array of nulls.
pub(crate) fn element_type(items: &[Parsed], path: &str) -> Result<ValueType> {
    let mut element = None;
    for (index, item) in items.iter().enumerate() {
        let found = value_type(item);
        element = Some(match element {
            None => found,
            Some(expected) if expected == found => expected,
            Some(ValueType::Integer) if found == ValueType::Double => ValueType::Double,
            Some(ValueType::Double) if found == ValueType::Integer => ValueType::Double,
            Some(expected) => {
                return Err(Error::decode(format!(
                    "{path}[{index}]: array of {expected} cannot hold {found}"
                )))
            }
        });
    }
    Ok(element.unwrap_or(ValueType::Null))
}

/// Rejects anything the builder would refuse, before anything is built.
pub(crate) fn check_object(members: &[(String, Parsed)], path: &str) -> Result<()> {
    for (key, value) in members {
        check_value(value, &format!("{path}.{key}"))?;
    }
    Ok(())
}

fn check_value(value: &Parsed, path: &str) -> Result<()> {
    match value {
        Parsed::Object(members) => check_object(members, path),
        Parsed::Array(items) => {
            element_type(items, path)?;
            for (index, item) in items.iter().enumerate() {
                check_value(item, &format!("{path}[{index}]"))?;
            }
            Ok(())
        }
        Parsed::Double(double) if !double.is_finite() => {
            Err(Error::decode(format!("{path}: non-finite number")))
        }
        _ => Ok(()),
    }
}

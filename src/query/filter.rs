use std::borrow::Borrow;
use std::fmt;
use std::rc::Rc;

use crate::doc::{Document, Element, ValueType};
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
    KeyValuePair,
    SingleValue,
    #[default]
    Any,
}

/// Equality against a fixed value, or an arbitrary test.
pub enum Predicate<T: ?Sized + ToOwned> {
    Equals(T::Owned),
    Custom(Rc<dyn Fn(&T) -> bool>),
}

impl<T: ?Sized + ToOwned> Predicate<T> {
    pub fn custom(test: impl Fn(&T) -> bool + 'static) -> Self {
        Predicate::Custom(Rc::new(test))
    }
}

impl<T: ?Sized + ToOwned + PartialEq> Predicate<T> {
    pub fn matches(&self, candidate: &T) -> bool {
        match self {
            Predicate::Equals(expected) => <T::Owned as Borrow<T>>::borrow(expected) == candidate,
            Predicate::Custom(test) => test(candidate),
        }
    }
}

impl<T: ?Sized + ToOwned> Clone for Predicate<T>
where
    T::Owned: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Predicate::Equals(expected) => Predicate::Equals(expected.clone()),
            Predicate::Custom(test) => Predicate::Custom(Rc::clone(test)),
        }
    }
}

impl<T: ?Sized + ToOwned> fmt::Debug for Predicate<T>
where
    T::Owned: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Equals(expected) => f.debug_tuple("Equals").field(expected).finish(),
            Predicate::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl From<&str> for Predicate<str> {
    fn from(value: &str) -> Self {
        Predicate::Equals(value.to_string())
    }
}

impl From<String> for Predicate<str> {
    fn from(value: String) -> Self {
        Predicate::Equals(value)
    }
}

macro_rules! equals_from {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Predicate<$ty> {
            fn from(value: $ty) -> Self {
                Predicate::Equals(value)
            }
        })*
    };
}

equals_from!(usize, i64, f64, bool, ValueType);

/// Depth-bounded predicate set evaluated against one element.
///
/// Every predicate that is set must hold; unset predicates accept anything.
/// Value and cardinality predicates reject elements of another type.
#[derive(Debug, Clone)]
pub struct Filter {
    min_depth: usize,
    max_depth: usize,
    key: Option<Predicate<str>>,
    index: Option<Predicate<usize>>,
    value_type: Option<Predicate<ValueType>>,
    entry_kind: EntryKind,
    integer: Option<Predicate<i64>>,
    double: Option<Predicate<f64>>,
    string: Option<Predicate<str>>,
    boolean: Option<Predicate<bool>>,
    array_len: (Option<usize>, Option<usize>),
    object_len: (Option<usize>, Option<usize>),
}

impl Filter {
    /// `max_depth` of `usize::MAX` means unbounded.
    pub fn new(min_depth: usize, max_depth: usize) -> Result<Self> {
        if min_depth > max_depth {
            return Err(Error::illegal_argument(format!(
                "min depth {min_depth} exceeds max depth {max_depth}"
            )));
        }
        Ok(Self::blank(min_depth, max_depth))
    }

    /// Matches at every depth.
    pub fn any() -> Self {
        Self::blank(0, usize::MAX)
    }

    fn blank(min_depth: usize, max_depth: usize) -> Self {
        Self {
            min_depth,
            max_depth,
            key: None,
            index: None,
            value_type: None,
            entry_kind: EntryKind::Any,
            integer: None,
            double: None,
            string: None,
            boolean: None,
            array_len: (None, None),
            object_len: (None, None),
        }
    }

    pub fn min_depth(&self) -> usize {
        self.min_depth
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn with_key_name(mut self, predicate: impl Into<Predicate<str>>) -> Self {
        self.key = Some(predicate.into());
        self
    }

    pub fn with_index(mut self, predicate: impl Into<Predicate<usize>>) -> Self {
        self.index = Some(predicate.into());
        self
    }

    pub fn with_value_type(mut self, predicate: impl Into<Predicate<ValueType>>) -> Self {
        self.value_type = Some(predicate.into());
        self
    }

    pub fn with_entry_kind(mut self, entry_kind: EntryKind) -> Self {
        self.entry_kind = entry_kind;
        self
    }

    pub fn with_integer(mut self, predicate: impl Into<Predicate<i64>>) -> Self {
        self.integer = Some(predicate.into());
        self
    }

    pub fn with_double(mut self, predicate: impl Into<Predicate<f64>>) -> Self {
        self.double = Some(predicate.into());
        self
    }

    pub fn with_string(mut self, predicate: impl Into<Predicate<str>>) -> Self {
        self.string = Some(predicate.into());
        self
    }

    pub fn with_boolean(mut self, predicate: impl Into<Predicate<bool>>) -> Self {
        self.boolean = Some(predicate.into());
        self
    }

    pub fn with_array_len_min(mut self, min: usize) -> Self {
        self.array_len.0 = Some(min);
        self
    }

    pub fn with_array_len_max(mut self, max: usize) -> Self {
        self.array_len.1 = Some(max);
        self
    }

    pub fn with_object_len_min(mut self, min: usize) -> Self {
        self.object_len.0 = Some(min);
        self
    }

    pub fn with_object_len_max(mut self, max: usize) -> Self {
        self.object_len.1 = Some(max);
        self
    }

    pub fn covers_depth(&self, depth: usize) -> bool {
        (self.min_depth..=self.max_depth).contains(&depth)
    }

    pub fn matches(&self, doc: &Document, element: Element, depth: usize) -> Result<bool> {
        if !self.covers_depth(depth) {
            return Ok(false);
        }
        match (self.entry_kind, element) {
            (EntryKind::KeyValuePair, Element::Unnamed(_))
            | (EntryKind::SingleValue, Element::Named(_)) => return Ok(false),
            _ => {}
        }
        if let Some(predicate) = &self.key {
            match doc.element_key(element)? {
                Some(key) if predicate.matches(key) => {}
                _ => return Ok(false),
            }
        }
        if let Some(predicate) = &self.index {
            if !predicate.matches(&doc.element_index(element)?) {
                return Ok(false);
            }
        }

        let value = doc.element_value(element)?;
        let value_type = doc.value_type(value)?;
        if let Some(predicate) = &self.value_type {
            if !predicate.matches(&value_type) {
                return Ok(false);
            }
        }
        if let Some(predicate) = &self.integer {
            if value_type != ValueType::Integer || !predicate.matches(&doc.value_as_integer(value)) {
                return Ok(false);
            }
        }
        if let Some(predicate) = &self.double {
            if value_type != ValueType::Double || !predicate.matches(&doc.value_as_double(value)) {
                return Ok(false);
            }
        }
        if let Some(predicate) = &self.string {
            match doc.value_as_string(value) {
                Some(string) if predicate.matches(string) => {}
                _ => return Ok(false),
            }
        }
        if let Some(predicate) = &self.boolean {
            if value_type != ValueType::Boolean || !predicate.matches(&doc.value_as_boolean(value)) {
                return Ok(false);
            }
        }
        if self.array_len != (None, None) {
            let Some(array) = doc.value_as_array(value) else {
                return Ok(false);
            };
            if !within(doc.array_len(array)?, self.array_len) {
                return Ok(false);
            }
        }
        if self.object_len != (None, None) {
            let Some(object) = doc.value_as_object(value) else {
                return Ok(false);
            };
            if !within(doc.object_len(object)?, self.object_len) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

fn within(len: usize, (min, max): (Option<usize>, Option<usize>)) -> bool {
    min.map_or(true, |min| len >= min) && max.map_or(true, |max| len <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample() -> (Document, Element, Element) {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        doc.add_integer(root, "reviews", 928).unwrap();
        let keywords = doc.add_array(root, "keywords", ValueType::String).unwrap();
        let cop = doc.array_add_value(keywords, "cop").unwrap();
        let entries = doc.object_entries(root).unwrap();
        let reviews = Element::Named(entries[0]);
        let cop = doc.element_of(cop).unwrap();
        (doc, reviews, cop)
    }

    #[rstest]
    #[case(Filter::any(), true)]
    #[case(Filter::any().with_key_name("reviews"), true)]
    #[case(Filter::any().with_key_name("title"), false)]
    #[case(Filter::any().with_integer(928), true)]
    #[case(Filter::any().with_integer(Predicate::custom(|n: &i64| *n > 1000)), false)]
    #[case(Filter::any().with_double(928.0), false)]
    #[case(Filter::any().with_value_type(ValueType::Integer), true)]
    #[case(Filter::any().with_entry_kind(EntryKind::SingleValue), false)]
    #[case(Filter::any().with_index(0usize), true)]
    #[case(Filter::new(1, 3).unwrap(), false)]
    fn test_named_integer(#[case] filter: Filter, #[case] expected: bool) {
        let (doc, reviews, _) = sample();
        assert_eq!(filter.matches(&doc, reviews, 0).unwrap(), expected);
    }

    #[rstest]
    #[case(Filter::any().with_string("cop"), true)]
    #[case(Filter::any().with_string(Predicate::custom(|s: &str| s.starts_with('c'))), true)]
    #[case(Filter::any().with_key_name("cop"), false)]
    #[case(Filter::any().with_entry_kind(EntryKind::KeyValuePair), false)]
    #[case(Filter::any().with_boolean(true), false)]
    fn test_unnamed_string(#[case] filter: Filter, #[case] expected: bool) {
        let (doc, _, cop) = sample();
        assert_eq!(filter.matches(&doc, cop, 1).unwrap(), expected);
    }

    #[rstest]
    #[case(Filter::any().with_array_len_min(1), true)]
    #[case(Filter::any().with_array_len_max(0), false)]
    #[case(Filter::any().with_object_len_min(0), false)]
    fn test_cardinality(#[case] filter: Filter, #[case] expected: bool) {
        let (doc, _, cop) = sample();
        let keywords = doc.fullscan(doc.root()).unwrap()[1];
        assert_eq!(filter.matches(&doc, keywords, 0).unwrap(), expected);
        assert!(!filter.clone().with_key_name("reviews").matches(&doc, cop, 1).unwrap());
    }

    #[rstest]
    #[case(Filter::any(), 0, usize::MAX)]
    #[case(Filter::new(2, 2).unwrap(), 2, 2)]
    #[case(Filter::new(0, 5).unwrap(), 0, 5)]
    fn test_fresh_filters_accept_any_element_in_range(
        #[case] filter: Filter,
        #[case] min: usize,
        #[case] max: usize,
    ) {
        let (doc, reviews, cop) = sample();
        assert_eq!((filter.min_depth(), filter.max_depth()), (min, max));
        assert!(filter.matches(&doc, reviews, min).unwrap());
        assert!(filter.matches(&doc, cop, max).unwrap());
    }

    #[rstest]
    fn test_inverted_depth_range_is_illegal() {
        let err = Filter::new(3, 1).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::IllegalArgument);
    }
}

use std::io::Write;

use crate::doc::{Document, Element, Writer};
use crate::error::Result;
use crate::options::PrintOptions;

/// Matched elements in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultSet {
    elements: Vec<Element>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, element: Element) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<Element> {
        self.elements.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Element> {
        self.elements.iter()
    }

    /// One `path: type` line per match.
    pub fn print<W: Write>(&self, sink: W, doc: &Document) -> Result<()> {
        let mut writer = Writer::new(sink, PrintOptions::default());
        for &element in &self.elements {
            writer.write_str(&doc.path_of(element)?)?;
            writer.write_str(": ")?;
            writer.write_str(doc.element_type(element)?.as_str())?;
            writer.write_str("\n")?;
        }
        writer.flush()
    }

    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut buffer = Vec::new();
        self.print(&mut buffer, doc)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a Element;
    type IntoIter = std::slice::Iter<'a, Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

impl IntoIterator for ResultSet {
    type Item = Element;
    type IntoIter = std::vec::IntoIter<Element>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ValueType;
    use rstest::rstest;

    #[rstest]
    fn test_print_lists_paths_and_types() {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let movies = doc.add_array(root, "movies", ValueType::Object).unwrap();
        let movie = doc.array_add_object(movies).unwrap();
        let title = doc.add_string(movie, "title", "Heat").unwrap();

        let mut result = ResultSet::new();
        assert!(result.is_empty());
        result.push(doc.fullscan(root).unwrap()[0]);
        result.push(doc.element_of(title).unwrap());
        assert_eq!(result.len(), 2);
        assert_eq!(
            result.render(&doc).unwrap(),
            "$.movies: array\n$.movies[0].title: string\n"
        );
    }
}

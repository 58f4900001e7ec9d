use crate::doc::{ArrayId, Document, Element, ObjectId, ValueId};
use crate::error::Result;

use super::filter::Filter;
use super::operator::{Operator, ScanOperator};
use super::result::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalPolicy {
    #[default]
    BreadthFirst,
    DepthFirst,
}

/// Which containers the driver walks into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Descent {
    /// Every container, matched or not.
    #[default]
    All,
    /// Only containers that matched a path filter.
    MatchedOnly,
}

/// Path filters plus terminators, evaluated against every visited element.
///
/// Depth is counted from the query root: its direct children are at depth 0.
/// A query without path filters records every element it reaches. A
/// terminator match records the element and stops descent below it. With
/// path filters present, nothing deeper than the largest `max_depth` of any
/// filter or terminator is visited.
#[derive(Debug, Clone, Default)]
pub struct Query {
    filters: Vec<Filter>,
    terminators: Vec<Filter>,
    descent: Descent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Step {
    record: bool,
    descend: bool,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_filter(&mut self, filter: Filter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    pub fn add_terminator(&mut self, filter: Filter) -> &mut Self {
        self.terminators.push(filter);
        self
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_terminator(mut self, filter: Filter) -> Self {
        self.terminators.push(filter);
        self
    }

    pub fn with_descent(mut self, descent: Descent) -> Self {
        self.descent = descent;
        self
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn terminators(&self) -> &[Filter] {
        &self.terminators
    }

    pub fn descent(&self) -> Descent {
        self.descent
    }

    pub fn execute(&self, doc: &Document, root: ObjectId, policy: TraversalPolicy) -> Result<ResultSet> {
        let mut driver = Driver {
            doc,
            query: self,
            depth_limit: self.depth_limit(),
            result: ResultSet::new(),
            visited: 0,
        };
        match policy {
            TraversalPolicy::BreadthFirst => driver.breadth_first(root)?,
            TraversalPolicy::DepthFirst => driver.depth_first(root)?,
        }
        tracing::debug!(
            ?policy,
            filters = self.filters.len(),
            terminators = self.terminators.len(),
            visited = driver.visited,
            matches = driver.result.len(),
            "executed query"
        );
        Ok(driver.result)
    }

    fn depth_limit(&self) -> Option<usize> {
        if self.filters.is_empty() {
            return None;
        }
        self.filters
            .iter()
            .chain(&self.terminators)
            .map(Filter::max_depth)
            .max()
    }

    fn evaluate(&self, doc: &Document, element: Element, depth: usize) -> Result<Step> {
        for terminator in &self.terminators {
            if terminator.matches(doc, element, depth)? {
                return Ok(Step {
                    record: true,
                    descend: false,
                });
            }
        }
        if self.filters.is_empty() {
            return Ok(Step {
                record: true,
                descend: true,
            });
        }
        let mut matched = false;
        for filter in &self.filters {
            if filter.matches(doc, element, depth)? {
                matched = true;
                break;
            }
        }
        Ok(Step {
            record: matched,
            descend: matched || self.descent == Descent::All,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object(ObjectId),
    Array(ArrayId),
}

impl Container {
    fn of(doc: &Document, value: ValueId) -> Option<Self> {
        doc.value_as_object(value)
            .map(Container::Object)
            .or_else(|| doc.value_as_array(value).map(Container::Array))
    }

    fn same_kind(self, other: Self) -> bool {
        matches!(
            (self, other),
            (Container::Object(_), Container::Object(_)) | (Container::Array(_), Container::Array(_))
        )
    }

    /// One scan over a run of same-kind containers.
    fn scan<'d>(doc: &'d Document, run: &[Container]) -> Result<Operator<'d>> {
        match run.first() {
            Some(Container::Array(_)) => {
                let arrays: Vec<ArrayId> = run
                    .iter()
                    .filter_map(|c| match c {
                        Container::Array(id) => Some(*id),
                        Container::Object(_) => None,
                    })
                    .collect();
                Operator::scan_arrays(doc, arrays)
            }
            _ => {
                let objects: Vec<ObjectId> = run
                    .iter()
                    .filter_map(|c| match c {
                        Container::Object(id) => Some(*id),
                        Container::Array(_) => None,
                    })
                    .collect();
                Operator::scan_objects(doc, objects)
            }
        }
    }
}

struct Driver<'a> {
    doc: &'a Document,
    query: &'a Query,
    depth_limit: Option<usize>,
    result: ResultSet,
    visited: usize,
}

impl<'a> Driver<'a> {
    /// Evaluates one child; returns the container to descend into, if any.
    fn visit(&mut self, value: ValueId, depth: usize) -> Result<Option<Container>> {
        self.visited += 1;
        let element = self.doc.element_of(value)?;
        let step = self.query.evaluate(self.doc, element, depth)?;
        if step.record {
            self.result.push(element);
        }
        if !step.descend || self.depth_limit.is_some_and(|limit| depth >= limit) {
            return Ok(None);
        }
        Ok(Container::of(self.doc, value))
    }

    fn breadth_first(&mut self, root: ObjectId) -> Result<()> {
        let doc = self.doc;
        let mut level = vec![Container::Object(root)];
        let mut depth = 0;
        while !level.is_empty() {
            let mut next_level = Vec::new();
            let mut start = 0;
            while start < level.len() {
                let mut end = start + 1;
                while end < level.len() && level[start].same_kind(level[end]) {
                    end += 1;
                }
                let mut operator = Container::scan(doc, &level[start..end])?;
                operator.open()?;
                while let Some(cursor) = operator.next()? {
                    for &value in cursor.read() {
                        if let Some(child) = self.visit(value, depth)? {
                            next_level.push(child);
                        }
                    }
                }
                operator.close()?;
                start = end;
            }
            level = next_level;
            depth += 1;
        }
        Ok(())
    }

    /// Pre-order walk over an explicit stack.
    fn depth_first(&mut self, root: ObjectId) -> Result<()> {
        let mut stack = Vec::new();
        self.push_children(Container::Object(root), 0, &mut stack)?;
        while let Some((value, depth)) = stack.pop() {
            if let Some(child) = self.visit(value, depth)? {
                self.push_children(child, depth + 1, &mut stack)?;
            }
        }
        Ok(())
    }

    fn push_children(&self, container: Container, depth: usize, stack: &mut Vec<(ValueId, usize)>) -> Result<()> {
        let mut operator = Container::scan(self.doc, std::slice::from_ref(&container))?;
        operator.open()?;
        while let Some(cursor) = operator.next()? {
            stack.extend(cursor.read().iter().rev().map(|&value| (value, depth)));
        }
        operator.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ValueType;
    use rstest::rstest;

    fn tree() -> Document {
        let mut doc = Document::new().unwrap();
        let root = doc.root();
        let a = doc.add_object(root, "a").unwrap();
        doc.add_integer(a, "x", 1).unwrap();
        let xs = doc.add_array(root, "xs", ValueType::Integer).unwrap();
        doc.array_add_value(xs, 2).unwrap();
        doc.add_integer(root, "y", 3).unwrap();
        doc
    }

    fn paths(doc: &Document, result: &ResultSet) -> Vec<String> {
        result.iter().map(|&e| doc.path_of(e).unwrap()).collect()
    }

    #[rstest]
    #[case(TraversalPolicy::BreadthFirst, &["$.a", "$.xs", "$.y", "$.a.x", "$.xs[0]"])]
    #[case(TraversalPolicy::DepthFirst, &["$.a", "$.a.x", "$.xs", "$.xs[0]", "$.y"])]
    fn test_unfiltered_query_visits_everything(#[case] policy: TraversalPolicy, #[case] expected: &[&str]) {
        let doc = tree();
        let result = Query::new().execute(&doc, doc.root(), policy).unwrap();
        assert_eq!(paths(&doc, &result), expected);
    }

    #[rstest]
    fn test_terminator_stops_descent() {
        let doc = tree();
        let query = Query::new().with_terminator(Filter::any().with_key_name("a"));
        let result = query.execute(&doc, doc.root(), TraversalPolicy::DepthFirst).unwrap();
        assert_eq!(paths(&doc, &result), ["$.a", "$.xs", "$.xs[0]", "$.y"]);
    }

    #[rstest]
    fn test_depth_pruning_and_matched_only() {
        let doc = tree();
        let shallow = Query::new().with_filter(Filter::new(0, 0).unwrap());
        let result = shallow.execute(&doc, doc.root(), TraversalPolicy::BreadthFirst).unwrap();
        assert_eq!(paths(&doc, &result), ["$.a", "$.xs", "$.y"]);

        let integers = Query::new()
            .with_filter(Filter::any().with_value_type(ValueType::Integer))
            .with_descent(Descent::MatchedOnly);
        let result = integers.execute(&doc, doc.root(), TraversalPolicy::BreadthFirst).unwrap();
        assert_eq!(paths(&doc, &result), ["$.y"]);
    }
}

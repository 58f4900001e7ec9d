use smallvec::SmallVec;

use crate::doc::{ArrayId, Document, ObjectId, ValueId};
use crate::error::{Error, Result};

use super::cursor::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorTag {
    ScanObjects,
    ScanArrays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    Created,
    Open,
    Closed,
}

/// Pull-based iterator over the direct children of a set of containers.
///
/// `open` must precede `next`; each `next` yields the children of exactly one
/// input container and `Ok(None)` once the inputs are exhausted.
pub trait ScanOperator {
    fn tag(&self) -> OperatorTag;
    fn state(&self) -> OperatorState;
    fn open(&mut self) -> Result<()>;
    fn next(&mut self) -> Result<Option<&Cursor>>;
    fn close(&mut self) -> Result<()>;
}

/// A container kind a scan can enumerate.
pub trait ScanSource: Copy {
    const TAG: OperatorTag;

    fn child_count(self, doc: &Document) -> Result<usize>;

    fn append_children(self, doc: &Document, cursor: &mut Cursor) -> Result<()>;
}

impl ScanSource for ObjectId {
    const TAG: OperatorTag = OperatorTag::ScanObjects;

    fn child_count(self, doc: &Document) -> Result<usize> {
        doc.object_len(self)
    }

    fn append_children(self, doc: &Document, cursor: &mut Cursor) -> Result<()> {
        let values = doc
            .object_entries(self)?
            .iter()
            .map(|&entry| doc.named_entry_value(entry))
            .collect::<Result<SmallVec<[ValueId; 16]>>>()?;
        cursor.append(&values)
    }
}

impl ScanSource for ArrayId {
    const TAG: OperatorTag = OperatorTag::ScanArrays;

    fn child_count(self, doc: &Document) -> Result<usize> {
        doc.array_len(self)
    }

    fn append_children(self, doc: &Document, cursor: &mut Cursor) -> Result<()> {
        let values = doc
            .array_entries(self)?
            .iter()
            .map(|&entry| doc.unnamed_entry_value(entry))
            .collect::<Result<SmallVec<[ValueId; 16]>>>()?;
        cursor.append(&values)
    }
}

#[derive(Debug)]
pub struct Scan<'doc, C: ScanSource> {
    doc: &'doc Document,
    inputs: Vec<C>,
    position: usize,
    cursor: Option<Cursor>,
    state: OperatorState,
}

pub type ObjectScan<'doc> = Scan<'doc, ObjectId>;
pub type ArrayScan<'doc> = Scan<'doc, ArrayId>;

impl<'doc, C: ScanSource> Scan<'doc, C> {
    pub fn new(doc: &'doc Document, inputs: impl Into<Vec<C>>) -> Result<Self> {
        let inputs = inputs.into();
        if inputs.is_empty() {
            return Err(Error::illegal_argument("scan needs at least one container"));
        }
        Ok(Self {
            doc,
            inputs,
            position: 0,
            cursor: None,
            state: OperatorState::Created,
        })
    }

    pub fn inputs(&self) -> &[C] {
        &self.inputs
    }

    /// `None` until opened. A closed scan keeps its cleared cursor until dropped.
    pub fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }
}

impl<C: ScanSource> ScanOperator for Scan<'_, C> {
    fn tag(&self) -> OperatorTag {
        C::TAG
    }

    fn state(&self) -> OperatorState {
        self.state
    }

    fn open(&mut self) -> Result<()> {
        if self.state != OperatorState::Created {
            return Err(Error::bad_call(format!("open on {:?} operator", self.state)));
        }
        let mut upper_bound = 0;
        for &container in &self.inputs {
            upper_bound = upper_bound.max(container.child_count(self.doc)?);
        }
        self.cursor = Some(Cursor::new(
            upper_bound.max(1),
            self.doc.options().growth,
        )?);
        self.state = OperatorState::Open;
        let tag = C::TAG;
        tracing::trace!(
            ?tag,
            inputs = self.inputs.len(),
            upper_bound,
            "opened scan"
        );
        Ok(())
    }

    fn next(&mut self) -> Result<Option<&Cursor>> {
        if self.state != OperatorState::Open {
            return Err(Error::bad_call(format!("next on {:?} operator", self.state)));
        }
        let Some(cursor) = self.cursor.as_mut() else {
            return Err(Error::Internal("open scan without cursor".into()));
        };
        cursor.clear();
        let Some(&container) = self.inputs.get(self.position) else {
            return Ok(None);
        };
        self.position += 1;
        container.append_children(self.doc, cursor)?;
        Ok(Some(&*cursor))
    }

    fn close(&mut self) -> Result<()> {
        if self.state == OperatorState::Closed {
            return Err(Error::bad_call("close on closed operator"));
        }
        if let Some(cursor) = self.cursor.as_mut() {
            cursor.clear();
        }
        self.state = OperatorState::Closed;
        let tag = C::TAG;
        tracing::trace!(?tag, scanned = self.position, "closed scan");
        Ok(())
    }
}

/// Either concrete scan, dispatched statically.
#[derive(Debug)]
pub enum Operator<'doc> {
    ObjectScan(ObjectScan<'doc>),
    ArrayScan(ArrayScan<'doc>),
}

impl<'doc> Operator<'doc> {
    pub fn scan_objects(doc: &'doc Document, objects: impl Into<Vec<ObjectId>>) -> Result<Self> {
        Ok(Operator::ObjectScan(Scan::new(doc, objects)?))
    }

    pub fn scan_arrays(doc: &'doc Document, arrays: impl Into<Vec<ArrayId>>) -> Result<Self> {
        Ok(Operator::ArrayScan(Scan::new(doc, arrays)?))
    }

    pub fn cursor(&self) -> Option<&Cursor> {
        match self {
            Operator::ObjectScan(scan) => scan.cursor(),
            Operator::ArrayScan(scan) => scan.cursor(),
        }
    }
}

impl ScanOperator for Operator<'_> {
    fn tag(&self) -> OperatorTag {
        match self {
            Operator::ObjectScan(scan) => scan.tag(),
            Operator::ArrayScan(scan) => scan.tag(),
        }
    }

    fn state(&self) -> OperatorState {
        match self {
            Operator::ObjectScan(scan) => scan.state(),
            Operator::ArrayScan(scan) => scan.state(),
        }
    }

    fn open(&mut self) -> Result<()> {
        match self {
            Operator::ObjectScan(scan) => scan.open(),
            Operator::ArrayScan(scan) => scan.open(),
        }
    }

    fn next(&mut self) -> Result<Option<&Cursor>> {
        match self {
            Operator::ObjectScan(scan) => scan.next(),
            Operator::ArrayScan(scan) => scan.next(),
        }
    }

    fn close(&mut self) -> Result<()> {
        match self {
            Operator::ObjectScan(scan) => scan.close(),
            Operator::ArrayScan(scan) => scan.close(),
        }
    }
}

//! Scanning and querying documents.
//!
//! Scans are pull-based operators yielding the direct children of one
//! container per step into a reusable [`Cursor`]. [`Query`] drives those
//! operators breadth- or depth-first, evaluating [`Filter`]s against each
//! visited [`Element`](crate::doc::Element).

mod cursor;
mod filter;
mod operator;
mod result;
mod traversal;

pub use cursor::Cursor;
pub use filter::{EntryKind, Filter, Predicate};
pub use operator::{ArrayScan, ObjectScan, Operator, OperatorState, OperatorTag, Scan, ScanOperator, ScanSource};
pub use result::ResultSet;
pub use traversal::{Descent, Query, TraversalPolicy};

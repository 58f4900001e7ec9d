use std::io::Write;

use memchr::memchr2;

use crate::error::Result;
use crate::options::{BoolStyle, DoubleFormat, PrintOptions};

use super::node::ValueData;
use super::{ArrayId, Document, NamedEntryId, Node, ObjectId, UnnamedEntryId, ValueId};

#[derive(Clone, Copy)]
enum Entries<'d> {
    Named(&'d [NamedEntryId]),
    Unnamed(&'d [UnnamedEntryId]),
}

impl Entries<'_> {
    fn len(&self) -> usize {
        match self {
            Entries::Named(entries) => entries.len(),
            Entries::Unnamed(entries) => entries.len(),
        }
    }
}

/// An open container and the position of its next entry.
struct Frame<'d> {
    entries: Entries<'d>,
    next: usize,
}

impl<'d> Frame<'d> {
    fn new(entries: Entries<'d>) -> Self {
        Self { entries, next: 0 }
    }

    fn closer(&self) -> &'static str {
        match (self.entries, self.entries.len()) {
            (Entries::Named(_), 0) => "}",
            (Entries::Named(_), _) => " }",
            (Entries::Unnamed(_), 0) => "]",
            (Entries::Unnamed(_), _) => " ]",
        }
    }
}

/// Incremental text sink for document rendering.
pub struct Writer<W: Write> {
    sink: W,
    options: PrintOptions,
}

impl<W: Write> Writer<W> {
    pub fn new(sink: W, options: PrintOptions) -> Self {
        Self { sink, options }
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.sink.write_all(s.as_bytes())?;
        Ok(())
    }

    pub fn write_integer(&mut self, value: i64) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.write_str(buf.format(value))
    }

    pub fn write_usize(&mut self, value: usize) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.write_str(buf.format(value))
    }

    pub fn write_double(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            return self.write_str("null");
        }
        match self.options.doubles {
            DoubleFormat::Shortest => {
                let mut buf = ryu::Buffer::new();
                self.write_str(buf.format_finite(value))
            }
            DoubleFormat::Fixed(precision) => {
                write!(self.sink, "{value:.precision$}")?;
                Ok(())
            }
        }
    }

    pub fn write_boolean(&mut self, value: bool) -> Result<()> {
        let literal = if value { "true" } else { "false" };
        match self.options.booleans {
            BoolStyle::Quoted => self.write_quoted_string(literal),
            BoolStyle::Bare => self.write_str(literal),
        }
    }

    pub fn write_quoted_string(&mut self, s: &str) -> Result<()> {
        self.write_str("\"")?;
        let bytes = s.as_bytes();
        if memchr2(b'"', b'\\', bytes).is_none() && !bytes.iter().any(|b| *b < 0x20) {
            self.write_str(s)?;
        } else {
            self.write_escaped(s)?;
        }
        self.write_str("\"")
    }

    fn write_escaped(&mut self, s: &str) -> Result<()> {
        let mut start = 0;
        for (idx, ch) in s.char_indices() {
            let escape = match ch {
                '"' => "\\\"",
                '\\' => "\\\\",
                '\n' => "\\n",
                '\r' => "\\r",
                '\t' => "\\t",
                c if (c as u32) < 0x20 => "",
                _ => continue,
            };
            self.write_str(&s[start..idx])?;
            if escape.is_empty() {
                write!(self.sink, "\\u{:04x}", ch as u32)?;
            } else {
                self.write_str(escape)?;
            }
            start = idx + ch.len_utf8();
        }
        self.write_str(&s[start..])
    }

    pub fn write_object(&mut self, doc: &Document, object: ObjectId) -> Result<()> {
        let mut stack = Vec::new();
        self.open_object(doc, object, &mut stack)?;
        self.drain(doc, &mut stack)
    }

    pub fn write_array(&mut self, doc: &Document, array: ArrayId) -> Result<()> {
        let mut stack = Vec::new();
        self.open_array(doc, array, &mut stack)?;
        self.drain(doc, &mut stack)
    }

    pub fn write_value(&mut self, doc: &Document, value: ValueId) -> Result<()> {
        let mut stack = Vec::new();
        self.open_value(doc, value, &mut stack)?;
        self.drain(doc, &mut stack)
    }

    /// Scalars are written in place; containers are opened and pushed.
    fn open_value<'d>(&mut self, doc: &'d Document, value: ValueId, stack: &mut Vec<Frame<'d>>) -> Result<()> {
        match &doc.value_node(value)?.data {
            ValueData::Object(object) => self.open_object(doc, *object, stack),
            ValueData::Array(array) => self.open_array(doc, *array, stack),
            ValueData::Integer(integer) => self.write_integer(*integer),
            ValueData::Double(double) => self.write_double(*double),
            ValueData::String(string) => self.write_quoted_string(string),
            ValueData::Boolean(boolean) => self.write_boolean(*boolean),
            ValueData::Null => self.write_str("null"),
        }
    }

    fn open_object<'d>(&mut self, doc: &'d Document, object: ObjectId, stack: &mut Vec<Frame<'d>>) -> Result<()> {
        stack.push(Frame::new(Entries::Named(doc.object_entries(object)?)));
        self.write_str("{ ")
    }

    fn open_array<'d>(&mut self, doc: &'d Document, array: ArrayId, stack: &mut Vec<Frame<'d>>) -> Result<()> {
        stack.push(Frame::new(Entries::Unnamed(doc.array_entries(array)?)));
        self.write_str("[ ")
    }

    fn drain<'d>(&mut self, doc: &'d Document, stack: &mut Vec<Frame<'d>>) -> Result<()> {
        while let Some(frame) = stack.last_mut() {
            let position = frame.next;
            if position == frame.entries.len() {
                let closer = frame.closer();
                stack.pop();
                self.write_str(closer)?;
                continue;
            }
            frame.next += 1;
            let entries = frame.entries;
            if position > 0 {
                self.write_str(", ")?;
            }
            let value = match entries {
                Entries::Named(named) => {
                    let entry = named[position];
                    self.write_quoted_string(doc.named_entry_key(entry)?)?;
                    self.write_str(": ")?;
                    doc.named_entry_value(entry)?
                }
                Entries::Unnamed(unnamed) => doc.unnamed_entry_value(unnamed[position])?,
            };
            self.open_value(doc, value, stack)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.sink.flush()?;
        Ok(())
    }
}

impl Document {
    pub fn print<W: Write>(&self, sink: W, node: impl Into<Node>) -> Result<()> {
        self.print_with(sink, node, PrintOptions::default())
    }

    pub fn print_with<W: Write>(&self, sink: W, node: impl Into<Node>, options: PrintOptions) -> Result<()> {
        let mut writer = Writer::new(sink, options);
        match node.into() {
            Node::Object(object) => writer.write_object(self, object)?,
            Node::Array(array) => writer.write_array(self, array)?,
            Node::Value(value) => writer.write_value(self, value)?,
        }
        writer.flush()
    }

    pub fn render(&self, node: impl Into<Node>) -> Result<String> {
        self.render_with(node, PrintOptions::default())
    }

    pub fn render_with(&self, node: impl Into<Node>, options: PrintOptions) -> Result<String> {
        let mut buffer = Vec::new();
        self.print_with(&mut buffer, node, options)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Diagnostic one-liner: `{ "type": "string", "handle": 3 }`.
    pub fn describe_value<W: Write>(&self, sink: W, value: ValueId) -> Result<()> {
        let value_type = self.value_type(value)?;
        let mut writer = Writer::new(sink, PrintOptions::default());
        writer.write_str("{ \"type\": ")?;
        writer.write_quoted_string(value_type.as_str())?;
        writer.write_str(", \"handle\": ")?;
        writer.write_usize(value.index())?;
        writer.write_str(" }")
    }
}

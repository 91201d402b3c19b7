//! Little-endian node table with a deduplicated string table
//!
//! ```text
//! u32 node_count
//! u32 string_count
//! string_count x { u16 byte_len, UTF-8 bytes }
//! node_count x {
//!     u16 child_count
//!     child_count x { u32 char_string, u32 child_node }
//!     u32 output_string     JSON array of identifiers
//!     u32 expression_string
//!     u32 fail_node
//! }
//! ```
//!
//! `0xFFFFFFFF` stands for a missing output or expression. Strings are
//! numbered in first-seen order walking the nodes: output, expression, then
//! child characters.

use std::collections::HashMap;
use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::automaton::{Automaton, TrieNode};
use crate::error::{CodecError, Result};

const NULL_INDEX: u32 = u32::MAX;

/// Fixed bytes per node besides its children
const NODE_FIXED_LEN: usize = 2 + 4 + 4 + 4;

#[derive(Default)]
struct StringTable {
    strings: Vec<String>,
    index: HashMap<String, u32>,
}

impl StringTable {
    fn intern(&mut self, s: &str) -> Result<u32> {
        if let Some(&existing) = self.index.get(s) {
            return Ok(existing);
        }
        if s.len() > u16::MAX as usize {
            return Err(CodecError::StringTooLong {
                len: s.len(),
                max: u16::MAX as usize,
            });
        }
        let next = u32::try_from(self.strings.len())
            .ok()
            .filter(|&next| next != NULL_INDEX)
            .ok_or(CodecError::CountOverflow {
                what: "string",
                count: self.strings.len(),
            })?;
        self.strings.push(s.to_string());
        self.index.insert(s.to_string(), next);
        Ok(next)
    }

    fn intern_opt(&mut self, s: Option<&str>) -> Result<u32> {
        s.map_or(Ok(NULL_INDEX), |s| self.intern(s))
    }
}

fn output_string(node: &TrieNode) -> Result<Option<String>> {
    node.output()
        .map(serde_json::to_string)
        .transpose()
        .map_err(CodecError::from)
}

pub(super) fn encode(automaton: &Automaton) -> Result<Vec<u8>> {
    let nodes = automaton.nodes();
    let node_count = u32::try_from(nodes.len()).map_err(|_| CodecError::CountOverflow {
        what: "node",
        count: nodes.len(),
    })?;

    let mut table = StringTable::default();
    let mut outputs = Vec::with_capacity(nodes.len());
    for node in nodes {
        let output = output_string(node)?;
        table.intern_opt(output.as_deref())?;
        table.intern_opt(node.expression())?;
        let mut buf = [0u8; 4];
        for ch in node.children().keys() {
            table.intern(ch.encode_utf8(&mut buf))?;
        }
        outputs.push(output);
    }

    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(node_count)?;
    out.write_u32::<LittleEndian>(table.strings.len() as u32)?;
    for s in &table.strings {
        // Length bounded by `intern`
        out.write_u16::<LittleEndian>(s.len() as u16)?;
        out.extend_from_slice(s.as_bytes());
    }

    for (node, output) in nodes.iter().zip(&outputs) {
        let child_count =
            u16::try_from(node.children().len()).map_err(|_| CodecError::CountOverflow {
                what: "child",
                count: node.children().len(),
            })?;
        out.write_u16::<LittleEndian>(child_count)?;

        let mut buf = [0u8; 4];
        for (ch, &child) in node.children() {
            out.write_u32::<LittleEndian>(table.intern(ch.encode_utf8(&mut buf))?)?;
            out.write_u32::<LittleEndian>(child)?;
        }

        out.write_u32::<LittleEndian>(table.intern_opt(output.as_deref())?)?;
        out.write_u32::<LittleEndian>(table.intern_opt(node.expression())?)?;
        out.write_u32::<LittleEndian>(node.fail())?;
    }

    log::debug!(
        "encoded {} nodes with {} strings into {} bytes",
        nodes.len(),
        table.strings.len(),
        out.len()
    );
    Ok(out)
}

pub(super) fn decode(bytes: &[u8]) -> Result<Automaton> {
    let mut cursor = Cursor::new(bytes);
    let remaining = |cursor: &Cursor<&[u8]>| bytes.len().saturating_sub(cursor.position() as usize);

    let node_count = cursor.read_u32::<LittleEndian>()? as usize;
    let string_count = cursor.read_u32::<LittleEndian>()? as usize;

    // Each string needs at least its length prefix
    let mut strings = Vec::with_capacity(string_count.min(remaining(&cursor) / 2));
    for index in 0..string_count {
        let len = cursor.read_u16::<LittleEndian>()? as usize;
        let mut raw = vec![0u8; len];
        cursor.read_exact(&mut raw)?;
        let s = String::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8 { index })?;
        strings.push(s);
    }

    let lookup = |index: u32| -> Result<Option<&str>> {
        if index == NULL_INDEX {
            return Ok(None);
        }
        strings
            .get(index as usize)
            .map(|s| Some(s.as_str()))
            .ok_or(CodecError::StringIndexOutOfRange {
                index,
                len: strings.len(),
            })
    };

    let mut nodes = Vec::with_capacity(node_count.min(remaining(&cursor) / NODE_FIXED_LEN));
    for index in 0..node_count {
        let mut node = TrieNode::new(0);

        let child_count = cursor.read_u16::<LittleEndian>()?;
        for _ in 0..child_count {
            let key_index = cursor.read_u32::<LittleEndian>()?;
            let child = cursor.read_u32::<LittleEndian>()?;
            let key = lookup(key_index)?.ok_or_else(|| {
                CodecError::invariant(format!("node {index}: child key cannot be null"))
            })?;
            let mut chars = key.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(CodecError::InvalidChildKey {
                        node: index,
                        key: key.to_string(),
                    })
                }
            };
            if node.children.insert(ch, child).is_some() {
                return Err(CodecError::invariant(format!(
                    "node {index}: duplicate child key {ch:?}"
                )));
            }
        }

        let output = lookup(cursor.read_u32::<LittleEndian>()?)?;
        node.output = output
            .map(serde_json::from_str::<Vec<String>>)
            .transpose()?
            .map(|ids| ids.into_iter().collect());
        node.expression = lookup(cursor.read_u32::<LittleEndian>()?)?.map(str::to_string);
        node.fail = cursor.read_u32::<LittleEndian>()?;

        nodes.push(node);
    }

    let trailing = remaining(&cursor);
    if trailing > 0 {
        return Err(CodecError::TrailingBytes(trailing));
    }

    Automaton::from_decoded(nodes)
}

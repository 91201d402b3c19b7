//! JSON node array

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::automaton::{Automaton, NodeId, TrieNode};
use crate::error::{CodecError, Result};

#[derive(Serialize)]
struct NodeRef<'a> {
    children: &'a BTreeMap<char, NodeId>,
    output: Option<&'a [String]>,
    korean: Option<&'a str>,
    fail: NodeId,
}

#[derive(Deserialize)]
struct WireNode {
    #[serde(default)]
    children: BTreeMap<String, NodeId>,
    #[serde(default)]
    output: Option<Vec<String>>,
    #[serde(default)]
    korean: Option<String>,
    fail: NodeId,
}

pub(super) fn encode(automaton: &Automaton, pretty: bool) -> Result<Vec<u8>> {
    let nodes: Vec<NodeRef<'_>> = automaton
        .nodes()
        .iter()
        .map(|node| NodeRef {
            children: node.children(),
            output: node.output(),
            korean: node.expression(),
            fail: node.fail(),
        })
        .collect();

    let bytes = if pretty {
        serde_json::to_vec_pretty(&nodes)?
    } else {
        serde_json::to_vec(&nodes)?
    };
    Ok(bytes)
}

pub(super) fn decode(bytes: &[u8]) -> Result<Automaton> {
    let wire: Vec<WireNode> = serde_json::from_slice(bytes)?;

    let mut nodes = Vec::with_capacity(wire.len());
    for (index, wire_node) in wire.into_iter().enumerate() {
        let mut node = TrieNode::new(0);
        for (key, child) in wire_node.children {
            let ch = single_char(&key).ok_or_else(|| CodecError::InvalidChildKey {
                node: index,
                key: key.clone(),
            })?;
            node.children.insert(ch, child);
        }
        node.fail = wire_node.fail;
        node.output = wire_node.output.map(|ids| ids.into_iter().collect());
        node.expression = wire_node.korean;
        nodes.push(node);
    }

    Automaton::from_decoded(nodes)
}

fn single_char(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Some(ch),
        _ => None,
    }
}

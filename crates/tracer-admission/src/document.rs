//! Schema-less navigation of the resource carried by an admission request.
//!
//! Admission requests can target any kind of resource, hence the object is
//! never decoded into a concrete type. Instead it is looked at through
//! [`Node`], which tells apart mappings, sequences and scalars, and treats
//! every missing step of a path as [`Node::Absent`].

use serde_json::{Map, Value};

/// A view over one position of a JSON document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Node<'a> {
    Mapping(&'a Map<String, Value>),
    Sequence(&'a [Value]),
    /// Strings, numbers, booleans and `null`
    Scalar(&'a Value),
    Absent,
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        match value {
            Value::Object(map) => Node::Mapping(map),
            Value::Array(items) => Node::Sequence(items),
            scalar => Node::Scalar(scalar),
        }
    }
}

impl<'a> Node<'a> {
    /// Returns the child stored under `key`. Only mappings have keyed
    /// children, any other shape yields [`Node::Absent`].
    pub fn get(self, key: &str) -> Node<'a> {
        match self {
            Node::Mapping(map) => map.get(key).map(Node::from).unwrap_or(Node::Absent),
            _ => Node::Absent,
        }
    }

    pub fn is_present(&self) -> bool {
        !matches!(self, Node::Absent)
    }
}

/// Walks `path` starting from `root`, one mapping key at a time.
///
/// An empty path returns `root` itself.
pub fn lookup<'a>(root: Node<'a>, path: &[&str]) -> Node<'a> {
    match path.split_first() {
        None => root,
        Some((key, rest)) => lookup(root.get(key), rest),
    }
}

//! Finds the innermost element under a caret and its key-path.

use super::ast::KeyPath;
use super::element::Element;
use crate::document::node::{Node, Pair};

/// The result of [`locate`]: the innermost element at an offset and the keys
/// of every pair on the way down to it (its own key included).
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'a> {
    pub element: Element<'a>,
    pub path: KeyPath,
}

impl<'a> Located<'a> {
    /// Returns the pair when the located element is a mapping entry.
    pub fn pair(&self) -> Option<&'a Pair> {
        self.element.as_pair()
    }
}

/// Walks the tree depth-first and returns the deepest element whose span
/// contains `offset`.
///
/// Children are tried in document order and the first one that contains the
/// offset wins; later siblings are not looked at. Returns `None` only when
/// `offset` lies outside the root.
pub fn locate(root: &Node, offset: usize) -> Option<Located<'_>> {
    let (element, mut keys) = descend(Element::Node(root), offset)?;
    keys.reverse();
    Some(Located {
        element,
        path: KeyPath::from_keys(keys),
    })
}

/// Returns the located element and its keys innermost first.
fn descend<'a>(element: Element<'a>, offset: usize) -> Option<(Element<'a>, Vec<&'a str>)> {
    if !element.span().contains(offset) {
        return None;
    }

    let (found, mut keys) = element
        .children()
        .find_map(|child| descend(child, offset))
        .unwrap_or((element, Vec::new()));

    if let Some(key) = element.key() {
        keys.push(key);
    }
    Some((found, keys))
}

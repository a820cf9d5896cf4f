use super::ast::KeyPath;
use super::element::Element;
use crate::document::node::{Node, Pair};

/// Collects every mapping entry whose key-path matches a pattern.
///
/// Only pairs advance the depth. Sequences and the mappings inside them are
/// walked through at the depth of their parent, so `jobs.*.steps.run` reaches
/// the `run` key of every step without naming the list position.
pub struct Evaluator<'a> {
    root: &'a Node,
}

impl<'a> Evaluator<'a> {
    pub fn new(root: &'a Node) -> Self {
        Evaluator { root }
    }

    /// Returns the values of all matching pairs in document order.
    pub fn collect_all(&self, pattern: &KeyPath) -> Vec<&'a Node> {
        self.collect_pairs(pattern)
            .into_iter()
            .map(|(_, pair)| &pair.value)
            .collect()
    }

    /// Returns all matching pairs together with their concrete key-paths.
    pub fn collect_pairs(&self, pattern: &KeyPath) -> Vec<(KeyPath, &'a Pair)> {
        let mut results = Vec::new();
        if pattern.is_empty() {
            return results;
        }

        let mut prefix = KeyPath::default();
        walk(Element::Node(self.root), pattern, &mut prefix, &mut results);
        results
    }
}

fn walk<'a>(
    element: Element<'a>,
    pattern: &KeyPath,
    prefix: &mut KeyPath,
    results: &mut Vec<(KeyPath, &'a Pair)>,
) {
    let Some(pair) = element.as_pair() else {
        for child in element.children() {
            walk(child, pattern, prefix, results);
        }
        return;
    };

    let depth = prefix.len();
    let Some(segment) = pattern.get(depth) else {
        return;
    };
    if !segment.matches(&pair.key.value) {
        return;
    }

    prefix.push_key(pair.key.value.as_str());
    if depth + 1 == pattern.len() {
        results.push((prefix.clone(), pair));
    } else {
        for child in element.children() {
            walk(child, pattern, prefix, results);
        }
    }
    prefix.segments.pop();
}

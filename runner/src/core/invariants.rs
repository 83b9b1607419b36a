//! Semantic invariants not expressible via JSON Schema.

use crate::tree::SuiteNode;
use std::collections::HashSet;

/// Check semantic invariants not expressible in JSON Schema:
/// - Ids and titles are non-blank
/// - Static ids are unique within their tree
/// - Ids within one `dynamic` list are unique
///
/// A dynamic node may share an id with a static node. Dynamic nodes register
/// while their parent executes, before its static children run, so the dynamic
/// one runs and the static one is passed over.
pub fn validate_invariants(root: &SuiteNode) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    validate_node(root, &mut seen, &mut errors, root.id.as_str());
    errors
}

fn validate_node(
    node: &SuiteNode,
    seen: &mut HashSet<String>,
    errors: &mut Vec<String>,
    path: &str,
) {
    if node.id.trim().is_empty() {
        errors.push(format!("{}: id must not be blank", path));
    } else if !seen.insert(node.id.clone()) {
        errors.push(format!("duplicate id '{}' at {}", node.id, path));
    }

    if node.title.trim().is_empty() {
        errors.push(format!("{}: title must not be blank", path));
    }

    let mut dynamic_ids = HashSet::new();
    for child in &node.dynamic {
        let child_path = format!("{}/~{}", path, child.id);
        if !child.id.trim().is_empty() && !dynamic_ids.insert(child.id.as_str()) {
            errors.push(format!("duplicate dynamic id '{}' at {}", child.id, child_path));
        }
        // Each registered subtree is checked on its own.
        let mut subtree = HashSet::new();
        validate_node(child, &mut subtree, errors, &child_path);
    }
    for child in &node.children {
        let child_path = format!("{}/{}", path, child.id);
        validate_node(child, seen, errors, &child_path);
    }
}

//! Normalization passes over a finished tree.
//!
//! Both passes are independent and can run in either order.

use vellum_common::NamespaceError;

use crate::{DomTree, NamespaceDecl, NodeId, QualName, SVG_NAMESPACE, XML_NAMESPACE};

/// Give every namespaced element and attribute a prefix.
///
/// Declarations are searched from the nearest enclosing element outwards; a
/// declaration whose prefix has been rebound further in is skipped. Elements
/// bound through the in-scope default namespace are written unprefixed.
/// The `xml` prefix is always in scope.
///
/// # Errors
///
/// Returns [`NamespaceError::Unresolved`] if no declaration binds a name's
/// namespace, and [`NamespaceError::CannotQualifyAttribute`] if an attribute's
/// nearest binding is the default namespace.
pub fn assign_namespace_prefixes(tree: &mut DomTree) -> Result<(), NamespaceError> {
    let mut scope = vec![NamespaceDecl {
        prefix: Some("xml".to_string()),
        uri: XML_NAMESPACE.to_string(),
    }];
    resolve_node(tree, NodeId::ROOT, &mut scope)
}

fn resolve_node(
    tree: &mut DomTree,
    id: NodeId,
    scope: &mut Vec<NamespaceDecl>,
) -> Result<(), NamespaceError> {
    let depth = scope.len();

    if let Some(element) = tree.as_element(id) {
        scope.extend(element.namespaces.iter().cloned());

        let element_prefix = match &element.name.namespace {
            Some(ns) => Some(lookup_prefix(scope, ns, &element.name, false)?),
            None => None,
        };
        let mut attr_prefixes = Vec::with_capacity(element.attrs.len());
        for attr in &element.attrs {
            attr_prefixes.push(match &attr.name.namespace {
                Some(ns) => Some(lookup_prefix(scope, ns, &attr.name, true)?),
                None => None,
            });
        }

        if let Some(element) = tree.as_element_mut(id) {
            if let Some(prefix) = element_prefix {
                element.name.prefix = prefix;
            }
            for (attr, prefix) in element.attrs.iter_mut().zip(attr_prefixes) {
                if let Some(prefix) = prefix {
                    attr.name.prefix = prefix;
                }
            }
        }
    }

    for child in tree.children(id).to_vec() {
        resolve_node(tree, child, scope)?;
    }

    scope.truncate(depth);
    Ok(())
}

/// Find the prefix for `namespace`. `Ok(None)` means "write unprefixed".
fn lookup_prefix(
    scope: &[NamespaceDecl],
    namespace: &str,
    name: &QualName,
    is_attribute: bool,
) -> Result<Option<String>, NamespaceError> {
    for (index, decl) in scope.iter().enumerate().rev() {
        if decl.uri != namespace {
            continue;
        }
        let shadowed = scope[index + 1..].iter().any(|d| d.prefix == decl.prefix);
        if shadowed {
            continue;
        }
        return match &decl.prefix {
            None if is_attribute => Err(NamespaceError::CannotQualifyAttribute {
                namespace: namespace.to_string(),
                local: name.local.clone(),
            }),
            None => Ok(None),
            Some(prefix) => Ok(Some(prefix.clone())),
        };
    }

    Err(NamespaceError::Unresolved {
        namespace: namespace.to_string(),
        local: name.local.clone(),
    })
}

/// Replace every attribute-less group with exactly one child by that child.
///
/// Runs bottom-up; a node keeps collapsing until it is no longer a redundant
/// group, so nested single-child chains reduce to their innermost content.
/// Running it again on its own output changes nothing.
pub fn remove_redundant_groups(tree: &mut DomTree) {
    let _ = prune(tree, NodeId::ROOT);
}

fn prune(tree: &mut DomTree, id: NodeId) -> NodeId {
    for child in tree.children(id).to_vec() {
        let replacement = prune(tree, child);
        if replacement != child {
            tree.replace_child(id, child, replacement);
        }
    }

    let mut current = id;
    while let Some(only_child) = redundant_group_child(tree, current) {
        if let Some(node) = tree.get_mut(current) {
            node.children.clear();
        }
        current = only_child;
    }
    current
}

fn redundant_group_child(tree: &DomTree, id: NodeId) -> Option<NodeId> {
    let element = tree.as_element(id)?;
    let in_svg = element
        .name
        .namespace
        .as_deref()
        .is_none_or(|ns| ns == SVG_NAMESPACE);
    if !in_svg || !element.is("g") || !element.attrs.is_empty() || !element.namespaces.is_empty()
    {
        return None;
    }
    match tree.children(id) {
        [only] => Some(*only),
        _ => None,
    }
}

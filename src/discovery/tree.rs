use std::collections::HashMap;

use tracing::trace;

use super::TagError;
use crate::binder::BindingLayout;

/// A node of the presentation tree, as far as slot discovery cares.
pub trait TaggedNode: Clone {
    fn tag(&self) -> Option<&str>;

    /// A positive numeric id, for nodes addressed by id rather than by slot.
    fn id(&self) -> Option<u32>;

    fn children(&self) -> Vec<Self>;
}

/// The nodes found by [`map_tagged_nodes`].
#[derive(Debug, Clone)]
pub struct TaggedNodes<N> {
    /// Indexed by slot. `None` where no node carried that slot's tag.
    pub slots: Vec<Option<N>>,
    /// Untagged nodes that carry an id.
    pub by_id: HashMap<u32, N>,
}

/// Walk the tree under `root` (root included) and collect bound nodes.
///
/// Nodes whose tag starts with the layout's prefix land in `slots`; when two
/// nodes carry the same tag, the first in pre-order wins. Nodes with any
/// other tag, or none, land in `by_id` if they have an id. Every node's
/// children are visited either way.
///
/// # Examples
///
/// ```
/// use bindery::discovery::{map_tagged_nodes, TaggedNode};
/// use bindery::BindingLayout;
///
/// #[derive(Clone)]
/// struct Node {
///     tag: Option<&'static str>,
///     children: Vec<Node>,
/// }
///
/// impl TaggedNode for Node {
///     fn tag(&self) -> Option<&str> { self.tag }
///     fn id(&self) -> Option<u32> { None }
///     fn children(&self) -> Vec<Self> { self.children.clone() }
/// }
///
/// let leaf = |tag| Node { tag: Some(tag), children: vec![] };
/// let root = Node { tag: None, children: vec![leaf("bindingTag1"), leaf("bindingTag0")] };
///
/// let found = map_tagged_nodes(&root, &BindingLayout::new(2)).unwrap();
/// assert_eq!(found.slots[0].as_ref().and_then(|n| n.tag), Some("bindingTag0"));
/// assert_eq!(found.slots[1].as_ref().and_then(|n| n.tag), Some("bindingTag1"));
/// ```
pub fn map_tagged_nodes<N: TaggedNode>(
    root: &N,
    layout: &BindingLayout,
) -> Result<TaggedNodes<N>, TagError> {
    let mut found = TaggedNodes {
        slots: vec![None; layout.field_count()],
        by_id: HashMap::new(),
    };
    visit(root, layout, &mut found)?;
    trace!(
        bound = found.slots.iter().flatten().count(),
        by_id = found.by_id.len(),
        "slot discovery finished"
    );
    Ok(found)
}

fn visit<N: TaggedNode>(
    node: &N,
    layout: &BindingLayout,
    found: &mut TaggedNodes<N>,
) -> Result<(), TagError> {
    match node.tag() {
        Some(tag) if tag.starts_with(layout.tag_prefix()) => {
            let index = layout.parse_tag(tag)?;
            let field_count = found.slots.len();
            let slot = found
                .slots
                .get_mut(index)
                .ok_or_else(|| TagError::OutOfRange {
                    tag: tag.to_string(),
                    index,
                    field_count,
                })?;
            if slot.is_none() {
                *slot = Some(node.clone());
            }
        }
        _ => {
            if let Some(id) = node.id().filter(|&id| id > 0) {
                found.by_id.entry(id).or_insert_with(|| node.clone());
            }
        }
    }
    for child in node.children() {
        visit(&child, layout, found)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[derive(Clone, Debug)]
    struct Node(Rc<NodeData>);

    #[derive(Debug)]
    struct NodeData {
        name: &'static str,
        tag: Option<String>,
        id: Option<u32>,
        children: Vec<Node>,
    }

    impl Node {
        fn new(name: &'static str, tag: Option<&str>, id: Option<u32>, children: Vec<Node>) -> Self {
            Node(Rc::new(NodeData {
                name,
                tag: tag.map(str::to_string),
                id,
                children,
            }))
        }
    }

    impl TaggedNode for Node {
        fn tag(&self) -> Option<&str> {
            self.0.tag.as_deref()
        }

        fn id(&self) -> Option<u32> {
            self.0.id
        }

        fn children(&self) -> Vec<Self> {
            self.0.children.clone()
        }
    }

    fn names(found: &TaggedNodes<Node>) -> Vec<Option<&'static str>> {
        found
            .slots
            .iter()
            .map(|slot| slot.as_ref().map(|node| node.0.name))
            .collect()
    }

    #[test]
    fn collects_tagged_and_id_nodes() {
        let tree = Node::new(
            "root",
            Some("bindingTag0"),
            None,
            vec![
                Node::new(
                    "panel",
                    None,
                    Some(7),
                    vec![Node::new("title", Some("bindingTag2"), Some(8), vec![])],
                ),
                Node::new("footer", Some("footer"), Some(9), vec![]),
                Node::new("anon", None, Some(0), vec![]),
            ],
        );

        let found = map_tagged_nodes(&tree, &BindingLayout::new(3)).unwrap();

        assert_eq!(names(&found), vec![Some("root"), None, Some("title")]);
        assert_eq!(found.by_id.len(), 2);
        assert_eq!(found.by_id[&7].0.name, "panel");
        assert_eq!(found.by_id[&9].0.name, "footer");
    }

    #[test]
    fn first_duplicate_wins() {
        let tree = Node::new(
            "root",
            None,
            None,
            vec![
                Node::new("a", Some("bindingTag0"), None, vec![]),
                Node::new("b", Some("bindingTag0"), None, vec![]),
            ],
        );
        let found = map_tagged_nodes(&tree, &BindingLayout::new(1)).unwrap();
        assert_eq!(names(&found), vec![Some("a")]);
    }

    #[test]
    fn custom_prefix_ignores_default_tags() {
        let tree = Node::new(
            "root",
            None,
            None,
            vec![
                Node::new("a", Some("bindingTag0"), Some(3), vec![]),
                Node::new("b", Some("bt0"), None, vec![]),
            ],
        );
        let layout = BindingLayout::new(1).with_tag_prefix("bt");
        let found = map_tagged_nodes(&tree, &layout).unwrap();

        assert_eq!(names(&found), vec![Some("b")]);
        assert_eq!(found.by_id[&3].0.name, "a");
    }

    #[test]
    fn out_of_range_tag_is_an_error() {
        let tree = Node::new("root", Some("bindingTag5"), None, vec![]);
        let err = map_tagged_nodes(&tree, &BindingLayout::new(2)).unwrap_err();
        assert_eq!(
            err,
            TagError::OutOfRange {
                tag: "bindingTag5".to_string(),
                index: 5,
                field_count: 2,
            }
        );
    }

    #[test]
    fn malformed_tag_is_an_error() {
        let tree = Node::new("root", None, None, vec![Node::new("x", Some("bindingTagA"), None, vec![])]);
        assert!(matches!(
            map_tagged_nodes(&tree, &BindingLayout::new(1)),
            Err(TagError::InvalidDigit { found: 'A', .. })
        ));
    }
}

//! Slot discovery.
//!
//! Generated layouts mark bound nodes with a tag made of a prefix and the
//! node's slot index, such as `bindingTag3`. This module parses that format
//! and walks a tree to collect the tagged nodes. Binders never call it;
//! they only see the resolved indices through [`BindingLayout`].
//!
//! [`BindingLayout`]: crate::BindingLayout

mod tag;
mod tree;

pub use tag::{binding_tag, parse_tag_index, parse_tag_index_with_prefix, TagError, BINDING_TAG_PREFIX};
pub use tree::{map_tagged_nodes, TaggedNode, TaggedNodes};

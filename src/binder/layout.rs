use std::borrow::Cow;

use crate::discovery::{self, TagError, BINDING_TAG_PREFIX};

/// Shape of one bound presentation unit, as resolved by slot discovery.
///
/// # Examples
///
/// ```
/// use bindery::BindingLayout;
///
/// let layout = BindingLayout::new(3).with_tag_prefix("slot");
/// assert_eq!(layout.field_count(), 3);
/// assert_eq!(layout.parse_tag("slot2"), Ok(2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingLayout {
    field_count: usize,
    tag_prefix: Cow<'static, str>,
}

impl BindingLayout {
    /// A layout with `field_count` bound fields and the default tag prefix.
    pub fn new(field_count: usize) -> Self {
        Self {
            field_count,
            tag_prefix: Cow::Borrowed(BINDING_TAG_PREFIX),
        }
    }

    pub fn with_tag_prefix(mut self, prefix: impl Into<Cow<'static, str>>) -> Self {
        self.tag_prefix = prefix.into();
        self
    }

    pub fn field_count(&self) -> usize {
        self.field_count
    }

    pub fn tag_prefix(&self) -> &str {
        &self.tag_prefix
    }

    /// Resolve a tag to a slot index using this layout's prefix.
    pub fn parse_tag(&self, tag: &str) -> Result<usize, TagError> {
        discovery::parse_tag_index_with_prefix(tag, &self.tag_prefix)
    }

    /// The tag that resolves to `index` under this layout.
    pub fn tag_for(&self, index: usize) -> String {
        format!("{}{index}", self.tag_prefix)
    }
}

impl Default for BindingLayout {
    fn default() -> Self {
        Self::new(0)
    }
}

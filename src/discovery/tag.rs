use thiserror::Error;

/// Prefix of every binding tag in the default layout format.
pub const BINDING_TAG_PREFIX: &str = "bindingTag";

/// Why a tag could not be resolved to a slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    #[error("tag {tag:?} does not start with {prefix:?}")]
    MissingPrefix { tag: String, prefix: String },

    #[error("tag {tag:?} has no slot index after its prefix")]
    Empty { tag: String },

    #[error("tag {tag:?} contains {found:?}, expected a decimal digit")]
    InvalidDigit { tag: String, found: char },

    #[error("slot index in tag {tag:?} does not fit in usize")]
    Overflow { tag: String },

    #[error("tag {tag:?} names slot {index} but the layout has {field_count} bound fields")]
    OutOfRange {
        tag: String,
        index: usize,
        field_count: usize,
    },
}

/// The default-format tag for `index`.
pub fn binding_tag(index: usize) -> String {
    format!("{BINDING_TAG_PREFIX}{index}")
}

/// Resolve a default-format tag to its slot index.
///
/// # Examples
///
/// ```
/// use bindery::discovery::parse_tag_index;
///
/// assert_eq!(parse_tag_index("bindingTag0"), Ok(0));
/// assert_eq!(parse_tag_index("bindingTag42"), Ok(42));
/// assert!(parse_tag_index("header").is_err());
/// ```
pub fn parse_tag_index(tag: &str) -> Result<usize, TagError> {
    parse_tag_index_with_prefix(tag, BINDING_TAG_PREFIX)
}

/// Resolve `tag` to a slot index, given the layout's tag prefix.
///
/// Digits directly follow the prefix, with no separator and no sign.
pub fn parse_tag_index_with_prefix(tag: &str, prefix: &str) -> Result<usize, TagError> {
    let digits = tag
        .strip_prefix(prefix)
        .ok_or_else(|| TagError::MissingPrefix {
            tag: tag.to_string(),
            prefix: prefix.to_string(),
        })?;
    parse_digits(tag, digits)
}

fn parse_digits(tag: &str, digits: &str) -> Result<usize, TagError> {
    if digits.is_empty() {
        return Err(TagError::Empty {
            tag: tag.to_string(),
        });
    }
    digits.chars().try_fold(0usize, |value, c| {
        let digit = c.to_digit(10).ok_or_else(|| TagError::InvalidDigit {
            tag: tag.to_string(),
            found: c,
        })?;
        value
            .checked_mul(10)
            .and_then(|value| value.checked_add(digit as usize))
            .ok_or_else(|| TagError::Overflow {
                tag: tag.to_string(),
            })
    })
}

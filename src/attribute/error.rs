use std::fmt;

/// Failure to assign a value through an attribute
///
/// Returned by [`ExchangeAttribute::write`](super::ExchangeAttribute::write).
/// Reads never fail; missing data reads as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeError {
    /// The attribute cannot be assigned
    ReadOnly {
        /// Attribute kind (e.g. `"Remote IP"`)
        attribute: &'static str,
        /// The rejected value
        value: String,
    },
    /// The attribute is writable but the value does not fit it
    ///
    /// For example a status code that is not a three digit number, or a
    /// header value containing control characters.
    InvalidValue {
        /// Attribute kind
        attribute: &'static str,
        /// The rejected value
        value: String,
    },
}

impl AttributeError {
    pub fn read_only(attribute: &'static str, value: &str) -> Self {
        AttributeError::ReadOnly {
            attribute,
            value: value.to_string(),
        }
    }

    pub fn invalid_value(attribute: &'static str, value: &str) -> Self {
        AttributeError::InvalidValue {
            attribute,
            value: value.to_string(),
        }
    }
}

impl fmt::Display for AttributeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeError::ReadOnly { attribute, value } => {
                write!(
                    f,
                    "Could not set read only attribute {} to '{}'",
                    attribute, value
                )
            }
            AttributeError::InvalidValue { attribute, value } => {
                write!(f, "Invalid value '{}' for attribute {}", value, attribute)
            }
        }
    }
}

impl std::error::Error for AttributeError {}

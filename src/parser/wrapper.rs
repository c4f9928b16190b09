use std::sync::Arc;

use crate::attribute::{QuotingAttribute, SharedAttribute, SubstituteEmptyAttribute};

/// Decorates every attribute the parser produces, literals included.
///
/// Wrappers run in the order they were handed to the parser; the output of one
/// is the input of the next.
pub trait AttributeWrapper: Send + Sync {
    fn wrap(&self, attribute: SharedAttribute) -> SharedAttribute;
}

/// Wraps each attribute in a [`QuotingAttribute`]
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotingWrapper;

impl AttributeWrapper for QuotingWrapper {
    fn wrap(&self, attribute: SharedAttribute) -> SharedAttribute {
        Arc::new(QuotingAttribute::new(attribute))
    }
}

/// Replaces missing or empty values with a fixed placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubstituteEmptyWrapper {
    substitute: String,
}

impl SubstituteEmptyWrapper {
    pub fn new(substitute: impl Into<String>) -> Self {
        Self {
            substitute: substitute.into(),
        }
    }

    pub fn substitute(&self) -> &str {
        &self.substitute
    }
}

impl AttributeWrapper for SubstituteEmptyWrapper {
    fn wrap(&self, attribute: SharedAttribute) -> SharedAttribute {
        Arc::new(SubstituteEmptyAttribute::new(
            attribute,
            self.substitute.clone(),
        ))
    }
}

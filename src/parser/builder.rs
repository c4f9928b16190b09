use std::cmp::Reverse;
use std::fmt;

use crate::attribute::SharedAttribute;

/// Recognizes one textual token form and produces the matching attribute.
///
/// A builder returns `None` for tokens it does not own so that the next
/// builder in priority order can try.
pub trait AttributeBuilder: Send + Sync {
    /// Short description used in diagnostics
    fn name(&self) -> &str;

    /// Build an attribute for `token`, or decline
    fn build(&self, token: &str) -> Option<SharedAttribute>;

    /// Builders with a higher priority are consulted first
    fn priority(&self) -> i32 {
        0
    }
}

/// Ordered set of builders consulted by the parser.
///
/// Builders are registered explicitly and kept sorted by descending priority.
/// The sort is stable, so builders of equal priority are consulted in
/// registration order.
///
/// # Example
///
/// ```rust
/// use brrtrouter_accesslog::parser::BuilderRegistry;
///
/// let registry = BuilderRegistry::standard();
/// assert!(registry.build("%s").is_some());
/// assert!(registry.build("%{bogus}").is_none());
/// ```
pub struct BuilderRegistry {
    builders: Vec<Box<dyn AttributeBuilder>>,
}

impl BuilderRegistry {
    /// Create a registry from builders in registration order
    pub fn new(builders: Vec<Box<dyn AttributeBuilder>>) -> Self {
        let mut registry = Self { builders };
        registry.sort();
        registry
    }

    /// Registry with every builder shipped with this crate
    pub fn standard() -> Self {
        Self::new(super::builders::standard_builders())
    }

    /// Register one more builder after the existing ones
    pub fn with(mut self, builder: Box<dyn AttributeBuilder>) -> Self {
        self.builders.push(builder);
        self.sort();
        self
    }

    fn sort(&mut self) {
        // sort_by_key is stable: equal priorities keep registration order
        self.builders.sort_by_key(|b| Reverse(b.priority()));
    }

    /// Ask each builder in order; the first match wins
    pub fn build(&self, token: &str) -> Option<SharedAttribute> {
        self.builders.iter().find_map(|b| b.build(token))
    }

    /// Builder names in consultation order
    pub fn names(&self) -> Vec<&str> {
        self.builders.iter().map(|b| b.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.builders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.builders.is_empty()
    }
}

impl Default for BuilderRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("builders", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::ConstantAttribute;
    use std::sync::Arc;

    struct Fixed {
        name: &'static str,
        token: &'static str,
        priority: i32,
    }

    impl AttributeBuilder for Fixed {
        fn name(&self) -> &str {
            self.name
        }

        fn build(&self, token: &str) -> Option<SharedAttribute> {
            (token == self.token)
                .then(|| Arc::new(ConstantAttribute::new(self.name)) as SharedAttribute)
        }

        fn priority(&self) -> i32 {
            self.priority
        }
    }

    fn fixed(name: &'static str, token: &'static str, priority: i32) -> Box<dyn AttributeBuilder> {
        Box::new(Fixed {
            name,
            token,
            priority,
        })
    }

    #[test]
    fn test_sorted_by_descending_priority() {
        let registry = BuilderRegistry::new(vec![
            fixed("low", "%x", -5),
            fixed("high", "%x", 10),
            fixed("mid", "%x", 0),
        ]);
        assert_eq!(registry.names(), vec!["high", "mid", "low"]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let registry = BuilderRegistry::new(vec![
            fixed("first", "%x", 1),
            fixed("second", "%x", 1),
            fixed("top", "%y", 2),
        ])
        .with(fixed("third", "%x", 1));
        assert_eq!(registry.names(), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_first_match_wins() {
        let registry = BuilderRegistry::new(vec![
            fixed("first", "%x", 0),
            fixed("second", "%x", 0),
        ]);
        let exchange = crate::exchange::HttpExchange::builder(http::Method::GET, "/").build();
        let attr = registry.build("%x").unwrap();
        assert_eq!(attr.read(&exchange).as_deref(), Some("first"));
        assert!(registry.build("%z").is_none());
    }

    #[test]
    fn test_higher_priority_overrides_standard() {
        let registry = BuilderRegistry::standard().with(fixed("override", "%s", 100));
        let exchange = crate::exchange::HttpExchange::builder(http::Method::GET, "/").build();
        let attr = registry.build("%s").unwrap();
        assert_eq!(attr.read(&exchange).as_deref(), Some("override"));
    }
}

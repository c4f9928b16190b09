use super::{ExchangeAttribute, SharedAttribute};
use crate::exchange::Exchange;

/// Wraps the output of another attribute in single quotes.
///
/// `None`, `"-"` and `""` all render as `-`. Otherwise the value is emitted
/// between `'` characters and each embedded `'` is followed by a `"`. The scan
/// resumes two characters past an embedded quote, so the character directly
/// after it is dropped: `O'Brien` renders as `'O'"rien'`. Existing log
/// consumers depend on this exact output.
#[derive(Debug, Clone)]
pub struct QuotingAttribute {
    inner: SharedAttribute,
}

impl QuotingAttribute {
    pub fn new(inner: SharedAttribute) -> Self {
        Self { inner }
    }
}

pub(crate) fn quote(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    let mut i = 0;
    while i < chars.len() {
        match chars[i..].iter().position(|&c| c == '\'') {
            None => {
                out.extend(&chars[i..]);
                i = chars.len();
            }
            Some(offset) => {
                let j = i + offset;
                out.extend(&chars[i..=j]);
                out.push('"');
                i = j + 2;
            }
        }
    }
    out.push('\'');
    out
}

impl ExchangeAttribute for QuotingAttribute {
    fn name(&self) -> &'static str {
        "Quoting"
    }

    fn read(&self, exchange: &dyn Exchange) -> Option<String> {
        match self.inner.read(exchange) {
            None => Some("-".to_string()),
            Some(v) if v.is_empty() || v == "-" => Some("-".to_string()),
            Some(v) => Some(quote(&v)),
        }
    }
}

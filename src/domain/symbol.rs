//! Tradable symbol listing.

use std::collections::HashSet;

/// Ordered, deduplicated list of tradable symbol identifiers.
///
/// Order is the exchange-reported order; the first occurrence of a
/// duplicate wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolList(Vec<String>);

impl SymbolList {
    /// An empty list, the uniform "fetch failed" outcome.
    #[must_use]
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// Build from symbols in exchange-reported order, dropping duplicates.
    #[must_use]
    pub fn from_exchange_order<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into();
            if seen.insert(symbol.clone()) {
                out.push(symbol);
            }
        }
        Self(out)
    }

    #[must_use]
    pub fn contains(&self, symbol: &str) -> bool {
        self.0.iter().any(|s| s == symbol)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_exchange_order() {
        let list = SymbolList::from_exchange_order(["ETHUSDT", "BTCUSDT", "SOLUSDT"]);
        let symbols: Vec<_> = list.iter().collect();
        assert_eq!(symbols, vec!["ETHUSDT", "BTCUSDT", "SOLUSDT"]);
    }

    #[test]
    fn deduplicates_keeping_first_occurrence() {
        let list = SymbolList::from_exchange_order(["BTCUSDT", "ETHUSDT", "BTCUSDT"]);
        assert_eq!(list.len(), 2);
        let symbols: Vec<_> = list.iter().collect();
        assert_eq!(symbols, vec!["BTCUSDT", "ETHUSDT"]);
    }

    #[test]
    fn contains_lookup() {
        let list = SymbolList::from_exchange_order(["BTCUSDT"]);
        assert!(list.contains("BTCUSDT"));
        assert!(!list.contains("XXXUSDT"));
    }

    #[test]
    fn empty_list() {
        assert!(SymbolList::empty().is_empty());
        assert!(SymbolList::from_exchange_order(Vec::<String>::new()).is_empty());
    }
}

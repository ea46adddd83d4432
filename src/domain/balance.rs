//! Account balance filtered to held assets.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// Per-asset balances, retaining only strictly positive quantities.
///
/// Construction filters zero and negative entries, so a `Balance` is always
/// either the full filtered snapshot or empty — never a partial view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Balance(BTreeMap<String, Decimal>);

impl Balance {
    /// An empty balance, the uniform "fetch failed" outcome.
    #[must_use]
    pub const fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Build from exchange-reported totals, dropping entries that are not
    /// strictly positive.
    #[must_use]
    pub fn from_totals<I, S>(totals: I) -> Self
    where
        I: IntoIterator<Item = (S, Decimal)>,
        S: Into<String>,
    {
        Self(
            totals
                .into_iter()
                .filter(|(_, quantity)| *quantity > Decimal::ZERO)
                .map(|(asset, quantity)| (asset.into(), quantity))
                .collect(),
        )
    }

    /// Available quantity for an asset, if held.
    #[must_use]
    pub fn get(&self, asset: &str) -> Option<Decimal> {
        self.0.get(asset).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(asset, quantity)| (asset.as_str(), *quantity))
    }
}

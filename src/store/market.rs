//! Quotes and the symbol catalog.

use crate::api::{Quote, SymbolCatalog};
use chrono::{DateTime, Utc};

/// Market data shown on the dashboard and in the add-monitor form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketState {
    /// Latest quote snapshot, replaced wholesale.
    pub quotes: Vec<Quote>,
    /// Category filter for quote polling; None means all.
    pub category: Option<String>,
    pub catalog: SymbolCatalog,
    pub quotes_updated: Option<DateTime<Utc>>,
}

impl MarketState {
    pub fn set_quotes(&mut self, quotes: Vec<Quote>) {
        self.quotes = quotes;
        self.quotes_updated = Some(Utc::now());
    }

    pub fn quote(&self, symbol: &str) -> Option<&Quote> {
        self.quotes
            .iter()
            .find(|q| q.symbol.eq_ignore_ascii_case(symbol))
    }

    /// Catalog categories in display order.
    pub fn categories(&self) -> Vec<&str> {
        self.catalog.keys().map(String::as_str).collect()
    }

    /// The category after `current`, wrapping to "all" (None) at the end.
    pub fn next_category(&self, current: Option<&str>) -> Option<String> {
        let categories = self.categories();
        match current {
            None => categories.first().map(|c| c.to_string()),
            Some(current) => categories
                .iter()
                .position(|c| *c == current)
                .and_then(|i| categories.get(i + 1))
                .map(|c| c.to_string()),
        }
    }

    /// All symbols across categories, for form completion.
    pub fn all_symbols(&self) -> impl Iterator<Item = &str> {
        self.catalog.values().flatten().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> SymbolCatalog {
        let mut catalog = SymbolCatalog::new();
        catalog.insert("forex".into(), vec!["EURUSD".into(), "GBPUSD".into()]);
        catalog.insert("crypto".into(), vec!["BTCUSD".into()]);
        catalog
    }

    #[test]
    fn test_category_cycle_wraps_through_all() {
        let state = MarketState {
            catalog: catalog(),
            ..Default::default()
        };
        // BTreeMap orders keys: crypto, forex.
        assert_eq!(state.next_category(None).as_deref(), Some("crypto"));
        assert_eq!(state.next_category(Some("crypto")).as_deref(), Some("forex"));
        assert_eq!(state.next_category(Some("forex")), None);
        assert_eq!(state.next_category(Some("gone")), None);
    }

    #[test]
    fn test_quotes_replaced_wholesale() {
        let mut state = MarketState::default();
        let quote = |s: &str| Quote {
            symbol: s.into(),
            category: None,
            bid: None,
            ask: None,
            close: None,
            change: None,
            timestamp: None,
        };
        state.set_quotes(vec![quote("EURUSD"), quote("GBPUSD")]);
        state.set_quotes(vec![quote("BTCUSD")]);
        assert_eq!(state.quotes.len(), 1);
        assert!(state.quote("btcusd").is_some());
        assert!(state.quote("EURUSD").is_none());
        assert_eq!(state.all_symbols().count(), 0);
    }
}

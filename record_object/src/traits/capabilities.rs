//! Backend capability flags
//!
//! Each adapter declares what it can do so the active record can reject a
//! query with one uniform error before any network call.

use crate::query_builder::{Query, RelationalOperator};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Search,
    Filter,
    Operator(RelationalOperator),
    Sort,
    Projection,
    Aggregation,
    Listing,
    Truncate,
    Patch,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Search => f.write_str("search"),
            Capability::Filter => f.write_str("filtering"),
            Capability::Operator(op) => write!(f, "the {} operator", op),
            Capability::Sort => f.write_str("sorting"),
            Capability::Projection => f.write_str("field projection"),
            Capability::Aggregation => f.write_str("aggregation"),
            Capability::Listing => f.write_str("listing"),
            Capability::Truncate => f.write_str("truncate"),
            Capability::Patch => f.write_str("partial updates"),
        }
    }
}

/// What a backend adapter supports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub search: bool,
    pub filter: bool,
    pub sort: bool,
    pub projection: bool,
    pub aggregation: bool,
    pub listing: bool,
    pub truncate: bool,
    pub patch: bool,
    pub operators: &'static [RelationalOperator],
}

impl Capabilities {
    /// Everything but patch
    pub const FULL: Capabilities = Capabilities {
        search: true,
        filter: true,
        sort: true,
        projection: true,
        aggregation: true,
        listing: true,
        truncate: true,
        patch: false,
        operators: &RelationalOperator::ALL,
    };

    /// Key lookups only
    pub const KEY_VALUE: Capabilities = Capabilities {
        search: false,
        filter: false,
        sort: false,
        projection: false,
        aggregation: false,
        listing: false,
        truncate: false,
        patch: false,
        operators: &[],
    };

    pub fn supports(&self, capability: Capability) -> bool {
        match capability {
            Capability::Search => self.search,
            Capability::Filter => self.filter,
            Capability::Operator(op) => self.filter && self.operators.contains(&op),
            Capability::Sort => self.sort,
            Capability::Projection => self.projection,
            Capability::Aggregation => self.aggregation,
            Capability::Listing => self.listing,
            Capability::Truncate => self.truncate,
            Capability::Patch => self.patch,
        }
    }

    /// First capability `query` needs that is missing
    pub fn missing_for(&self, query: &Query) -> Option<Capability> {
        let mut needed = Vec::new();
        if !query.conditions().is_empty() {
            needed.push(Capability::Filter);
            needed.extend(query.conditions().iter().map(|c| Capability::Operator(c.operator)));
        }
        if !query.order_bys().is_empty() {
            needed.push(Capability::Sort);
        }
        if query.plucks().is_some() {
            needed.push(Capability::Projection);
        }
        if !query.aggregation().is_empty() {
            needed.push(Capability::Aggregation);
        }

        needed.into_iter().find(|capability| !self.supports(*capability))
    }
}

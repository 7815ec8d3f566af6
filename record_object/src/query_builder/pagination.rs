//! Listing options

/// Where a paginated listing starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCursor {
    /// Start after this key (exclusive)
    After(String),
    /// Start at this key (inclusive)
    Start(String),
}

/// Options for listing every record of a collection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    pub limit: Option<usize>,
    pub cursor: Option<ListCursor>,
}

impl ListOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn after(mut self, key: &str) -> Self {
        self.cursor = Some(ListCursor::After(key.to_string()));
        self
    }

    pub fn start(mut self, key: &str) -> Self {
        self.cursor = Some(ListCursor::Start(key.to_string()));
        self
    }
}

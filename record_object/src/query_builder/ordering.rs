//! Sort keys

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

/// One sort key; several apply primary first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub key: String,
    pub order: SortOrder,
}

impl OrderBy {
    pub fn new(key: &str, order: SortOrder) -> Self {
        Self {
            key: key.to_string(),
            order,
        }
    }

    pub fn asc(key: &str) -> Self {
        Self::new(key, SortOrder::Asc)
    }

    pub fn desc(key: &str) -> Self {
        Self::new(key, SortOrder::Desc)
    }
}

use serde::{Deserialize, Deserializer, Serialize};

use crate::query::{QueryKey, QueryParams};

/// Page/page-size pair sent as query parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
}

impl Pagination {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    pub(crate) fn apply(&self, query: &mut QueryParams) {
        query
            .set(QueryKey::PageSize, self.page_size.to_string())
            .set(QueryKey::Page, self.page.to_string());
    }
}

/// Decode `null` the same as a missing field
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Paginated envelope returned by list endpoints
///
/// Bulk lookups return the same envelope with only `results` populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    pub count: Option<u64>,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub page_size: Option<u64>,
    pub current_page: Option<u64>,
    pub total_pages: Option<u64>,
    pub start_index: Option<u64>,
    pub end_index: Option<u64>,
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            count: None,
            next: None,
            previous: None,
            page_size: None,
            current_page: None,
            total_pages: None,
            start_index: None,
            end_index: None,
            results: Vec::new(),
        }
    }
}

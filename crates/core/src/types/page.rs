//! Paged list responses.

use serde::{Deserialize, Deserializer, Serialize};

/// One page of a backend listing.
///
/// The backend answers list endpoints either with a bare JSON array or with
/// an envelope (`{"data": [...], "total": 40, "page": 2, "limit": 12}`); both
/// deserialize into this type. A bare array is treated as a single complete
/// page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// Number of pages implied by `total` and `limit`.
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        if self.limit == 0 {
            return 1;
        }
        self.total.div_ceil(u64::from(self.limit)).max(1)
    }

    /// Whether a later page exists.
    #[must_use]
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page) < self.total_pages()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageRepr<T> {
    Bare(Vec<T>),
    Envelope {
        #[serde(alias = "items", alias = "results", alias = "rows")]
        data: Vec<T>,
        #[serde(default)]
        total: Option<u64>,
        #[serde(default)]
        page: Option<u32>,
        #[serde(default)]
        limit: Option<u32>,
    },
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PageRepr::<T>::deserialize(deserializer)? {
            PageRepr::Bare(items) => {
                let count = items.len();
                Self {
                    total: count as u64,
                    page: 1,
                    limit: u32::try_from(count).unwrap_or(u32::MAX),
                    items,
                }
            }
            PageRepr::Envelope {
                data,
                total,
                page,
                limit,
            } => {
                let count = data.len();
                Self {
                    total: total.unwrap_or(count as u64),
                    page: page.unwrap_or(1),
                    limit: limit.unwrap_or_else(|| u32::try_from(count).unwrap_or(u32::MAX)),
                    items: data,
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_array() {
        let page: Page<u32> = serde_json::from_str("[1, 2, 3]").unwrap();
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.total, 3);
        assert_eq!(page.total_pages(), 1);
        assert!(!page.has_next_page());
    }

    #[test]
    fn test_envelope() {
        let page: Page<u32> =
            serde_json::from_str(r#"{"items": [1, 2], "total": 5, "page": 1, "limit": 2}"#)
                .unwrap();
        assert_eq!(page.items, vec![1, 2]);
        assert_eq!(page.total_pages(), 3);
        assert!(page.has_next_page());
    }

    #[test]
    fn test_empty_bare_array() {
        let page: Page<u32> = serde_json::from_str("[]").unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_pages(), 1);
    }
}

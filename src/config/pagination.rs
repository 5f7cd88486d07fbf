//! Paging options for collection requests.

/// Largest value the API accepts for `page[limit]`.
pub const MAX_PAGE_LIMIT: u32 = 1000;

/// Paging options for `list()` calls.
///
/// Two mutually exclusive modes exist on the wire:
///
/// - size mode: `page[size]=N&count=true|false`
/// - limit mode: `page[limit]=N`, used whenever `limit` is set and non-zero,
///   clamped to [`MAX_PAGE_LIMIT`]
///
/// ```rust
/// use outreach_sdk::PaginationConfig;
///
/// let params = PaginationConfig::default().with_limit(3).query_params();
/// assert_eq!(params, vec![("page[limit]".to_string(), "3".to_string())]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, bon::Builder)]
pub struct PaginationConfig {
    /// Page size in size mode.
    #[builder(default = 50)]
    pub size: u32,

    /// Whether to ask the API for a total count in size mode.
    #[builder(default = false)]
    pub count: bool,

    /// Hard cap on returned records; switches to limit mode when non-zero.
    pub limit: Option<u32>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            size: 50,
            count: false,
            limit: None,
        }
    }
}

impl PaginationConfig {
    /// Sets the page size.
    #[must_use]
    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    /// Sets whether a total count is requested.
    #[must_use]
    pub fn with_count(mut self, count: bool) -> Self {
        self.count = count;
        self
    }

    /// Sets the hard limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns the effective limit, if limit mode applies.
    pub fn effective_limit(&self) -> Option<u32> {
        self.limit
            .filter(|limit| *limit > 0)
            .map(|limit| limit.min(MAX_PAGE_LIMIT))
    }

    /// Renders the pagination query parameters.
    pub fn query_params(&self) -> Vec<(String, String)> {
        match self.effective_limit() {
            Some(limit) => vec![("page[limit]".to_string(), limit.to_string())],
            None => vec![
                ("page[size]".to_string(), self.size.to_string()),
                ("count".to_string(), self.count.to_string()),
            ],
        }
    }
}

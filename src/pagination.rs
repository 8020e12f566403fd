//! Response envelopes and page-number pagination.

use serde::{Deserialize, Serialize};

/// Page metadata returned alongside list responses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PaginationMeta {
    #[serde(default)]
    pub page_number: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

impl PaginationMeta {
    pub fn has_next_page(&self) -> bool {
        self.page_number < self.total_pages
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.has_next_page().then(|| self.page_number + 1)
    }
}

/// `page[number]` / `page[size]` query parameters.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
}

impl PageParams {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
        }
    }

    pub fn with_number(mut self, number: u32) -> Self {
        self.number = Some(number);
        self
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = Some(size);
        self
    }
}

/// `{"data": T}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataResponse<T> {
    pub data: T,
}

/// `{"data": [T], "meta": {...}}` envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PaginationMeta>,
}

impl<T> ListResponse<T> {
    pub fn has_next_page(&self) -> bool {
        self.meta.map(|m| m.has_next_page()).unwrap_or(false)
    }

    pub fn next_page_number(&self) -> Option<u32> {
        self.meta.and_then(|m| m.next_page_number())
    }
}

pub(crate) const PAGE_NUMBER_KEY: &str = "page[number]";

//! Result shapes for query execution

use serde::de::DeserializeOwned;

use crate::error::QueryResult;
use crate::part::Sort;
use crate::store::Record;

/// Page size used when none is configured
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Zero-based page number, page size and dynamic sort
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
    pub sort: Sort,
}

impl PageRequest {
    /// `size` is clamped to at least 1
    pub fn of(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Sort::unsorted(),
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = sort;
        self
    }

    /// Index of the first record of the page
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    pub fn next(&self) -> Self {
        Self {
            page: self.page + 1,
            ..self.clone()
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(0, DEFAULT_PAGE_SIZE)
    }
}

/// Bounded window of results without a total count
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    pub content: Vec<Record>,
    pub offset: usize,
    pub size: usize,
}

impl Slice {
    pub fn content(&self) -> &[Record] {
        &self.content
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_first(&self) -> bool {
        self.offset == 0
    }

    /// Always `false`: whether records exist beyond the window is not checked
    pub fn has_next(&self) -> bool {
        false
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    /// Deserializes the content, `id` receiving the record key
    pub fn entities<T: DeserializeOwned>(&self) -> QueryResult<Vec<T>> {
        entities(&self.content)
    }
}

/// Window of results with the total count of matching records
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub content: Vec<Record>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
}

impl Page {
    pub fn content(&self) -> &[Record] {
        &self.content
    }

    pub fn total_pages(&self) -> usize {
        self.total_elements.div_ceil(self.size.max(1))
    }

    pub fn is_first(&self) -> bool {
        self.page == 0
    }

    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages()
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn entities<T: DeserializeOwned>(&self) -> QueryResult<Vec<T>> {
        entities(&self.content)
    }
}

fn entities<T: DeserializeOwned>(records: &[Record]) -> QueryResult<Vec<T>> {
    Ok(records
        .iter()
        .map(|r| r.to_entity::<T>())
        .collect::<Result<Vec<T>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(total: usize, page: usize, size: usize) -> Page {
        Page {
            content: Vec::new(),
            page,
            size,
            total_elements: total,
        }
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::of(3, 10).offset(), 30);
        assert_eq!(PageRequest::of(0, 0).size, 1);
        assert_eq!(PageRequest::default().size, DEFAULT_PAGE_SIZE);
        assert_eq!(PageRequest::of(1, 5).next().offset(), 10);
    }

    #[test]
    fn test_page_navigation() {
        assert_eq!(page(2, 0, 1).total_pages(), 2);
        assert!(page(2, 0, 1).has_next());
        assert!(page(2, 1, 1).is_last());
        assert_eq!(page(0, 0, 20).total_pages(), 0);
        assert_eq!(page(41, 0, 20).total_pages(), 3);
    }

    #[test]
    fn test_slice_never_reports_next() {
        let slice = Slice {
            content: vec![Record::new("a")],
            offset: 0,
            size: 1,
        };
        assert!(slice.is_first());
        assert!(!slice.has_next());
        assert!(slice.is_last());
    }
}

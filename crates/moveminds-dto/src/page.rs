use serde::{Deserialize, Serialize};

use crate::DtoError;

/// One page of a paginated listing, as returned by Spring-style endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_elements: u64,
    /// Zero-based page index, when the backend echoes it.
    #[serde(default)]
    pub number: Option<u32>,
    #[serde(default)]
    pub size: Option<u32>,
}

impl<T> Page<T> {
    /// A page holding every element of an unpaginated listing.
    pub fn single(content: Vec<T>) -> Self {
        let total = content.len() as u64;
        Self {
            content,
            total_pages: u32::from(total > 0),
            total_elements: total,
            number: Some(0),
            size: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            content: Vec::new(),
            total_pages: 0,
            total_elements: 0,
            number: Some(0),
            size: None,
        }
    }

    /// Check the page against the size that was requested.
    ///
    /// A page may never carry more items than asked for, and the reported
    /// total can never be smaller than what this page alone contains.
    pub fn checked(self, requested_size: usize) -> Result<Self, DtoError> {
        if self.content.len() > requested_size {
            return Err(DtoError::InconsistentPage(format!(
                "{} items returned for page size {}",
                self.content.len(),
                requested_size
            )));
        }
        if (self.content.len() as u64) > self.total_elements {
            return Err(DtoError::InconsistentPage(format!(
                "page holds {} items but total is {}",
                self.content.len(),
                self.total_elements
            )));
        }
        if self.total_elements > 0 && self.total_pages == 0 {
            return Err(DtoError::InconsistentPage(
                "non-empty listing reports zero pages".to_string(),
            ));
        }
        Ok(self)
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_pages: self.total_pages,
            total_elements: self.total_elements,
            number: self.number,
            size: self.size,
        }
    }
}

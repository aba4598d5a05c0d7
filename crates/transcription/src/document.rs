use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::address::{Bound, DocumentBound, ItemAddressInDocument, PageBound, UNDEFINED_PAGE};
use crate::error::TranscriptionError;
use crate::item::Item;
use crate::page::PageTranscription;

/// An item together with its address in the document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemInDocument {
    pub address: ItemAddressInDocument,
    pub item: Item,
}

/// Transcribed pages of one document, keyed by page id.
///
/// Page ids need not be contiguous; document order is page id order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentTranscription {
    #[serde(default)]
    pub doc_id: String,
    pages: BTreeMap<i32, PageTranscription>,
}

impl DocumentTranscription {
    pub fn new(doc_id: impl Into<String>) -> Self {
        Self {
            doc_id: doc_id.into(),
            pages: BTreeMap::new(),
        }
    }

    pub fn set_page_transcription(&mut self, page_id: i32, page: PageTranscription) {
        self.pages.insert(page_id, page);
    }

    pub fn with_page(mut self, page_id: i32, page: PageTranscription) -> Self {
        self.set_page_transcription(page_id, page);
        self
    }

    pub fn get_page_transcription(&self, page_id: i32) -> Result<&PageTranscription, TranscriptionError> {
        self.pages
            .get(&page_id)
            .ok_or(TranscriptionError::PageNotFound(page_id))
    }

    pub fn get_page_transcription_mut(
        &mut self,
        page_id: i32,
    ) -> Result<&mut PageTranscription, TranscriptionError> {
        self.pages
            .get_mut(&page_id)
            .ok_or(TranscriptionError::PageNotFound(page_id))
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page_ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.pages.keys().copied()
    }

    /// First page id, or [`UNDEFINED_PAGE`] for an empty document.
    pub fn first_transcribed_page_id(&self) -> i32 {
        self.pages.keys().next().copied().unwrap_or(UNDEFINED_PAGE)
    }

    /// Last page id, or [`UNDEFINED_PAGE`] for an empty document.
    pub fn last_transcribed_page_id(&self) -> i32 {
        self.pages.keys().next_back().copied().unwrap_or(UNDEFINED_PAGE)
    }

    /// Items of one page between two bounds, both inclusive.
    pub fn get_page_item_range(
        &self,
        page_id: i32,
        lower: PageBound,
        upper: PageBound,
    ) -> Result<Vec<ItemInDocument>, TranscriptionError> {
        let page = self.get_page_transcription(page_id)?;
        Ok(page
            .get_item_range(lower, upper)?
            .into_iter()
            .map(|i| ItemInDocument {
                address: ItemAddressInDocument {
                    page_id,
                    address: i.address,
                },
                item: i.item,
            })
            .collect())
    }

    /// Items between two document bounds, both inclusive, in document order.
    ///
    /// Pages are visited in id order and each page in reading order; there
    /// is no separator between the last item of a page and the first item of
    /// the next. A lower bound after the upper bound gives an empty range.
    pub fn get_item_range(
        &self,
        lower: DocumentBound,
        upper: DocumentBound,
    ) -> Result<Vec<ItemInDocument>, TranscriptionError> {
        let (first_page, first_bound) = match lower {
            Bound::Start => (self.first_transcribed_page_id(), Bound::Start),
            Bound::End => return Ok(Vec::new()),
            Bound::At(a) => {
                self.get_page_transcription(a.page_id)?;
                (a.page_id, Bound::At(a.address))
            }
        };
        let (last_page, last_bound) = match upper {
            Bound::Start => return Ok(Vec::new()),
            Bound::End => (self.last_transcribed_page_id(), Bound::End),
            Bound::At(a) => {
                self.get_page_transcription(a.page_id)?;
                (a.page_id, Bound::At(a.address))
            }
        };

        if self.pages.is_empty() {
            return Ok(Vec::new());
        }
        if first_page > last_page {
            // still report bad in-page addresses
            self.check_bound(first_page, first_bound)?;
            self.check_bound(last_page, last_bound)?;
            return Ok(Vec::new());
        }

        let mut out = Vec::new();
        for &page_id in self.pages.range(first_page..=last_page).map(|(id, _)| id) {
            let lower = if page_id == first_page { first_bound } else { Bound::Start };
            let upper = if page_id == last_page { last_bound } else { Bound::End };
            out.extend(self.get_page_item_range(page_id, lower, upper)?);
        }
        Ok(out)
    }

    fn check_bound(&self, page_id: i32, bound: PageBound) -> Result<(), TranscriptionError> {
        if let Bound::At(address) = bound {
            self.get_page_transcription(page_id)?.item(address)?;
        }
        Ok(())
    }
}

use std::fmt;

use serde::{Deserialize, Serialize};

/// Page id returned when a document has no transcribed pages.
pub const UNDEFINED_PAGE: i32 = -1;

/// Position of an item inside a page: text box index, then item index.
///
/// Indexes are signed so the null address `(-1, -1)` of the boundary format
/// can be represented; any negative component makes the address null.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct ItemAddressInPage {
    pub text_box_index: i32,
    pub item_index: i32,
}

impl ItemAddressInPage {
    pub const NULL: ItemAddressInPage = ItemAddressInPage {
        text_box_index: -1,
        item_index: -1,
    };

    pub fn new(text_box_index: i32, item_index: i32) -> Self {
        Self {
            text_box_index,
            item_index,
        }
    }

    pub fn null() -> Self {
        Self::NULL
    }

    pub fn is_null(&self) -> bool {
        self.text_box_index < 0 || self.item_index < 0
    }

    pub(crate) fn indexes(&self) -> Option<(usize, usize)> {
        let text_box = usize::try_from(self.text_box_index).ok()?;
        let item = usize::try_from(self.item_index).ok()?;
        Some((text_box, item))
    }
}

impl Default for ItemAddressInPage {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for ItemAddressInPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.text_box_index, self.item_index)
    }
}

/// Position of an item in a document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub struct ItemAddressInDocument {
    pub page_id: i32,
    pub address: ItemAddressInPage,
}

impl ItemAddressInDocument {
    pub const NULL: ItemAddressInDocument = ItemAddressInDocument {
        page_id: UNDEFINED_PAGE,
        address: ItemAddressInPage::NULL,
    };

    pub fn new(page_id: i32, text_box_index: i32, item_index: i32) -> Self {
        Self {
            page_id,
            address: ItemAddressInPage::new(text_box_index, item_index),
        }
    }

    pub fn null() -> Self {
        Self::NULL
    }

    pub fn is_null(&self) -> bool {
        self.page_id == UNDEFINED_PAGE || self.address.is_null()
    }
}

impl Default for ItemAddressInDocument {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for ItemAddressInDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} {}", self.page_id, self.address)
    }
}

/// One end of an item range.
///
/// `Start` and `End` replace the null address of the boundary format, whose
/// meaning depends on which end of the range it sits.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Bound<A> {
    Start,
    End,
    At(A),
}

pub type PageBound = Bound<ItemAddressInPage>;
pub type DocumentBound = Bound<ItemAddressInDocument>;

impl PageBound {
    /// Reads a lower limit in the boundary format: null means `Start`.
    pub fn lower(address: ItemAddressInPage) -> Self {
        if address.is_null() {
            Bound::Start
        } else {
            Bound::At(address)
        }
    }

    /// Reads an upper limit in the boundary format: null means `End`.
    pub fn upper(address: ItemAddressInPage) -> Self {
        if address.is_null() {
            Bound::End
        } else {
            Bound::At(address)
        }
    }
}

impl DocumentBound {
    pub fn lower(address: ItemAddressInDocument) -> Self {
        if address.is_null() {
            Bound::Start
        } else {
            Bound::At(address)
        }
    }

    pub fn upper(address: ItemAddressInDocument) -> Self {
        if address.is_null() {
            Bound::End
        } else {
            Bound::At(address)
        }
    }
}

use serde::{Deserialize, Serialize};

use crate::address::ItemAddressInPage;
use crate::item::Item;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TextBoxKind {
    MainColumn,
    MarginalAddition,
    MarginalGloss,
    Other(String),
}

impl TextBoxKind {
    /// Boxes whose content belongs to the text itself rather than to its
    /// commentary.
    pub fn is_main_text(&self) -> bool {
        matches!(self, TextBoxKind::MainColumn | TextBoxKind::MarginalAddition)
    }
}

/// A column or an annotation on a page.
///
/// Annotations point at the item they are attached to through `anchor`; a
/// null anchor makes the box hanging.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TextBox {
    pub kind: TextBoxKind,
    /// Free text, e.g. `"margin left"`.
    #[serde(default)]
    pub placement: String,
    #[serde(default)]
    pub anchor: ItemAddressInPage,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl TextBox {
    pub fn new(kind: TextBoxKind, placement: impl Into<String>, anchor: ItemAddressInPage) -> Self {
        Self {
            kind,
            placement: placement.into(),
            anchor,
            items: Vec::new(),
        }
    }

    /// Main text column `n` (1-based, as numbered on the page).
    pub fn column(n: u32) -> Self {
        Self::new(
            TextBoxKind::MainColumn,
            format!("column {n}"),
            ItemAddressInPage::NULL,
        )
    }

    pub fn marginal_addition(placement: impl Into<String>, anchor: ItemAddressInPage) -> Self {
        Self::new(TextBoxKind::MarginalAddition, placement, anchor)
    }

    pub fn marginal_gloss(placement: impl Into<String>, anchor: ItemAddressInPage) -> Self {
        Self::new(TextBoxKind::MarginalGloss, placement, anchor)
    }

    pub fn with_items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn push_item(&mut self, item: Item) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    pub fn is_hanging(&self) -> bool {
        self.anchor.is_null()
    }

    pub fn is_main_text(&self) -> bool {
        self.kind.is_main_text()
    }
}

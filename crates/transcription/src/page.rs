use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::address::{Bound, ItemAddressInPage, PageBound};
use crate::error::TranscriptionError;
use crate::item::Item;
use crate::text_box::{TextBox, TextBoxKind};

/// An item together with its address in the page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemInPage {
    pub address: ItemAddressInPage,
    pub item: Item,
}

/// The text boxes of one page, in insertion order.
///
/// Insertion order is the only notion of text box index, so boxes are never
/// reordered: replacing a box keeps its index and there is no removal.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageTranscription {
    text_boxes: Vec<TextBox>,
}

/// Reading order of a page: anchored boxes hang off their anchor item.
struct AnchorTree {
    /// `(text box, item)` to the boxes anchored there, in insertion order.
    children: BTreeMap<(usize, usize), Vec<usize>>,
    /// Boxes walked from the top level: columns first, then hanging boxes.
    roots: Vec<usize>,
}

impl PageTranscription {
    pub fn new() -> Self {
        Self::default()
    }

    /// One main column per entry, each holding one text item per string.
    pub fn from_column_texts(lang: &str, hand: u32, columns: &[&[&str]]) -> Self {
        let columns = columns
            .iter()
            .map(|texts| {
                texts
                    .iter()
                    .map(|t| Item::text(*t).with_language(lang).with_hand(hand))
                    .collect()
            })
            .collect();
        Self::from_column_items(columns)
    }

    pub fn from_column_items(columns: Vec<Vec<Item>>) -> Self {
        let mut page = Self::new();
        for (n, items) in columns.into_iter().enumerate() {
            page.add_text_box(TextBox::column(n as u32 + 1).with_items(items));
        }
        page
    }

    /// Appends a text box and returns its index.
    pub fn add_text_box(&mut self, text_box: TextBox) -> usize {
        self.text_boxes.push(text_box);
        self.text_boxes.len() - 1
    }

    pub fn replace_text_box(
        &mut self,
        index: usize,
        text_box: TextBox,
    ) -> Result<(), TranscriptionError> {
        let count = self.text_boxes.len();
        let slot = self
            .text_boxes
            .get_mut(index)
            .ok_or_else(|| TranscriptionError::text_box_out_of_bounds(index as i64, count))?;
        *slot = text_box;
        Ok(())
    }

    pub fn text_box_count(&self) -> usize {
        self.text_boxes.len()
    }

    pub fn text_boxes(&self) -> &[TextBox] {
        &self.text_boxes
    }

    pub fn text_box(&self, index: usize) -> Result<&TextBox, TranscriptionError> {
        self.text_boxes
            .get(index)
            .ok_or_else(|| TranscriptionError::text_box_out_of_bounds(index as i64, self.text_boxes.len()))
    }

    pub fn text_box_anchor(&self, index: usize) -> Result<ItemAddressInPage, TranscriptionError> {
        self.text_box(index).map(|tb| tb.anchor)
    }

    /// The item at `address`.
    pub fn item(&self, address: ItemAddressInPage) -> Result<&Item, TranscriptionError> {
        let (tb, item) = self.checked_indexes(address)?;
        Ok(&self.text_boxes[tb].items[item])
    }

    /// Reports the first text box whose anchor does not point at an existing
    /// item of an earlier box.
    pub fn validate_anchors(&self) -> Result<(), TranscriptionError> {
        for (index, tb) in self.text_boxes.iter().enumerate() {
            if !tb.is_hanging() && self.anchor_target(index).is_none() {
                return Err(TranscriptionError::MalformedAnchor {
                    text_box: index,
                    anchor: tb.anchor,
                });
            }
        }
        Ok(())
    }

    /// Every item of the page in reading order.
    pub fn all_items(&self) -> Vec<ItemInPage> {
        let tree = self.anchor_tree();
        let mut out = Vec::new();
        for &root in &tree.roots {
            self.walk(&tree, root, &mut out);
        }
        out
    }

    /// The items of one box followed, at each anchor point, by the boxes
    /// anchored to it.
    pub fn items_for_text_box(&self, index: usize) -> Result<Vec<ItemInPage>, TranscriptionError> {
        self.text_box(index)?;
        let tree = self.anchor_tree();
        let mut out = Vec::new();
        self.walk(&tree, index, &mut out);
        Ok(out)
    }

    /// Items between two bounds, both inclusive, in reading order.
    ///
    /// A lower bound that comes after the upper bound gives an empty range.
    pub fn get_item_range(
        &self,
        lower: PageBound,
        upper: PageBound,
    ) -> Result<Vec<ItemInPage>, TranscriptionError> {
        for bound in [lower, upper] {
            if let Bound::At(address) = bound {
                self.checked_indexes(address)?;
            }
        }

        let items = self.all_items();
        if items.is_empty() {
            return Ok(items);
        }
        let from = match lower {
            Bound::Start => 0,
            Bound::End => items.len(),
            Bound::At(a) => position_of(&items, a)?,
        };
        let to = match upper {
            Bound::Start => return Ok(Vec::new()),
            Bound::End => items.len() - 1,
            Bound::At(a) => position_of(&items, a)?,
        };
        if from > to {
            return Ok(Vec::new());
        }
        Ok(items.into_iter().skip(from).take(to - from + 1).collect())
    }

    fn checked_indexes(&self, address: ItemAddressInPage) -> Result<(usize, usize), TranscriptionError> {
        let count = self.text_boxes.len();
        let tb = usize::try_from(address.text_box_index)
            .ok()
            .filter(|&i| i < count)
            .ok_or_else(|| TranscriptionError::text_box_out_of_bounds(address.text_box_index.into(), count))?;
        let item_count = self.text_boxes[tb].items.len();
        let item = usize::try_from(address.item_index)
            .ok()
            .filter(|&i| i < item_count)
            .ok_or_else(|| TranscriptionError::item_out_of_bounds(address.item_index.into(), item_count))?;
        Ok((tb, item))
    }

    /// Anchor of box `index` when it points at an existing item of an
    /// earlier box.
    fn anchor_target(&self, index: usize) -> Option<(usize, usize)> {
        let (tb, item) = self.text_boxes.get(index)?.anchor.indexes()?;
        (tb < index && item < self.text_boxes[tb].items.len()).then_some((tb, item))
    }

    fn anchor_tree(&self) -> AnchorTree {
        let mut children: BTreeMap<(usize, usize), Vec<usize>> = BTreeMap::new();
        let mut columns = Vec::new();
        let mut hanging = Vec::new();

        for (index, tb) in self.text_boxes.iter().enumerate() {
            match self.anchor_target(index) {
                Some(target) => children.entry(target).or_default().push(index),
                None => {
                    if !tb.is_hanging() {
                        warn!(
                            text_box = index,
                            anchor = %tb.anchor,
                            "malformed_anchor"
                        );
                    }
                    if tb.kind == TextBoxKind::MainColumn {
                        columns.push(index);
                    } else {
                        hanging.push(index);
                    }
                }
            }
        }

        columns.extend(hanging);
        AnchorTree {
            children,
            roots: columns,
        }
    }

    /// Pre-order walk from `root` with an explicit stack.
    fn walk(&self, tree: &AnchorTree, root: usize, out: &mut Vec<ItemInPage>) {
        // (text box, next item to visit)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];
        while let Some((tb, item)) = stack.pop() {
            let Some(text_box) = self.text_boxes.get(tb) else {
                continue;
            };
            let Some(current) = text_box.items.get(item) else {
                continue;
            };
            out.push(ItemInPage {
                address: ItemAddressInPage::new(tb as i32, item as i32),
                item: current.clone(),
            });
            stack.push((tb, item + 1));
            if let Some(anchored) = tree.children.get(&(tb, item)) {
                stack.extend(anchored.iter().rev().map(|&child| (child, 0)));
            }
        }
    }
}

fn position_of(items: &[ItemInPage], address: ItemAddressInPage) -> Result<usize, TranscriptionError> {
    items
        .iter()
        .position(|i| i.address == address)
        .ok_or_else(|| TranscriptionError::item_out_of_bounds(address.item_index.into(), items.len()))
}

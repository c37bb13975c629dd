//! Add-on line items and the FIFO queue they wait in before submission.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// A secondary product to add to the cart after the base item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonItem {
    /// Product entity id.
    pub id: String,
    pub amount: i64,
}

impl AddonItem {
    #[must_use]
    pub fn new(id: impl Into<String>, amount: i64) -> Self {
        Self {
            id: id.into(),
            amount,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        let reason = if self.id.trim().is_empty() {
            "product id is empty"
        } else if self.amount <= 0 {
            "amount must be a positive integer"
        } else {
            return Ok(());
        };
        Err(CoreError::InvalidItem {
            id: self.id.clone(),
            amount: self.amount,
            reason: reason.to_owned(),
        })
    }
}

/// Ordered, append-only sequence of add-ons for one submission attempt.
///
/// Items are consumed front to back exactly once via [`AddonQueue::drain`].
/// Duplicates are not suppressed.
#[derive(Debug, Default)]
pub struct AddonQueue {
    items: Vec<AddonItem>,
}

impl AddonQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a fresh queue from the add-on controls on the product page:
    /// the free add-on first, then every checked additional add-on in
    /// display order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidItem`] if a checked line carries a
    /// counter that is not a positive integer.
    pub fn from_selection(selection: &AddonSelection) -> Result<Self, CoreError> {
        let mut queue = Self::new();

        if let Some(free) = selection.free_addon.as_deref().map(str::trim) {
            if !free.is_empty() {
                queue.append(AddonItem::new(free, 1))?;
            }
        }

        for line in selection.lines.iter().filter(|l| l.checked) {
            let amount = line.counter.trim().parse::<i64>().map_err(|e| {
                CoreError::InvalidItem {
                    id: line.entity_id.clone(),
                    amount: 0,
                    reason: format!("counter \"{}\" is not a number: {e}", line.counter),
                }
            })?;
            queue.append(AddonItem::new(line.entity_id.clone(), amount))?;
        }

        Ok(queue)
    }

    /// Adds `item` to the tail of the queue.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidItem`] if the id is empty or the amount
    /// is not positive. The queue is left unchanged.
    pub fn append(&mut self, item: AddonItem) -> Result<(), CoreError> {
        item.validate()?;
        self.items.push(item);
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Queued items in submission order, without consuming them.
    pub fn iter(&self) -> impl Iterator<Item = &AddonItem> {
        self.items.iter()
    }

    /// Yields every queued item once, in insertion order, leaving the
    /// queue empty. Items not pulled before the iterator is dropped are
    /// discarded.
    pub fn drain(&mut self) -> std::vec::Drain<'_, AddonItem> {
        self.items.drain(..)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// A free add-on select and the additional add-on lines as shown on the
/// product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonSelection {
    /// Value of the free add-on select. Empty means nothing was chosen.
    #[serde(default)]
    pub free_addon: Option<String>,
    #[serde(default)]
    pub lines: Vec<AddonLine>,
}

/// One additional add-on checkbox and its quantity counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLine {
    pub entity_id: String,
    #[serde(default)]
    pub checked: bool,
    /// Raw contents of the quantity counter input.
    pub counter: String,
}

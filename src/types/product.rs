//! Product-related types for the soda machine
//!
//! A product is one physical unit sitting in a slot. Stock is tracked as a
//! multiset, so several identical `Product` values may coexist in inventory.

/// A single stocked product unit
///
/// Two products are considered the same kind when their names match. The slot
/// is carried along for display and persistence but does not take part in
/// stock lookups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    /// Display name, e.g. "Coke"
    pub name: String,

    /// Slot identifier the unit occupies, e.g. "1"
    pub slot: String,
}

impl Product {
    /// Create a product unit for the given name and slot
    pub fn new(name: impl Into<String>, slot: impl Into<String>) -> Self {
        Product {
            name: name.into(),
            slot: slot.into(),
        }
    }

    /// Create a selection by name only
    ///
    /// Used when a caller asks for a product by name and the slot is unknown.
    pub fn named(name: impl Into<String>) -> Self {
        Product::new(name, "")
    }

    /// Whether `other` is the same kind of product (name match)
    pub fn same_kind(&self, other: &Product) -> bool {
        self.name == other.name
    }
}

//! Menu domain events exchanged with the menu service.
//!
//! All structs use `#[serde(rename_all = "camelCase")]` so the named `MsgPack`
//! and JSON forms line up with the presentation tier's field names.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Request for the full menu catalog.
///
/// Carries no fields today; kept as a struct so filters can be added without
/// changing the service signature.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAllMenuItemsEvent {}

/// Wire view of a single menu item.
///
/// Decoupled from the storage entity so the repository representation can
/// evolve independently of what callers see.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDetails {
    /// Catalog identifier, e.g. `"YM1"`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Exact price. Serialized as a decimal string, never as a float.
    pub cost: Decimal,
    /// Preparation time in whole minutes.
    pub minutes_to_prepare: u32,
}

/// Response carrying every menu item present at call time.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllMenuItemsEvent {
    pub menu_item_details: Vec<MenuItemDetails>,
}

impl AllMenuItemsEvent {
    #[must_use]
    pub fn new(menu_item_details: Vec<MenuItemDetails>) -> Self {
        Self { menu_item_details }
    }

    /// Looks up an item in the response by catalog identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&MenuItemDetails> {
        self.menu_item_details.iter().find(|item| item.id == id)
    }
}

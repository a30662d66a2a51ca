//! Stored entity shapes.
//!
//! These are the storage-side representations held in a
//! [`Repository`](super::Repository). The services project them into the wire
//! views from `noodlebar_core::messages` before returning them.

use chrono::{DateTime, Utc};
use noodlebar_core::messages::{MenuItemDetails, OrderDetails};
use rust_decimal::Decimal;
use uuid::Uuid;

use super::repository::Entity;

/// A purchasable catalog entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    /// Exact price; never converted to floating point.
    pub cost: Decimal,
    pub minutes_to_prepare: u32,
}

impl MenuItem {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        cost: Decimal,
        minutes_to_prepare: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost,
            minutes_to_prepare,
        }
    }

    /// Projects this item into its wire view.
    #[must_use]
    pub fn to_details(&self) -> MenuItemDetails {
        MenuItemDetails {
            id: self.id.clone(),
            name: self.name.clone(),
            cost: self.cost,
            minutes_to_prepare: self.minutes_to_prepare,
        }
    }
}

impl Entity for MenuItem {
    type Key = String;
    const KIND: &'static str = "menu item";

    fn key(&self) -> &String {
        &self.id
    }
}

/// A submitted order. Written once by the order service and never edited.
///
/// `key` and `date_time_of_submission` are held only here; the wire copies
/// inside [`OrderDetails`] are filled in by [`Order::to_details`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub key: Uuid,
    /// Customer payload as submitted, with `key` and submission time cleared.
    pub details: OrderDetails,
    pub date_time_of_submission: DateTime<Utc>,
}

impl Order {
    /// Builds an order from an inbound payload, stamping the key and time.
    ///
    /// Any client-supplied key or submission time in `details` is discarded.
    #[must_use]
    pub fn new(key: Uuid, mut details: OrderDetails, submitted_at: DateTime<Utc>) -> Self {
        details.key = None;
        details.date_time_of_submission = None;
        Self {
            key,
            details,
            date_time_of_submission: submitted_at,
        }
    }

    /// Wire view with the order key and submission time filled in.
    #[must_use]
    pub fn to_details(&self) -> OrderDetails {
        OrderDetails {
            key: Some(self.key),
            date_time_of_submission: Some(self.date_time_of_submission),
            ..self.details.clone()
        }
    }
}

impl Entity for Order {
    type Key = Uuid;
    const KIND: &'static str = "order";

    fn key(&self) -> &Uuid {
        &self.key
    }
}

/// Fulfillment label for an order, keyed by the order's own identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderStatus {
    pub order_id: Uuid,
    /// Free-text label; the vocabulary is owned by whoever updates it.
    pub status: String,
    pub status_date: DateTime<Utc>,
}

impl OrderStatus {
    #[must_use]
    pub fn new(order_id: Uuid, status: impl Into<String>, status_date: DateTime<Utc>) -> Self {
        Self {
            order_id,
            status: status.into(),
            status_date,
        }
    }
}

impl Entity for OrderStatus {
    type Key = Uuid;
    const KIND: &'static str = "order status";

    fn key(&self) -> &Uuid {
        &self.order_id
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn order_new_overwrites_client_supplied_fields() {
        let key = Uuid::new_v4();
        let forged = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let details = OrderDetails {
            key: Some(Uuid::new_v4()),
            date_time_of_submission: Some(forged),
            ..OrderDetails::for_customer("Jane", "1 Road", "90210")
        };

        let order = Order::new(key, details, now);
        assert_eq!(order.key, key);
        assert_eq!(order.date_time_of_submission, now);

        let view = order.to_details();
        assert_eq!(view.key, Some(key));
        assert_eq!(view.date_time_of_submission, Some(now));
        assert_eq!(view.name, "Jane");
    }

    #[test]
    fn submission_time_has_a_single_source() {
        let key = Uuid::new_v4();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        let later = Utc.with_ymd_and_hms(2024, 6, 2, 9, 30, 0).unwrap();
        let mut order = Order::new(key, OrderDetails::for_customer("Jane", "1 Road", "90210"), now);
        assert!(order.details.date_time_of_submission.is_none());
        assert!(order.details.key.is_none());

        order.date_time_of_submission = later;
        assert_eq!(order.to_details().date_time_of_submission, Some(later));
    }

    #[test]
    fn menu_item_projection_keeps_every_field() {
        let item = MenuItem::new("YM2", "Special Yummy Noodles", Decimal::new(299, 2), 12);
        let details = item.to_details();
        assert_eq!(details.id, "YM2");
        assert_eq!(details.name, "Special Yummy Noodles");
        assert_eq!(details.cost, Decimal::new(299, 2));
        assert_eq!(details.minutes_to_prepare, 12);
    }

    #[test]
    fn status_is_keyed_by_order_id() {
        let id = Uuid::new_v4();
        let status = OrderStatus::new(id, "ready", Utc::now());
        assert_eq!(status.key(), &id);
    }
}

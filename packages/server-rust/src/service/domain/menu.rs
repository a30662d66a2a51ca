//! Menu queries.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use noodlebar_core::messages::{AllMenuItemsEvent, Message, RequestAllMenuItemsEvent};
use tower::Service;
use tracing::{info, warn};

use crate::service::operation::{service_names, Operation, OperationError, OperationResponse};
use crate::service::registry::{ManagedService, ServiceContext};
use crate::storage::{MenuItem, Repository};

/// Answers "what is on the menu" straight from the menu repository.
///
/// Nothing is cached: every call reflects the repository at call time.
pub struct MenuService {
    menu_items: Arc<dyn Repository<MenuItem>>,
}

impl MenuService {
    #[must_use]
    pub fn new(menu_items: Arc<dyn Repository<MenuItem>>) -> Self {
        Self { menu_items }
    }

    /// Returns every menu item, projected into its wire view.
    ///
    /// The request carries no filters. An empty catalog yields an empty list.
    #[must_use]
    pub fn request_all_menu_items(&self, _request: &RequestAllMenuItemsEvent) -> AllMenuItemsEvent {
        let details = self
            .menu_items
            .find_all()
            .iter()
            .map(MenuItem::to_details)
            .collect();
        AllMenuItemsEvent::new(details)
    }
}

#[async_trait]
impl ManagedService for MenuService {
    fn name(&self) -> &'static str {
        service_names::MENU
    }

    async fn init(&self, ctx: &ServiceContext) -> anyhow::Result<()> {
        let items = self.menu_items.len();
        if items == 0 {
            warn!(node = %ctx.config.node_id, "menu catalog is empty");
        }
        info!(node = %ctx.config.node_id, items, "menu service ready");
        Ok(())
    }

    async fn shutdown(&self, _terminate: bool) -> anyhow::Result<()> {
        info!("menu service stopped");
        Ok(())
    }
}

/// The repository is read when the returned future is polled, not in `call`.
impl Service<Operation> for Arc<MenuService> {
    type Response = OperationResponse;
    type Error = OperationError;
    type Future = Pin<Box<dyn Future<Output = Result<OperationResponse, OperationError>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, op: Operation) -> Self::Future {
        let svc = Arc::clone(self);
        Box::pin(async move {
            match op {
                Operation::RequestAllMenuItems { payload, .. } => {
                    Ok(OperationResponse::message(Message::AllMenuItems {
                        payload: svc.request_all_menu_items(&payload),
                    }))
                }
                other => Err(OperationError::WrongService {
                    service: service_names::MENU,
                    operation: other.name(),
                }),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::Utc;
    use noodlebar_core::messages::DeleteOrderEvent;

    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::service::operation::OperationContext;
    use crate::storage::{default_menu, HashMapRepository};

    fn service_with(menu: Vec<MenuItem>) -> (MenuService, Arc<dyn Repository<MenuItem>>) {
        let repo: Arc<dyn Repository<MenuItem>> =
            Arc::new(HashMapRepository::seeded(menu).unwrap());
        (MenuService::new(Arc::clone(&repo)), repo)
    }

    #[test]
    fn returns_every_seeded_item() {
        let (svc, _) = service_with(default_menu());
        let event = svc.request_all_menu_items(&RequestAllMenuItemsEvent {});

        assert_eq!(event.menu_item_details.len(), 3);
        let ym1 = event.find("YM1").unwrap();
        assert_eq!(ym1.name, "Yummy Noodles");
        assert_eq!(ym1.cost, Decimal::new(199, 2));
        assert_eq!(ym1.minutes_to_prepare, 11);
        assert_eq!(event.find("YM3").unwrap().cost.to_string(), "3.99");
    }

    #[test]
    fn empty_catalog_is_an_empty_list() {
        let (svc, _) = service_with(Vec::new());
        assert!(svc
            .request_all_menu_items(&RequestAllMenuItemsEvent {})
            .menu_item_details
            .is_empty());
    }

    #[test]
    fn reflects_repository_changes_immediately() {
        let (svc, repo) = service_with(default_menu());
        repo.save(MenuItem::new("YM4", "Chilli Noodles", Decimal::new(450, 2), 9))
            .unwrap();
        repo.delete(&"YM1".to_string());

        let event = svc.request_all_menu_items(&RequestAllMenuItemsEvent {});
        assert_eq!(event.menu_item_details.len(), 3);
        assert!(event.find("YM1").is_none());
        assert_eq!(event.find("YM4").unwrap().minutes_to_prepare, 9);
    }

    #[tokio::test]
    async fn call_reads_the_menu_when_polled() {
        let (svc, repo) = service_with(default_menu());
        let mut svc = Arc::new(svc);
        let op = Operation::RequestAllMenuItems {
            ctx: OperationContext::new(1, service_names::MENU, Utc::now()),
            payload: RequestAllMenuItemsEvent {},
        };
        let pending = Service::call(&mut svc, op);
        repo.delete(&"YM2".to_string());

        let Message::AllMenuItems { payload } = pending.await.unwrap().into_message() else {
            panic!("expected ALL_MENU_ITEMS");
        };
        assert_eq!(payload.menu_item_details.len(), 2);
        assert!(payload.find("YM2").is_none());
    }

    #[tokio::test]
    async fn serves_menu_operations() {
        let (svc, _) = service_with(default_menu());
        let op = Operation::RequestAllMenuItems {
            ctx: OperationContext::new(1, service_names::MENU, Utc::now()),
            payload: RequestAllMenuItemsEvent {},
        };
        let resp = Arc::new(svc).oneshot(op).await.unwrap();
        let Message::AllMenuItems { payload } = resp.into_message() else {
            panic!("expected ALL_MENU_ITEMS");
        };
        assert_eq!(payload.menu_item_details.len(), 3);
    }

    #[tokio::test]
    async fn rejects_order_operations() {
        let (svc, _) = service_with(default_menu());
        let op = Operation::DeleteOrder {
            ctx: OperationContext::new(2, service_names::MENU, Utc::now()),
            payload: DeleteOrderEvent {
                key: Uuid::new_v4(),
            },
        };
        let err = Arc::new(svc).oneshot(op).await.unwrap_err();
        assert!(matches!(
            err,
            OperationError::WrongService {
                service: "menu",
                operation: "delete_order"
            }
        ));
    }

    fn catalog() -> impl Strategy<Value = HashMap<String, (String, i64, u32)>> {
        prop::collection::hash_map(
            "[A-Z]{2}[0-9]{1,3}",
            ("[a-zA-Z ]{1,20}", 0i64..100_000, 0u32..120),
            0..20,
        )
    }

    proptest! {
        #[test]
        fn menu_round_trips_every_item(items in catalog()) {
            let menu: Vec<MenuItem> = items
                .iter()
                .map(|(id, (name, cents, minutes))| {
                    MenuItem::new(id.as_str(), name.as_str(), Decimal::new(*cents, 2), *minutes)
                })
                .collect();
            let (svc, _) = service_with(menu);
            let event = svc.request_all_menu_items(&RequestAllMenuItemsEvent {});

            prop_assert_eq!(event.menu_item_details.len(), items.len());
            for (id, (name, cents, minutes)) in &items {
                let details = event.find(id).unwrap();
                prop_assert_eq!(&details.name, name);
                prop_assert_eq!(details.cost, Decimal::new(*cents, 2));
                prop_assert_eq!(details.minutes_to_prepare, *minutes);
            }
        }
    }
}

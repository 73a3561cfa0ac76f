//! OrderService — order lifecycle engine
//!
//! Every mutation follows the same order: validate, write the store,
//! then broadcast. Broadcasts never fail the call.

use sqlx::SqlitePool;

use shared::StallEvent;
use shared::error::ErrorCode;
use shared::message::NewOrderPayload;
use shared::models::{
    Order, OrderItem, OrderStatus, OrderWithItems, PaymentMethod, SubmitOrderRequest,
};

use super::error::{LifecycleError, LifecycleResult};
use super::status::StatusPolicy;
use super::summary::{initial_status, items_summary};
use crate::db::repository::order::{self as order_repo, OrderCreate};
use crate::live::NotificationHub;
use crate::services::ProofStore;

/// One uploaded payment proof file
#[derive(Debug, Clone)]
pub struct ProofUpload {
    pub file_name: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct OrderService {
    pool: SqlitePool,
    proofs: ProofStore,
    hub: NotificationHub,
    policy: StatusPolicy,
}

impl OrderService {
    pub fn new(
        pool: SqlitePool,
        proofs: ProofStore,
        hub: NotificationHub,
        policy: StatusPolicy,
    ) -> Self {
        Self {
            pool,
            proofs,
            hub,
            policy,
        }
    }

    pub fn hub(&self) -> &NotificationHub {
        &self.hub
    }

    pub fn proofs(&self) -> &ProofStore {
        &self.proofs
    }

    /// Create an order from the customer page and announce it
    #[tracing::instrument(skip_all, fields(customer = %req.customer_name))]
    pub async fn submit_order(&self, req: SubmitOrderRequest) -> LifecycleResult<Order> {
        let payment_method = validate_submission(&req)?;

        let summary = items_summary(&req.items);
        let status = initial_status(&payment_method);
        let items = req
            .items
            .iter()
            .map(|item| OrderItem {
                item_name: item.name.trim().to_string(),
                quantity: item.quantity,
                unit_price: item.price,
                note: item.trimmed_note().map(str::to_string),
            })
            .collect();

        let order = order_repo::create(
            &self.pool,
            OrderCreate {
                customer_name: req.customer_name.trim().to_string(),
                table_number: req
                    .table_number
                    .as_deref()
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string),
                total_price: req.total_price,
                payment_method,
                status,
                items_summary: summary,
                items,
            },
        )
        .await?;

        tracing::info!(
            order_id = order.id,
            status = %order.status,
            payment_method = %order.payment_method,
            "Order created"
        );

        self.hub
            .broadcast(StallEvent::NewOrder(NewOrderPayload::from(&order)));
        Ok(order)
    }

    /// Cashier status update
    #[tracing::instrument(skip(self))]
    pub async fn change_status(
        &self,
        order_id: i64,
        new_status: &str,
    ) -> LifecycleResult<OrderStatus> {
        let status = self.policy.check(new_status)?;

        order_repo::update_status(&self.pool, order_id, &status)
            .await
            .map_err(|e| LifecycleError::from_repo(e, order_id))?;

        tracing::info!(order_id, status = %status, "Order status updated");

        self.hub.broadcast(StallEvent::StatusUpdate {
            order_id,
            new_status: status.clone(),
        });
        Ok(status)
    }

    /// Store a payment proof and move the order to `AWAITING_CONFIRMATION`
    ///
    /// If the order can't be updated the stored file is removed again.
    #[tracing::instrument(skip(self, upload))]
    pub async fn record_payment_proof(
        &self,
        order_id: i64,
        upload: Option<ProofUpload>,
    ) -> LifecycleResult<String> {
        let upload = upload.ok_or_else(|| {
            LifecycleError::invalid(ErrorCode::NoFileProvided, "No payment proof file provided")
        })?;

        let file_ref = self
            .proofs
            .store(upload.file_name.as_deref(), &upload.data)
            .await?;

        if let Err(e) = order_repo::attach_payment_proof(&self.pool, order_id, &file_ref).await {
            self.discard_proof(&file_ref).await;
            return Err(LifecycleError::from_repo(e, order_id));
        }

        tracing::info!(order_id, file_ref = %file_ref, "Payment proof recorded");

        self.hub.broadcast(StallEvent::ProofUploaded {
            order_id,
            file_ref: file_ref.clone(),
        });
        self.hub.broadcast(StallEvent::StatusUpdate {
            order_id,
            new_status: OrderStatus::awaiting_confirmation(),
        });
        Ok(file_ref)
    }

    pub async fn list_orders(&self) -> LifecycleResult<Vec<OrderWithItems>> {
        Ok(order_repo::find_all_with_items(&self.pool).await?)
    }

    pub async fn get_order(&self, order_id: i64) -> LifecycleResult<Order> {
        order_repo::find_by_id(&self.pool, order_id)
            .await?
            .ok_or(LifecycleError::NotFound(order_id))
    }

    /// Items of an order; unknown ids give an empty list
    pub async fn get_items(&self, order_id: i64) -> LifecycleResult<Vec<OrderItem>> {
        Ok(order_repo::find_items(&self.pool, order_id).await?)
    }

    /// Best-effort removal of an orphaned upload
    async fn discard_proof(&self, file_ref: &str) {
        if let Err(e) = self.proofs.delete(file_ref).await {
            tracing::warn!(file_ref = %file_ref, error = %e, "Failed to remove orphaned payment proof");
        }
    }
}

/// Check a submission before anything is written
fn validate_submission(req: &SubmitOrderRequest) -> LifecycleResult<PaymentMethod> {
    if req.customer_name.trim().is_empty() {
        return Err(LifecycleError::invalid(
            ErrorCode::RequiredField,
            "Customer name is required",
        ));
    }
    if req.items.is_empty() {
        return Err(LifecycleError::invalid(ErrorCode::OrderEmpty, "Cart is empty"));
    }
    if !req.total_price.is_finite() || req.total_price <= 0.0 {
        return Err(LifecycleError::invalid(
            ErrorCode::ValueOutOfRange,
            "Total price must be greater than 0",
        ));
    }

    let payment_method = match &req.payment_method {
        Some(method) if !method.is_empty() => method.clone(),
        _ => {
            return Err(LifecycleError::invalid(
                ErrorCode::PaymentInvalidMethod,
                "Payment method is required",
            ));
        }
    };

    for (index, item) in req.items.iter().enumerate() {
        let line = index + 1;
        if item.name.trim().is_empty() {
            return Err(LifecycleError::validation(format!(
                "Item {line}: name is required"
            )));
        }
        if item.quantity <= 0 {
            return Err(LifecycleError::validation(format!(
                "Item {line}: quantity must be greater than 0"
            )));
        }
        if !item.price.is_finite() || item.price <= 0.0 {
            return Err(LifecycleError::validation(format!(
                "Item {line}: price must be greater than 0"
            )));
        }
    }

    Ok(payment_method)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::models::OrderItemInput;
    use tempfile::TempDir;

    struct Fixture {
        service: OrderService,
        _dir: TempDir,
    }

    async fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let db = DbService::in_memory().await.unwrap();
        let service = OrderService::new(
            db.pool,
            ProofStore::new(dir.path().join("uploads"), 1024 * 1024),
            NotificationHub::new(),
            StatusPolicy::default(),
        );
        Fixture { service, _dir: dir }
    }

    fn request(method: &str) -> SubmitOrderRequest {
        SubmitOrderRequest {
            customer_name: "Budi".into(),
            table_number: Some(" 4 ".into()),
            total_price: 25000.0,
            payment_method: Some(PaymentMethod::from(method)),
            items: vec![OrderItemInput {
                name: "Sate".into(),
                quantity: 2,
                price: 12500.0,
                note: Some(String::new()),
            }],
        }
    }

    fn proof() -> Option<ProofUpload> {
        Some(ProofUpload {
            file_name: Some("qris.png".into()),
            data: b"fake-png".to_vec(),
        })
    }

    async fn count_orders(service: &OrderService) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM orders")
            .fetch_one(&service.pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_submit_order_broadcasts_public_fields() {
        let f = fixture().await;
        let mut sub = f.service.hub().subscribe();

        let order = f.service.submit_order(request("QRIS")).await.unwrap();
        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::awaiting_payment());
        assert_eq!(order.items_summary, "Sate x2");
        assert_eq!(order.table_number.as_deref(), Some("4"));

        let event = sub.recv().await.unwrap();
        let StallEvent::NewOrder(payload) = event else {
            panic!("expected new-order, got {event:?}");
        };
        assert_eq!(payload, NewOrderPayload::from(&order));

        let items = f.service.get_items(order.id).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].note, None);
    }

    #[tokio::test]
    async fn test_initial_status_follows_payment_method() {
        let f = fixture().await;
        for (method, expected) in [
            ("CASH", OrderStatus::awaiting_payment()),
            ("TUNAI", OrderStatus::awaiting_payment()),
            ("QRIS", OrderStatus::awaiting_payment()),
            ("TRANSFER", OrderStatus::awaiting_confirmation()),
        ] {
            let order = f.service.submit_order(request(method)).await.unwrap();
            assert_eq!(order.status, expected, "payment method {method}");
        }
    }

    #[tokio::test]
    async fn test_invalid_submissions_write_nothing() {
        let f = fixture().await;
        let mut sub = f.service.hub().subscribe();

        let mut empty_cart = request("CASH");
        empty_cart.items.clear();
        let mut no_name = request("CASH");
        no_name.customer_name = "  ".into();
        let mut zero_total = request("CASH");
        zero_total.total_price = 0.0;
        let mut negative_total = request("CASH");
        negative_total.total_price = -5.0;
        let mut no_method = request("CASH");
        no_method.payment_method = None;
        let mut bad_item = request("CASH");
        bad_item.items[0].quantity = 0;

        for req in [empty_cart, no_name, zero_total, negative_total, no_method, bad_item] {
            let err = f.service.submit_order(req).await.unwrap_err();
            assert!(matches!(err, LifecycleError::Validation { .. }), "{err:?}");
        }

        assert_eq!(count_orders(&f.service).await, 0);
        assert_eq!(f.service.hub().broadcast(StallEvent::Connected {
            subscriber_id: "probe".into(),
        }), 1);
        // only the probe arrives: no new-order events were sent
        assert!(matches!(sub.recv().await, Some(StallEvent::Connected { .. })));
    }

    #[tokio::test]
    async fn test_change_status() {
        let f = fixture().await;
        let order = f.service.submit_order(request("CASH")).await.unwrap();
        let mut sub = f.service.hub().subscribe();

        let status = f.service.change_status(order.id, "DONE").await.unwrap();
        assert_eq!(status.as_str(), "DONE");
        assert_eq!(f.service.get_order(order.id).await.unwrap().status, status);

        assert_eq!(
            sub.recv().await,
            Some(StallEvent::StatusUpdate {
                order_id: order.id,
                new_status: OrderStatus::new("DONE"),
            })
        );
    }

    #[tokio::test]
    async fn test_change_status_unknown_order() {
        let f = fixture().await;
        let order = f.service.submit_order(request("CASH")).await.unwrap();

        let err = f.service.change_status(999, "DONE").await.unwrap_err();
        assert!(matches!(err, LifecycleError::NotFound(999)));
        assert_eq!(
            f.service.get_order(order.id).await.unwrap().status,
            OrderStatus::awaiting_payment()
        );

        let err = f.service.change_status(order.id, " ").await.unwrap_err();
        assert!(matches!(err, LifecycleError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_record_payment_proof_from_any_state() {
        let f = fixture().await;
        let order = f.service.submit_order(request("QRIS")).await.unwrap();
        f.service.change_status(order.id, "DONE").await.unwrap();
        let mut sub = f.service.hub().subscribe();

        let file_ref = f.service.record_payment_proof(order.id, proof()).await.unwrap();
        assert!(f.service.proofs().exists(&file_ref).await);

        let stored = f.service.get_order(order.id).await.unwrap();
        assert_eq!(stored.status, OrderStatus::awaiting_confirmation());
        assert_eq!(stored.payment_proof_ref.as_deref(), Some(file_ref.as_str()));

        assert_eq!(
            sub.recv().await,
            Some(StallEvent::ProofUploaded {
                order_id: order.id,
                file_ref: file_ref.clone(),
            })
        );
        assert_eq!(
            sub.recv().await,
            Some(StallEvent::StatusUpdate {
                order_id: order.id,
                new_status: OrderStatus::awaiting_confirmation(),
            })
        );
    }

    #[tokio::test]
    async fn test_record_payment_proof_unknown_order_leaves_no_file() {
        let f = fixture().await;

        let err = f.service.record_payment_proof(42, proof()).await.unwrap_err();
        assert!(matches!(err, LifecycleError::NotFound(42)));

        let leftovers = std::fs::read_dir(f.service.proofs().root()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_record_payment_proof_requires_file() {
        let f = fixture().await;
        let order = f.service.submit_order(request("QRIS")).await.unwrap();

        let err = f.service.record_payment_proof(order.id, None).await.unwrap_err();
        assert!(matches!(
            err,
            LifecycleError::Validation { code: ErrorCode::NoFileProvided, .. }
        ));
        assert_eq!(
            f.service.get_order(order.id).await.unwrap().status,
            OrderStatus::awaiting_payment()
        );
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let f = fixture().await;
        let a = f.service.submit_order(request("CASH")).await.unwrap();
        let b = f.service.submit_order(request("QRIS")).await.unwrap();

        let listed = f.service.list_orders().await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|o| o.order.id).collect();
        assert_eq!(ids, vec![b.id, a.id]);
        assert_eq!(listed[0].items[0].item_name, "Sate");
    }
}

use tracing::info;

use crate::client::RequestExecutor;
use crate::error::Result;
use crate::http::Response;
use crate::types::Order;

const STORE_ENDPOINT: &str = "/store";

/// Operations under `/store`: orders and inventory.
#[derive(Clone, Copy)]
pub struct StoreApi<'a> {
    executor: &'a RequestExecutor,
}

impl<'a> StoreApi<'a> {
    pub fn new(executor: &'a RequestExecutor) -> Self {
        Self { executor }
    }

    pub fn place_order(&self, order: &Order) -> Result<Response> {
        info!(pet_id = ?order.pet_id, "placing order");
        self.executor.post(&format!("{STORE_ENDPOINT}/order"), order)
    }

    pub fn get_order_by_id(&self, order_id: i64) -> Result<Response> {
        info!(order_id, "getting order");
        self.executor.reset_template();
        self.executor.get(&format!("{STORE_ENDPOINT}/order/{order_id}"))
    }

    pub fn delete_order(&self, order_id: i64) -> Result<Response> {
        info!(order_id, "deleting order");
        self.executor.delete(&format!("{STORE_ENDPOINT}/order/{order_id}"))
    }

    /// Pet counts keyed by status.
    pub fn get_inventory(&self) -> Result<Response> {
        info!("getting store inventory");
        self.executor.reset_template();
        self.executor.get(&format!("{STORE_ENDPOINT}/inventory"))
    }
}

use crate::api::{Order, OrderDetails, OrderId};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;

/// Order history of the session user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrdersView {
    pub orders: Vec<Order>,
}

impl OrdersView {
    /// Nobody logged in means no orders
    pub async fn load(client: &BookstoreClient) -> Result<Self, BookstoreError> {
        let Some(user_id) = client.session().current_user_id().await? else {
            return Ok(Self::default());
        };
        Ok(Self {
            orders: client.get_orders_by_user_id(user_id).await?,
        })
    }

    pub async fn details(
        &self,
        client: &BookstoreClient,
        order_id: OrderId,
    ) -> Result<OrderDetails, BookstoreError> {
        client.get_order_by_id(order_id).await
    }
}

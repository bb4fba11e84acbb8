use crate::api::{
    CartItem, DeliveryType, DeliveryTypeId, OrderCreate, OrderDetails, OrderItemCreate, UserId,
};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;
use crate::validation::ValidationError;

/// Checkout screen state: delivery address and delivery option for the cart items
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutForm {
    pub user_id: Option<UserId>,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub delivery_types: Vec<DeliveryType>,
    pub selected_delivery_type: Option<DeliveryTypeId>,
}

impl CheckoutForm {
    /// Prefills the address from the session user and preselects the first delivery option.
    /// Unavailable delivery options leave the list empty.
    pub async fn load(client: &BookstoreClient) -> Result<Self, BookstoreError> {
        let mut form = Self::default();
        if let Some(user) = client.session().current_user().await? {
            form.user_id = Some(user.user_id);
            form.street = user.street.unwrap_or_default();
            form.city = user.city.unwrap_or_default();
            form.postal_code = user.postal_code.unwrap_or_default();
        }

        match client.get_delivery_types().await {
            Ok(delivery_types) => {
                form.selected_delivery_type = delivery_types
                    .first()
                    .map(|delivery_type| delivery_type.delivery_type_id);
                form.delivery_types = delivery_types;
            }
            Err(err) => tracing::error!("Failed to fetch delivery types: {}", err),
        }
        Ok(form)
    }

    pub fn is_address_complete(&self) -> bool {
        [&self.street, &self.city, &self.postal_code]
            .iter()
            .all(|field| !field.trim().is_empty())
    }

    pub fn select_delivery_type(&mut self, delivery_type_id: DeliveryTypeId) {
        self.selected_delivery_type = Some(delivery_type_id);
    }

    pub fn selected_delivery(&self) -> Option<&DeliveryType> {
        let selected = self.selected_delivery_type?;
        self.delivery_types
            .iter()
            .find(|delivery_type| delivery_type.delivery_type_id == selected)
    }

    /// Fee of the selected option, zero when nothing is selected
    pub fn delivery_fee(&self) -> f64 {
        self.selected_delivery()
            .map(|delivery_type| delivery_type.fee)
            .unwrap_or_default()
    }

    pub fn total(&self, items: &[CartItem]) -> f64 {
        items.iter().map(CartItem::line_total).sum::<f64>() + self.delivery_fee()
    }

    /// Payload for the order, checks run in the order the screen reports them
    pub fn order(&self, items: &[CartItem]) -> Result<OrderCreate, BookstoreError> {
        if !self.is_address_complete() {
            return Err(ValidationError::IncompleteAddress.into());
        }
        let Some(user_id) = self.user_id else {
            return Err(BookstoreError::Auth("User not found".to_string()));
        };
        if items.is_empty() {
            return Err(ValidationError::EmptyCart.into());
        }
        let Some(delivery_type_id) = self.selected_delivery_type else {
            return Err(ValidationError::NoDeliveryType.into());
        };

        Ok(OrderCreate {
            user_id,
            street: self.street.clone(),
            city: self.city.clone(),
            postal_code: self.postal_code.clone(),
            delivery_type_id,
            order_items: items
                .iter()
                .map(|item| OrderItemCreate {
                    book_id: item.book_id,
                    quantity: item.quantity,
                })
                .collect(),
        })
    }

    /// Places the order, then empties the cart. Lines that fail to delete stay in the cart.
    /// The cart is emptied on every accepted order, also when the backend sent no details.
    pub async fn place_order(
        &self,
        client: &BookstoreClient,
        items: &[CartItem],
    ) -> Result<Option<OrderDetails>, BookstoreError> {
        let order = self.order(items)?;
        let placed = client.post_order(&order).await?;
        match &placed {
            Some(details) => tracing::info!(
                "Order {} placed for user {}",
                details.order_id,
                order.user_id
            ),
            None => tracing::info!("Order placed for user {}", order.user_id),
        }

        for item in items {
            if let Err(err) = client.delete_cart_item(item.cart_id).await {
                tracing::warn!("Failed to remove cart item {}: {}", item.cart_id, err);
            }
        }
        Ok(placed)
    }
}

use crate::api::{BookId, CartCreate, CartId, CartItem, UserId};
use crate::client::BookstoreClient;
use crate::error::BookstoreError;
use crate::optimistic::OptimisticList;
use crate::validation::{ValidationError, MIN_CART_QUANTITY};

/// Puts one copy of the book into the cart, returns whether the backend confirmed it
pub async fn add_to_cart(
    client: &BookstoreClient,
    user_id: UserId,
    book_id: BookId,
) -> Result<bool, BookstoreError> {
    let added = client
        .post_cart_item(&CartCreate {
            user_id,
            book_id,
            quantity: MIN_CART_QUANTITY,
        })
        .await?;
    Ok(added.is_some())
}

/// Cart screen state, every change is shown before the backend confirms it
#[derive(Debug, Clone, Default)]
pub struct CartView {
    user_id: UserId,
    items: OptimisticList<CartItem>,
}

impl CartView {
    pub async fn load(client: &BookstoreClient, user_id: UserId) -> Result<Self, BookstoreError> {
        let items = client.get_cart_by_user_id(user_id).await?;
        Ok(Self {
            user_id,
            items: OptimisticList::new(items),
        })
    }

    /// Replaces the shown lines with the server state
    pub async fn reload(&mut self, client: &BookstoreClient) -> Result<(), BookstoreError> {
        let items = client.get_cart_by_user_id(self.user_id).await?;
        self.items.replace(items);
        Ok(())
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn items(&self) -> &[CartItem] {
        self.items.items()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Number of copies over all lines
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub async fn increase_quantity(
        &mut self,
        client: &BookstoreClient,
        cart_id: CartId,
    ) -> Result<(), BookstoreError> {
        let quantity = self
            .quantity_of(cart_id)?
            .checked_add(1)
            .ok_or(ValidationError::QuantityAboveMaximum)?;
        self.set_quantity(client, cart_id, quantity).await
    }

    /// Refuses to go below one copy, the line has to be removed instead
    pub async fn decrease_quantity(
        &mut self,
        client: &BookstoreClient,
        cart_id: CartId,
    ) -> Result<(), BookstoreError> {
        let current = self.quantity_of(cart_id)?;
        if current <= MIN_CART_QUANTITY {
            return Err(ValidationError::QuantityBelowMinimum.into());
        }
        self.set_quantity(client, cart_id, current - 1).await
    }

    pub async fn remove_item(
        &mut self,
        client: &BookstoreClient,
        cart_id: CartId,
    ) -> Result<(), BookstoreError> {
        self.quantity_of(cart_id)?;
        self.items
            .apply(
                |items| items.retain(|item| item.cart_id != cart_id),
                client.delete_cart_item(cart_id),
            )
            .await
    }

    async fn set_quantity(
        &mut self,
        client: &BookstoreClient,
        cart_id: CartId,
        quantity: u32,
    ) -> Result<(), BookstoreError> {
        self.items
            .apply(
                |items| {
                    items
                        .iter_mut()
                        .filter(|item| item.cart_id == cart_id)
                        .for_each(|item| item.quantity = quantity)
                },
                client.update_cart_item_quantity(cart_id, quantity),
            )
            .await
    }

    fn quantity_of(&self, cart_id: CartId) -> Result<u32, BookstoreError> {
        self.items
            .iter()
            .find(|item| item.cart_id == cart_id)
            .map(|item| item.quantity)
            .ok_or_else(|| BookstoreError::NotFound(format!("Cart item {cart_id}")))
    }
}

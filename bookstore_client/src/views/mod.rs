pub use cart::{add_to_cart, CartView};
pub use catalog::{CatalogLoadErrors, CatalogView};
pub use checkout::CheckoutForm;
pub use orders::OrdersView;
pub use reviews::MyReviews;
pub use saved::{BookSaveState, SavedBooks};

mod cart;
mod catalog;
mod checkout;
mod orders;
mod reviews;
mod saved;

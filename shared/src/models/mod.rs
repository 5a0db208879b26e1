//! Domain Models
//!
//! Plain serde structs mirroring the relational schema. sqlx row derives
//! are feature-gated behind `db` so client builds stay database-free.

pub mod cart;
pub mod order;
pub mod payment;
pub mod product;

pub use cart::{CartItem, CartLine};
pub use order::{Order, OrderItem, OrderLine, OrderStatus};
pub use payment::{Payment, PaymentMethod, PaymentStatus};
pub use product::Product;

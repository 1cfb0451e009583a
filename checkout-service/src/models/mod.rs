pub mod group_order;
pub mod intent;
pub mod order;
pub mod order_item;
pub mod party_session;

pub use group_order::{CreateGroupOrderSummary, GroupOrderLine, GroupOrderSummary};
pub use intent::{CartItem, CheckoutIntent};
pub use order::{CreateOrder, Order, OrderStatus, OrderType};
pub use order_item::{CreateOrderItem, OrderItem};
pub use party_session::{PartySession, PartySessionStatus};

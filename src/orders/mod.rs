pub mod in_memory;
pub mod model;
pub mod store;

pub use in_memory::InMemoryOrderStore;
pub use model::{Order, OrderStatus, User};
pub use store::OrderStore;

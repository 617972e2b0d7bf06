pub mod types;

pub use types::{CustomerId, OrderId, OrderLineId, ProductId};

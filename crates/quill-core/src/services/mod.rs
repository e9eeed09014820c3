//! Application services - the operations exposed to the HTTP layer.

mod category_ledger;
mod consistency;
mod post_registry;

pub use category_ledger::CategoryLedger;
pub use consistency::ConsistencyCoordinator;
pub use post_registry::PostRegistry;

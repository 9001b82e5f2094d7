pub mod auto;
pub mod handlers;
pub mod store;

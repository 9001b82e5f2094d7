pub mod events;
pub mod handlers;
pub mod sessions;

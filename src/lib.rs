pub mod api;
pub mod core;
pub mod shared;
pub mod state;
pub mod store;

pub mod memory;
pub mod rates;

pub use memory::MemStore;
pub use rates::RateStore;

pub mod currency;
pub mod history;
pub mod units;

pub mod poll_interval;
pub mod price;

pub use poll_interval::PollInterval;
pub use price::PricePoint;

mod clock;
mod errors;
mod monetary;

pub use clock::{Clock, SystemClock};
pub use errors::MonetaryError;
pub use monetary::{percent_of, Monetary, Percent};

pub type TransactionId = u64;
pub type UserId = u64;
pub type CurrencyId = u32;
pub type OrderId = u64;
pub type BalanceId = u64;
pub type EntityId = u64;

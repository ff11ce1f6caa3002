//! Core ledger logic
//!
//! - `traits` - Clock and identifier seams
//! - `processor` - Pure statement application
//! - `pager` - Pure statement pagination
//! - `account_store` - Concurrent account storage with atomic per-account writes
//! - `ledger` - Facade exposing the four ledger operations

pub mod account_store;
pub mod ledger;
pub mod pager;
pub mod processor;
pub mod traits;

pub use account_store::{AccountStore, StoreConfig, WriteStrategy};
pub use ledger::Ledger;
pub use pager::StatementPager;
pub use processor::StatementProcessor;
pub use traits::{Clock, IdGenerator, RandomIdGenerator, SteppingClock, SystemClock};

mod currency;
mod entry;
mod error;
mod ledger;
mod money;

pub use currency::*;
pub use entry::*;
pub use error::*;
pub use ledger::*;
pub use money::*;

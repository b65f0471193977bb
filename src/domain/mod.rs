mod item;
mod ledger;
mod money;
mod partners;

pub use item::*;
pub use ledger::*;
pub use money::*;
pub use partners::*;

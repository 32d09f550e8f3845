//! Invite usage tracking
//!
//! Keeps the last observed use count of every invite of the tracked server
//! and, when a member joins, works out which configured invite they came
//! through so the matching role can be granted.

#[macro_use]
extern crate log;

mod cache;
mod join;
mod onboarding;
mod reconcile;
mod settings;
mod table;

pub use cache::*;
pub use join::*;
pub use onboarding::*;
pub use reconcile::*;
pub use settings::*;
pub use table::*;

// Page model: the unit cost table and the static theme registry.
// Both are immutable data shared by every fitting run.

pub mod themes;
pub mod units;

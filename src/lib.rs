//! scanmatch
//!
//! Terminal station for barcode scan verification: scan a reference code,
//! confirm it against its catalog record, then scan items and see at a glance
//! whether each one matches.
//!
//! Pure core (`scan`, `state`, `integration`) takes the current instant as a
//! parameter and returns effects; the impure shell (`view`, `lookup::worker`,
//! `main`) owns the terminal, the clock and threads.

pub mod config;
pub mod integration;
pub mod logging;
pub mod lookup;
pub mod model;
pub mod scan;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;

#[cfg(test)]
mod tests;

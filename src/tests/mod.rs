//! Internal test modules - whitebox tests with crate access
//!
//! Acceptance scenarios run through `AcceptanceTestHarness`, which drives the
//! real `TuiApp` key routing and event-loop tick on a synthetic clock.

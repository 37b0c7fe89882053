//! `nc-core` — foundational types for the netcut link-failure experiments.
//!
//! This crate is a dependency of every other `nc-*` crate.  It has no `nc-*`
//! dependencies and only a handful of external ones (`rand`, `thiserror`,
//! `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`ids`]         | `SwitchId`, `HostId`, `NodeIndex`                          |
//! | [`params`]      | `RunParameters`, `GeneratorConfig`, `LinkProfile`, `BatchConfig` |
//! | [`time`]        | `Clock` trait, `WallClock`, `ScaledClock`                  |
//! | [`rng`]         | `SimRng` (seeded, splittable per worker)                   |
//! | [`error`]       | `CoreError`, `CoreResult`                                  |

pub mod error;
pub mod ids;
pub mod params;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{HostId, NodeIndex, SwitchId};
pub use params::{BatchConfig, GeneratorConfig, LinkProfile, RunParameters};
pub use rng::SimRng;
pub use time::{Clock, ScaledClock, WallClock};

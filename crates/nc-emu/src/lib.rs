//! `nc-emu` — the seam between the experiment core and a packet emulator.
//!
//! The core never talks to virtual switches, controllers or `ping` directly;
//! it calls an [`EmulationBackend`].  A real deployment implements the trait
//! over its emulator of choice.  [`LabNetwork`] is an in-process
//! implementation used by the demo binaries and the test suites: links carry
//! their attributes and an up/down flag, pings follow the minimum-delay path
//! over links that are up.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`backend`] | `EmulationBackend`, `BackendFactory`, `Device`, `PingStats`, `LinkParams`, `TrafficFlow` |
//! | [`lab`]     | `LabNetwork`, `LabFactory`                                  |
//! | [`error`]   | `EmuError`, `EmuResult<T>`                                  |

pub mod backend;
pub mod error;
pub mod lab;


pub use backend::{BackendFactory, Device, EmulationBackend, LinkParams, PingStats, TrafficFlow};
pub use error::{EmuError, EmuResult};
pub use lab::{LabFactory, LabNetwork};

//! Post-run connectivity check.

use std::time::Duration;

use log::{debug, info};

use nc_core::{HostId, NodeIndex};
use nc_emu::EmulationBackend;

use crate::{MeasureError, MeasureResult};

/// Timeout handed to the backend for one connectivity probe.
pub const CONNECTIVITY_TIMEOUT: Duration = Duration::from_secs(5);

/// One flag per node: 1 when the central node could not reach it.
pub type AlarmFlags = Vec<u8>;

/// Probe every non-central host from `hosts[central]`.
///
/// A probe that loses every packet is repeated once; only a second total
/// loss raises the alarm.  A backend error counts as total loss.  The central
/// node's own flag is always 0.
pub fn detect_faults<B>(backend: &B, central: NodeIndex, hosts: &[HostId]) -> MeasureResult<AlarmFlags>
where
    B: EmulationBackend + ?Sized,
{
    let central_host = *hosts
        .get(central.index())
        .ok_or(MeasureError::NodeOutOfRange { index: central, nodes: hosts.len() })?;

    let flags: AlarmFlags = hosts
        .iter()
        .enumerate()
        .map(|(i, &host)| {
            if i == central.index() {
                return 0;
            }
            if !all_lost(backend, central_host, host) || !all_lost(backend, central_host, host) {
                return 0;
            }
            debug!("{central_host} cannot reach {host}");
            1
        })
        .collect();

    let alarms = flags.iter().filter(|&&f| f == 1).count();
    info!("fault detection: {alarms} of {} nodes unreachable", hosts.len() - 1);
    Ok(flags)
}

fn all_lost<B: EmulationBackend + ?Sized>(backend: &B, src: HostId, dst: HostId) -> bool {
    match backend.ping_loss(src, dst, CONNECTIVITY_TIMEOUT) {
        Ok(loss) => loss >= 100.0,
        Err(e) => {
            debug!("connectivity probe {src} -> {dst} failed: {e}");
            true
        }
    }
}

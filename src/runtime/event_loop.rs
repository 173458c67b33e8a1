use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::engine::{Engine, EngineEvent};
use crate::host::{Host, HostEvent};
use crate::relay::Relay;
use crate::session::ControlCmd;

const IDLE_SLEEP: Duration = Duration::from_millis(50);

/// Single-threaded dispatch loop. All relay handlers run here, in arrival
/// order, so no handler ever races another. Returns `Ok(())` when a quit
/// command comes in.
pub fn run<E: Engine, H: Host>(
    relay: &mut Relay<E, H>,
    control_rx: &Receiver<ControlCmd>,
    host_rx: &Receiver<HostEvent>,
    engine_rx: &Receiver<EngineEvent>,
    tick_rx: &Receiver<()>,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let mut idle = true;

        while let Ok(cmd) = control_rx.try_recv() {
            idle = false;
            if relay.handle_control(cmd) {
                return Ok(());
            }
        }

        while let Ok(event) = engine_rx.try_recv() {
            idle = false;
            relay.handle_engine_event(event);
        }

        while let Ok(event) = host_rx.try_recv() {
            idle = false;
            relay.handle_host_event(event);
        }

        while tick_rx.try_recv().is_ok() {
            idle = false;
            relay.poll_engine();
        }

        if idle {
            std::thread::sleep(IDLE_SLEEP);
        }
    }
}

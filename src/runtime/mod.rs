//! Wiring: builds the engine, host, session surface and relay, then runs
//! the dispatch loop until quit.

use std::sync::mpsc;
use std::time::Duration;

use crate::engine::{DirectoryEngine, EngineEvent};
use crate::host::{DesktopHost, HostEvent};
use crate::notify::Presenter;
use crate::poller::Poller;
use crate::relay::Relay;
use crate::session::{self, ControlCmd};

mod event_loop;
mod settings;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();

    let (control_tx, control_rx) = mpsc::channel::<ControlCmd>();
    let (host_tx, host_rx) = mpsc::channel::<HostEvent>();
    let (engine_tx, engine_rx) = mpsc::channel::<EngineEvent>();
    let (tick_tx, tick_rx) = mpsc::channel::<()>();

    let session = session::spawn_session(settings.session.identity.clone(), control_tx.clone());
    let host = DesktopHost::new(host_tx);
    let presenter = Presenter::new(&settings.notifications);
    let mut relay = Relay::new(DirectoryEngine::new(), host, session, presenter, &settings);

    relay.start(engine_tx);

    let mut poller = if settings.poller.enabled {
        Some(Poller::spawn(
            Duration::from_millis(settings.poller.interval_ms),
            tick_tx,
        ))
    } else {
        None
    };

    if settings.storage.ask_directory_on_start {
        relay.request_directory();
    }

    let run_result = event_loop::run(&mut relay, &control_rx, &host_rx, &engine_rx, &tick_rx);

    if let Some(poller) = poller.as_mut() {
        poller.stop();
    }
    relay.shutdown();

    run_result
}

#![warn(rust_2018_idioms)]

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use gilrs::Gilrs;
use log::{debug, error, info};

use gcar_controller::command::{Command, Mode};
use gcar_controller::command_link::CommandLink;
use gcar_controller::config::Config;
use gcar_controller::control_panel::ControlPanel;
use gcar_controller::event_translator::{EventTranslator, PadEvent, PanelAction};

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(5);

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(Path::new(&path))?,
        None => Config::default(),
    };
    info!("configuration: {:?}", config);

    let terminate = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGINT, Arc::clone(&terminate))?;
    signal_hook::flag::register(signal_hook::consts::SIGTERM, Arc::clone(&terminate))?;

    let mut link = CommandLink::start_listening(config.port)?;

    let mut gilrs = Gilrs::new().map_err(|error| format!("gamepad subsystem: {}", error))?;
    for (_id, gamepad) in gilrs.gamepads() {
        info!("gamepad found: {}", gamepad.name());
    }

    let mut panel = ControlPanel::new(&config);
    let mut translator = EventTranslator::new();

    let send_interval = Duration::from_millis(config.send_interval_ms);
    let mut last_send = Instant::now();

    while !terminate.load(Ordering::SeqCst) {
        while let Some(gilrs::Event { event, .. }) = gilrs.next_event() {
            let pad_event = match PadEvent::from_gilrs(&event) {
                Some(pad_event) => pad_event,
                None => continue,
            };
            for action in translator.translate(&pad_event) {
                apply(action, &mut panel, &link, &terminate);
            }
        }

        panel.set_link_alive(link.is_connected());

        if link.is_connected() {
            // the robot may write something back, which only proves it is alive
            let _ = link.poll_peer();
        }

        if last_send.elapsed() >= send_interval && link.is_connected() {
            last_send = Instant::now();
            let command = match panel.take_pending_sentinel() {
                Some(sentinel) => Some(sentinel),
                None if panel.mode() == Mode::Manual => Some(panel.current_command()),
                None => None, // automatic mode, the robot drives itself
            };
            if let Some(command) = command {
                debug!("sending: {}", command);
                if let Err(send_error) = link.send_command(command) {
                    error!("send failed: {}", send_error);
                }
            }
        }

        std::thread::sleep(INPUT_POLL_INTERVAL);
    }

    info!("shutting down");
    if link.is_connected() {
        // best effort, the robot should not keep driving with stale values
        let _ = link.send_command(Command::stop());
    }
    link.shutdown();

    Ok(())
}

fn apply(action: PanelAction, panel: &mut ControlPanel, link: &CommandLink, terminate: &AtomicBool) {
    match action {
        PanelAction::SetSpeed(fraction) => panel.set_speed(fraction),
        PanelAction::SetTurn(fraction) => panel.set_turn(fraction),
        PanelAction::SetFrequency(fraction) => panel.set_frequency(fraction),
        PanelAction::Stop => panel.stop(),
        PanelAction::ToggleMode => panel.toggle_mode(),
        PanelAction::Disconnect => link.disconnect(),
        PanelAction::Shutdown => terminate.store(true, Ordering::SeqCst),
    }
}

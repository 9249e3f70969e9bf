use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use anyhow::Context;
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::commands::{PlayerCommand, PlayerEvent};

/// How often the clock advances while nothing else is happening
const TICK: Duration = Duration::from_millis(250);

/// Channel pair the surface uses to talk to a running engine
pub struct EngineHandle {
    pub cmd_tx: Sender<PlayerCommand>,
    pub event_rx: Receiver<PlayerEvent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display)]
enum TransportStatus {
    #[default]
    #[strum(serialize = "idle")]
    Idle,
    #[strum(serialize = "playing")]
    Playing,
    #[strum(serialize = "paused")]
    Paused,
}

/// The stream currently armed on the clock
struct LoadedStream {
    url: String,
    duration: u32,
    looping: bool,
    /// Position in seconds, fractional between ticks
    position: f64,
}

/// A media engine that advances a wall-clock position over the declared
/// duration of the loaded stream. The stream URL is treated as opaque;
/// decoding lives behind this same command/event contract in a real backend.
pub struct TransportEngine {
    cmd_rx: Receiver<PlayerCommand>,
    event_tx: Sender<PlayerEvent>,
    status: TransportStatus,
    stream: Option<LoadedStream>,
}

impl TransportEngine {
    pub fn new() -> (TransportEngine, EngineHandle) {
        let (cmd_tx, cmd_rx) = unbounded();
        let (event_tx, event_rx) = unbounded();
        let engine = TransportEngine {
            cmd_rx,
            event_tx,
            status: TransportStatus::Idle,
            stream: None,
        };
        (engine, EngineHandle { cmd_tx, event_rx })
    }

    /// Run the engine on a dedicated thread
    pub fn spawn(mut self) -> anyhow::Result<JoinHandle<()>> {
        thread::Builder::new()
            .name("transport-engine".to_string())
            .spawn(move || self.run())
            .context("failed to spawn the engine thread")
    }

    fn run(&mut self) {
        log::info!("Transport engine started");
        let mut last_tick = Instant::now();
        loop {
            let command = self.cmd_rx.recv_timeout(TICK);
            self.advance(last_tick.elapsed());
            last_tick = Instant::now();

            match command {
                Ok(PlayerCommand::Quit) => break,
                Ok(cmd) => self.handle_command(cmd),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        log::info!("Transport engine shutting down");
        let _ = self.event_tx.send(PlayerEvent::Shutdown);
    }

    /// Apply one command. Transport commands with nothing loaded are silent
    /// no-ops.
    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::Load {
                url,
                duration,
                looping,
            } => {
                log::debug!("Loading stream {} ({}s)", url, duration);
                self.stream = Some(LoadedStream {
                    url,
                    duration,
                    looping,
                    position: 0.0,
                });
                self.status = TransportStatus::Paused;
                self.emit(PlayerEvent::MetadataReady { duration });
            }
            PlayerCommand::Unload => {
                self.stream = None;
                self.status = TransportStatus::Idle;
            }
            PlayerCommand::Play => {
                if self.stream.is_some() && self.status != TransportStatus::Playing {
                    self.status = TransportStatus::Playing;
                    log::debug!("Transport {}", self.status);
                    self.emit(PlayerEvent::Started);
                }
            }
            PlayerCommand::Pause => {
                if self.stream.is_some() && self.status == TransportStatus::Playing {
                    self.status = TransportStatus::Paused;
                    self.emit(PlayerEvent::Paused);
                }
            }
            PlayerCommand::Seek(position) => {
                if let Some(stream) = self.stream.as_mut() {
                    let clamped = position.min(stream.duration);
                    stream.position = f64::from(clamped);
                    self.emit(PlayerEvent::Position(clamped));
                }
            }
            PlayerCommand::SetLooping(looping) => {
                if let Some(stream) = self.stream.as_mut() {
                    stream.looping = looping;
                }
            }
            PlayerCommand::Quit => unreachable!("Quit is handled by the run loop"),
        }
    }

    /// Advance the clock by `elapsed` wall time, emitting a position update
    /// on each whole-second change and `Ended` once the declared duration is
    /// reached without looping.
    fn advance(&mut self, elapsed: Duration) {
        if self.status != TransportStatus::Playing {
            return;
        }
        let Some(stream) = self.stream.as_mut() else {
            return;
        };

        let before = stream.position as u32;
        stream.position += elapsed.as_secs_f64();

        let event = if stream.position >= f64::from(stream.duration) {
            if stream.looping && stream.duration > 0 {
                stream.position %= f64::from(stream.duration);
                Some(PlayerEvent::Position(stream.position as u32))
            } else {
                stream.position = f64::from(stream.duration);
                log::debug!("Stream {} ended", stream.url);
                self.status = TransportStatus::Paused;
                Some(PlayerEvent::Ended)
            }
        } else {
            let after = stream.position as u32;
            (after != before).then_some(PlayerEvent::Position(after))
        };

        if let Some(event) = event {
            self.emit(event);
        }
    }

    fn emit(&self, event: PlayerEvent) {
        // The surface may already be gone during teardown
        let _ = self.event_tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(engine: &mut TransportEngine, duration: u32, looping: bool) {
        engine.handle_command(PlayerCommand::Load {
            url: "https://cdn.example.com/ep.mp3".to_string(),
            duration,
            looping,
        });
    }

    fn drain(handle: &EngineHandle) -> Vec<PlayerEvent> {
        let mut events = Vec::new();
        while let Ok(event) = handle.event_rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[test]
    fn load_reports_metadata_and_resets_position() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 120, false);

        assert_eq!(drain(&handle), vec![PlayerEvent::MetadataReady { duration: 120 }]);
    }

    #[test]
    fn play_and_pause_are_acknowledged_once() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 120, false);
        drain(&handle);

        engine.handle_command(PlayerCommand::Play);
        engine.handle_command(PlayerCommand::Play);
        assert_eq!(drain(&handle), vec![PlayerEvent::Started]);

        engine.handle_command(PlayerCommand::Pause);
        engine.handle_command(PlayerCommand::Pause);
        assert_eq!(drain(&handle), vec![PlayerEvent::Paused]);
    }

    #[test]
    fn transport_commands_without_a_stream_are_noops() {
        let (mut engine, handle) = TransportEngine::new();

        engine.handle_command(PlayerCommand::Play);
        engine.handle_command(PlayerCommand::Pause);
        engine.handle_command(PlayerCommand::Seek(10));
        engine.handle_command(PlayerCommand::SetLooping(true));

        assert!(drain(&handle).is_empty());
        assert_eq!(engine.status, TransportStatus::Idle);
    }

    #[test]
    fn position_is_emitted_per_whole_second() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 120, false);
        engine.handle_command(PlayerCommand::Play);
        drain(&handle);

        engine.advance(Duration::from_millis(400));
        assert!(drain(&handle).is_empty());

        engine.advance(Duration::from_millis(700));
        assert_eq!(drain(&handle), vec![PlayerEvent::Position(1)]);
    }

    #[test]
    fn clock_does_not_advance_while_paused() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 120, false);
        drain(&handle);

        engine.advance(Duration::from_secs(5));
        assert!(drain(&handle).is_empty());
    }

    #[test]
    fn reaching_the_end_emits_ended_and_stops() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 3, false);
        engine.handle_command(PlayerCommand::Play);
        drain(&handle);

        engine.advance(Duration::from_secs(5));
        assert_eq!(drain(&handle), vec![PlayerEvent::Ended]);
        assert_eq!(engine.status, TransportStatus::Paused);

        // No further events once stopped
        engine.advance(Duration::from_secs(5));
        assert!(drain(&handle).is_empty());
    }

    #[test]
    fn looping_wraps_instead_of_ending() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 10, true);
        engine.handle_command(PlayerCommand::Play);
        drain(&handle);

        engine.advance(Duration::from_secs(12));
        assert_eq!(drain(&handle), vec![PlayerEvent::Position(2)]);
        assert_eq!(engine.status, TransportStatus::Playing);
    }

    #[test]
    fn zero_length_looping_stream_still_ends() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 0, true);
        engine.handle_command(PlayerCommand::Play);
        drain(&handle);

        engine.advance(Duration::from_millis(1));
        assert_eq!(drain(&handle), vec![PlayerEvent::Ended]);
    }

    #[test]
    fn seek_clamps_to_the_declared_duration() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 60, false);
        drain(&handle);

        engine.handle_command(PlayerCommand::Seek(45));
        assert_eq!(drain(&handle), vec![PlayerEvent::Position(45)]);

        engine.handle_command(PlayerCommand::Seek(500));
        assert_eq!(drain(&handle), vec![PlayerEvent::Position(60)]);
    }

    #[test]
    fn set_looping_takes_effect_at_the_boundary() {
        let (mut engine, handle) = TransportEngine::new();
        load(&mut engine, 5, false);
        engine.handle_command(PlayerCommand::Play);
        engine.handle_command(PlayerCommand::SetLooping(true));
        drain(&handle);

        engine.advance(Duration::from_secs(6));
        assert_eq!(drain(&handle), vec![PlayerEvent::Position(1)]);
        assert_eq!(engine.status, TransportStatus::Playing);
    }
}

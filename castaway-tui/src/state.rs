use anyhow::Result;
use castaway_core::commands::{PlayerCommand, PlayerEvent};
use castaway_core::engine::EngineHandle;
use castaway_core::episode::Episode;
use castaway_core::queue::PlayerQueue;
use ratatui::widgets::ListState;

/// Application state for the TUI: the queue store plus the surface-local
/// playback view derived from engine events.
pub struct AppState {
    /// Queue store, single source of truth for what plays
    pub player: PlayerQueue,
    /// Full episode catalog shown on the queue route
    pub catalog: Vec<Episode>,
    /// UI-local playback position in whole seconds
    pub progress: u32,
    /// Duration the engine reported for the loaded stream
    pub duration: u32,
    /// Status line at the bottom of the screen
    pub status_message: String,
    /// Selection on the queue route
    pub catalog_state: ListState,

    // What has been commanded to the engine so far; sync_engine diffs the
    // store against these instead of re-sending every turn.
    loaded_url: Option<String>,
    commanded_playing: Option<bool>,
    commanded_looping: bool,
}

impl AppState {
    pub fn new(catalog: Vec<Episode>) -> Self {
        let mut catalog_state = ListState::default();
        if !catalog.is_empty() {
            catalog_state.select(Some(0));
        }
        let status_message = if catalog.is_empty() {
            "No catalog loaded. Pass an episodes.json path as argument.".to_string()
        } else {
            format!("{} episodes in catalog", catalog.len())
        };

        Self {
            player: PlayerQueue::new(),
            catalog,
            progress: 0,
            duration: 0,
            status_message,
            catalog_state,
            loaded_url: None,
            commanded_playing: None,
            commanded_looping: false,
        }
    }

    /// Fold an engine event into the store and the surface-local view
    pub fn handle_event(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::MetadataReady { duration } => {
                self.progress = 0;
                self.duration = duration;
            }
            PlayerEvent::Started => {
                self.player.set_playing_state(true);
                self.status_message = "Playing".to_string();
            }
            PlayerEvent::Paused => {
                self.player.set_playing_state(false);
                self.status_message = "Paused".to_string();
            }
            PlayerEvent::Position(seconds) => {
                self.progress = seconds;
            }
            PlayerEvent::Ended => {
                if self.player.has_next() {
                    self.player.play_next();
                } else {
                    self.player.clear_player_state();
                    self.status_message = "Queue finished".to_string();
                }
            }
            PlayerEvent::Shutdown => {
                self.status_message = "Engine shut down".to_string();
            }
        }
    }

    /// Re-derive what the engine should be doing from the store and send
    /// only the commands whose target differs from what was last commanded.
    pub fn sync_engine(&mut self, handle: &EngineHandle) -> Result<()> {
        let current_url = self.player.current_episode().map(|e| e.url.clone());
        if current_url != self.loaded_url {
            match self.player.current_episode() {
                Some(episode) => {
                    log::info!("Loading \"{}\"", episode.title);
                    handle.cmd_tx.send(PlayerCommand::Load {
                        url: episode.url.clone(),
                        duration: episode.duration,
                        looping: self.player.is_looping,
                    })?;
                }
                None => {
                    handle.cmd_tx.send(PlayerCommand::Unload)?;
                    self.progress = 0;
                    self.duration = 0;
                }
            }
            self.loaded_url = current_url;
            self.commanded_looping = self.player.is_looping;
            // Force a fresh play/pause decision for the new stream
            self.commanded_playing = None;
        }

        if self.player.is_looping != self.commanded_looping && self.loaded_url.is_some() {
            handle
                .cmd_tx
                .send(PlayerCommand::SetLooping(self.player.is_looping))?;
            self.commanded_looping = self.player.is_looping;
        }

        let desired = self.player.is_playing && self.loaded_url.is_some();
        if self.commanded_playing != Some(desired) {
            if desired {
                handle.cmd_tx.send(PlayerCommand::Play)?;
            } else {
                handle.cmd_tx.send(PlayerCommand::Pause)?;
            }
            self.commanded_playing = Some(desired);
        }

        Ok(())
    }

    /// Jump to `amount` seconds: command the engine and reflect the target
    /// immediately rather than waiting for its position event.
    pub fn seek_to(&mut self, amount: u32, handle: &EngineHandle) -> Result<()> {
        if self.player.current_episode().is_none() {
            return Ok(());
        }
        let amount = amount.min(self.duration);
        handle.cmd_tx.send(PlayerCommand::Seek(amount))?;
        self.progress = amount;
        Ok(())
    }

    pub fn current_episode(&self) -> Option<&Episode> {
        self.player.current_episode()
    }

    /// Shuffle only means something with more than one episode queued
    pub fn shuffle_available(&self) -> bool {
        self.current_episode().is_some() && self.player.episode_list.len() > 1
    }

    // Catalog selection, queue-route navigation

    pub fn catalog_next(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        let i = match self.catalog_state.selected() {
            Some(i) if i + 1 < self.catalog.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.catalog_state.select(Some(i));
    }

    pub fn catalog_prev(&mut self) {
        if self.catalog.is_empty() {
            return;
        }
        let i = match self.catalog_state.selected() {
            Some(0) | None => self.catalog.len() - 1,
            Some(i) => i - 1,
        };
        self.catalog_state.select(Some(i));
    }

    /// Load the whole catalog into the queue, starting at the selection
    pub fn play_selected(&mut self) {
        if let Some(index) = self.catalog_state.selected() {
            self.player.play_list(self.catalog.clone(), index);
            if let Some(episode) = self.catalog.get(index) {
                self.status_message = format!("Queued from \"{}\"", episode.title);
            }
        }
    }

    /// Play only the selected episode, replacing any queued list
    pub fn play_selected_single(&mut self) {
        if let Some(episode) = self
            .catalog_state
            .selected()
            .and_then(|index| self.catalog.get(index))
            .cloned()
        {
            self.status_message = format!("Playing \"{}\"", episode.title);
            self.player.play(episode);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{Receiver, unbounded};

    fn episode(n: usize) -> Episode {
        Episode {
            title: format!("Episode {}", n),
            members: "Host".to_string(),
            thumbnail: format!("thumb-{}.jpg", n),
            duration: 100,
            url: format!("https://cdn.example.com/ep{}.mp3", n),
        }
    }

    fn catalog(count: usize) -> Vec<Episode> {
        (0..count).map(episode).collect()
    }

    fn test_handle() -> (EngineHandle, Receiver<PlayerCommand>) {
        let (cmd_tx, cmd_rx) = unbounded();
        let (_event_tx, event_rx) = unbounded::<PlayerEvent>();
        (EngineHandle { cmd_tx, event_rx }, cmd_rx)
    }

    fn sent(cmd_rx: &Receiver<PlayerCommand>) -> Vec<PlayerCommand> {
        let mut commands = Vec::new();
        while let Ok(command) = cmd_rx.try_recv() {
            commands.push(command);
        }
        commands
    }

    #[test]
    fn metadata_ready_resets_progress() {
        let mut state = AppState::new(catalog(1));
        state.progress = 42;

        state.handle_event(PlayerEvent::MetadataReady { duration: 100 });
        assert_eq!(state.progress, 0);
        assert_eq!(state.duration, 100);
    }

    #[test]
    fn position_events_drive_progress() {
        let mut state = AppState::new(catalog(1));
        state.handle_event(PlayerEvent::Position(17));
        assert_eq!(state.progress, 17);
    }

    #[test]
    fn started_and_paused_reconcile_the_store() {
        let mut state = AppState::new(catalog(1));

        state.handle_event(PlayerEvent::Started);
        assert!(state.player.is_playing);

        state.handle_event(PlayerEvent::Paused);
        assert!(!state.player.is_playing);
    }

    #[test]
    fn ended_advances_when_a_next_episode_exists() {
        let mut state = AppState::new(catalog(3));
        state.player.play_list(state.catalog.clone(), 0);

        state.handle_event(PlayerEvent::Ended);
        assert_eq!(state.player.current_episode_index, 1);
        assert_eq!(state.player.episode_list.len(), 3);
    }

    #[test]
    fn ended_on_the_last_episode_clears_the_queue() {
        let mut state = AppState::new(catalog(3));
        state.player.play_list(state.catalog.clone(), 2);

        state.handle_event(PlayerEvent::Ended);
        assert!(state.player.episode_list.is_empty());
        assert_eq!(state.player.current_episode_index, 0);
    }

    #[test]
    fn sync_loads_and_plays_a_new_episode() {
        let mut state = AppState::new(catalog(2));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();

        let commands = sent(&cmd_rx);
        assert_eq!(
            commands,
            vec![
                PlayerCommand::Load {
                    url: "https://cdn.example.com/ep0.mp3".to_string(),
                    duration: 100,
                    looping: false,
                },
                PlayerCommand::Play,
            ]
        );
    }

    #[test]
    fn sync_is_idempotent_between_changes() {
        let mut state = AppState::new(catalog(2));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();
        sent(&cmd_rx);

        state.sync_engine(&handle).unwrap();
        assert!(sent(&cmd_rx).is_empty());
    }

    #[test]
    fn sync_pauses_when_the_store_stops_playing() {
        let mut state = AppState::new(catalog(2));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();
        sent(&cmd_rx);

        state.player.toggle_play();
        state.sync_engine(&handle).unwrap();
        assert_eq!(sent(&cmd_rx), vec![PlayerCommand::Pause]);
    }

    #[test]
    fn sync_ships_the_loop_flag_when_it_changes() {
        let mut state = AppState::new(catalog(2));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();
        sent(&cmd_rx);

        state.player.toggle_loop();
        state.sync_engine(&handle).unwrap();
        assert_eq!(sent(&cmd_rx), vec![PlayerCommand::SetLooping(true)]);
    }

    #[test]
    fn sync_unloads_when_the_queue_empties() {
        let mut state = AppState::new(catalog(1));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();
        sent(&cmd_rx);
        state.duration = 100;
        state.progress = 40;

        state.handle_event(PlayerEvent::Ended);
        state.sync_engine(&handle).unwrap();

        let commands = sent(&cmd_rx);
        assert_eq!(commands[0], PlayerCommand::Unload);
        assert_eq!(state.progress, 0);
        assert_eq!(state.duration, 0);
    }

    #[test]
    fn ended_then_sync_restarts_playback_on_the_next_episode() {
        let mut state = AppState::new(catalog(2));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.sync_engine(&handle).unwrap();
        sent(&cmd_rx);

        state.handle_event(PlayerEvent::Ended);
        state.sync_engine(&handle).unwrap();

        let commands = sent(&cmd_rx);
        assert_eq!(
            commands,
            vec![
                PlayerCommand::Load {
                    url: "https://cdn.example.com/ep1.mp3".to_string(),
                    duration: 100,
                    looping: false,
                },
                PlayerCommand::Play,
            ]
        );
    }

    #[test]
    fn seek_is_optimistic_and_clamped() {
        let mut state = AppState::new(catalog(1));
        let (handle, cmd_rx) = test_handle();

        state.player.play_list(state.catalog.clone(), 0);
        state.duration = 100;

        state.seek_to(42, &handle).unwrap();
        assert_eq!(state.progress, 42);
        assert_eq!(sent(&cmd_rx), vec![PlayerCommand::Seek(42)]);

        state.seek_to(500, &handle).unwrap();
        assert_eq!(state.progress, 100);
        assert_eq!(sent(&cmd_rx), vec![PlayerCommand::Seek(100)]);
    }

    #[test]
    fn seek_without_an_episode_is_a_noop() {
        let mut state = AppState::new(Vec::new());
        let (handle, cmd_rx) = test_handle();

        state.seek_to(10, &handle).unwrap();
        assert_eq!(state.progress, 0);
        assert!(sent(&cmd_rx).is_empty());
    }

    #[test]
    fn shuffle_needs_more_than_one_queued_episode() {
        let mut state = AppState::new(catalog(2));
        assert!(!state.shuffle_available());

        state.player.play(episode(0));
        assert!(!state.shuffle_available());

        state.player.play_list(state.catalog.clone(), 0);
        assert!(state.shuffle_available());
    }

    #[test]
    fn catalog_selection_wraps_both_ways() {
        let mut state = AppState::new(catalog(2));
        assert_eq!(state.catalog_state.selected(), Some(0));

        state.catalog_next();
        assert_eq!(state.catalog_state.selected(), Some(1));
        state.catalog_next();
        assert_eq!(state.catalog_state.selected(), Some(0));
        state.catalog_prev();
        assert_eq!(state.catalog_state.selected(), Some(1));
    }

    #[test]
    fn play_selected_queues_the_whole_catalog() {
        let mut state = AppState::new(catalog(3));
        state.catalog_next();

        state.play_selected();
        assert_eq!(state.player.episode_list.len(), 3);
        assert_eq!(state.player.current_episode_index, 1);
        assert!(state.player.is_playing);
    }

    #[test]
    fn play_selected_single_replaces_the_queue() {
        let mut state = AppState::new(catalog(3));
        state.play_selected();
        state.catalog_next();

        state.play_selected_single();
        assert_eq!(state.player.episode_list.len(), 1);
        assert_eq!(state.player.current_episode_index, 0);
        assert_eq!(state.current_episode().unwrap().title, "Episode 1");
    }
}

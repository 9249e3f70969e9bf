use rand::Rng;

use crate::episode::Episode;

/// Shared playback state: the ordered episode queue, the cursor into it, and
/// the transport flags. Single source of truth for the player surface; every
/// mutation goes through the operations below.
#[derive(Debug, Clone, Default)]
pub struct PlayerQueue {
    pub episode_list: Vec<Episode>,
    pub current_episode_index: usize,
    pub is_playing: bool,
    pub is_looping: bool,
    pub is_shuffling: bool,
}

impl PlayerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole queue with a single episode and start playing it
    pub fn play(&mut self, episode: Episode) {
        self.episode_list = vec![episode];
        self.current_episode_index = 0;
        self.is_playing = true;
    }

    /// Replace the queue with `list`, positioned at `index`, and start
    /// playing. The index is stored as given; an out-of-range value leaves
    /// the queue without a current episode until the next navigation.
    pub fn play_list(&mut self, list: Vec<Episode>, index: usize) {
        self.episode_list = list;
        self.current_episode_index = index;
        self.is_playing = true;
    }

    pub fn toggle_play(&mut self) {
        self.is_playing = !self.is_playing;
    }

    pub fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
    }

    pub fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
    }

    /// Reconcile with playback state observed from the engine
    pub fn set_playing_state(&mut self, state: bool) {
        self.is_playing = state;
    }

    /// Shuffle always has a pick available; otherwise there must be an
    /// episode after the cursor
    pub fn has_next(&self) -> bool {
        self.is_shuffling || self.current_episode_index + 1 < self.episode_list.len()
    }

    pub fn has_previous(&self) -> bool {
        self.current_episode_index > 0
    }

    /// Advance the cursor. Shuffle draws a uniform index over the whole list
    /// and may land on the current episode again.
    pub fn play_next(&mut self) {
        if self.is_shuffling {
            if self.episode_list.is_empty() {
                return;
            }
            let mut rng = rand::rng();
            self.current_episode_index = rng.random_range(0..self.episode_list.len());
        } else if self.has_next() {
            self.current_episode_index += 1;
        }
    }

    pub fn play_previous(&mut self) {
        if self.has_previous() {
            self.current_episode_index -= 1;
        }
    }

    /// Drop the queue once playback has exhausted it. Transport flags keep
    /// their values.
    pub fn clear_player_state(&mut self) {
        self.episode_list = Vec::new();
        self.current_episode_index = 0;
    }

    /// Episode under the cursor, if the queue has one there
    pub fn current_episode(&self) -> Option<&Episode> {
        self.episode_list.get(self.current_episode_index)
    }
}

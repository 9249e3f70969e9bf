/// Commands sent from the player surface to the media engine
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Load a stream with its declared duration and the loop flag
    Load {
        url: String,
        duration: u32,
        looping: bool,
    },
    /// Drop the loaded stream and stop the clock
    Unload,
    /// Start or resume playback
    Play,
    /// Pause playback
    Pause,
    /// Jump to a position in seconds
    Seek(u32),
    /// Repeat the loaded stream natively instead of reporting its end
    SetLooping(bool),
    /// Shut down the engine
    Quit,
}

/// Events sent from the media engine back to the player surface
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    /// Stream metadata is known and the position sits at zero
    MetadataReady { duration: u32 },
    /// Playback has started
    Started,
    /// Playback has been paused
    Paused,
    /// Current playback position in whole seconds
    Position(u32),
    /// The stream finished and the engine is not looping
    Ended,
    /// Engine is shutting down
    Shutdown,
}

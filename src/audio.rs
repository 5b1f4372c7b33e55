//! Sound hook. The simulation names the effect; whoever implements
//! `Audio` decides whether anything is heard.

pub const FIRE_TORP: &str = "firetorp";
pub const WARP: &str = "warp";
pub const PRIZE_PICKUP: &str = "ddloo";
pub const ALIEN_EXPLODE: &str = "explode";
pub const PLAYER_EXPLODE: &str = "explode_big";

/// Fire-and-forget playback. Implementations must swallow their own
/// failures, a missing sound never reaches the game.
pub trait Audio {
    fn play_sound(&mut self, name: &str);
}

/// Plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl Audio for NullAudio {
    fn play_sound(&mut self, _name: &str) {}
}

/// Remembers every sound requested, in order.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<String>,
}

impl Audio for RecordingAudio {
    fn play_sound(&mut self, name: &str) {
        self.played.push(name.to_string());
    }
}

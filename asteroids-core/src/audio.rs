use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cue {
    Shot,
    BreakLarge,
    BreakMedium,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineSound {
    SmallUfo,
    BigUfo,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

pub trait AudioSink {
    fn play(&mut self, cue: Cue);

    /// Starts a looping sound. `None` means no channel was free.
    fn start_loop(&mut self, sound: EngineSound) -> Option<ChannelId>;

    fn stop_loop(&mut self, channel: ChannelId);
}

impl<T: AudioSink + ?Sized> AudioSink for Box<T> {
    fn play(&mut self, cue: Cue) {
        (**self).play(cue);
    }

    fn start_loop(&mut self, sound: EngineSound) -> Option<ChannelId> {
        (**self).start_loop(sound)
    }

    fn stop_loop(&mut self, channel: ChannelId) {
        (**self).stop_loop(channel);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct EngineChannel(Option<ChannelId>);

impl EngineChannel {
    pub fn acquire<A: AudioSink + ?Sized>(audio: &mut A, sound: EngineSound) -> Self {
        let channel = audio.start_loop(sound);
        if channel.is_none() {
            tracing::debug!(?sound, "no free audio channel, ufo flies silent");
        }
        Self(channel)
    }

    #[inline]
    pub fn channel(&self) -> Option<ChannelId> {
        self.0
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }

    /// Stops the loop if it is still held. Returns whether anything was stopped.
    pub fn release<A: AudioSink + ?Sized>(&mut self, audio: &mut A) -> bool {
        match self.0.take() {
            Some(channel) => {
                audio.stop_loop(channel);
                true
            }
            None => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct NullAudio {
    next_channel: u32,
}

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: Cue) {}

    fn start_loop(&mut self, _sound: EngineSound) -> Option<ChannelId> {
        let channel = ChannelId(self.next_channel);
        self.next_channel = self.next_channel.wrapping_add(1);
        Some(channel)
    }

    fn stop_loop(&mut self, _channel: ChannelId) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CueCounts {
    pub shot: u32,
    pub break_large: u32,
    pub break_medium: u32,
}

/// Sink that keeps books instead of making noise.
///
/// Loops draw from a fixed pool of channels, so exhaustion can be exercised.
/// Stopping a channel that is not open is counted as an invalid stop.
#[derive(Debug, Clone)]
pub struct RecordingAudio {
    capacity: usize,
    next_channel: u32,
    open: BTreeSet<ChannelId>,
    cues: CueCounts,
    loops_started: u32,
    loops_stopped: u32,
    loops_refused: u32,
    invalid_stops: u32,
}

impl RecordingAudio {
    pub const DEFAULT_CHANNELS: usize = 8;

    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            next_channel: 0,
            open: BTreeSet::new(),
            cues: CueCounts::default(),
            loops_started: 0,
            loops_stopped: 0,
            loops_refused: 0,
            invalid_stops: 0,
        }
    }

    #[inline]
    pub fn cues(&self) -> CueCounts {
        self.cues
    }

    #[inline]
    pub fn open_channels(&self) -> usize {
        self.open.len()
    }

    #[inline]
    pub fn is_open(&self, channel: ChannelId) -> bool {
        self.open.contains(&channel)
    }

    #[inline]
    pub fn loops_started(&self) -> u32 {
        self.loops_started
    }

    #[inline]
    pub fn loops_stopped(&self) -> u32 {
        self.loops_stopped
    }

    #[inline]
    pub fn loops_refused(&self) -> u32 {
        self.loops_refused
    }

    #[inline]
    pub fn invalid_stops(&self) -> u32 {
        self.invalid_stops
    }
}

impl Default for RecordingAudio {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CHANNELS)
    }
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        match cue {
            Cue::Shot => self.cues.shot += 1,
            Cue::BreakLarge => self.cues.break_large += 1,
            Cue::BreakMedium => self.cues.break_medium += 1,
        }
    }

    fn start_loop(&mut self, _sound: EngineSound) -> Option<ChannelId> {
        if self.open.len() >= self.capacity {
            self.loops_refused += 1;
            return None;
        }

        let channel = ChannelId(self.next_channel);
        self.next_channel = self.next_channel.wrapping_add(1);
        self.open.insert(channel);
        self.loops_started += 1;
        Some(channel)
    }

    fn stop_loop(&mut self, channel: ChannelId) {
        if self.open.remove(&channel) {
            self.loops_stopped += 1;
        } else {
            self.invalid_stops += 1;
        }
    }
}

//! Sensory feedback collaborators.
//!
//! The engine asks for a cue when a leaf settles and when a whisper sinks
//! into the soil. Cues are fire-and-forget: a failing cue is logged and
//! otherwise ignored.

use crate::models::{Mood, TimeOfDay};
use anyhow::Result;

pub trait FeedbackCue {
    /// A leaf grown from a reflection with this mood has settled.
    fn growth_cue(&self, mood: &Mood, time_of_day: TimeOfDay) -> Result<()>;

    /// A whisper was released into the soil.
    fn soil_cue(&self) -> Result<()>;
}

/// Cue sink for hosts without any feedback channel.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCue;

impl FeedbackCue for NoopCue {
    fn growth_cue(&self, _mood: &Mood, _time_of_day: TimeOfDay) -> Result<()> {
        Ok(())
    }

    fn soil_cue(&self) -> Result<()> {
        Ok(())
    }
}

/// Loudness of the growth cue. Late in the day the tree answers more softly.
pub fn growth_gain(time_of_day: TimeOfDay) -> f32 {
    match time_of_day {
        TimeOfDay::Morning | TimeOfDay::Afternoon => 0.08,
        TimeOfDay::Evening | TimeOfDay::Night => 0.05,
    }
}

#[cfg(feature = "audio")]
pub use tone::ToneCue;

#[cfg(feature = "audio")]
mod tone {
    use super::{growth_gain, FeedbackCue};
    use crate::models::{Mood, TimeOfDay};
    use anyhow::{Context, Result};
    use rodio::source::{SineWave, Source};
    use rodio::{OutputStream, OutputStreamHandle, Sink};
    use std::time::Duration;

    const SOIL_GAIN: f32 = 0.03;

    /// Short sine tones through the default audio output.
    pub struct ToneCue {
        /// Output stream (must be kept alive for playback)
        _stream: OutputStream,
        stream_handle: OutputStreamHandle,
    }

    impl ToneCue {
        pub fn new() -> Result<Self> {
            let (stream, stream_handle) =
                OutputStream::try_default().context("Failed to open audio output")?;
            Ok(Self {
                _stream: stream,
                stream_handle,
            })
        }

        fn play(&self, steps: &[(f32, Duration)], gain: f32) -> Result<()> {
            let sink =
                Sink::try_new(&self.stream_handle).context("Failed to create audio sink")?;
            for &(frequency, length) in steps {
                sink.append(
                    SineWave::new(frequency)
                        .take_duration(length)
                        .fade_in(Duration::from_millis(100))
                        .amplify(gain),
                );
            }
            // Let the tone finish on its own
            sink.detach();
            Ok(())
        }
    }

    impl FeedbackCue for ToneCue {
        fn growth_cue(&self, mood: &Mood, time_of_day: TimeOfDay) -> Result<()> {
            let base = mood.cue_frequency();
            let half = Duration::from_millis(400);
            self.play(&[(base, half), (base * 1.5, half)], growth_gain(time_of_day))
        }

        fn soil_cue(&self) -> Result<()> {
            let half = Duration::from_millis(500);
            self.play(&[(80.0, half), (60.0, half)], SOIL_GAIN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_cue_never_fails() {
        assert!(NoopCue.growth_cue(&Mood::Hopeful, TimeOfDay::Morning).is_ok());
        assert!(NoopCue.soil_cue().is_ok());
    }

    #[test]
    fn test_growth_gain_softens_late() {
        assert!(growth_gain(TimeOfDay::Night) < growth_gain(TimeOfDay::Morning));
    }
}

//! Sound effects
//!
//! Every effect is synthesized once at startup with fundsp and kept as a
//! sample buffer; playing one hands a copy to the rodio output stream.

use std::time::Duration;

use fundsp::prelude64::*;
use rodio::{OutputStream, OutputStreamHandle, Source};

use crate::error::Error;
use crate::game::GameEvent;

const SAMPLE_RATE: u32 = 44100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sound {
    Flap,
    Point,
    Die,
    Pause,
}

impl Sound {
    pub const ALL: [Sound; 4] = [Sound::Flap, Sound::Point, Sound::Die, Sound::Pause];

    /// Sound to play for a game event, if any
    pub fn for_event(event: GameEvent) -> Option<Sound> {
        match event {
            GameEvent::Flapped => Some(Sound::Flap),
            GameEvent::Scored => Some(Sound::Point),
            GameEvent::Died => Some(Sound::Die),
            GameEvent::Paused | GameEvent::Resumed => Some(Sound::Pause),
            GameEvent::Restarted => None,
        }
    }

    pub fn duration(self) -> Duration {
        Duration::from_secs_f32(match self {
            Sound::Flap => 0.12,
            Sound::Point => 0.2,
            Sound::Die => 0.5,
            Sound::Pause => 0.18,
        })
    }
}

/// Render `secs` worth of mono samples from a generator graph
fn render(mut unit: impl AudioUnit, secs: f32) -> Vec<f32> {
    unit.set_sample_rate(SAMPLE_RATE as f64);
    unit.reset();
    let n = (secs * SAMPLE_RATE as f32) as usize;
    (0..n).map(|_| unit.get_mono().clamp(-1.0, 1.0)).collect()
}

/// Mono samples for a sound at `SAMPLE_RATE`
pub fn synthesize(sound: Sound) -> Vec<f32> {
    let secs = sound.duration().as_secs_f32();
    match sound {
        // Short burst of filtered noise
        Sound::Flap => render(
            (noise() >> lowpass_hz(1800.0, 0.8)) * lfo(|t: f64| 0.3 * (-t * 30.0).exp()),
            secs,
        ),
        // Two rising tones
        Sound::Point => render(
            (lfo(|t: f64| if t < 0.08 { 880.0 } else { 1320.0 }) >> sine())
                * lfo(|t: f64| 0.2 * (-t * 8.0).exp()),
            secs,
        ),
        // Saw dropping from 400Hz to 80Hz while fading out
        Sound::Die => render(
            (lfo(|t: f64| lerp(400.0, 80.0, (t / 0.4).min(1.0))) >> saw())
                * lfo(|t: f64| lerp(0.15, 0.0, (t / 0.5).min(1.0))),
            secs,
        ),
        // Sine sweeping up
        Sound::Pause => render(
            (lfo(|t: f64| lerp(500.0, 1000.0, (t / 0.18).min(1.0))) >> sine())
                * lfo(|t: f64| 0.2 * (1.0 - t / 0.18).max(0.0)),
            secs,
        ),
    }
}

/// Output device plus the pre-rendered effects. A muted instance plays
/// nothing.
pub struct Audio {
    // Playback stops when the stream is dropped
    output: Option<(OutputStream, OutputStreamHandle)>,
    clips: Vec<(Sound, Vec<f32>)>,
}

impl Audio {
    /// Open the default output device
    pub fn open() -> Result<Self, Error> {
        let output = OutputStream::try_default().map_err(|e| Error::Audio(e.to_string()))?;
        log::info!("Audio output opened");
        Ok(Self {
            output: Some(output),
            clips: Self::clips(),
        })
    }

    pub fn muted() -> Self {
        log::info!("Audio disabled");
        Self {
            output: None,
            clips: Vec::new(),
        }
    }

    fn clips() -> Vec<(Sound, Vec<f32>)> {
        Sound::ALL.iter().map(|&s| (s, synthesize(s))).collect()
    }

    #[cfg(test)]
    fn is_muted(&self) -> bool {
        self.output.is_none()
    }

    pub fn play(&self, sound: Sound) {
        let Some((_, handle)) = &self.output else {
            return;
        };
        let Some((_, samples)) = self.clips.iter().find(|(s, _)| *s == sound) else {
            return;
        };
        let source = rodio::buffer::SamplesBuffer::new(1, SAMPLE_RATE, samples.clone());
        if let Err(e) = handle.play_raw(source.convert_samples()) {
            log::warn!("Failed to play {:?}: {}", sound, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_sound_renders() {
        for sound in Sound::ALL {
            let samples = synthesize(sound);
            let expected = (sound.duration().as_secs_f32() * SAMPLE_RATE as f32) as usize;
            assert_eq!(samples.len(), expected);
            assert!(samples.iter().all(|s| s.is_finite() && s.abs() <= 1.0));
            assert!(samples.iter().any(|s| s.abs() > 1e-4), "{:?} is silent", sound);
        }
    }

    #[test]
    fn test_die_fades_out() {
        let samples = synthesize(Sound::Die);
        let tail = &samples[samples.len() - 100..];
        assert!(tail.iter().all(|s| s.abs() < 0.01));
    }

    #[test]
    fn test_event_mapping() {
        assert_eq!(Sound::for_event(GameEvent::Flapped), Some(Sound::Flap));
        assert_eq!(Sound::for_event(GameEvent::Scored), Some(Sound::Point));
        assert_eq!(Sound::for_event(GameEvent::Died), Some(Sound::Die));
        assert_eq!(Sound::for_event(GameEvent::Resumed), Some(Sound::Pause));
        assert_eq!(Sound::for_event(GameEvent::Restarted), None);
    }

    #[test]
    fn test_muted_play_is_noop() {
        let audio = Audio::muted();
        assert!(audio.is_muted());
        audio.play(Sound::Flap);
    }
}

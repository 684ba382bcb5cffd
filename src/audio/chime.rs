use rodio::Source;
use std::f32::consts::PI;
use std::time::Duration;

use crate::timer::state::SessionKind;

const SAMPLE_RATE: u32 = 44100;

/// Two-note alert chime, synthesized instead of loaded from an asset.
/// Focus boundaries get a rising pair, break boundaries a falling one.
pub struct Chime {
    first_freq: f32,
    second_freq: f32,
    num_sample: usize,
    total_samples: usize,
}

impl Chime {
    pub fn new(first_freq: f32, second_freq: f32, duration: Duration) -> Self {
        Self {
            first_freq,
            second_freq,
            num_sample: 0,
            total_samples: (SAMPLE_RATE as f64 * duration.as_secs_f64()) as usize,
        }
    }

    pub fn for_session(kind: SessionKind) -> Self {
        match kind {
            // A5 -> D6
            SessionKind::Focus => Self::new(880.0, 1174.66, Duration::from_millis(600)),
            // E5 -> C5
            SessionKind::Break => Self::new(659.25, 523.25, Duration::from_millis(600)),
        }
    }
}

impl Iterator for Chime {
    type Item = f32;

    fn next(&mut self) -> Option<Self::Item> {
        if self.num_sample >= self.total_samples {
            return None;
        }
        self.num_sample += 1;

        let t = self.num_sample as f32 / SAMPLE_RATE as f32;
        let freq = if self.num_sample * 2 < self.total_samples {
            self.first_freq
        } else {
            self.second_freq
        };

        // Linear fade keeps the tail from clicking
        let fade = 1.0 - self.num_sample as f32 / self.total_samples as f32;
        Some((2.0 * PI * freq * t).sin() * 0.2 * fade)
    }
}

impl Source for Chime {
    fn current_frame_len(&self) -> Option<usize> {
        Some(self.total_samples - self.num_sample)
    }

    fn channels(&self) -> u16 {
        1 // Mono
    }

    fn sample_rate(&self) -> u32 {
        SAMPLE_RATE
    }

    fn total_duration(&self) -> Option<Duration> {
        Some(Duration::from_secs_f64(
            self.total_samples as f64 / SAMPLE_RATE as f64,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{Chime, SAMPLE_RATE};
    use crate::timer::state::SessionKind;

    #[test]
    fn chime_is_finite_and_bounded() {
        let chime = Chime::for_session(SessionKind::Focus);
        let samples: Vec<f32> = chime.collect();

        // 600ms at 44.1kHz
        assert_eq!(samples.len(), (SAMPLE_RATE as usize * 600) / 1000);
        assert!(samples.iter().all(|s| s.abs() <= 0.2));
    }

    #[test]
    fn iterator_ends_cleanly() {
        let mut chime = Chime::new(440.0, 440.0, Duration::from_millis(1));
        let expected = (SAMPLE_RATE as usize) / 1000;
        for _ in 0..expected {
            assert!(chime.next().is_some());
        }
        assert!(chime.next().is_none());
        assert!(chime.next().is_none());
    }
}

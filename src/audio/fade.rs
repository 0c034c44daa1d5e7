//! Linear fade over the last seconds of a source

use rodio::{Sample, Source};
use std::time::Duration;

/// Wraps a finite source and ramps its amplitude down to silence over the
/// final `fade` of its length. Sources of unknown length pass through.
pub struct FadeTail<S> {
    inner: S,
    remaining: u64,
    fade_samples: u64,
}

impl<S> FadeTail<S>
where
    S: Source,
    S::Item: Sample,
{
    pub fn new(inner: S, fade: Duration) -> Self {
        let samples_per_sec = inner.sample_rate() as f64 * inner.channels() as f64;
        let (remaining, fade_samples) = match inner.total_duration() {
            Some(total) => (
                (total.as_secs_f64() * samples_per_sec).round() as u64,
                (fade.as_secs_f64() * samples_per_sec).round() as u64,
            ),
            None => (u64::MAX, 0),
        };

        Self {
            inner,
            remaining,
            fade_samples,
        }
    }

    fn gain(&self) -> f32 {
        if self.fade_samples == 0 || self.remaining >= self.fade_samples {
            1.0
        } else {
            self.remaining as f32 / self.fade_samples as f32
        }
    }
}

impl<S> Iterator for FadeTail<S>
where
    S: Source,
    S::Item: Sample,
{
    type Item = S::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let sample = self.inner.next()?;
        let gain = self.gain();
        self.remaining = self.remaining.saturating_sub(1);
        Some(sample.amplify(gain))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<S> Source for FadeTail<S>
where
    S: Source,
    S::Item: Sample,
{
    fn current_frame_len(&self) -> Option<usize> {
        self.inner.current_frame_len()
    }

    fn channels(&self) -> u16 {
        self.inner.channels()
    }

    fn sample_rate(&self) -> u32 {
        self.inner.sample_rate()
    }

    fn total_duration(&self) -> Option<Duration> {
        self.inner.total_duration()
    }
}

/// Timing for one rendered frame, as handed to the animators.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub elapsed: f32,
    /// Seconds since the previous frame. Never negative, never bounded above.
    pub delta: f32,
    /// Frames advanced so far (1 after the first `advance`).
    pub frame: u64,
}

/// Variable-rate frame clock.
/// Accumulates the deltas reported by the render loop into a monotonic
/// elapsed time. Unlike a fixed-step accumulator it does not cap long
/// stalls: the animators are built to absorb any delta.
#[derive(Debug, Default)]
pub struct FrameClock {
    elapsed: f32,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by one frame of `frame_dt` seconds.
    /// Negative or non-finite deltas count as zero so elapsed time stays monotonic.
    pub fn advance(&mut self, frame_dt: f32) -> FrameTime {
        let delta = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.elapsed += delta;
        self.frame += 1;
        FrameTime {
            elapsed: self.elapsed,
            delta,
            frame: self.frame,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_elapsed() {
        let mut clock = FrameClock::new();
        clock.advance(0.5);
        let t = clock.advance(0.25);
        assert_eq!(t.elapsed, 0.75);
        assert_eq!(t.delta, 0.25);
        assert_eq!(t.frame, 2);
    }

    #[test]
    fn negative_and_nan_deltas_are_zero() {
        let mut clock = FrameClock::new();
        clock.advance(1.0);
        let t = clock.advance(-3.0);
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.elapsed, 1.0);
        let t = clock.advance(f32::NAN);
        assert_eq!(t.delta, 0.0);
        assert_eq!(t.elapsed, 1.0);
    }

    #[test]
    fn large_stall_passes_through() {
        let mut clock = FrameClock::new();
        let t = clock.advance(30.0);
        assert_eq!(t.delta, 30.0);
    }
}

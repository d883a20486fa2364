/// Fixed timestep accumulator.
/// Runs game logic at a consistent rate regardless of frame time.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// How many game updates one host frame turns into.
///
/// `PerFrame` couples simulation rate to the display refresh rate: a 120 Hz
/// display advances orbits twice as fast as a 60 Hz one.
#[derive(Debug, Clone)]
pub enum FramePacing {
    PerFrame,
    Fixed(FixedTimestep),
}

impl FramePacing {
    pub fn from_fixed_dt(fixed_dt: Option<f32>) -> Self {
        match fixed_dt {
            Some(dt) if dt > 0.0 => FramePacing::Fixed(FixedTimestep::new(dt)),
            _ => FramePacing::PerFrame,
        }
    }

    /// Number of updates to run for a host frame that took `frame_dt` seconds.
    pub fn steps(&mut self, frame_dt: f32) -> u32 {
        match self {
            FramePacing::PerFrame => 1,
            FramePacing::Fixed(ts) => ts.accumulate(frame_dt),
        }
    }

    /// Delta handed to each update: the fixed dt, or the raw frame time.
    pub fn step_dt(&self, frame_dt: f32) -> f32 {
        match self {
            FramePacing::PerFrame => frame_dt,
            FramePacing::Fixed(ts) => ts.dt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0), 10);
    }

    #[test]
    fn per_frame_pacing_ignores_frame_time() {
        let mut pacing = FramePacing::from_fixed_dt(None);
        assert_eq!(pacing.steps(0.001), 1);
        assert_eq!(pacing.steps(0.5), 1);
        assert_eq!(pacing.step_dt(0.25), 0.25);
    }

    #[test]
    fn non_positive_fixed_dt_falls_back_to_per_frame() {
        let pacing = FramePacing::from_fixed_dt(Some(0.0));
        assert!(matches!(pacing, FramePacing::PerFrame));
    }

    #[test]
    fn fixed_pacing_accumulates() {
        let mut pacing = FramePacing::from_fixed_dt(Some(1.0 / 60.0));
        assert_eq!(pacing.steps(1.0 / 120.0), 0);
        assert_eq!(pacing.steps(1.0 / 120.0 + 1e-4), 1);
        assert!((pacing.step_dt(0.5) - 1.0 / 60.0).abs() < 1e-9);
    }
}

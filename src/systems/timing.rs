use std::time::{Duration, Instant};

/// Time handed to every update: the fixed step length and total simulated time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GameTime {
    pub elapsed: Duration,
    pub total: Duration,
}

impl GameTime {
    pub fn new(elapsed: Duration, total: Duration) -> Self {
        Self { elapsed, total }
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.elapsed.as_secs_f32()
    }

    pub fn elapsed_ms(&self) -> f32 {
        self.elapsed.as_secs_f32() * 1000.0
    }
}

/// Result of one scheduler tick
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameTick {
    /// fixed simulation steps to run this frame
    pub steps: u32,
    /// new FPS measurement, once per second
    pub fps: Option<u32>,
    pub needs_redraw: bool,
    /// leftover fraction of a step (0.0–1.0)
    pub alpha: f32,
}

/// Fixed-timestep scheduler driven from the host event loop
pub struct TimeSystem {
    // Core
    pub sim_time: Duration,
    last_update: Instant,
    sim_accumulator: Duration,
    fps_timer: Instant,
    fps_frame_count: u32,
    pub current_fps: u32,

    // Constants
    sim_dt: Duration,
    fps_dt: Duration,
    max_steps: u32,

    // Flags/States
    paused: bool,
}

impl TimeSystem {
    pub fn new(sim_hz: u32) -> Self {
        Self::starting_at(Instant::now(), sim_hz)
    }

    pub fn starting_at(now: Instant, sim_hz: u32) -> Self {
        let hz = sim_hz.max(1);
        Self {
            sim_time: Duration::ZERO,
            last_update: now,
            sim_accumulator: Duration::ZERO,
            fps_timer: now,
            fps_frame_count: 0,
            current_fps: 0,
            sim_dt: Duration::from_secs(1) / hz,
            fps_dt: Duration::from_secs(1),
            max_steps: 5,
            paused: false,
        }
    }

    pub fn sim_dt(&self) -> Duration {
        self.sim_dt
    }

    /// The [`GameTime`] for the step about to run.
    pub fn game_time(&self) -> GameTime {
        GameTime::new(self.sim_dt, self.sim_time)
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Advances wall-clock time. Long stalls are clamped to `max_steps` steps.
    pub fn tick(&mut self, now: Instant) -> FrameTick {
        let mut frame_dt = now.saturating_duration_since(self.last_update);
        self.last_update = now;

        if self.paused {
            self.sim_accumulator = Duration::ZERO;
            return FrameTick {
                steps: 0,
                fps: None,
                needs_redraw: false,
                alpha: 0.0,
            };
        }

        frame_dt = frame_dt.min(self.sim_dt * self.max_steps);
        self.sim_accumulator += frame_dt;

        let mut steps = 0;
        while self.sim_accumulator >= self.sim_dt {
            self.sim_accumulator -= self.sim_dt;
            steps += 1;
        }

        self.fps_frame_count += 1;
        let mut fps = None;

        if now.saturating_duration_since(self.fps_timer) >= self.fps_dt {
            let elapsed = (now - self.fps_timer).as_secs_f32();
            let measured = (self.fps_frame_count as f32 / elapsed).round() as u32;

            self.current_fps = measured;
            self.fps_frame_count = 0;
            self.fps_timer = now;

            fps = Some(measured);
        }

        let alpha =
            (self.sim_accumulator.as_secs_f32() / self.sim_dt.as_secs_f32()).clamp(0.0, 1.0);

        FrameTick {
            steps,
            fps,
            needs_redraw: steps > 0 || fps.is_some(),
            alpha,
        }
    }

    /// Marks one fixed step as simulated; call after each update pass.
    pub fn advance_step(&mut self) {
        self.sim_time += self.sim_dt;
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        self.paused = !self.paused;

        if !self.paused {
            self.last_update = now;
            self.fps_timer = now;
            self.sim_accumulator = Duration::ZERO;
        }
    }

    pub fn next_wakeup(&self) -> Instant {
        self.last_update + self.sim_dt
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_steps_and_carries_remainder() {
        let start = Instant::now();
        let mut timing = TimeSystem::starting_at(start, 100);
        let tick = timing.tick(start + Duration::from_millis(25));
        assert_eq!(tick.steps, 2);
        assert!(tick.needs_redraw);
        assert!((tick.alpha - 0.5).abs() < 1e-3);

        let tick = timing.tick(start + Duration::from_millis(30));
        assert_eq!(tick.steps, 1);
    }

    #[test]
    fn long_stall_is_clamped() {
        let start = Instant::now();
        let mut timing = TimeSystem::starting_at(start, 100);
        let tick = timing.tick(start + Duration::from_secs(3));
        assert_eq!(tick.steps, 5);
        assert_eq!(tick.fps, Some(0));
    }

    #[test]
    fn paused_runs_no_steps() {
        let start = Instant::now();
        let mut timing = TimeSystem::starting_at(start, 100);
        timing.toggle_pause(start);
        assert!(timing.is_paused());
        let tick = timing.tick(start + Duration::from_millis(50));
        assert_eq!(tick.steps, 0);
        assert!(!tick.needs_redraw);

        let resume = start + Duration::from_millis(60);
        timing.toggle_pause(resume);
        let tick = timing.tick(resume + Duration::from_millis(10));
        assert_eq!(tick.steps, 1);
    }

    #[test]
    fn game_time_tracks_simulated_steps() {
        let mut timing = TimeSystem::starting_at(Instant::now(), 125);
        assert_eq!(timing.sim_dt(), Duration::from_millis(8));
        timing.advance_step();
        timing.advance_step();
        let time = timing.game_time();
        assert_eq!(time.total, Duration::from_millis(16));
        assert!((time.elapsed_ms() - 8.0).abs() < 1e-4);
    }
}

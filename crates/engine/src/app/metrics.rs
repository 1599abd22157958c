use std::time::{Duration, Instant};

/// Rates observed over the last metrics window, published to the log by the
/// loop at a fixed cadence.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoopMetricsSnapshot {
    pub fps: f32,
    pub tps: f32,
    pub frame_time_ms: f32,
}

/// Counts frames and simulation ticks inside a rolling window and turns
/// them into per-second rates when the window closes.
#[derive(Debug)]
pub(crate) struct MetricsWindow {
    opened_at: Instant,
    length: Duration,
    frames: u32,
    ticks: u32,
    frame_time_total: Duration,
}

impl MetricsWindow {
    pub(crate) fn new(length: Duration) -> Self {
        Self {
            opened_at: Instant::now(),
            length,
            frames: 0,
            ticks: 0,
            frame_time_total: Duration::ZERO,
        }
    }

    pub(crate) fn note_frame(&mut self, frame_dt: Duration) {
        self.frames = self.frames.saturating_add(1);
        self.frame_time_total = self.frame_time_total.saturating_add(frame_dt);
    }

    pub(crate) fn note_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    /// Reports the window's rates and opens a fresh one once `length` has
    /// elapsed; returns `None` while the window is still open.
    pub(crate) fn close_if_elapsed(&mut self, now: Instant) -> Option<LoopMetricsSnapshot> {
        let elapsed = now.saturating_duration_since(self.opened_at);
        if elapsed < self.length {
            return None;
        }

        let seconds = elapsed.as_secs_f32().max(f32::EPSILON);
        let mean_frame_ms = match self.frames {
            0 => 0.0,
            n => self.frame_time_total.as_secs_f32() * 1000.0 / n as f32,
        };
        let snapshot = LoopMetricsSnapshot {
            fps: self.frames as f32 / seconds,
            tps: self.ticks as f32 / seconds,
            frame_time_ms: mean_frame_ms,
        };

        self.opened_at = now;
        self.frames = 0;
        self.ticks = 0;
        self.frame_time_total = Duration::ZERO;
        Some(snapshot)
    }
}

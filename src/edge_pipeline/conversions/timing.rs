//! Named step timings for a filter run, printed by `--timings`.

use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct StepTiming {
    pub name: String,
    pub duration: Duration,
}

#[derive(Debug, Default)]
pub struct PipelineTimings {
    steps: Vec<StepTiming>,
    step_map: HashMap<String, Duration>,
}

impl PipelineTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_step(&mut self, name: impl Into<String>, duration: Duration) {
        let name = name.into();
        self.steps.push(StepTiming {
            name: name.clone(),
            duration,
        });
        *self.step_map.entry(name).or_insert(Duration::ZERO) += duration;
    }

    /// Records a stopped [`Timer`].
    pub fn record(&mut self, timer: Timer) {
        let (name, duration) = timer.stop();
        self.add_step(name, duration);
    }

    /// Appends every step of `other`, in order.
    pub fn extend(&mut self, other: PipelineTimings) {
        for step in other.steps {
            self.add_step(step.name, step.duration);
        }
    }

    pub fn total_duration(&self) -> Duration {
        self.steps.iter().map(|s| s.duration).sum()
    }

    pub fn get_step(&self, name: &str) -> Option<Duration> {
        self.step_map.get(name).copied()
    }

    pub fn steps(&self) -> &[StepTiming] {
        &self.steps
    }

    pub fn print_summary(&self) {
        println!("\n{self}");
    }
}

/// Step table with each step's share of the total, in run order.
impl fmt::Display for PipelineTimings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.total_duration().as_secs_f64();
        let rule = "-".repeat(52);
        writeln!(f, "Edge filter timings:")?;
        writeln!(f, "{rule}")?;
        for step in &self.steps {
            let ms = step.duration.as_secs_f64() * 1000.0;
            let share = if total > 0.0 {
                step.duration.as_secs_f64() / total * 100.0
            } else {
                0.0
            };
            writeln!(f, "{:<24} {:>12.3}ms {:>6.1}%", step.name, ms, share)?;
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "{:<24} {:>12.3}ms", "total", total * 1000.0)
    }
}

/// Starts on creation; `stop` yields the name and elapsed time.
pub struct Timer {
    start: Instant,
    name: String,
}

impl Timer {
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    pub fn stop(self) -> (String, Duration) {
        (self.name, self.start.elapsed())
    }
}

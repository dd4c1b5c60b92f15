//! Progress reporting for wireframe generation.
//!
//! Each generator splits its work into a fixed number of steps (validation,
//! adjacency, scoring, pairing, baking) and reports the step it is entering.
//! The repair loop has no fixed length, so it reports its rounds inside the
//! one step it is given through a [`StepProgress`].
//!
//! # Example
//!
//! ```
//! use quadwire::wireframe::Progress;
//!
//! let progress = Progress::new(|current, total, message| {
//!     println!("[{}/{}] {}", current, total, message);
//! });
//! progress.report(1, 5, "Building adjacency");
//!
//! // Round 3 of at most 32, inside step 1 of 2
//! progress.step(1, 2).report(3, 32, "Repairing shared corners");
//! ```

/// Sub-steps per step when a step reports its own progress.
const STEP_RESOLUTION: usize = 1000;

/// Receives `(current, total, message)` as a generator advances.
///
/// `current` counts completed steps, so a run ends with a report where
/// `current == total`. Totals can differ between reports of the same run
/// (step reports use `steps * 1000`), so a consumer should compare ratios.
pub struct Progress {
    callback: Box<dyn Fn(usize, usize, &str) + Send + Sync>,
}

impl Progress {
    /// Wrap a callback.
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(usize, usize, &str) + Send + Sync + 'static,
    {
        Self {
            callback: Box::new(callback),
        }
    }

    /// Report that `current` of `total` steps are done.
    #[inline]
    pub fn report(&self, current: usize, total: usize, message: &str) {
        (self.callback)(current, total, message);
    }

    /// A reporter confined to step `step` of `steps`.
    pub fn step(&self, step: usize, steps: usize) -> StepProgress<'_> {
        StepProgress {
            progress: self,
            step,
            steps,
        }
    }

    /// A reporter that ignores every update.
    pub fn none() -> Self {
        Self::new(|_, _, _| {})
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::none()
    }
}

impl std::fmt::Debug for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Progress").finish_non_exhaustive()
    }
}

/// Progress within a single step of a longer run.
///
/// `report(done, total, ..)` lands between `step` and `step + 1` of the
/// enclosing run, in fixed point.
#[derive(Debug, Clone, Copy)]
pub struct StepProgress<'a> {
    progress: &'a Progress,
    step: usize,
    steps: usize,
}

impl StepProgress<'_> {
    /// Report that `done` of `total` sub-steps are finished.
    ///
    /// Ignored when either total is zero.
    pub fn report(&self, done: usize, total: usize, message: &str) {
        if total == 0 || self.steps == 0 {
            return;
        }
        let fraction = done.min(total) * STEP_RESOLUTION / total;
        self.progress.report(
            self.step * STEP_RESOLUTION + fraction,
            self.steps * STEP_RESOLUTION,
            message,
        );
    }
}

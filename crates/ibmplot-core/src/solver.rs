//! Run metadata and the schedule of saved iterations.

use serde::{Deserialize, Serialize};

use crate::error::{IbmError, Result};

/// Solver section of `case.json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Iteration the run started from.
    pub start: usize,
    /// Total number of time steps.
    pub nt: usize,
    /// Interval between saved snapshots.
    pub write_every: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            start: 0,
            nt: 1,
            write_every: 1,
        }
    }
}

/// The saved iterations that get rendered.
///
/// The counter is advanced by `write_every` before each frame is drawn, so
/// the first frame is `start + write_every` and the snapshot at `start`
/// itself is never rendered. There are `ceil(nt / write_every)` frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSchedule {
    start: usize,
    nt: usize,
    write_every: usize,
}

impl RunSchedule {
    pub fn new(start: usize, nt: usize, write_every: usize) -> Result<Self> {
        if write_every == 0 {
            return Err(IbmError::InvalidConfig(
                "write_every must be positive".to_string(),
            ));
        }
        // frames() counts up to start + nt + write_every
        if start
            .checked_add(nt)
            .and_then(|end| end.checked_add(write_every))
            .is_none()
        {
            return Err(IbmError::InvalidConfig(format!(
                "schedule overflows: start {start} + nt {nt} + write_every {write_every}"
            )));
        }
        Ok(Self {
            start,
            nt,
            write_every,
        })
    }

    pub fn from_config(config: &SolverConfig) -> Result<Self> {
        Self::new(config.start, config.nt, config.write_every)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn nt(&self) -> usize {
        self.nt
    }

    pub fn write_every(&self) -> usize {
        self.write_every
    }

    /// Number of rendered frames.
    pub fn num_frames(&self) -> usize {
        self.nt.div_ceil(self.write_every)
    }

    /// Iteration contexts in rendering order.
    pub fn frames(&self) -> impl Iterator<Item = IterationContext> + '_ {
        (self.start..self.start + self.nt)
            .step_by(self.write_every)
            .map(move |ite| IterationContext::new(ite + self.write_every))
    }
}

/// The iteration every renderer of one frame works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IterationContext {
    iteration: usize,
}

impl IterationContext {
    pub fn new(iteration: usize) -> Self {
        Self { iteration }
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    /// Zero padded tag used in image file names.
    pub fn image_tag(&self) -> String {
        format!("{:04}", self.iteration)
    }

    /// Zero padded tag used for snapshot folders.
    pub fn snapshot_tag(&self) -> String {
        format!("{:05}", self.iteration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn iterations(schedule: &RunSchedule) -> Vec<usize> {
        schedule.frames().map(|c| c.iteration()).collect()
    }

    #[test]
    fn test_first_frame_is_offset_by_write_every() {
        let schedule = RunSchedule::new(0, 40, 20).unwrap();
        assert_eq!(iterations(&schedule), vec![20, 40]);
    }

    #[test]
    fn test_nonzero_start() {
        let schedule = RunSchedule::new(100, 30, 10).unwrap();
        assert_eq!(iterations(&schedule), vec![110, 120, 130]);
    }

    #[test]
    fn test_partial_interval_still_rendered() {
        let schedule = RunSchedule::new(0, 25, 10).unwrap();
        assert_eq!(iterations(&schedule), vec![10, 20, 30]);
        assert_eq!(schedule.num_frames(), 3);
    }

    #[test]
    fn test_zero_steps() {
        let schedule = RunSchedule::new(5, 0, 10).unwrap();
        assert!(iterations(&schedule).is_empty());
    }

    #[test]
    fn test_write_every_zero_rejected() {
        assert!(RunSchedule::new(0, 10, 0).is_err());
    }

    #[test]
    fn test_overflowing_schedule_rejected() {
        assert!(matches!(
            RunSchedule::new(10, usize::MAX, 10),
            Err(IbmError::InvalidConfig(_))
        ));
        assert!(RunSchedule::new(0, usize::MAX - 1, 2).is_err());
        assert!(RunSchedule::new(0, usize::MAX - 2, 2).is_ok());
    }

    #[test]
    fn test_overflowing_config_rejected() {
        let config = SolverConfig {
            start: 10,
            nt: usize::MAX,
            write_every: 10,
        };
        assert!(matches!(
            RunSchedule::from_config(&config),
            Err(IbmError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_tags() {
        let ctx = IterationContext::new(20);
        assert_eq!(ctx.image_tag(), "0020");
        assert_eq!(ctx.snapshot_tag(), "00020");
        assert_eq!(IterationContext::new(123_456).image_tag(), "123456");
    }

    proptest! {
        #[test]
        fn prop_frames_match_count_and_spacing(
            start in 0usize..1000,
            nt in 0usize..500,
            write_every in 1usize..50,
        ) {
            let schedule = RunSchedule::new(start, nt, write_every).unwrap();
            let its = iterations(&schedule);
            prop_assert_eq!(its.len(), schedule.num_frames());
            for (k, ite) in its.iter().enumerate() {
                prop_assert_eq!(*ite, start + (k + 1) * write_every);
            }
        }
    }
}

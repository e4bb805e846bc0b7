// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::ValueEnum;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use serde::Serialize;

use crate::analysis::options::Options;
use crate::analysis::verify::Mark;
use crate::analysis::verify::Verification;
use crate::analysis::verify::check;
use crate::types::problem::Problem;

/// The repeat counter a problem is reset to after a wrong answer.
pub const RETRY_TIMES: u32 = 2;

/// How the next problem is picked.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Policy {
    /// Uniform random choice, avoiding the previous problem.
    #[default]
    Resample,
    /// A shuffled queue. The front problem is asked until it is retired or
    /// missed; missed problems are pushed back to a random slot.
    Rotate,
}

/// Which side of a problem is shown.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Orientation {
    #[default]
    Normal,
    Inverted,
    /// A coin flip per presentation.
    Mixed,
}

#[derive(Clone, Copy, Debug)]
pub struct SessionSettings {
    pub policy: Policy,
    pub orientation: Orientation,
    pub retry: u32,
    /// Only drill problems missed in their last session.
    pub errors_only: bool,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            policy: Policy::default(),
            orientation: Orientation::default(),
            retry: RETRY_TIMES,
            errors_only: false,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize)]
pub struct SessionStats {
    pub solved: u32,
    pub errors: u32,
    pub skipped: u32,
}

/// What recording an answer did to the current problem.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    /// Right, and no repetitions left.
    Retired,
    /// Right, but it comes back.
    Again,
    /// Wrong: the repeat counter was reset.
    Reset,
}

/// A drill session over an arena of problems. The active list holds the
/// indices of problems that still need to be answered.
pub struct Session<R: Rng> {
    problems: Vec<Problem>,
    active: Vec<usize>,
    current: Option<usize>,
    previous: Option<usize>,
    settings: SessionSettings,
    rng: R,
    stats: SessionStats,
}

impl<R: Rng> Session<R> {
    pub fn new(problems: Vec<Problem>, settings: SessionSettings, mut rng: R) -> Self {
        let mut active: Vec<usize> = problems
            .iter()
            .enumerate()
            .filter(|(_, p)| p.repeat > 0)
            .filter(|(_, p)| !settings.errors_only || p.last_errors > 0)
            .map(|(n, _)| n)
            .collect();
        if settings.policy == Policy::Rotate {
            active.shuffle(&mut rng);
        }
        Self {
            problems,
            active,
            current: None,
            previous: None,
            settings,
            rng,
            stats: SessionStats::default(),
        }
    }

    /// Select the next problem and return its id, or `None` once every
    /// problem is retired or skipped.
    pub fn next(&mut self) -> Option<usize> {
        self.previous = self.current.take();
        if self.active.is_empty() {
            return None;
        }
        let id = match self.settings.policy {
            Policy::Resample => {
                let mut pick = self.pick();
                while self.active.len() > 1 && Some(pick) == self.previous {
                    pick = self.pick();
                }
                pick
            }
            Policy::Rotate => self.active[0],
        };
        self.problems[id].inverted = match self.settings.orientation {
            Orientation::Normal => false,
            Orientation::Inverted => true,
            Orientation::Mixed => self.rng.random_bool(0.5),
        };
        self.current = Some(id);
        Some(id)
    }

    fn pick(&mut self) -> usize {
        self.active[self.rng.random_range(0..self.active.len())]
    }

    pub fn problem(&self, id: usize) -> &Problem {
        &self.problems[id]
    }

    pub fn current(&self) -> Option<&Problem> {
        self.current.map(|id| &self.problems[id])
    }

    /// Position of the current problem in the active list, if it is still
    /// active.
    fn current_position(&self) -> Option<usize> {
        let id = self.current?;
        self.active.iter().position(|&n| n == id)
    }

    /// Grade an answer to the current problem and record the result.
    pub fn check<S: AsRef<str>>(&mut self, answer: &[S], options: Options) -> Option<Verification> {
        let id = self.current?;
        let verification = check(&self.problems[id], answer, options);
        self.record(verification.state)?;
        Some(verification)
    }

    /// Update the current problem's counters from a verification state.
    pub fn record(&mut self, state: Mark) -> Option<Outcome> {
        let pos = self.current_position()?;
        let id = self.active[pos];
        let rotate = self.settings.policy == Policy::Rotate;
        let problem = &mut self.problems[id];
        problem.attempted = true;
        if state.is_right() {
            problem.repeat = problem.repeat.saturating_sub(1);
            if problem.repeat == 0 {
                self.active.remove(pos);
                self.stats.solved += 1;
                return Some(Outcome::Retired);
            }
            Some(Outcome::Again)
        } else {
            problem.repeat = self.settings.retry;
            problem.errors += 1;
            problem.total_errors += 1;
            self.stats.errors += 1;
            if rotate && self.active.len() > 1 {
                self.active.remove(pos);
                let slot = self.rng.random_range(1..=self.active.len());
                self.active.insert(slot, id);
            }
            Some(Outcome::Reset)
        }
    }

    /// Drop the current problem from the session without touching its
    /// counters.
    pub fn skip(&mut self) -> bool {
        let Some(pos) = self.current_position() else {
            return false;
        };
        self.active.remove(pos);
        self.stats.skipped += 1;
        true
    }

    /// Retire the current problem as if it had been answered right enough
    /// times.
    pub fn retire(&mut self) -> bool {
        let Some(pos) = self.current_position() else {
            return false;
        };
        let id = self.active.remove(pos);
        self.problems[id].repeat = 0;
        self.stats.solved += 1;
        true
    }

    /// Problems still in play.
    pub fn left(&self) -> usize {
        self.active.len()
    }

    pub fn is_finished(&self) -> bool {
        self.active.is_empty()
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// End the session, returning every problem and the session totals.
    pub fn finish(mut self) -> (Vec<Problem>, SessionStats) {
        for problem in self.problems.iter_mut().filter(|p| p.attempted) {
            problem.last_errors = problem.errors;
        }
        (self.problems, self.stats)
    }
}

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

use std::path::Path;
use std::path::PathBuf;

use crate::types::problem_hash::ProblemHash;

/// A question block and its solution block, along with the counters the
/// scheduler and the statistics store work with.
#[derive(Clone, Debug)]
pub struct Problem {
    question: Vec<String>,
    solution: Vec<String>,
    /// The cached hash of the question text.
    hash: ProblemHash,
    /// The file this problem was parsed from.
    file: PathBuf,
    /// The line number where the problem starts (1-based).
    line: usize,
    /// Correct answers still needed before the problem is retired.
    pub repeat: u32,
    /// Wrong answers during the current session.
    pub errors: u32,
    /// Wrong answers across all sessions.
    pub total_errors: u32,
    /// Wrong answers in the last session the problem was attempted in.
    pub last_errors: u32,
    /// Whether the solution is shown as the prompt and the question graded.
    pub inverted: bool,
    /// Whether an answer was submitted this session.
    pub attempted: bool,
}

impl Problem {
    pub fn new(question: Vec<String>, solution: Vec<String>, file: PathBuf, line: usize) -> Self {
        let hash = ProblemHash::of_question(&question);
        Self {
            question,
            solution,
            hash,
            file,
            line,
            repeat: 1,
            errors: 0,
            total_errors: 0,
            last_errors: 0,
            inverted: false,
            attempted: false,
        }
    }

    pub fn question(&self) -> &[String] {
        &self.question
    }

    pub fn solution(&self) -> &[String] {
        &self.solution
    }

    /// The block shown to the learner.
    pub fn prompt(&self) -> &[String] {
        if self.inverted {
            &self.solution
        } else {
            &self.question
        }
    }

    /// The block the answer is graded against.
    pub fn target(&self) -> &[String] {
        if self.inverted {
            &self.question
        } else {
            &self.solution
        }
    }

    pub fn hash(&self) -> ProblemHash {
        self.hash
    }

    pub fn file(&self) -> &Path {
        &self.file
    }

    pub fn line(&self) -> usize {
        self.line
    }
}

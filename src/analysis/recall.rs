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

//! Order-independent comparison: the answer and the solution are each
//! reduced to a set of phrases, and only set membership matters.

use std::collections::BTreeSet;

use crate::analysis::options::Options;
use crate::analysis::token::TokenKind;
use crate::analysis::token::tokenize;
use crate::analysis::verify::Mark;
use crate::analysis::verify::Verification;

/// Soft limit for the width of report lines.
const REPORT_WIDTH: usize = 80;

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct RecallDiff {
    /// Phrases in the answer that the solution lacks.
    pub wrong: BTreeSet<String>,
    /// Phrases in the solution that the answer lacks.
    pub missed: BTreeSet<String>,
}

impl RecallDiff {
    pub fn is_empty(&self) -> bool {
        self.wrong.is_empty() && self.missed.is_empty()
    }

    /// Render as report lines: a "Wrong:" section, then a "Missed:" section.
    pub fn report(&self) -> Vec<String> {
        let mut lines = vec!["Wrong:".to_string()];
        lines.extend(wrap(&self.wrong, REPORT_WIDTH));
        lines.push("Missed:".to_string());
        lines.extend(wrap(&self.missed, REPORT_WIDTH));
        lines
    }
}

/// Split lines into phrases at delimiter punctuation and line ends.
pub fn phrases<S: AsRef<str>>(lines: &[S], options: Options) -> BTreeSet<String> {
    let mut set = BTreeSet::new();
    for line in lines {
        let mut phrase = String::new();
        for token in tokenize(line.as_ref()) {
            if token.delim {
                flush(&mut set, &mut phrase, options);
            } else if token.kind == TokenKind::Punct && options.skip_punct() {
                // Dropped.
            } else {
                phrase.push_str(&token.text);
            }
        }
        flush(&mut set, &mut phrase, options);
    }
    set
}

fn flush(set: &mut BTreeSet<String>, phrase: &mut String, options: Options) {
    let collapsed = phrase.split_whitespace().collect::<Vec<_>>().join(" ");
    phrase.clear();
    if collapsed.is_empty() {
        return;
    }
    if options.fold_case() {
        set.insert(collapsed.to_lowercase());
    } else {
        set.insert(collapsed);
    }
}

pub fn diff_phrases<S: AsRef<str>>(answer: &[S], solution: &[S], options: Options) -> RecallDiff {
    let answer = phrases(answer, options);
    let solution = phrases(solution, options);
    RecallDiff {
        wrong: answer.difference(&solution).cloned().collect(),
        missed: solution.difference(&answer).cloned().collect(),
    }
}

/// Grade normalized answer lines in recall mode.
pub fn compare_phrases(answer: Vec<String>, solution: Vec<String>, options: Options) -> Verification {
    let diff = diff_phrases(&answer, &solution, options);
    let line_count_differs = answer.len() != solution.len();
    let mut v = Verification::new(answer, solution);
    if !diff.is_empty() {
        v.state = Mark::ERROR;
        if line_count_differs {
            v.state |= Mark::INVALID_LINES_NUMBER;
        }
        v.solution = diff.report();
    }
    v
}

/// Comma-join items and greedily wrap them into lines of at most `width`
/// chars. An item longer than `width` gets a line of its own.
fn wrap(items: &BTreeSet<String>, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    let last = items.len().saturating_sub(1);
    for (n, item) in items.iter().enumerate() {
        let piece = if n < last {
            format!("{item},")
        } else {
            item.clone()
        };
        if line.is_empty() {
            line = piece;
        } else if line.chars().count() + 1 + piece.chars().count() <= width {
            line.push(' ');
            line.push_str(&piece);
        } else {
            lines.push(std::mem::replace(&mut line, piece));
        }
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

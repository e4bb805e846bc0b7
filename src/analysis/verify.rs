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

use std::collections::BTreeMap;
use std::fmt::Display;
use std::fmt::Formatter;

use bitflags::bitflags;

use crate::analysis::align::align_line;
use crate::analysis::options::Options;
use crate::analysis::recall::compare_phrases;
use crate::types::problem::Problem;

bitflags! {
    /// The outcome of a check. Several bits can be set at once, e.g. one
    /// line has a typo and another line is cut short.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Mark: u8 {
        const INVALID_LINES_NUMBER = 1;
        const NOT_FULL_ANSWER = 1 << 1;
        const REDUNDANT_ANSWER = 1 << 2;
        const ERROR = 1 << 3;
    }
}

impl Mark {
    pub const RIGHT: Mark = Mark::empty();

    pub fn is_right(self) -> bool {
        self.is_empty()
    }
}

impl Display for Mark {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_right() {
            return write!(f, "right");
        }
        let mut names = Vec::new();
        if self.contains(Mark::INVALID_LINES_NUMBER) {
            names.push("invalid lines amount");
        }
        if self.contains(Mark::ERROR) {
            names.push("wrong");
        }
        if self.contains(Mark::NOT_FULL_ANSWER) {
            names.push("incomplete");
        }
        if self.contains(Mark::REDUNDANT_ANSWER) {
            names.push("redundant");
        }
        write!(f, "{}", names.join(", "))
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MistakeKind {
    /// A whole word differs from the expected one.
    ErrorToken,
    /// A single character (or a trailing run) inside a wrong word.
    ErrorSymbol,
    /// Something expected is absent from the answer.
    Missed,
    /// The answer contains something not expected.
    Redundant,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Mistake {
    pub kind: MistakeKind,
    pub text: String,
    /// Offset in the answer line, in chars.
    pub position: usize,
}

impl Mistake {
    pub fn new(kind: MistakeKind, text: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            position,
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Verification {
    /// The submitted lines, blank lines dropped and whitespace collapsed.
    pub answer: Vec<String>,
    /// The lines graded against. In total recall mode a failed check
    /// replaces these with a report of wrong and missed phrases.
    pub solution: Vec<String>,
    pub state: Mark,
    /// Mistakes per answer line, in the order they were found.
    pub errors: BTreeMap<usize, Vec<Mistake>>,
}

impl Verification {
    pub fn new(answer: Vec<String>, solution: Vec<String>) -> Self {
        Self {
            answer,
            solution,
            state: Mark::RIGHT,
            errors: BTreeMap::new(),
        }
    }

    pub fn is_right(&self) -> bool {
        self.state.is_right()
    }
}

/// Grade an answer against a problem. Never fails: every input yields a
/// verification with the appropriate state bits set.
pub fn check<S: AsRef<str>>(problem: &Problem, answer: &[S], options: Options) -> Verification {
    let answer: Vec<String> = answer
        .iter()
        .map(|line| normalize_line(line.as_ref()))
        .filter(|line| !line.is_empty())
        .collect();
    let solution: Vec<String> = problem.target().to_vec();

    if options.total_recall() {
        return compare_phrases(answer, solution, options);
    }

    let mut v = Verification::new(answer, solution);
    if v.answer.len() != v.solution.len() {
        v.state = Mark::INVALID_LINES_NUMBER;
        return v;
    }

    for (n, (a, s)) in v.answer.iter().zip(v.solution.iter()).enumerate() {
        let report = align_line(a, s, options);
        v.state |= report.mark;
        if !report.mistakes.is_empty() {
            v.errors.insert(n, report.mistakes);
        }
    }
    v
}

/// Trim a line and collapse runs of whitespace into a single space.
fn normalize_line(line: &str) -> String {
    line.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn problem(question: &[&str], solution: &[&str]) -> Problem {
        Problem::new(
            question.iter().map(|s| s.to_string()).collect(),
            solution.iter().map(|s| s.to_string()).collect(),
            PathBuf::from("test.lrn"),
            1,
        )
    }

    #[test]
    fn test_substitution_and_truncation() {
        let p = problem(&["Hello world"], &["Привет мир"]);
        let v = check(&p, &["превет"], Options::CASE_INSENSITIVE);
        assert_eq!(v.state, Mark::ERROR | Mark::NOT_FULL_ANSWER);
        assert_eq!(v.errors.len(), 1);
        assert_eq!(
            v.errors[&0],
            vec![
                Mistake::new(MistakeKind::ErrorToken, "превет", 0),
                Mistake::new(MistakeKind::ErrorSymbol, "е", 2),
                Mistake::new(MistakeKind::Missed, "...", 6),
            ]
        );
    }

    #[test]
    fn test_punctuation_insensitive_match() {
        let p = problem(&["Hello, world!"], &["Привет, мир!"]);
        let v = check(&p, &["Привет мир"], Options::PUNCT_INSENSITIVE);
        assert_eq!(v.state, Mark::RIGHT);
        assert!(v.errors.is_empty());
    }

    #[test]
    fn test_punctuation_matters_by_default() {
        let p = problem(&["Hello, world!"], &["Привет, мир!"]);
        let v = check(&p, &["Привет мир"], Options::empty());
        assert!(!v.is_right());
    }

    #[test]
    fn test_line_count_gate() {
        let p = problem(&["Q"], &["one", "two"]);
        let v = check(&p, &["one"], Options::empty());
        assert_eq!(v.state, Mark::INVALID_LINES_NUMBER);
        assert!(v.errors.is_empty());

        let v = check(&p, &["one", "two", "three"], Options::CASE_INSENSITIVE);
        assert_eq!(v.state, Mark::INVALID_LINES_NUMBER);
        assert!(v.errors.is_empty());
    }

    #[test]
    fn test_blank_lines_and_spacing_are_normalized() {
        let p = problem(&["Q"], &["char *str = tmpnam(NULL);", "puts(str);"]);
        let answer = [
            "",
            "  char  *str =   tmpnam(NULL);  ",
            "   ",
            "puts(str);",
            "",
        ];
        let v = check(&p, &answer, Options::empty());
        assert!(v.is_right());
        assert_eq!(v.answer, vec!["char *str = tmpnam(NULL);", "puts(str);"]);
    }

    #[test]
    fn test_empty_answer_against_empty_solution() {
        let p = problem(&["Q"], &[]);
        let empty: [&str; 0] = [];
        let v = check(&p, &empty, Options::empty());
        assert_eq!(v.state, Mark::RIGHT);
    }

    #[test]
    fn test_inverted_problem_grades_against_question() {
        let mut p = problem(&["Hello world"], &["Привет мир"]);
        p.inverted = true;
        let v = check(&p, &["Hello world"], Options::empty());
        assert!(v.is_right());
        assert_eq!(v.solution, vec!["Hello world"]);
    }

    #[test]
    fn test_state_bits_accumulate_across_lines() {
        let p = problem(&["Q"], &["red green", "blue"]);
        let v = check(&p, &["red", "blew"], Options::empty());
        assert_eq!(v.state, Mark::ERROR | Mark::NOT_FULL_ANSWER);
        assert_eq!(v.errors.len(), 2);
        assert_eq!(v.errors[&0], vec![Mistake::new(MistakeKind::Missed, "...", 3)]);
        assert_eq!(v.errors[&1][0], Mistake::new(MistakeKind::ErrorToken, "blew", 0));
    }

    #[test]
    fn test_check_is_idempotent() {
        let p = problem(&["Q"], &["The quick brown fox", "jumps over"]);
        let answer = ["the quik fox", "jumps over the dog"];
        let first = check(&p, &answer, Options::CASE_INSENSITIVE);
        let second = check(&p, &answer, Options::CASE_INSENSITIVE);
        assert_eq!(first, second);
    }

    #[test]
    fn test_every_matching_line_is_right() {
        let solution = ["int main(void)", "{", "\treturn 0;", "}"];
        let p = problem(&["Q"], &solution);
        for options in [
            Options::empty(),
            Options::CASE_INSENSITIVE,
            Options::PUNCT_INSENSITIVE,
            Options::CASE_INSENSITIVE | Options::PUNCT_INSENSITIVE,
        ] {
            let v = check(&p, &solution, options);
            assert_eq!(v.state, Mark::RIGHT);
        }
    }

    #[test]
    fn test_total_recall_reports_wrong_and_missed() {
        let p = problem(&["Q"], &["apples, oranges."]);
        let v = check(&p, &["oranges, bananas."], Options::TOTAL_RECALL);
        assert_eq!(v.state, Mark::ERROR);
        assert_eq!(v.solution, vec!["Wrong:", "bananas", "Missed:", "apples"]);
        assert!(v.errors.is_empty());
    }

    #[test]
    fn test_total_recall_with_every_option() {
        let p = problem(&["Q"], &["apples, oranges."]);
        let options = Options::TOTAL_RECALL | Options::CASE_INSENSITIVE | Options::PUNCT_INSENSITIVE;
        let v = check(&p, &["  ", "ORANGES,  Apples"], options);
        assert_eq!(v.state, Mark::RIGHT);
        assert_eq!(v.answer, vec!["ORANGES, Apples"]);
        assert_eq!(v.solution, vec!["apples, oranges."]);
    }

    #[test]
    fn test_mark_display() {
        assert_eq!(Mark::RIGHT.to_string(), "right");
        assert_eq!(
            (Mark::ERROR | Mark::NOT_FULL_ANSWER).to_string(),
            "wrong, incomplete"
        );
    }
}

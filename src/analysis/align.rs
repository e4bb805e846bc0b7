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

use std::borrow::Cow;

use crate::analysis::options::Options;
use crate::analysis::token::Token;
use crate::analysis::token::TokenKind;
use crate::analysis::token::tokenize;
use crate::analysis::verify::Mark;
use crate::analysis::verify::Mistake;
use crate::analysis::verify::MistakeKind;

/// Marks the end of an answer that stops before the solution does.
const ELLIPSIS: &str = "...";

/// The result of aligning one answer line with one solution line.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct LineReport {
    pub mark: Mark,
    pub mistakes: Vec<Mistake>,
}

/// A token paired with the text it is compared by.
struct Lexeme<'a> {
    token: &'a Token,
    key: Cow<'a, str>,
}

impl PartialEq for Lexeme<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// Tokenize and align a normalized answer line against a solution line.
pub fn align_line(answer: &str, solution: &str, options: Options) -> LineReport {
    let answer_tokens = tokenize(answer);
    let solution_tokens = tokenize(solution);
    align(
        &answer_tokens,
        &solution_tokens,
        answer.chars().count(),
        options,
    )
}

/// Walk both token sequences in lock step with one token of lookahead on
/// each side. `answer_len` is the length of the answer line in chars, where
/// a truncated answer is marked.
pub fn align(
    answer: &[Token],
    solution: &[Token],
    answer_len: usize,
    options: Options,
) -> LineReport {
    let answer = lexemes(answer, options);
    let solution = lexemes(solution, options);
    let mut report = LineReport::default();

    let (mut i, mut j) = (0, 0);
    while i < answer.len() && j < solution.len() {
        let a = &answer[i];
        let s = &solution[j];
        if a == s {
            // Match.
        } else if i > 0 && solution.get(j + 1).is_some_and(|next| next == a) {
            // The answer skipped `s`.
            report.mistakes.push(Mistake::new(
                MistakeKind::Missed,
                s.token.text.clone(),
                a.token.position.saturating_sub(1),
            ));
            report.mark |= Mark::NOT_FULL_ANSWER;
            j += 1;
        } else if answer.get(i + 1).is_some_and(|next| next == s) {
            // The answer inserted `a`.
            report.mistakes.push(Mistake::new(
                MistakeKind::Redundant,
                a.token.text.clone(),
                a.token.position,
            ));
            report.mark |= Mark::REDUNDANT_ANSWER;
            i += 1;
        } else {
            report.mistakes.push(Mistake::new(
                MistakeKind::ErrorToken,
                a.token.text.clone(),
                a.token.position,
            ));
            report
                .mistakes
                .extend(symbol_mistakes(a.token, s.token, options.fold_case()));
            report.mark |= Mark::ERROR;
        }
        i += 1;
        j += 1;
    }

    if j < solution.len() {
        report
            .mistakes
            .push(Mistake::new(MistakeKind::Missed, ELLIPSIS, answer_len));
        report.mark |= Mark::NOT_FULL_ANSWER;
    }

    if i < answer.len() {
        for a in &answer[i..] {
            report.mistakes.push(Mistake::new(
                MistakeKind::Redundant,
                a.token.text.clone(),
                a.token.position,
            ));
        }
        report.mark |= Mark::REDUNDANT_ANSWER;
    }

    report
}

/// Drop spaces (and punctuation if requested) and compute comparison keys.
/// Folding happens on the key only, so reported text keeps its casing.
fn lexemes(tokens: &[Token], options: Options) -> Vec<Lexeme<'_>> {
    tokens
        .iter()
        .filter(|t| t.kind != TokenKind::Space)
        .filter(|t| !(options.skip_punct() && t.kind == TokenKind::Punct))
        .map(|token| {
            let key = if options.fold_case() {
                Cow::Owned(token.text.to_lowercase())
            } else {
                Cow::Borrowed(token.text.as_str())
            };
            Lexeme { token, key }
        })
        .collect()
}

/// Character-level differences between a wrong answer word and the
/// expected word.
fn symbol_mistakes(answer: &Token, solution: &Token, fold: bool) -> Vec<Mistake> {
    let a: Vec<char> = answer.text.chars().collect();
    let s: Vec<char> = solution.text.chars().collect();
    let mut mistakes = Vec::new();
    for (k, (x, y)) in a.iter().zip(s.iter()).enumerate() {
        if !same_char(*x, *y, fold) {
            mistakes.push(Mistake::new(
                MistakeKind::ErrorSymbol,
                x.to_string(),
                answer.position + k,
            ));
        }
    }
    if a.len() > s.len() {
        let tail: String = a[s.len()..].iter().collect();
        mistakes.push(Mistake::new(
            MistakeKind::ErrorSymbol,
            tail,
            answer.position + s.len(),
        ));
    }
    mistakes
}

fn same_char(x: char, y: char, fold: bool) -> bool {
    x == y || (fold && x.to_lowercase().eq(y.to_lowercase()))
}

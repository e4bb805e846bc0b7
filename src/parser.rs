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

use std::collections::HashMap;
use std::path::Path;

use crate::error::Fallible;
use crate::error::fail;
use crate::types::problem::Problem;

const COMMENT: char = '#';
const TOPIC: char = '%';
const TAG: char = '^';
const QUESTION: char = '>';
const SOLUTION: char = '<';
const BLOCK: char = '@';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum State {
    Outside,
    Question,
    Solution,
    Block,
}

/// Parse the contents of a quiz file. If `topics` is non-empty, only
/// problems under one of the listed `%` topics are returned.
pub fn parse_quiz(content: &str, file: &Path, topics: &[String]) -> Fallible<Vec<Problem>> {
    let mut parser = Parser::new(file, topics);
    for (n, line) in content.lines().enumerate() {
        parser.line(n + 1, line)?;
    }
    parser.finish()
}

struct Parser<'a> {
    file: &'a Path,
    topics: &'a [String],
    /// Whether lines under the current topic are loaded.
    wanted: bool,
    state: State,
    /// Line number where the problem in progress starts.
    start: usize,
    question: Vec<String>,
    solution: Vec<String>,
    blocks: HashMap<String, Vec<String>>,
    block_name: Option<String>,
    block: Vec<String>,
    problems: Vec<Problem>,
}

impl<'a> Parser<'a> {
    fn new(file: &'a Path, topics: &'a [String]) -> Self {
        Self {
            file,
            topics,
            wanted: topics.is_empty(),
            state: State::Outside,
            start: 0,
            question: Vec::new(),
            solution: Vec::new(),
            blocks: HashMap::new(),
            block_name: None,
            block: Vec::new(),
            problems: Vec::new(),
        }
    }

    fn line(&mut self, n: usize, line: &str) -> Fallible<()> {
        let line = line.trim_end();
        let Some(first) = line.chars().next() else {
            return Ok(());
        };
        let rest = trim(&line[first.len_utf8()..]);

        if first == TOPIC {
            self.close()?;
            if !self.topics.is_empty() {
                self.wanted = self.topics.iter().any(|t| t == rest.trim());
            }
            return Ok(());
        }
        if !self.wanted {
            return Ok(());
        }

        match first {
            COMMENT => {}
            TAG => {
                log::debug!("{}:{n}: ignoring tag line.", self.file.display());
            }
            QUESTION => {
                if self.state != State::Question {
                    self.close()?;
                    self.state = State::Question;
                    self.start = n;
                }
                if !rest.is_empty() {
                    self.push_question(rest);
                }
            }
            SOLUTION => {
                if self.state != State::Question && self.state != State::Solution {
                    return self.error(n, "solution without a question");
                }
                self.state = State::Solution;
                if !rest.is_empty() {
                    self.solution.push(rest.to_string());
                }
            }
            BLOCK => {
                self.close()?;
                self.state = State::Block;
                if !rest.is_empty() {
                    self.block_name = Some(rest.to_string());
                }
            }
            _ => {
                let text = trim(line);
                match self.state {
                    State::Outside => return self.error(n, "text outside of a problem"),
                    State::Question => self.push_question(text),
                    State::Solution => self.solution.push(text.to_string()),
                    State::Block => {
                        if self.block_name.is_none() {
                            self.block_name = Some(text.to_string());
                        } else {
                            self.block.push(text.to_string());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Add a question line, expanding a `{{name}}` reference to a block.
    fn push_question(&mut self, text: &str) {
        let block = block_reference(text).and_then(|name| self.blocks.get(name));
        match block {
            Some(block) => self.question.extend(block.iter().cloned()),
            None => self.question.push(text.to_string()),
        }
    }

    /// End whatever is in progress.
    fn close(&mut self) -> Fallible<()> {
        match self.state {
            State::Outside => {}
            State::Question => {
                return self.error(self.start, "question without a solution");
            }
            State::Solution => {
                let question = std::mem::take(&mut self.question);
                let solution = std::mem::take(&mut self.solution);
                let problem = Problem::new(question, solution, self.file.to_path_buf(), self.start);
                self.problems.push(problem);
            }
            State::Block => {
                let block = std::mem::take(&mut self.block);
                match self.block_name.take() {
                    Some(name) => {
                        self.blocks.insert(name, block);
                    }
                    None => log::warn!("{}: ignoring unnamed block.", self.file.display()),
                }
            }
        }
        self.state = State::Outside;
        Ok(())
    }

    fn finish(mut self) -> Fallible<Vec<Problem>> {
        self.close()?;
        log::debug!(
            "Parsed {} problems from {}.",
            self.problems.len(),
            self.file.display()
        );
        Ok(self.problems)
    }

    fn error<T>(&self, n: usize, message: &str) -> Fallible<T> {
        fail(format!("{}:{n}: {message}.", self.file.display()))
    }
}

/// Strip trailing whitespace, and leading whitespace other than tabs.
fn trim(s: &str) -> &str {
    s.trim_end()
        .trim_start_matches(|c: char| c.is_whitespace() && c != '\t')
}

/// The name inside the first `{{...}}` of a line.
fn block_reference(text: &str) -> Option<&str> {
    let start = text.find("{{")? + 2;
    let len = text[start..].find("}}")?;
    Some(&text[start..start + len])
}

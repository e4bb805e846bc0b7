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

use std::io::BufRead;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::analysis::options::Options;
use crate::analysis::verify::Mistake;
use crate::analysis::verify::MistakeKind;
use crate::analysis::verify::Verification;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::scheduler::Orientation;
use crate::scheduler::Policy;
use crate::scheduler::Session;
use crate::scheduler::SessionSettings;
use crate::types::timestamp::Timestamp;

const SKIP: &str = ":skip";
const QUIT: &str = ":quit";
const KNOWN: &str = ":known";

/// Command-line settings of a drill. Analysis switches are OR-ed over the
/// configuration file; the rest override it.
#[derive(Clone, Debug, Default)]
pub struct DrillArgs {
    pub options: Options,
    pub orientation: Orientation,
    pub errors_only: bool,
    pub accept_by_enter: bool,
    pub topics: Vec<String>,
    pub seed: Option<u64>,
    pub policy: Option<Policy>,
    pub config: Option<PathBuf>,
}

pub fn drill(path: &Path, args: DrillArgs) -> Fallible<()> {
    let started_at = Timestamp::now();
    let mut collection = Collection::open(path, &args.topics, args.config.as_deref())?;
    let options = collection.config.options() | args.options;
    let settings = SessionSettings {
        policy: args.policy.unwrap_or(collection.config.session.policy),
        orientation: args.orientation,
        retry: collection.config.session.retry,
        errors_only: args.errors_only,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let problems = std::mem::take(&mut collection.problems);
    let mut session = Session::new(problems, settings, rng);
    if session.is_finished() {
        println!("No problems to drill.");
        return Ok(());
    }
    log::debug!("Drilling {} problems with {settings:?}.", session.left());

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut output = std::io::stdout();
    run(&mut session, options, args.accept_by_enter, &mut input, &mut output)?;

    let (problems, stats) = session.finish();
    collection
        .db
        .save_session(started_at, Timestamp::now(), &stats, &problems)?;
    log::info!(
        "Session saved: {} solved, {} errors, {} skipped.",
        stats.solved,
        stats.errors,
        stats.skipped
    );
    Ok(())
}

enum Answer {
    Lines(Vec<String>),
    Skip,
    Quit,
}

enum Command {
    Continue,
    Known,
    Quit,
}

/// The interactive loop. Stops when every problem is retired or skipped,
/// on `:quit`, or at the end of input.
pub fn run<R: Rng, I: BufRead, O: Write>(
    session: &mut Session<R>,
    options: Options,
    accept_by_enter: bool,
    input: &mut I,
    output: &mut O,
) -> Fallible<()> {
    while let Some(id) = session.next() {
        let problem = session.problem(id);
        let stats = session.stats();
        writeln!(
            output,
            "[{} left, {} solved, {} errors] repeat {}, errors {}, total {}",
            session.left(),
            stats.solved,
            stats.errors,
            problem.repeat,
            problem.errors,
            problem.total_errors
        )?;
        for line in problem.prompt() {
            writeln!(output, "{line}")?;
        }
        let target = problem.target().to_vec();

        let answer = match read_answer(input, output, accept_by_enter)? {
            Answer::Lines(lines) => lines,
            Answer::Skip => {
                session.skip();
                writeln!(output, "Skipped. Solution:")?;
                print_block(output, &target)?;
                continue;
            }
            Answer::Quit => break,
        };

        let Some(verification) = session.check(&answer, options) else {
            continue;
        };
        print_verification(output, &verification)?;

        match read_command(input, output)? {
            Command::Continue => {}
            Command::Known => {
                session.retire();
            }
            Command::Quit => break,
        }
    }

    if session.is_finished() {
        writeln!(output, "All problems are solved.")?;
    }
    let stats = session.stats();
    writeln!(
        output,
        "Solved: {}, errors: {}, skipped: {}.",
        stats.solved, stats.errors, stats.skipped
    )?;
    output.flush()?;
    Ok(())
}

/// Read one line without its terminator, or `None` at the end of input.
fn read_line<I: BufRead>(input: &mut I) -> Fallible<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    let len = line.trim_end_matches(['\n', '\r']).len();
    line.truncate(len);
    Ok(Some(line))
}

/// Read an answer: a single line with `accept_by_enter`, otherwise lines up
/// to the first blank one.
fn read_answer<I: BufRead, O: Write>(
    input: &mut I,
    output: &mut O,
    accept_by_enter: bool,
) -> Fallible<Answer> {
    let mut lines: Vec<String> = Vec::new();
    loop {
        write!(output, "> ")?;
        output.flush()?;
        let Some(line) = read_line(input)? else {
            return Ok(if lines.is_empty() {
                Answer::Quit
            } else {
                Answer::Lines(lines)
            });
        };
        if lines.is_empty() {
            match line.trim() {
                SKIP => return Ok(Answer::Skip),
                QUIT => return Ok(Answer::Quit),
                _ => {}
            }
        }
        if line.trim().is_empty() {
            if lines.is_empty() {
                continue;
            }
            return Ok(Answer::Lines(lines));
        }
        if accept_by_enter {
            return Ok(Answer::Lines(vec![line]));
        }
        lines.push(line);
    }
}

fn read_command<I: BufRead, O: Write>(input: &mut I, output: &mut O) -> Fallible<Command> {
    write!(output, ": ")?;
    output.flush()?;
    let command = match read_line(input)? {
        None => Command::Quit,
        Some(line) => match line.trim() {
            KNOWN => Command::Known,
            QUIT => Command::Quit,
            _ => Command::Continue,
        },
    };
    Ok(command)
}

fn print_verification<O: Write>(output: &mut O, verification: &Verification) -> Fallible<()> {
    writeln!(output, "{}", verification.state)?;
    if verification.is_right() {
        return Ok(());
    }
    for (n, line) in verification.answer.iter().enumerate() {
        writeln!(output, "  {line}")?;
        if let Some(mistakes) = verification.errors.get(&n) {
            writeln!(output, "  {}", marker_line(mistakes))?;
        }
    }
    writeln!(output, "Solution:")?;
    print_block(output, &verification.solution)
}

fn print_block<O: Write>(output: &mut O, lines: &[String]) -> Fallible<()> {
    for line in lines {
        writeln!(output, "  {line}")?;
    }
    Ok(())
}

/// A line to print under an answer line, pointing at its mistakes: `~`
/// under wrong words, `^` under wrong characters and gaps, `+` under
/// extra words.
fn marker_line(mistakes: &[Mistake]) -> String {
    let mut marks: Vec<char> = Vec::new();
    for mistake in mistakes {
        let width = mistake.text.chars().count();
        let (mark, width) = match mistake.kind {
            MistakeKind::ErrorToken => ('~', width),
            MistakeKind::ErrorSymbol => ('^', width),
            MistakeKind::Missed => ('^', 1),
            MistakeKind::Redundant => ('+', width),
        };
        let end = mistake.position + width;
        if marks.len() < end {
            marks.resize(end, ' ');
        }
        for slot in &mut marks[mistake.position..end] {
            *slot = mark;
        }
    }
    let line: String = marks.into_iter().collect();
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::types::problem::Problem;

    fn session(question: &str, solution: &str) -> Session<StdRng> {
        let problem = Problem::new(
            vec![question.to_string()],
            vec![solution.to_string()],
            PathBuf::from("test.lrn"),
            1,
        );
        Session::new(
            vec![problem],
            SessionSettings::default(),
            StdRng::seed_from_u64(1),
        )
    }

    fn drive(
        session: &mut Session<StdRng>,
        options: Options,
        accept_by_enter: bool,
        input: &str,
    ) -> Fallible<String> {
        let mut input = Cursor::new(input.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();
        run(session, options, accept_by_enter, &mut input, &mut output)?;
        Ok(String::from_utf8_lossy(&output).into_owned())
    }

    #[test]
    fn test_right_answer() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(&mut s, Options::empty(), false, "Paris\n\n\n")?;
        assert!(out.contains("France"));
        assert!(out.contains("right"));
        assert!(out.contains("All problems are solved."));
        assert_eq!(s.stats().solved, 1);
        Ok(())
    }

    #[test]
    fn test_wrong_then_right() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(
            &mut s,
            Options::empty(),
            false,
            "Rome\n\n\nParis\n\n\nParis\n\n\n",
        )?;
        assert!(out.contains("wrong"));
        assert!(out.contains("Solution:\n  Paris\n"));
        assert!(s.is_finished());
        assert_eq!(s.stats().errors, 1);
        assert_eq!(s.stats().solved, 1);
        Ok(())
    }

    #[test]
    fn test_multiline_answer() -> Fallible<()> {
        let problem = Problem::new(
            vec!["Q".to_string()],
            vec!["one".to_string(), "two".to_string()],
            PathBuf::from("test.lrn"),
            1,
        );
        let mut s = Session::new(
            vec![problem],
            SessionSettings::default(),
            StdRng::seed_from_u64(1),
        );
        let out = drive(&mut s, Options::empty(), false, "\none\ntwo\n\n\n")?;
        assert!(out.contains("right"));
        assert!(s.is_finished());
        Ok(())
    }

    #[test]
    fn test_marker_line_under_mistakes() -> Fallible<()> {
        let mut s = session("Hello world", "Привет мир");
        let out = drive(&mut s, Options::CASE_INSENSITIVE, false, "превет\n\n:quit\n")?;
        assert!(out.contains("wrong, incomplete"));
        assert!(out.contains("  превет\n  ~~^~~~^\n"));
        assert!(!s.is_finished());
        Ok(())
    }

    #[test]
    fn test_skip_shows_solution() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(&mut s, Options::empty(), false, ":skip\n")?;
        assert!(out.contains("Skipped. Solution:\n  Paris\n"));
        assert_eq!(s.stats().skipped, 1);
        assert!(s.is_finished());
        Ok(())
    }

    #[test]
    fn test_quit_and_end_of_input() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(&mut s, Options::empty(), false, ":quit\n")?;
        assert!(!out.contains("All problems are solved."));
        assert!(!s.is_finished());

        let mut s = session("France", "Paris");
        drive(&mut s, Options::empty(), false, "")?;
        assert!(!s.is_finished());
        assert_eq!(s.stats(), Default::default());
        Ok(())
    }

    #[test]
    fn test_known_retires_after_wrong_answer() -> Fallible<()> {
        let mut s = session("France", "Paris");
        drive(&mut s, Options::empty(), false, "Rome\n\n:known\n")?;
        assert!(s.is_finished());
        assert_eq!(s.stats().errors, 1);
        assert_eq!(s.stats().solved, 1);
        Ok(())
    }

    #[test]
    fn test_accept_by_enter() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(&mut s, Options::empty(), true, "Paris\n\n")?;
        assert!(out.contains("right"));
        assert!(s.is_finished());
        Ok(())
    }

    #[test]
    fn test_accept_by_enter_ignores_blank_lines() -> Fallible<()> {
        let mut s = session("France", "Paris");
        let out = drive(&mut s, Options::empty(), true, "\n  \nParis\n\n")?;
        assert!(out.contains("right"));
        assert!(s.is_finished());
        assert_eq!(s.stats().errors, 0);
        Ok(())
    }

    #[test]
    fn test_marker_line() {
        let mistakes = vec![
            Mistake::new(MistakeKind::Redundant, "big", 2),
            Mistake::new(MistakeKind::Missed, "...", 9),
        ];
        assert_eq!(marker_line(&mistakes), "  +++    ^");
        assert_eq!(marker_line(&[]), "");
    }
}

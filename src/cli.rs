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

use std::env::current_dir;
use std::path::PathBuf;

use clap::Parser;

use crate::analysis::options::Options;
use crate::cmd::check::check_quiz;
use crate::cmd::drill::DrillArgs;
use crate::cmd::drill::drill;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_quiz_stats;
use crate::error::Fallible;
use crate::scheduler::Orientation;
use crate::scheduler::Policy;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Drill the problems of a quiz file or directory.
    Drill {
        /// Path to a quiz file or a directory of quiz files. Defaults to the
        /// current directory.
        path: Option<String>,
        /// Ignore case when comparing answers.
        #[arg(short = 'c', long)]
        case_insensitive: bool,
        /// Ignore punctuation when comparing answers.
        #[arg(short = 'u', long)]
        punct_insensitive: bool,
        /// Grade answers as unordered sets of phrases.
        #[arg(short = 'z', long)]
        total_recall: bool,
        /// Show solutions and ask for questions.
        #[arg(short = 'i', long, conflicts_with = "mixed")]
        inverted: bool,
        /// Randomly show either side.
        #[arg(short = 'm', long)]
        mixed: bool,
        /// Only drill problems missed in the last session.
        #[arg(short = 'r', long)]
        errors_only: bool,
        /// Submit an answer with a single Enter.
        #[arg(short = 'e', long)]
        accept_by_enter: bool,
        /// Only drill problems under these topics.
        #[arg(short = 't', long = "topic", num_args = 1..)]
        topics: Vec<String>,
        /// Seed for problem selection.
        #[arg(long)]
        seed: Option<u64>,
        /// How the next problem is picked.
        #[arg(long)]
        policy: Option<Policy>,
        /// Configuration file to use instead of `lrn.toml`.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print error statistics of a quiz.
    Stats {
        /// Path to a quiz file or a directory of quiz files.
        path: Option<String>,
        /// Output format.
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
    /// Check that a quiz parses.
    Check {
        /// Path to a quiz file or a directory of quiz files.
        path: Option<String>,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Drill {
            path,
            case_insensitive,
            punct_insensitive,
            total_recall,
            inverted,
            mixed,
            errors_only,
            accept_by_enter,
            topics,
            seed,
            policy,
            config,
        } => {
            let mut options = Options::empty();
            options.set(Options::CASE_INSENSITIVE, case_insensitive);
            options.set(Options::PUNCT_INSENSITIVE, punct_insensitive);
            options.set(Options::TOTAL_RECALL, total_recall);
            let orientation = if mixed {
                Orientation::Mixed
            } else if inverted {
                Orientation::Inverted
            } else {
                Orientation::Normal
            };
            let args = DrillArgs {
                options,
                orientation,
                errors_only,
                accept_by_enter,
                topics,
                seed,
                policy,
                config,
            };
            drill(&resolve(path)?, args)
        }
        Command::Stats { path, format } => print_quiz_stats(&resolve(path)?, format),
        Command::Check { path } => check_quiz(&resolve(path)?),
    }
}

fn resolve(path: Option<String>) -> Fallible<PathBuf> {
    match path {
        Some(path) => Ok(PathBuf::from(path)),
        None => Ok(current_dir()?),
    }
}

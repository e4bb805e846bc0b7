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

use std::fmt::Display;
use std::fmt::Formatter;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::problem_hash::ProblemHash;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum StatsFormat {
    /// Plain text table.
    #[default]
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

pub fn print_quiz_stats(path: &Path, format: StatsFormat) -> Fallible<()> {
    let collection = Collection::open(path, &[], None)?;
    let stats = collect_stats(&collection)?;
    match format {
        StatsFormat::Text => {
            print!("{}", render_text(&stats));
        }
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    problem_count: usize,
    session_count: u32,
    last_session: Option<Timestamp>,
    total_errors: u32,
    /// Most missed first.
    problems: Vec<ProblemStats>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemStats {
    hash: ProblemHash,
    question: String,
    location: String,
    total_errors: u32,
    last_errors: u32,
}

fn collect_stats(collection: &Collection) -> Fallible<Stats> {
    let mut problems: Vec<ProblemStats> = collection
        .problems
        .iter()
        .map(|p| ProblemStats {
            hash: p.hash(),
            question: p.question().first().cloned().unwrap_or_default(),
            location: format!(
                "{}:{}",
                p.file()
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                p.line()
            ),
            total_errors: p.total_errors,
            last_errors: p.last_errors,
        })
        .collect();
    problems.sort_by(|a, b| b.total_errors.cmp(&a.total_errors));
    Ok(Stats {
        problem_count: problems.len(),
        session_count: collection.db.session_count()?,
        last_session: collection.db.last_session()?,
        total_errors: problems.iter().map(|p| p.total_errors).sum(),
        problems,
    })
}

fn render_text(stats: &Stats) -> String {
    let mut out = format!("Problems: {}\n", stats.problem_count);
    match &stats.last_session {
        Some(last) => {
            out.push_str(&format!(
                "Sessions: {} (last: {last})\n",
                stats.session_count
            ));
        }
        None => {
            out.push_str(&format!("Sessions: {}\n", stats.session_count));
        }
    }
    out.push_str(&format!("Total errors: {}\n\n", stats.total_errors));
    out.push_str(&format!("{:>6} {:>6}  question\n", "total", "last"));
    for p in &stats.problems {
        out.push_str(&format!(
            "{:>6} {:>6}  {} ({})\n",
            p.total_errors, p.last_errors, p.question, p.location
        ));
    }
    out
}

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

use std::fs::read_to_string;
use std::path::Path;
use std::path::PathBuf;
use std::time::Instant;

use walkdir::WalkDir;

use crate::config::CONFIG_FILE;
use crate::config::Config;
use crate::db::Database;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::parser::parse_quiz;
use crate::types::problem::Problem;

/// Statistics database of a quiz directory.
const DB_FILE: &str = "lrn.db";

const QUIZ_EXTENSION: &str = "lrn";

/// A quiz file or a directory of quiz files, together with its settings and
/// statistics.
pub struct Collection {
    pub path: PathBuf,
    pub db: Database,
    pub config: Config,
    pub problems: Vec<Problem>,
}

impl Collection {
    /// Open a quiz file or directory. With a non-empty `topics` list only
    /// problems under those topics are loaded. `config` overrides the
    /// `lrn.toml` found next to the quiz.
    pub fn open(path: &Path, topics: &[String], config: Option<&Path>) -> Fallible<Self> {
        let path = if path.exists() {
            path.canonicalize()?
        } else {
            return fail("path does not exist.");
        };
        let directory: PathBuf = if path.is_dir() {
            path.clone()
        } else {
            path.parent()
                .map(Path::to_path_buf)
                .ok_or_else(|| ErrorReport::new("invalid path"))?
        };

        let config = match config {
            Some(config_path) => Config::load(config_path)?,
            None => {
                let config_path = directory.join(CONFIG_FILE);
                if config_path.exists() {
                    Config::load(&config_path)?
                } else {
                    Config::default()
                }
            }
        };

        let db_path = db_path(&path)?;
        let db_path: &str = db_path
            .to_str()
            .ok_or_else(|| ErrorReport::new("invalid path"))?;
        let db: Database = Database::new(db_path)?;

        let mut problems = {
            log::debug!("Loading problems...");
            let start = Instant::now();
            let mut problems = Vec::new();
            for file in quiz_files(&path)? {
                let content = read_to_string(&file)?;
                problems.extend(parse_quiz(&content, &file, topics)?);
            }
            let end = Instant::now();
            let duration = end.duration_since(start).as_millis();
            log::debug!("Loaded {} problems in {duration}ms.", problems.len());
            problems
        };

        let history = db.history()?;
        for problem in problems.iter_mut() {
            problem.repeat = config.session.repeat;
            if let Some(entry) = history.get(&problem.hash()) {
                problem.total_errors = entry.total_errors;
                problem.last_errors = entry.last_errors;
            }
        }

        Ok(Self {
            path,
            db,
            config,
            problems,
        })
    }
}

/// Where statistics of a quiz live: `lrn.db` inside a directory, or a
/// hidden `.<stem>.db` next to a single file.
fn db_path(path: &Path) -> Fallible<PathBuf> {
    if path.is_dir() {
        return Ok(path.join(DB_FILE));
    }
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ErrorReport::new("invalid path"))?;
    Ok(path.with_file_name(format!(".{stem}.db")))
}

/// The quiz files under a path, in a stable order.
fn quiz_files(path: &Path) -> Fallible<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(path).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == QUIZ_EXTENSION) {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;
    use crate::scheduler::SessionStats;
    use crate::types::timestamp::Timestamp;

    #[test]
    fn test_missing_path() {
        let result = Collection::open(Path::new("./no/such/quiz.lrn"), &[], None);
        assert_eq!(
            result.err(),
            Some(ErrorReport::new("path does not exist."))
        );
    }

    #[test]
    fn test_open_directory() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        let collection = Collection::open(dir.path(), &[], None)?;
        assert_eq!(collection.problems.len(), 7);
        assert!(collection.config.analysis.case_insensitive);
        assert!(dir.path().join(DB_FILE).exists());
        // Files are read in name order.
        assert_eq!(collection.problems[0].question(), ["France"]);
        assert!(collection.problems[6].file().ends_with("code.lrn"));
        Ok(())
    }

    #[test]
    fn test_open_file_with_topics() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        let file = dir.path().join("capitals.lrn");
        let topics = vec!["greetings".to_string()];
        let collection = Collection::open(&file, &topics, None)?;
        assert_eq!(collection.problems.len(), 1);
        assert_eq!(
            collection.problems[0].question(),
            ["Say hello", "in Russian."]
        );
        assert!(dir.path().join(".capitals.db").exists());
        Ok(())
    }

    #[test]
    fn test_config_override() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        let config_path = dir.path().join("custom.toml");
        std::fs::write(&config_path, "[session]\nrepeat = 3\n")?;
        let collection = Collection::open(dir.path(), &[], Some(config_path.as_path()))?;
        assert!(!collection.config.analysis.case_insensitive);
        assert!(collection.problems.iter().all(|p| p.repeat == 3));
        Ok(())
    }

    #[test]
    fn test_history_is_applied_by_hash() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        let mut collection = Collection::open(dir.path(), &[], None)?;
        let mut problems = collection.problems.clone();
        problems[1].total_errors = 5;
        problems[1].last_errors = 2;
        let now = Timestamp::now();
        collection
            .db
            .save_session(now, now, &SessionStats::default(), &problems)?;

        let reopened = Collection::open(dir.path(), &[], None)?;
        assert_eq!(reopened.problems[1].total_errors, 5);
        assert_eq!(reopened.problems[1].last_errors, 2);
        assert_eq!(reopened.problems[0].total_errors, 0);
        Ok(())
    }
}

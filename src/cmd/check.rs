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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::problem::Problem;
use crate::types::problem_hash::ProblemHash;

pub fn check_quiz(path: &Path) -> Fallible<()> {
    let collection = Collection::open(path, &[], None)?;
    for (first, second) in duplicates(&collection.problems) {
        let a = &collection.problems[first];
        let b = &collection.problems[second];
        println!(
            "duplicate question: {}:{} and {}:{}",
            a.file().display(),
            a.line(),
            b.file().display(),
            b.line()
        );
    }
    println!("ok");
    Ok(())
}

/// Pairs of indices of problems sharing a question. Such problems share
/// their statistics.
fn duplicates(problems: &[Problem]) -> Vec<(usize, usize)> {
    let mut seen: HashMap<ProblemHash, usize> = HashMap::new();
    let mut pairs = Vec::new();
    for (n, problem) in problems.iter().enumerate() {
        match seen.get(&problem.hash()) {
            Some(&first) => pairs.push((first, n)),
            None => {
                seen.insert(problem.hash(), n);
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use crate::helper::create_tmp_copy_of_test_directory;
    use crate::parser::parse_quiz;

    #[test]
    fn test_non_existent_path() {
        assert!(check_quiz(Path::new("./derpherp")).is_err());
    }

    #[test]
    fn test_fixtures() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        check_quiz(dir.path())?;
        check_quiz(&dir.path().join("code.lrn"))?;
        Ok(())
    }

    #[test]
    fn test_malformed_file() -> Fallible<()> {
        let dir = create_tmp_copy_of_test_directory()?;
        let path = dir.path().join("broken.lrn");
        std::fs::write(&path, "> lonely question\n")?;
        assert!(check_quiz(dir.path()).is_err());
        Ok(())
    }

    #[test]
    fn test_duplicates() -> Fallible<()> {
        let content = "> a\n< 1\n> b\n< 2\n> a\n< 3\n";
        let problems = parse_quiz(content, &PathBuf::from("dup.lrn"), &[])?;
        assert_eq!(duplicates(&problems), vec![(0, 2)]);
        Ok(())
    }
}

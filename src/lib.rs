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

//! lrn: a terminal quiz drill. Answers are typed in full and graded line by
//! line against the stored solution; missed problems come back until they
//! are answered right enough times.

pub mod analysis;
pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod db;
pub mod error;
pub mod parser;
pub mod scheduler;
pub mod types;

#[cfg(test)]
mod helper;

pub use analysis::options::Options;
pub use analysis::verify::Mark;
pub use analysis::verify::Mistake;
pub use analysis::verify::MistakeKind;
pub use analysis::verify::Verification;
pub use analysis::verify::check;
pub use error::ErrorReport;
pub use error::Fallible;
pub use error::fail;
pub use scheduler::Session;
pub use types::problem::Problem;

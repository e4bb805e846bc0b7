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

use bitflags::bitflags;

bitflags! {
    /// Switches that change how an answer is compared. They compose freely.
    #[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
    pub struct Options: u8 {
        /// Compare case-folded text.
        const CASE_INSENSITIVE = 1;
        /// Ignore punctuation tokens.
        const PUNCT_INSENSITIVE = 1 << 1;
        /// Compare sets of phrases instead of aligned lines.
        const TOTAL_RECALL = 1 << 2;
    }
}

impl Options {
    pub fn fold_case(self) -> bool {
        self.contains(Options::CASE_INSENSITIVE)
    }

    pub fn skip_punct(self) -> bool {
        self.contains(Options::PUNCT_INSENSITIVE)
    }

    pub fn total_recall(self) -> bool {
        self.contains(Options::TOTAL_RECALL)
    }
}

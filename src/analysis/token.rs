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

const SPACES: [char; 2] = [' ', '\t'];

const PUNCTUATION: [char; 20] = [
    ',', '.', '?', '!', '-', ':', ';', '_', '(', ')', '[', ']', '<', '>', '{', '}', '+', '=', '*',
    '/',
];

/// Punctuation that separates phrases.
const DELIMITERS: [char; 6] = [',', '.', '?', '!', ':', ';'];

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TokenKind {
    Word,
    Space,
    Punct,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Offset from the start of the line, in chars.
    pub position: usize,
    /// Set on punctuation that separates phrases.
    pub delim: bool,
}

impl Token {
    /// Length in chars.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Split a line into words, single spaces, and single punctuation marks.
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut position = 0;
    for c in line.chars() {
        let kind = classify(c);
        if kind == TokenKind::Word {
            word.push(c);
            continue;
        }
        flush_word(&mut tokens, &mut word, &mut position);
        tokens.push(Token {
            kind,
            text: c.to_string(),
            position,
            delim: DELIMITERS.contains(&c),
        });
        position += 1;
    }
    flush_word(&mut tokens, &mut word, &mut position);
    tokens
}

fn classify(c: char) -> TokenKind {
    if SPACES.contains(&c) {
        TokenKind::Space
    } else if PUNCTUATION.contains(&c) {
        TokenKind::Punct
    } else {
        TokenKind::Word
    }
}

fn flush_word(tokens: &mut Vec<Token>, word: &mut String, position: &mut usize) {
    if word.is_empty() {
        return;
    }
    let token = Token {
        kind: TokenKind::Word,
        text: std::mem::take(word),
        position: *position,
        delim: false,
    };
    *position += token.char_len();
    tokens.push(token);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(tokens: &[Token]) -> Vec<(TokenKind, &str, usize)> {
        tokens
            .iter()
            .map(|t| (t.kind, t.text.as_str(), t.position))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_words_and_spaces() {
        let tokens = tokenize("Привет  мир");
        assert_eq!(
            summary(&tokens),
            vec![
                (TokenKind::Word, "Привет", 0),
                (TokenKind::Space, " ", 6),
                (TokenKind::Space, " ", 7),
                (TokenKind::Word, "мир", 8),
            ]
        );
    }

    #[test]
    fn test_punctuation_never_merges() {
        let tokens = tokenize("wait...!");
        assert_eq!(
            summary(&tokens),
            vec![
                (TokenKind::Word, "wait", 0),
                (TokenKind::Punct, ".", 4),
                (TokenKind::Punct, ".", 5),
                (TokenKind::Punct, ".", 6),
                (TokenKind::Punct, "!", 7),
            ]
        );
    }

    #[test]
    fn test_delimiter_flag() {
        let tokens = tokenize("a-b, c");
        let delims: Vec<bool> = tokens.iter().map(|t| t.delim).collect();
        assert_eq!(delims, vec![false, false, false, true, false, false]);
        assert_eq!(tokens[1].kind, TokenKind::Punct);
    }

    #[test]
    fn test_tab_is_space() {
        let tokens = tokenize("\tputs(str);");
        assert_eq!(tokens[0].kind, TokenKind::Space);
        assert_eq!(tokens[1].text, "puts");
        assert_eq!(tokens[1].position, 1);
        assert_eq!(tokens[2].text, "(");
        assert_eq!(tokens[3].text, "str");
        assert_eq!(tokens[3].position, 6);
    }

    #[test]
    fn test_positions_count_chars_not_bytes() {
        let tokens = tokenize("日本語 text");
        assert_eq!(tokens[2].text, "text");
        assert_eq!(tokens[2].position, 4);
    }
}

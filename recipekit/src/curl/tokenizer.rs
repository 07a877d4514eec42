const QUOTE_CHARS: [char; 2] = ['\'', '"'];

/// Splits a cURL command into shell-like words.
///
/// Spaces and backslashes separate words unless a quoted string is still open. A string counts
/// as closed once the word being built ends with a quote character, which is how adjacent
/// quoted segments such as `'Bearer '"$KEY"''` end up in a single word. Quotes are stripped
/// from the ends of quoted words. There is no escaping, and an unmatched quote simply swallows
/// the rest of the input.
///
/// Line continuations leave empty or backslash/newline-led fragments behind which are dropped.
pub fn tokenize(command: &str) -> Vec<String> {
    let mut scanner = Scanner::default();
    for c in command.trim().chars() {
        scanner.push(c);
    }
    scanner.finish()
}

#[derive(Default)]
struct Scanner {
    words: Vec<String>,
    builder: String,
    in_string: bool,
}

impl Scanner {
    fn push(&mut self, c: char) {
        if c == ' ' || c == '\\' {
            if self.builder.is_empty() {
                return;
            }
            if self.in_string && !self.builder.ends_with(QUOTE_CHARS) {
                self.builder.push(c);
                return;
            }
            self.end_word();
        } else {
            if QUOTE_CHARS.contains(&c) {
                self.in_string = true;
            }
            self.builder.push(c);
        }
    }

    fn end_word(&mut self) {
        let builder = std::mem::take(&mut self.builder);
        let word = builder.trim();
        let word = if std::mem::take(&mut self.in_string) {
            strip_quotes(word)
        } else {
            word
        };
        if !word.is_empty() && !word.starts_with(['\\', '\n']) {
            self.words.push(word.to_string());
        }
    }

    fn finish(mut self) -> Vec<String> {
        if !self.builder.is_empty() {
            self.end_word();
        }
        self.words
    }
}

fn strip_quotes(word: &str) -> &str {
    let word = word.strip_prefix(QUOTE_CHARS).unwrap_or(word);
    word.strip_suffix(QUOTE_CHARS).unwrap_or(word)
}

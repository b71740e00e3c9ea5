// src/core/tokenize.rs

/// One run of input text: either a literal separator passed through to
/// the output verbatim, or a word to be descrambled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Separator(String),
    Word(String),
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Splits text into alternating separator and word runs. A word run is a
/// maximal sequence of alphanumeric or underscore characters; everything
/// else, punctuation and whitespace included, is preserved as-is.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut run = String::new();
    let mut in_word = false;
    for c in text.chars() {
        let word_char = is_word_char(c);
        if !run.is_empty() && word_char != in_word {
            tokens.push(finish_run(std::mem::take(&mut run), in_word));
        }
        in_word = word_char;
        run.push(c);
    }
    if !run.is_empty() {
        tokens.push(finish_run(run, in_word));
    }
    tokens
}

fn finish_run(run: String, in_word: bool) -> Token {
    if in_word {
        Token::Word(run)
    } else {
        Token::Separator(run)
    }
}

/// Rebuilds the output text, substituting one entry of `chosen` per word
/// token in order. `chosen` is expected to hold exactly one word per
/// `Token::Word`; a short list leaves the remaining positions empty.
pub fn reassemble(tokens: &[Token], chosen: &[String]) -> String {
    let mut out = String::new();
    let mut next = chosen.iter();
    for token in tokens {
        match token {
            Token::Separator(s) => out.push_str(s),
            Token::Word(_) => {
                if let Some(word) = next.next() {
                    out.push_str(word);
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternates_separator_and_word_runs() {
        assert_eq!(
            tokenize("Hi, there!"),
            vec![
                Token::Word("Hi".into()),
                Token::Separator(", ".into()),
                Token::Word("there".into()),
                Token::Separator("!".into()),
            ]
        );
    }

    #[test]
    fn underscores_and_digits_are_word_characters() {
        assert_eq!(
            tokenize("a_b2 c"),
            vec![
                Token::Word("a_b2".into()),
                Token::Separator(" ".into()),
                Token::Word("c".into()),
            ]
        );
    }

    #[test]
    fn pure_punctuation_is_one_separator() {
        assert_eq!(tokenize("?! .."), vec![Token::Separator("?! ..".into())]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn reassembly_substitutes_words_and_keeps_separators() {
        let tokens = tokenize("taht, si");
        let chosen = vec!["that".to_string(), "is".to_string()];
        assert_eq!(reassemble(&tokens, &chosen), "that, is");
    }

    #[test]
    fn reassembly_round_trips_with_original_words() {
        let text = "no scrambling here, honest!";
        let tokens = tokenize(text);
        let words: Vec<String> = tokens
            .iter()
            .filter_map(|t| match t {
                Token::Word(w) => Some(w.clone()),
                Token::Separator(_) => None,
            })
            .collect();
        assert_eq!(reassemble(&tokens, &words), text);
    }
}

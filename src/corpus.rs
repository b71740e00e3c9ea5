// File: src/corpus.rs
use std::collections::HashMap;
use std::io::{self, BufRead};

use tracing::debug;

use crate::core::tokenize::{tokenize, Token};
use crate::core::types::{END, START};

/// Accumulates (previous word, next word) counts from corpus text, one
/// document at a time. The result feeds either persisted store form.
#[derive(Debug, Default)]
pub struct BigramCounter {
    counts: HashMap<(String, String), u64>,
}

impl BigramCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one sentence: `<START>` precedes the first word, `<END>`
    /// follows the last, words are lowercased in between. A sentence
    /// with no word runs contributes nothing.
    pub fn add_sentence(&mut self, sentence: &str) {
        let mut prev = START.to_string();
        let mut saw_word = false;
        for token in tokenize(sentence) {
            if let Token::Word(word) = token {
                let word = word.to_lowercase();
                *self.counts.entry((prev.clone(), word.clone())).or_insert(0) += 1;
                prev = word;
                saw_word = true;
            }
        }
        if saw_word {
            *self.counts.entry((prev, END.to_string())).or_insert(0) += 1;
        }
    }

    /// Plain text: every non-empty line is a paragraph, split into
    /// sentences on `.`.
    pub fn add_plain_document<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for line in reader.lines() {
            for sentence in line?.split('.') {
                self.add_sentence(sentence.trim());
            }
        }
        Ok(())
    }

    /// iWeb corpus sample lines (corpusdata.org): the `@ @ ... @`
    /// redaction marker is dropped, single-character markup tags are
    /// split out, and only text between a `<p>` tag and the next tag is
    /// kept as paragraph content.
    pub fn add_iweb_document<R: BufRead>(&mut self, reader: R) -> io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let line = line.replace("@ @ @ @ @ @ @ @ @ @", "");
            let mut in_paragraph = false;
            for segment in split_markup(&line) {
                match segment {
                    Segment::Tag(tag) => in_paragraph = tag == "<p>",
                    Segment::Text(text) if in_paragraph => {
                        for sentence in text.split('.') {
                            self.add_sentence(sentence.trim());
                        }
                    }
                    Segment::Text(_) => {}
                }
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn into_counts(self) -> HashMap<(String, String), u64> {
        debug!(bigrams = self.counts.len(), "corpus counting finished");
        self.counts
    }
}

/// A run of an iWeb line: either a single-character markup tag such as
/// `<p>` or `<h>`, or the text between tags.
#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Tag(&'a str),
    Text(&'a str),
}

fn split_markup(line: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while let Some(offset) = line[pos..].find('<') {
        let open = pos + offset;
        let mut inner = line[open + 1..].chars();
        match inner.next() {
            Some(c) if line[open + 1 + c.len_utf8()..].starts_with('>') => {
                let close = open + 1 + c.len_utf8() + 1;
                if open > start {
                    segments.push(Segment::Text(&line[start..open]));
                }
                segments.push(Segment::Tag(&line[open..close]));
                start = close;
                pos = close;
            }
            _ => pos = open + 1,
        }
    }
    if start < line.len() {
        segments.push(Segment::Text(&line[start..]));
    }
    segments
}

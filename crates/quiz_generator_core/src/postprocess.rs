//! crates/quiz_generator_core/src/postprocess.rs
//!
//! Order-only transforms applied to model output after it has been parsed.
//! Neither transform changes content; both only permute.

use std::sync::LazyLock;

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::domain::Question;

/// Shuffles each question's answers independently.
///
/// Uses a uniform Fisher-Yates shuffle, so every ordering is equally likely and
/// each `is_correct` flag stays attached to its own answer.
pub fn shuffle_answers<R: Rng + ?Sized>(questions: &mut [Question], rng: &mut R) {
    for question in questions.iter_mut() {
        question.answers.shuffle(rng);
    }
}

//=========================================================================================
// Markdown Choice Shuffling
//=========================================================================================

static QUESTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\d+[.)]\s+\S").expect("question line pattern is valid"));

static CHOICE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*[A-Za-z][.)]\s+)(\S.*?)(\r?)$").expect("choice line pattern is valid")
});

/// Shuffles lettered choices under numbered questions in a markdown document.
///
/// A block is a numbered line (`1. ...` or `1) ...`) directly followed by two
/// or more lettered lines (`A) ...`, `b. ...`). Inside a block the choice
/// bodies are permuted while the letter labels keep their order. Everything
/// else, including fenced code, is returned byte-for-byte.
pub fn shuffle_markdown_choices<R: Rng + ?Sized>(markdown: &str, rng: &mut R) -> String {
    let mut lines: Vec<String> = markdown.split('\n').map(str::to_owned).collect();
    // The marker character and run length of the fence we are inside, if any.
    let mut open_fence: Option<(char, usize)> = None;
    let mut index = 0;

    while index < lines.len() {
        if let Some((marker, run, rest)) = fence_run(&lines[index]) {
            match open_fence {
                None => open_fence = Some((marker, run)),
                Some((open, open_run))
                    if marker == open && run >= open_run && rest.trim().is_empty() =>
                {
                    open_fence = None;
                }
                Some(_) => {}
            }
            index += 1;
            continue;
        }
        if open_fence.is_some() || !QUESTION_LINE.is_match(&lines[index]) {
            index += 1;
            continue;
        }

        let start = index + 1;
        let mut end = start;
        while end < lines.len() && CHOICE_LINE.is_match(&lines[end]) {
            end += 1;
        }
        if end - start >= 2 {
            shuffle_choice_bodies(&mut lines[start..end], rng);
        }
        index = end.max(index + 1);
    }

    lines.join("\n")
}

/// Splits a code fence line into its marker, run length and trailing text.
fn fence_run(line: &str) -> Option<(char, usize, &str)> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let run = trimmed.chars().take_while(|c| *c == marker).count();
    (run >= 3).then(|| (marker, run, &trimmed[run..]))
}

fn shuffle_choice_bodies<R: Rng + ?Sized>(block: &mut [String], rng: &mut R) {
    let mut parts: Vec<(String, String, String)> = Vec::with_capacity(block.len());
    for line in block.iter() {
        match CHOICE_LINE.captures(line) {
            Some(caps) => parts.push((
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].to_string(),
            )),
            // Every line was matched by the caller.
            None => return,
        }
    }

    let mut bodies: Vec<String> = parts.iter().map(|(_, body, _)| body.clone()).collect();
    bodies.shuffle(rng);

    for (line, ((label, _, ending), body)) in block.iter_mut().zip(parts.into_iter().zip(bodies)) {
        *line = format!("{}{}{}", label, body, ending);
    }
}

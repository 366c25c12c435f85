//! Cleanup pass over raw model output. Local completion models routinely
//! leak their own scaffolding back at us: markdown fences around the code,
//! an echo of the prompt, template tokens, or a re-statement of the code
//! which already sits below the cursor. The sanitizer cuts all of that away
//! and hands back just the insertion text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref CODE_FENCE: Regex =
        Regex::new(r"(?s)^\s*```[^\n]*\n(.*?)\n?```\s*$").expect("regex to compile");
}

/// Reduces a raw generation to the text worth inserting at the cursor.
///
/// The stages run in a fixed order and every later stage works on the output
/// of the one before it: fence unwrap, prompt-echo strip, stop-token strip,
/// suffix-overlap trim, final trim. The pipeline is total; any input string
/// produces an output string.
pub struct ResponseSanitizer {
    strip_tokens: &'static [&'static str],
}

impl ResponseSanitizer {
    pub fn new(strip_tokens: &'static [&'static str]) -> Self {
        Self { strip_tokens }
    }

    pub fn sanitize(&self, response: &str, prompt: &str, suffix: &str) -> String {
        let response = unwrap_code_fence(response);
        let response = strip_prompt_echo(response, prompt);
        let response = self.strip_stop_tokens(response);
        let response = trim_suffix_overlap(response, suffix);
        response.trim().to_owned()
    }

    fn strip_stop_tokens(&self, mut response: String) -> String {
        for token in self.strip_tokens {
            if let Some(position) = response.find(token) {
                response.truncate(position);
                let trimmed_length = response.trim_end().len();
                response.truncate(trimmed_length);
            }
        }
        response
    }
}

/// Models which were instructed not to fence their output fence it anyway.
/// When the whole response is one fenced block we keep only the body.
fn unwrap_code_fence(response: &str) -> String {
    match CODE_FENCE.captures(response) {
        Some(captures) => captures[1].to_owned(),
        None => response.to_owned(),
    }
}

fn strip_prompt_echo(response: String, prompt: &str) -> String {
    if prompt.is_empty() {
        return response;
    }
    // last occurrence: a response which repeats the prompt still only has
    // new text after the final copy
    match response.rfind(prompt) {
        Some(position) => response[position + prompt.len()..].to_owned(),
        None => response,
    }
}

fn trim_suffix_overlap(mut response: String, suffix: &str) -> String {
    let first_suffix_line = suffix
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty());
    let suffix_line = match first_suffix_line {
        Some(line) => line,
        None => return response,
    };
    if let Some(position) = response.find(suffix_line) {
        // a completion which starts with the suffix line is kept whole, the
        // cut only applies past the first character
        if position > 0 {
            response.truncate(position);
        }
    }
    response
}

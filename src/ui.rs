// UI layer: operator prompts, pacing, and the terminal output helpers the
// migration stages print through. Prompts and pauses sit behind small
// traits so the pipeline can be driven without a terminal.

use crate::stage::StageCounts;
use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::thread;
use std::time::Duration;

/// Answers yes/no questions before anything destructive happens.
pub trait Operator {
    fn confirm(&mut self, prompt: &str) -> Result<bool>;
}

/// Only a lone `y` (any case, surrounding whitespace ignored) counts as yes.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}

/// Whether `err` came from the operator pressing Ctrl-C. dialoguer hands
/// that back from a prompt as an `Interrupted` I/O error.
pub fn is_interrupt(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        cause
            .downcast_ref::<io::Error>()
            .map_or(false, |e| e.kind() == io::ErrorKind::Interrupted)
    })
}

/// Asks on the terminal. The answer is free text rather than a y/n keypress
/// so an accidental Enter never confirms.
pub struct TerminalOperator;

impl Operator for TerminalOperator {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        println!();
        let answer: String = Input::new()
            .with_prompt(format!("{} {} (y/n)", "⚠".yellow(), prompt))
            .allow_empty(true)
            .interact_text()?;
        Ok(is_affirmative(&answer))
    }
}

/// Waits between requests to stay under the service's rate limit.
pub trait Pause {
    fn pause(&mut self, duration: Duration);
}

pub struct ThreadPause;

impl Pause for ThreadPause {
    fn pause(&mut self, duration: Duration) {
        thread::sleep(duration);
    }
}

/// Spinner shown while a blocking request is in flight. Callers finish it
/// with `finish_and_clear` once the response is in.
pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    spinner.set_style(style);
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

pub fn rule() {
    println!("{}", "=".repeat(60));
}

pub fn success(message: &str) {
    println!("{} {}", "✔".green(), message);
}

pub fn failure(message: &str) {
    println!("{} {}", "✘".red(), message);
}

pub fn notice(message: &str) {
    println!("{} {}", "⚠".yellow(), message);
}

pub fn print_banner(base_url: &str) {
    rule();
    println!("   {}", "MOCKAPI UPLOAD TOOL".bold());
    rule();
    println!("\nEndpoint: {}\n", base_url);
}

/// One line per stage in key order, e.g. `   Stage 1: 12 questions`.
pub fn print_stage_counts(counts: &StageCounts) {
    for (stage, count) in counts.iter() {
        println!("   Stage {}: {} questions", stage, count);
    }
}

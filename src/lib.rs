// Library root
// -----------
// This crate exposes the migration as a library; the binary (`main.rs`)
// only wires real collaborators into it and owns process-level concerns.
//
// Module responsibilities:
// - `config`: endpoint, template path and pacing.
// - `error`: the failure taxonomy shared by every stage.
// - `question`: typed question records and the template loader.
// - `stage`: per-stage tallies used for the breakdowns.
// - `api`: the `QuestionStore` seam and its blocking HTTP implementation.
// - `ui`: prompts, pacing and terminal output helpers.
// - `migrate`: the stages and the orchestrator that chains them.
//
// Keeping the HTTP client and the terminal behind traits is what lets the
// integration tests replay a whole run against an in-memory collection.
pub mod api;
pub mod config;
pub mod error;
pub mod migrate;
pub mod question;
pub mod stage;
pub mod ui;

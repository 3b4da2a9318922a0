// The migration pipeline: load the template, show what is about to be sent,
// optionally clear the collection, upload every question and read the
// collection back. Stages never propagate request failures; they print a
// diagnostic and keep going. Only prompt failures (closed stdin and the
// like) escape, through `anyhow`.

use crate::api::QuestionStore;
use crate::config::Config;
use crate::error::MigrateError;
use crate::question::{load_questions, Question};
use crate::stage::StageCounts;
use crate::ui::{self, Operator, Pause};
use anyhow::Result;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

/// Tally of one bulk upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl UploadSummary {
    /// Percentage of successful creates; 0.0 when nothing was attempted.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.succeeded as f64 / self.total as f64 * 100.0
    }

    fn print(&self) {
        println!();
        ui::rule();
        println!("\nRESULTS:");
        println!("   Succeeded: {}/{}", self.succeeded, self.total);
        println!("   Failed: {}/{}", self.failed, self.total);
        println!("   Success rate: {:.1}%", self.success_rate());
    }
}

/// What the purge stage ended up doing.
#[derive(Debug)]
pub enum PurgeOutcome {
    /// The operator declined; no request was sent.
    Skipped,
    /// The collection could not be listed, so nothing was deleted.
    ListFailed(MigrateError),
    Completed {
        listed: usize,
        deleted: usize,
        failed: usize,
    },
}

/// How a full run ended.
#[derive(Debug)]
pub enum RunOutcome {
    /// The template was missing, unreadable, invalid or empty.
    NothingToUpload,
    /// The operator declined the main confirmation.
    Cancelled,
    Finished {
        purge: PurgeOutcome,
        upload: UploadSummary,
        /// `None` when the read-back failed.
        verified: Option<StageCounts>,
    },
}

/// Load the template, reporting the outcome. Any failure is printed and
/// yields an empty list, which the caller treats as "nothing to do".
pub fn load_template(path: &Path) -> Vec<Question> {
    match load_questions(path) {
        Ok(questions) => {
            ui::success(&format!(
                "Loaded {} questions from {}",
                questions.len(),
                path.display()
            ));
            questions
        }
        Err(err) => {
            ui::failure(&err.to_string());
            Vec::new()
        }
    }
}

/// Create one question remotely. Returns whether the service accepted it.
pub fn upload_question<S>(store: &S, question: &Question) -> bool
where
    S: QuestionStore + ?Sized,
{
    let label = question.label();
    match store.create(question) {
        Ok(()) => {
            ui::success(&format!("Uploaded {}", label));
            true
        }
        Err(MigrateError::HttpStatus { status, body }) => {
            ui::failure(&format!("Failed to upload {}: {}", label, status));
            println!("   Response: {}", body);
            false
        }
        Err(err) => {
            ui::failure(&format!("Failed to upload {}: {}", label, err));
            false
        }
    }
}

/// Create every question in order, pausing `delay` between two requests
/// (never after the last one).
pub fn upload_all<S, P>(
    store: &S,
    questions: &[Question],
    pause: &mut P,
    delay: Duration,
) -> UploadSummary
where
    S: QuestionStore + ?Sized,
    P: Pause + ?Sized,
{
    let total = questions.len();
    let mut summary = UploadSummary {
        total,
        ..UploadSummary::default()
    };

    println!("\nStarting upload of {} questions...", total);
    ui::rule();
    tracing::info!(total, "upload started");

    for (i, question) in questions.iter().enumerate() {
        print!("\n[{}/{}] ", i + 1, total);
        let _ = std::io::stdout().flush();

        if upload_question(store, question) {
            summary.succeeded += 1;
        } else {
            summary.failed += 1;
        }

        if i + 1 < total {
            pause.pause(delay);
        }
    }

    tracing::info!(succeeded = summary.succeeded, failed = summary.failed, "upload finished");
    summary.print();
    summary
}

/// Ask whether to clear the collection and, if so, delete every listed
/// record, pausing `delay` after each attempt.
///
/// A failed delete (bad status, connection error, record without id) is
/// counted and the loop moves on to the next record.
pub fn purge<S, O, P>(
    store: &S,
    operator: &mut O,
    pause: &mut P,
    delay: Duration,
) -> Result<PurgeOutcome>
where
    S: QuestionStore + ?Sized,
    O: Operator + ?Sized,
    P: Pause + ?Sized,
{
    if !operator.confirm("Delete all existing remote records first?")? {
        println!("Skipping deletion of existing data.");
        return Ok(PurgeOutcome::Skipped);
    }

    let listing = ui::spinner("Fetching existing records...");
    let listed = store.list();
    listing.finish_and_clear();

    let records = match listed {
        Ok(records) => records,
        Err(err) => {
            ui::failure(&format!("Could not fetch existing records: {}", err));
            return Ok(PurgeOutcome::ListFailed(err));
        }
    };

    println!("Deleting {} existing records...", records.len());
    tracing::info!(count = records.len(), "purge started");
    let mut deleted = 0;
    let mut failed = 0;

    for record in &records {
        match record.id_segment() {
            Some(id) => match store.delete(&id) {
                Ok(()) => {
                    ui::success(&format!("Deleted record ID: {}", id));
                    deleted += 1;
                }
                Err(MigrateError::HttpStatus { status, .. }) => {
                    ui::failure(&format!("Failed to delete record ID: {} ({})", id, status));
                    failed += 1;
                }
                Err(err) => {
                    ui::failure(&format!("Failed to delete record ID: {}: {}", id, err));
                    failed += 1;
                }
            },
            None => {
                tracing::warn!(fields = ?record.fields, "listed record has no usable id");
                ui::failure("Listed record has no id, skipped");
                failed += 1;
            }
        }
        pause.pause(delay);
    }

    if failed == 0 {
        ui::success("All existing records deleted.");
    } else {
        ui::notice(&format!(
            "{} of {} existing records could not be deleted.",
            failed,
            records.len()
        ));
    }

    Ok(PurgeOutcome::Completed {
        listed: records.len(),
        deleted,
        failed,
    })
}

/// Read the collection back and print how many questions each stage has.
pub fn verify<S>(store: &S) -> Option<StageCounts>
where
    S: QuestionStore + ?Sized,
{
    let listing = ui::spinner("Fetching remote records...");
    let listed = store.list();
    listing.finish_and_clear();

    match listed {
        Ok(records) => {
            ui::success(&format!("{} questions are now on the server", records.len()));
            let counts = StageCounts::from_stages(records.iter().map(|r| r.stage.as_ref()));
            println!("\nBreakdown by stage:");
            ui::print_stage_counts(&counts);
            Some(counts)
        }
        Err(err) => {
            ui::failure(&format!("Could not verify: {}", err));
            None
        }
    }
}

/// The whole run, wired to its collaborators. Every step gates the next;
/// there is no way back to an earlier step.
pub struct Migration<S, O, P> {
    config: Config,
    store: S,
    operator: O,
    pause: P,
}

impl<S, O, P> Migration<S, O, P>
where
    S: QuestionStore,
    O: Operator,
    P: Pause,
{
    pub fn new(config: Config, store: S, operator: O, pause: P) -> Self {
        Migration {
            config,
            store,
            operator,
            pause,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn pause(&self) -> &P {
        &self.pause
    }

    pub fn run(&mut self) -> Result<RunOutcome> {
        ui::print_banner(&self.config.base_url);

        let questions = load_template(&self.config.template_path);
        if questions.is_empty() {
            println!("No data to upload. Exiting...");
            return Ok(RunOutcome::NothingToUpload);
        }

        let counts = StageCounts::from_stages(questions.iter().map(|q| Some(&q.stage)));
        println!("\nQuestion breakdown:");
        ui::print_stage_counts(&counts);
        println!("   Total: {} questions", questions.len());

        if !self.operator.confirm("Continue with the upload?")? {
            println!("Upload cancelled.");
            return Ok(RunOutcome::Cancelled);
        }

        let purge = purge(
            &self.store,
            &mut self.operator,
            &mut self.pause,
            self.config.delete_delay,
        )?;

        let upload = upload_all(
            &self.store,
            &questions,
            &mut self.pause,
            self.config.create_delay,
        );

        println!("\nChecking uploaded data...");
        let verified = verify(&self.store);

        println!("\nDone!");
        Ok(RunOutcome::Finished {
            purge,
            upload,
            verified,
        })
    }
}

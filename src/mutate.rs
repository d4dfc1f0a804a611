//! Guarded bulk deletion of a [`MatchSet`].

use std::io::{self, BufRead, Write};

use k8s_openapi::apimachinery::pkg::apis::meta::v1::APIResource;
use tracing::{debug, warn};

use crate::{
    error::Result,
    scope::{ResourceAccess, Scope, ScopedAccessor},
    select::MatchSet,
};

/// Supplies the operator's yes/no answer to the delete prompt.
pub trait Confirm {
    /// Read one answer. Anything but `y`/`Y` must return `false`.
    fn confirm(&mut self) -> io::Result<bool>;
}

/// Reads a single line from `R` and accepts only `y`, case-insensitively.
pub struct LineConfirm<R> {
    reader: R,
}

impl<R: BufRead> LineConfirm<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> Confirm for LineConfirm<R> {
    fn confirm(&mut self) -> io::Result<bool> {
        let mut answer = String::new();
        // EOF leaves `answer` empty, which is a refusal.
        self.reader.read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}

impl<F: FnMut() -> io::Result<bool>> Confirm for F {
    fn confirm(&mut self) -> io::Result<bool> {
        self()
    }
}

/// How a delete run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Nothing matched; no prompt, no deletes.
    NoMatches,
    /// The operator declined; no deletes.
    Aborted,
    /// Every matched object was attempted.
    Done,
}

/// Per-invocation delete accounting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub completion: Completion,
    pub deleted: usize,
    pub failed: usize,
}

impl MutationOutcome {
    fn finished(completion: Completion) -> Self {
        Self {
            completion,
            deleted: 0,
            failed: 0,
        }
    }
}

/// Present `matched`, ask for confirmation unless `skip_confirm`, then delete every item.
///
/// Each item gets its own accessor scoped to the item's namespace (or the cluster),
/// since objects gathered across all namespaces cannot be addressed through one
/// shared accessor. A failed delete is reported on `err` and counted; it never
/// stops the batch and is never retried.
///
/// Only failures writing to `out`/`err` or reading the answer are returned as errors.
/// A write failure while deleting is reported after every item has been attempted.
pub async fn execute<A, C, W, E>(
    access: &A,
    api_resource: &APIResource,
    matched: &MatchSet,
    confirm: &mut C,
    skip_confirm: bool,
    out: &mut W,
    err: &mut E,
) -> Result<MutationOutcome>
where
    A: ResourceAccess,
    C: Confirm,
    W: Write,
    E: Write,
{
    if matched.is_empty() {
        writeln!(out, "No resources matched your pattern.")?;
        return Ok(MutationOutcome::finished(Completion::NoMatches));
    }

    writeln!(
        out,
        "The following {} {} match your regex:",
        matched.len(),
        api_resource.name
    )?;
    for target in matched {
        writeln!(out, "  {target}")?;
    }

    if !skip_confirm {
        write!(out, "\nDelete all {} resources? [y/N]: ", matched.len())?;
        out.flush()?;
        if !confirm.confirm()? {
            writeln!(out, "Aborted.")?;
            return Ok(MutationOutcome::finished(Completion::Aborted));
        }
    }

    // A broken output stream must not cut the batch short; the first write error
    // is returned once every item has been attempted.
    let mut write_error = None;
    let mut outcome = MutationOutcome::finished(Completion::Done);
    for target in matched {
        let accessor = access.accessor(api_resource, &Scope::for_ref(target));
        debug!(%target, "deleting");
        let written = match accessor.delete(&target.name).await {
            Ok(()) => {
                outcome.deleted += 1;
                writeln!(out, "Deleted {target}")
            }
            Err(error) => {
                outcome.failed += 1;
                warn!(%target, %error, "delete failed");
                writeln!(err, "Failed to delete {target}: {error}")
            }
        };
        if let Err(error) = written {
            write_error.get_or_insert(error);
        }
    }

    let summary = writeln!(
        out,
        "\n✅ {} deleted, ❌ {} failed.",
        outcome.deleted, outcome.failed
    );
    if let Some(error) = write_error {
        warn!(
            deleted = outcome.deleted,
            failed = outcome.failed,
            "batch finished with unwritable output"
        );
        return Err(error.into());
    }
    summary?;
    Ok(outcome)
}

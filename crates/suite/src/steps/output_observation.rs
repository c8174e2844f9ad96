//! Mines the suite's captured output log for the runtime/samples/notes the
//! subject reported about the timed invocation.

use async_trait::async_trait;

use crate::{context::CaseContext, outcome::Outcome, step::Step};

/// Extracts `{runtime_ns, samples, notes}` from the subject's `TEST::Complete`
/// line, grounded on the original's `OutputObservation`. Runs after
/// [`crate::steps::Invocation`], whose wall-clock measurement this overwrites
/// with the subject's own more precise figure when one was reported.
pub struct OutputObservation;

#[async_trait]
impl Step for OutputObservation {
    fn name(&self) -> &'static str {
        "output-observation"
    }

    async fn run(&mut self, ctx: &mut CaseContext) -> Outcome {
        let hits = ctx.suite.progress.grep(&ctx.suite.patterns.complete);
        let Some(line) = hits.last() else {
            return Outcome::warning("no test-complete marker found in captured output");
        };
        let Some(caps) = ctx.suite.patterns.complete.captures(line) else {
            return Outcome::warning("test-complete marker did not match its own pattern");
        };

        match caps["runtime_ns"].parse::<f64>() {
            Ok(ns) => ctx.runtime_ns = Some(ns),
            Err(err) => {
                return Outcome::warning(format!("unparsable runtime in '{line}': {err}"));
            }
        }
        if let Some(samples) = caps.name("samples").and_then(|m| m.as_str().parse().ok()) {
            ctx.samples = Some(samples);
        }
        if let Some(notes) = caps.name("notes").and_then(|m| m.as_str().parse().ok()) {
            ctx.notes = Some(notes);
        }

        Outcome::green("runtime/samples/notes extracted from subject output")
    }
}

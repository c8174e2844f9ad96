//! Builds the ordered [`StepGraph`] for one testcase from its resolved
//! [`testspec::TestSpec`], grounded on the original's `ExeCliMould`
//! (`LV2PluginMould` is recognized but left unimplemented, same as upstream).

use testspec::{TestKind, TestSpec};

use crate::{
    error::{Error, Result},
    step::StepGraph,
    steps,
};

/// Wire up the step graph appropriate for `spec`'s [`TestKind`].
pub fn materialize(spec: &TestSpec) -> Result<StepGraph> {
    match spec.kind {
        TestKind::Cli => Ok(cli_graph(spec)),
        TestKind::Lv2 => Err(Error::UnsupportedKind("LV2".to_string())),
    }
}

fn cli_graph(spec: &TestSpec) -> StepGraph {
    let mut graph = StepGraph::new();
    graph.push(Box::new(steps::Launcher));
    graph.push_optional(spec.setup_script.is_some(), Box::new(steps::PrepareScript));
    graph.push(Box::new(steps::Invocation));
    graph.push(Box::new(steps::OutputObservation));
    graph.push_optional(spec.capture_sound, Box::new(steps::SoundObservation));
    graph.push_optional(spec.capture_sound, Box::new(steps::SoundJudgement));
    graph.push(Box::new(steps::TimingObservation));
    graph.push(Box::new(steps::TimingJudgement));
    graph.push(Box::new(steps::Summary));
    graph.push(Box::new(steps::Cleanup));
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_subject(dir: &std::path::Path) -> std::path::PathBuf {
        let subject = dir.join("subject.sh");
        fs::write(&subject, "#!/bin/sh\necho ready\n").unwrap();
        subject
    }

    #[test]
    fn cli_graph_includes_sound_steps_only_when_capturing() {
        let dir = tempfile::tempdir().unwrap();
        let subject = write_subject(dir.path());
        let spec_path = dir.path().join("case.test");
        fs::write(
            &spec_path,
            format!(
                "Test.type = CLI\nTest.subject = {}\n",
                subject.display()
            ),
        )
        .unwrap();
        let spec = TestSpec::load(&spec_path, "case", &testspec::Spec::default(), std::time::Duration::from_secs(10)).unwrap();
        let graph = materialize(&spec).unwrap();
        // launcher, invocation, output-observation, timing-observation,
        // timing-judgement, summary, cleanup: 7 steps when sound isn't
        // captured and there's no setup script.
        assert_eq!(graph.len(), 7);
    }

    #[test]
    fn cli_graph_adds_sound_steps_when_capturing() {
        let dir = tempfile::tempdir().unwrap();
        let subject = write_subject(dir.path());
        let baseline = dir.path().join("baseline.wav");
        fs::write(&baseline, b"").unwrap();
        let spec_path = dir.path().join("case.test");
        fs::write(
            &spec_path,
            format!(
                "Test.type = CLI\nTest.subject = {}\nTest.captureSound = yes\nTest.baseline = {}\n",
                subject.display(),
                baseline.display()
            ),
        )
        .unwrap();
        let spec = TestSpec::load(&spec_path, "case", &testspec::Spec::default(), std::time::Duration::from_secs(10)).unwrap();
        let graph = materialize(&spec).unwrap();
        assert_eq!(graph.len(), 9);
    }
}

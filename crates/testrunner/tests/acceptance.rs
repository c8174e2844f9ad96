//! End-to-end test driving a fake subject shell script through
//! [`suite::run`], exercising discovery, launch, invocation and timing
//! observation together the way the binary does.

use std::{fs, sync::Arc, time::Duration};

use testspec::Spec;

fn write_fake_subject(dir: &std::path::Path) -> std::path::PathBuf {
    let script = dir.join("subject.sh");
    fs::write(
        &script,
        "#!/bin/sh\n\
         echo ready\n\
         echo 'synth>'\n\
         while IFS= read -r line; do\n\
         \techo \"TEST::Complete runtime 1000000 ns samples 48000 notes 4\"\n\
         \techo 'synth>'\n\
         done\n",
    )
    .unwrap();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(&script).unwrap().permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).unwrap();
    }
    script
}

#[tokio::test]
async fn a_minimal_suite_runs_green_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let subject = write_fake_subject(dir.path());
    fs::write(dir.path().join("defaults.ini"), "").unwrap();
    fs::write(
        dir.path().join("play_note.test"),
        format!(
            "Test.type = CLI\nTest.subject = {}\nInvocation = play 60\n",
            subject.display()
        ),
    )
    .unwrap();

    let run_cfg = suite::RunConfig {
        suite_root: dir.path().to_path_buf(),
        baseline_mode: false,
        calibrate_mode: false,
        default_timeout: Duration::from_secs(5),
    };
    let progress = Arc::new(progress::Progress::in_memory());
    let report = suite::run(&run_cfg, &Spec::default(), progress)
        .await
        .expect("suite run should not abort");

    assert_eq!(report.case_count, 1);
    // A brand-new suite has no platform model yet (needs two distinct
    // sample counts across testcases to fit), so the lone case's timing
    // judgement cold-starts at a warning rather than green; anything worse
    // than that would mean the launch/invocation/observation chain broke.
    assert!(
        report.worst <= suite::ResCode::Warning,
        "{}",
        report::render(&report.log)
    );
}

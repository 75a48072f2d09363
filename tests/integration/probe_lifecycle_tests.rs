//! Integration tests for the version-probe lifecycle, driven against fake
//! engine scripts so no real gnuplot is needed.

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use std::time::Duration;

use plotpipe::engine::probe::probe_with_path;
use plotpipe::engine::session::EngineLink;
use plotpipe::engine::stream::plot;
use plotpipe::source::NullSource;
use plotpipe::PlotError;
use tempfile::TempDir;

const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

fn write_script(dir: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).expect("write script");
    let mut perms = fs::metadata(&path).expect("stat script").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).expect("chmod script");
    path
}

/// A stand-in engine: prints a version line for `-V`, otherwise consumes
/// stdin like an interactive session until its input closes.
fn fake_engine(dir: &TempDir) -> PathBuf {
    write_script(
        dir,
        "fakeplot",
        "#!/bin/sh\n\
         if [ \"$1\" = \"-V\" ]; then\n\
         \techo \"fakeplot 9.1 patchlevel 0\"\n\
         \texit 0\n\
         fi\n\
         exec cat >/dev/null\n",
    )
}

/// A stand-in for an engine whose `-V` flag was dropped: started, it just
/// sits there and never prints a byte.
fn mute_engine(dir: &TempDir) -> PathBuf {
    write_script(dir, "muteplot", "#!/bin/sh\nexec sleep 30\n")
}

// ── Successful probe ─────────────────────────────────────────────────────────

#[tokio::test]
async fn probe_returns_version_and_opens_session() {
    let dir = TempDir::new().expect("tempdir");
    let engine = fake_engine(&dir);
    let mut link = EngineLink::new();

    let version = probe_with_path(&mut link, engine.to_str().expect("utf-8 path"), PROBE_TIMEOUT)
        .await
        .expect("probe must succeed");

    assert_eq!(version, "fakeplot 9.1 patchlevel 0");
    assert!(link.is_open(), "a successful probe must establish the session");

    // Tear the spawned session down so the child is reaped.
    plot(&mut link, &mut NullSource, "", "quit")
        .await
        .expect("quit must close the session");
}

/// Probing twice must not create a second session: one `quit` empties the
/// single slot.
#[tokio::test]
async fn second_probe_reuses_the_existing_session() {
    let dir = TempDir::new().expect("tempdir");
    let engine = fake_engine(&dir);
    let path = engine.to_str().expect("utf-8 path");
    let mut link = EngineLink::new();

    let first = probe_with_path(&mut link, path, PROBE_TIMEOUT)
        .await
        .expect("first probe");
    let second = probe_with_path(&mut link, path, PROBE_TIMEOUT)
        .await
        .expect("second probe");

    assert_eq!(first, second, "both probes must report the same version");
    assert!(link.is_open());

    plot(&mut link, &mut NullSource, "", "quit")
        .await
        .expect("quit must close the session");
    assert!(
        !link.is_open(),
        "one quit must empty the slot — only one session ever existed"
    );
}

// ── Hung probe ───────────────────────────────────────────────────────────────

/// A probe that produces no output within the timeout fails with
/// `ProbeHung` and leaves no session behind. The probe child is abandoned,
/// not awaited — this test returning at all is the point.
#[tokio::test]
async fn hung_probe_reports_probe_hung_and_leaves_no_session() {
    let dir = TempDir::new().expect("tempdir");
    let engine = mute_engine(&dir);
    let mut link = EngineLink::new();

    let result = probe_with_path(
        &mut link,
        engine.to_str().expect("utf-8 path"),
        Duration::from_millis(200),
    )
    .await;

    match result {
        Err(PlotError::ProbeHung(msg)) => assert!(
            msg.contains("timed out"),
            "error must mention the timeout, got: {msg}"
        ),
        other => panic!("expected Err(PlotError::ProbeHung), got: {other:?}"),
    }
    assert!(!link.is_open(), "a hung probe must not create a session");
}

/// A hung probe does not poison the link: the next probe against a
/// working engine establishes the session normally.
#[tokio::test]
async fn probe_recovers_after_a_hung_probe() {
    let dir = TempDir::new().expect("tempdir");
    let mute = mute_engine(&dir);
    let good = fake_engine(&dir);
    let mut link = EngineLink::new();

    let hung = probe_with_path(
        &mut link,
        mute.to_str().expect("utf-8 path"),
        Duration::from_millis(200),
    )
    .await;
    assert!(matches!(hung, Err(PlotError::ProbeHung(_))));

    let version = probe_with_path(&mut link, good.to_str().expect("utf-8 path"), PROBE_TIMEOUT)
        .await
        .expect("probe after a hang must succeed");

    assert_eq!(version, "fakeplot 9.1 patchlevel 0");
    assert!(link.is_open());

    plot(&mut link, &mut NullSource, "", "quit")
        .await
        .expect("quit must close the session");
}

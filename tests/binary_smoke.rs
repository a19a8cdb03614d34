use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn bin() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("folder_sync"));
    for k in ["SYNC_FROM", "SYNC_TO", "PREFIX_WITH", "PRINT_LOCALLY", "FOLDER_SYNC_CONFIG"] {
        cmd.env_remove(k);
    }
    cmd
}

#[test]
fn print_config_succeeds() {
    let out = bin().arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success(), "binary should succeed with --print-config");
}

#[test]
fn missing_required_dirs_exit_with_status_1() {
    let td = tempdir().unwrap();
    let out = bin()
        // Point the config lookup at an empty dir so no user config is read.
        .env("XDG_CONFIG_HOME", td.path())
        .env("HOME", td.path())
        .arg("--log-level")
        .arg("quiet")
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("SYNC_FROM"), "stderr: {stderr}");
}

#[test]
fn nonexistent_source_exits_with_status_1() {
    let td = tempdir().unwrap();
    let out = bin()
        .env("XDG_CONFIG_HOME", td.path())
        .env("HOME", td.path())
        .env("SYNC_FROM", td.path().join("missing"))
        .env("SYNC_TO", td.path().join("spool"))
        .arg("--log-level")
        .arg("quiet")
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unknown_config_field_exits_with_status_1() {
    let td = tempdir().unwrap();
    let cfg = td.path().join("config.xml");
    fs::write(&cfg, "<config><download_base>/x</download_base></config>").unwrap();
    let out = bin().env("FOLDER_SYNC_CONFIG", &cfg).output().expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unexpected_positional_is_rejected_by_clap() {
    let out = bin().arg("EXTRA").output().expect("spawn binary");
    assert!(!out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unexpected") || stderr.contains("error:"), "{stderr}");
}

#[test]
fn oversized_poll_interval_exits_with_status_1() {
    let td = tempdir().unwrap();
    let out = bin()
        .env("XDG_CONFIG_HOME", td.path())
        .env("HOME", td.path())
        .env("SYNC_FROM", td.path())
        .env("SYNC_TO", td.path().join("spool"))
        .args(["--log-level", "quiet", "--poll-secs", "18446744073709551615"])
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("poll interval"), "stderr: {stderr}");
}

#[test]
fn path_like_prefix_exits_with_status_1() {
    let td = tempdir().unwrap();
    let out = bin()
        .env("XDG_CONFIG_HOME", td.path())
        .env("HOME", td.path())
        .env("SYNC_FROM", td.path())
        .env("SYNC_TO", td.path().join("spool"))
        .env("PREFIX_WITH", "../esc")
        .args(["--log-level", "quiet"])
        .output()
        .expect("spawn binary");
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn unrecognised_print_switch_does_not_exit_with_usage_status() {
    let out = bin()
        .env("PRINT_LOCALLY", "maybe")
        .arg("--print-config")
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "{:?}", out.status);
}

/// Start the service on empty folders, send `signal` once startup has finished
/// and check for a clean exit.
#[cfg(unix)]
fn stops_cleanly_on(signal: libc::c_int) {
    use std::time::Duration;

    let td = tempdir().unwrap();
    let src = td.path().join("in");
    let dst = td.path().join("out");
    fs::create_dir_all(&src).unwrap();
    let mut child = bin()
        .env("XDG_CONFIG_HOME", td.path())
        .env("HOME", td.path())
        .env("SYNC_FROM", &src)
        .env("SYNC_TO", &dst)
        .arg("--log-level")
        .arg("quiet")
        .spawn()
        .expect("spawn binary");

    // Validation creates the destination shortly before the handler is installed.
    for _ in 0..100 {
        if dst.exists() {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
    std::thread::sleep(Duration::from_millis(500));
    unsafe { libc::kill(child.id() as libc::pid_t, signal) };
    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(0), "signal {signal}");
}

#[cfg(unix)]
#[test]
fn sigterm_stops_the_service_with_status_0() {
    stops_cleanly_on(libc::SIGTERM);
}

#[cfg(unix)]
#[test]
fn sigint_stops_the_service_with_status_0() {
    stops_cleanly_on(libc::SIGINT);
}

use manifold_logger::{LevelFilter, Logging};
use serial_test::serial;
use std::time::Duration;

#[test]
#[serial]
fn file_layer_creates_log_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let log_dir = tmp.path().join("logs");

    let logging = Logging::builder()
        .name("test-app")
        .console(false)
        .path(&log_dir)
        .level(LevelFilter::INFO)
        .init()
        .expect("logging initializes");
    assert!(logging.has_file_output());

    tracing::info!("hello from the file layer");
    // Give the non-blocking worker a moment before dropping the guard.
    std::thread::sleep(Duration::from_millis(20));
    drop(logging);

    assert!(log_dir.exists(), "log directory is created on init");
    let has_log = std::fs::read_dir(&log_dir)
        .expect("log directory readable")
        .flatten()
        .any(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("log"));
    assert!(has_log, "at least one log file is created");
}

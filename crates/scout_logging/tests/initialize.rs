use log::LevelFilter;
use scout_logging::{initialize, scout_info, LogDestination};

// Only one global logger per process, so this file holds a single test.
#[test]
fn both_destinations_install_terminal_and_file_loggers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("jobscout.log");

    initialize(LogDestination::Both(path.clone()), LevelFilter::Info);
    scout_info!("written to the log file");
    log::logger().flush();

    assert!(path.exists());
    let contents = std::fs::read_to_string(&path).unwrap();
    assert!(contents.contains("written to the log file"), "log file was {contents:?}");
}

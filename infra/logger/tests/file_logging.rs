use pdl_logger::{FileOutput, LevelFilter, Logger};
use std::fs;
use std::time::Duration;
use tempfile::tempdir;

#[test]
fn file_logging_creates_log_file() -> Result<(), Box<dyn std::error::Error>> {
    let tmp_dir = tempdir()?;
    let log_dir = tmp_dir.path().join("logs");

    let logger = Logger::builder("pdl-file-logging")
        .console(false)
        .file(FileOutput::new(&log_dir))
        .level(LevelFilter::INFO)
        .init()?;

    tracing::info!(resource = "research-briefings", "upstream query issued");

    std::thread::sleep(Duration::from_millis(30));
    drop(logger);

    let log_file = fs::read_dir(&log_dir)?
        .flatten()
        .map(|entry| entry.path())
        .find(|path| path.extension().and_then(|ext| ext.to_str()) == Some("log"))
        .expect("log file should be created");

    let contents = fs::read_to_string(&log_file)?;
    assert!(contents.contains("upstream query issued"));
    assert!(log_file.file_name().and_then(|n| n.to_str()).is_some_and(|n| n.starts_with("pdl-file-logging")));

    Ok(())
}

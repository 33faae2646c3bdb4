//! Run driver
//!
//! Sequence: resolve configuration → open device → validate geometry →
//! write pass (unless check-only) → sync → verify pass → summary.
//! Any error short-circuits to the caller; mismatches do not.

use crate::config::RunConfig;
use crate::device::{BlockDevice, BlockGeometry};
use crate::errors::{VerifyError, VerifyResult};
use crate::observability::{Event, Logger};
use crate::scanner::{BlockScanner, VerifyPassReport, WritePassReport};

use super::args::Cli;

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub geometry: BlockGeometry,
    /// `None` in check-only mode
    pub write: Option<WritePassReport>,
    pub verify: VerifyPassReport,
}

/// Parses the command line and runs to completion.
pub fn run() -> VerifyResult<()> {
    let cli = Cli::parse_args();
    let logger = Logger::new();

    match run_cli(&cli, &logger) {
        Ok(_) => Ok(()),
        Err(e) => {
            log_failure(&logger, &e);
            Err(e)
        }
    }
}

fn log_failure(logger: &Logger, e: &VerifyError) {
    let fields = failure_fields(e);
    let field_refs: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
    logger.event(Event::RunFailed, &field_refs);
}

/// Fields of the RUN_FAILED line
fn failure_fields(e: &VerifyError) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("class", e.class().as_str().to_string()),
        ("code", e.code().to_string()),
        ("error", e.to_string()),
    ];
    if let Some(block) = e.block() {
        fields.push(("block", block.to_string()));
    }
    fields
}

/// Resolves configuration from parsed flags and runs it.
pub fn run_cli(cli: &Cli, logger: &Logger) -> VerifyResult<RunSummary> {
    logger.event(Event::RunBegin, &[("version", env!("CARGO_PKG_VERSION"))]);

    let config = RunConfig::resolve(cli.to_partial(), cli.config.as_deref())?;

    let device = config.device.display().to_string();
    let bs = config.block_size.to_string();
    let start = config.start_block.to_string();
    let check_only = config.check_only.to_string();
    logger.event(
        Event::ConfigLoaded,
        &[
            ("open", device.as_str()),
            ("bs", bs.as_str()),
            ("start", start.as_str()),
            ("checkonly", check_only.as_str()),
        ],
    );

    let summary = run_verification(&config, logger)?;

    let mismatches = summary.verify.mismatch_count().to_string();
    let short_reads = summary.verify.short_read_count().to_string();
    let checked = summary.verify.blocks_checked.to_string();
    logger.event(
        Event::RunComplete,
        &[
            ("blocks_checked", checked.as_str()),
            ("mismatches", mismatches.as_str()),
            ("short_reads", short_reads.as_str()),
        ],
    );
    Ok(summary)
}

/// Runs both passes against the configured device.
///
/// Flag-level validation runs before the device is opened; device size
/// divisibility is checked after opening and before any block I/O.
pub fn run_verification(config: &RunConfig, logger: &Logger) -> VerifyResult<RunSummary> {
    config.validate()?;

    let device = BlockDevice::open(&config.device)?;
    let geometry = BlockGeometry::new(device.total_bytes(), config.block_size)?;

    let path = config.device.display().to_string();
    let total = geometry.total_bytes().to_string();
    let bs = geometry.block_size().to_string();
    let blocks = geometry.block_count().to_string();
    let start = config.start_block.to_string();
    logger.event(
        Event::DeviceOpened,
        &[
            ("path", path.as_str()),
            ("total_bytes", total.as_str()),
            ("bs", bs.as_str()),
            ("blocks", blocks.as_str()),
            ("start", start.as_str()),
        ],
    );

    let mut scanner =
        BlockScanner::new(device, geometry, config.seed.as_bytes(), logger.clone())?;

    let write = if config.check_only {
        None
    } else {
        let report = scanner.write_pass(config.start_block)?;
        scanner.device_mut().sync()?;
        Some(report)
    };

    let verify = scanner.verify_pass(config.start_block)?;

    Ok(RunSummary {
        geometry,
        write,
        verify,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::fs;
    use std::io;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn device_file(dir: &TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("disk.img");
        fs::write(&path, vec![0u8; len]).unwrap();
        path
    }

    #[test]
    fn test_round_trip_on_file() {
        let dir = TempDir::new().unwrap();
        let path = device_file(&dir, 640);

        let mut config = RunConfig::for_device(&path);
        config.block_size = 64;

        let summary = run_verification(&config, &Logger::with_run_id("t")).unwrap();
        assert_eq!(summary.write.as_ref().unwrap().blocks_written, 10);
        assert_eq!(summary.verify.blocks_checked, 10);
        assert!(summary.verify.is_clean());
    }

    #[test]
    fn test_check_only_skips_write() {
        let dir = TempDir::new().unwrap();
        let path = device_file(&dir, 1024);

        let mut config = RunConfig::for_device(&path);
        config.check_only = true;

        let summary = run_verification(&config, &Logger::with_run_id("t")).unwrap();
        assert!(summary.write.is_none());
        // zero-filled device never matches the chain
        assert_eq!(summary.verify.mismatch_count(), 2);
        assert_eq!(fs::read(&path).unwrap(), vec![0u8; 1024]);
    }

    #[test]
    fn test_device_size_not_block_multiple() {
        let dir = TempDir::new().unwrap();
        let path = device_file(&dir, 1000);

        let config = RunConfig::for_device(&path);
        let err = run_verification(&config, &Logger::with_run_id("t")).unwrap_err();
        assert_eq!(err.code(), "BV_DEVICE_SIZE_INVALID");
        assert_eq!(fs::read(&path).unwrap(), vec![0u8; 1000]);
    }

    #[test]
    fn test_run_cli_with_config_file() {
        let dir = TempDir::new().unwrap();
        let path = device_file(&dir, 4096);
        let config_path = dir.path().join("verify.json");
        fs::write(
            &config_path,
            format!(r#"{{"open": {:?}, "bs": 1024}}"#, path.display().to_string()),
        )
        .unwrap();

        let cli = Cli::try_parse_from([
            "blockverify",
            "--config",
            config_path.to_str().unwrap(),
            "--seed",
            "cli-seed",
        ])
        .unwrap();

        let summary = run_cli(&cli, &Logger::with_run_id("t")).unwrap();
        assert_eq!(summary.geometry.block_size(), 1024);
        assert_eq!(summary.verify.blocks_checked, 4);
        assert!(summary.verify.is_clean());
    }

    #[test]
    fn test_failure_fields_carry_class_and_block() {
        let err = VerifyError::Read {
            block: 3,
            block_size: 512,
            source: io::Error::new(io::ErrorKind::Other, "medium error"),
        };
        let fields = failure_fields(&err);
        assert!(fields.contains(&("class", "IO".to_string())));
        assert!(fields.contains(&("code", "BV_READ_FAILED".to_string())));
        assert!(fields.contains(&("block", "3".to_string())));

        let fields = failure_fields(&VerifyError::MissingDevicePath);
        assert!(fields.contains(&("class", "CONFIGURATION".to_string())));
        assert!(fields.iter().all(|(k, _)| *k != "block"));
    }
}

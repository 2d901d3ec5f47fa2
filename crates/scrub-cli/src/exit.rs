//! Process exit codes.

use scrub_ingest::IngestError;
use scrub_model::ConfigError;

/// Cleaning finished without errors.
pub const SUCCESS: i32 = 0;
/// Cleaning finished with errors, or an unexpected failure.
pub const FAILURE: i32 = 1;
/// Invalid configuration, recipe or input file.
pub const INVALID_INPUT: i32 = 2;
/// Reading or writing failed.
pub const IO_ERROR: i32 = 3;

/// Exit code for a failed command, from the first recognized cause.
pub fn exit_code_for(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(err) = cause.downcast_ref::<ConfigError>() {
            return match err {
                ConfigError::RecipeRead { .. } => IO_ERROR,
                _ => INVALID_INPUT,
            };
        }
        if let Some(err) = cause.downcast_ref::<IngestError>() {
            return if err.is_invalid_input() {
                INVALID_INPUT
            } else {
                IO_ERROR
            };
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return IO_ERROR;
        }
    }
    FAILURE
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use anyhow::Context;

    use super::*;

    #[test]
    fn test_config_errors_are_invalid_input() {
        let err = anyhow::Error::new(ConfigError::UnknownOutlierStrategy {
            value: "bogus".to_string(),
        })
        .context("resolve configuration");
        assert_eq!(exit_code_for(&err), INVALID_INPUT);
    }

    #[test]
    fn test_ingest_errors_split_by_kind() {
        let unsupported: anyhow::Result<()> = Err(IngestError::UnsupportedFormat {
            path: PathBuf::from("a.xls"),
            extension: "xls".to_string(),
        })
        .context("read a.xls");
        assert_eq!(exit_code_for(&unsupported.unwrap_err()), INVALID_INPUT);

        let write = anyhow::Error::new(IngestError::FileWrite {
            path: PathBuf::from("out.csv"),
            source: std::io::Error::other("disk full"),
        });
        assert_eq!(exit_code_for(&write), IO_ERROR);
    }

    #[test]
    fn test_io_and_unknown_errors() {
        let io = anyhow::Error::new(std::io::Error::other("broken pipe")).context("write summary");
        assert_eq!(exit_code_for(&io), IO_ERROR);
        assert_eq!(exit_code_for(&anyhow::anyhow!("unexpected")), FAILURE);
    }
}

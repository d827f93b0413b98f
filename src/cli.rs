//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use picfetch_core::download::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};

/// Extract image metadata from JSON-like text and download the image.
///
/// Reads text containing "title", "copyright" and "url" keys, shows the title
/// and author, and saves the image under the output directory. Press Ctrl+C to
/// cancel a running download.
#[derive(Parser, Debug)]
#[command(name = "picfetch")]
#[command(author, version, about)]
pub struct Args {
    /// File containing the JSON text; reads stdin when omitted or "-"
    pub input: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Print task events as JSON lines instead of a progress bar
    #[arg(long)]
    pub json: bool,

    /// Directory images are saved to [default: img]
    #[arg(short = 'o', long)]
    pub output_dir: Option<PathBuf>,

    /// Progress increment in percent (1-100) [default: 10]
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub progress_step: Option<u8>,

    /// Pause before each progress increment in milliseconds (0-10000) [default: 100]
    #[arg(long, value_parser = clap::value_parser!(u64).range(0..=10_000))]
    pub progress_pause_ms: Option<u64>,

    /// Bytes written per chunk during download (1-1048576) [default: 1024]
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..=1_048_576))]
    pub chunk_size: Option<u64>,

    /// Shown when the title or author is missing [default: Unknown]
    #[arg(long)]
    pub placeholder: Option<String>,

    /// HTTP connect timeout in seconds (1-3600)
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// HTTP read timeout in seconds (0 disables, max 3600)
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(0..=3600))]
    pub read_timeout: u64,
}

impl Args {
    /// Returns the input file, or `None` for stdin.
    pub fn input_file(&self) -> Option<&PathBuf> {
        self.input.as_ref().filter(|p| p.as_os_str() != "-")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["picfetch"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.json);
        assert!(args.input.is_none());
        assert!(args.output_dir.is_none());
        assert_eq!(args.connect_timeout, 30);
        assert_eq!(args.read_timeout, 300);
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["picfetch", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_input_dash_means_stdin() {
        let args = Args::try_parse_from(["picfetch", "-"]).unwrap();
        assert!(args.input_file().is_none());

        let args = Args::try_parse_from(["picfetch", "photo.json"]).unwrap();
        assert_eq!(args.input_file(), Some(&PathBuf::from("photo.json")));
    }

    #[test]
    fn test_cli_output_dir_short_flag() {
        let args = Args::try_parse_from(["picfetch", "-o", "pictures"]).unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("pictures")));
    }

    #[test]
    fn test_cli_progress_step_rejects_zero() {
        let result = Args::try_parse_from(["picfetch", "--progress-step", "0"]);
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::ValueValidation
        );
    }

    #[test]
    fn test_cli_progress_step_rejects_over_100() {
        assert!(Args::try_parse_from(["picfetch", "--progress-step", "101"]).is_err());
    }

    #[test]
    fn test_cli_chunk_size_bounds() {
        assert!(Args::try_parse_from(["picfetch", "--chunk-size", "0"]).is_err());
        let args = Args::try_parse_from(["picfetch", "--chunk-size", "4096"]).unwrap();
        assert_eq!(args.chunk_size, Some(4096));
    }

    #[test]
    fn test_cli_read_timeout_zero_allowed() {
        let args = Args::try_parse_from(["picfetch", "--read-timeout", "0"]).unwrap();
        assert_eq!(args.read_timeout, 0);
    }

    #[test]
    fn test_cli_connect_timeout_zero_rejected() {
        assert!(Args::try_parse_from(["picfetch", "--connect-timeout", "0"]).is_err());
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["picfetch", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_invalid_flag_returns_error() {
        let result = Args::try_parse_from(["picfetch", "--invalid-flag"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}

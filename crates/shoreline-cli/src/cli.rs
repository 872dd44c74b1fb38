use clap::Parser;
use shoreline_lib::{Config, HeaderConvention, TerminalColumnPolicy};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub const TRANSECTS_EXTENSION: &str = "geojson";
pub const INTERSECTS_EXTENSION: &str = "csv";
pub const OUTPUT_EXTENSION: &str = "geojson";

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Shoreline Segments - Build per-date shoreline segments from transect intersect distances
pub struct Cli {
    /// Transect lines (.geojson), one LineString feature per transect
    #[clap(value_name = "TRANSECTS")]
    pub transects: PathBuf,

    /// Intersect distances (.csv), one row per date and one column per transect
    #[clap(value_name = "INTERSECTS")]
    pub intersects: PathBuf,

    /// Output shoreline segments (.geojson)
    #[clap(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Name of the CSV column holding the dates
    #[clap(long, default_value = "dates")]
    pub index_column: String,

    /// Separator between tokens of a value column header
    #[clap(long, default_value = " ")]
    pub header_delimiter: char,

    /// Zero-based position of the transect name within a value column header
    #[clap(long, default_value = "1")]
    pub header_token: usize,

    /// Transect feature property holding its name
    #[clap(long, default_value = "name")]
    pub name_property: String,

    /// Also project the last column of each row instead of only using it to end a segment
    #[clap(long)]
    pub include_last_column: bool,

    /// Process dates in parallel (output order is unchanged)
    #[clap(long)]
    pub parallel: bool,
}

/// Pre-flight argument check failures
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cant find file {}", .0.display())]
    NotFound(PathBuf),

    #[error("{} has wrong extension. expected .{expected}", path.display())]
    WrongExtension {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("output directory {} does not exist", .0.display())]
    MissingOutputDirectory(PathBuf),
}

/// Parses the command line arguments
pub fn parse_args() -> Result<Cli, clap::Error> {
    Cli::try_parse()
}

impl Cli {
    /// Check that inputs exist with the right extension and that the output can be placed
    pub fn validate(&self) -> Result<(), CliError> {
        check_input_file(&self.transects, TRANSECTS_EXTENSION)?;
        check_input_file(&self.intersects, INTERSECTS_EXTENSION)?;

        let output_dir = match self.output.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        if !output_dir.is_dir() {
            return Err(CliError::MissingOutputDirectory(output_dir.to_path_buf()));
        }
        check_extension(&self.output, OUTPUT_EXTENSION)
    }

    pub fn to_config(&self) -> Config {
        Config {
            index_column: self.index_column.clone(),
            header: HeaderConvention {
                delimiter: self.header_delimiter,
                token_index: self.header_token,
            },
            name_property: self.name_property.clone(),
            terminal_column: if self.include_last_column {
                TerminalColumnPolicy::Include
            } else {
                TerminalColumnPolicy::Replicate
            },
            parallel: self.parallel,
        }
    }
}

fn check_input_file(path: &Path, expected: &'static str) -> Result<(), CliError> {
    if !path.is_file() {
        return Err(CliError::NotFound(path.to_path_buf()));
    }
    check_extension(path, expected)
}

fn check_extension(path: &Path, expected: &'static str) -> Result<(), CliError> {
    if path.extension() == Some(OsStr::new(expected)) {
        Ok(())
    } else {
        Err(CliError::WrongExtension {
            path: path.to_path_buf(),
            expected,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("shoreline-segments").chain(args.iter().copied()))
            .unwrap()
    }

    fn touch(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_defaults_match_library_config() {
        let cli = parse(&["t.geojson", "i.csv", "o.geojson"]);
        assert_eq!(cli.to_config(), Config::default());
    }

    #[test]
    fn test_flags_map_to_config() {
        let cli = parse(&[
            "t.geojson",
            "i.csv",
            "o.geojson",
            "--index-column",
            "date",
            "--header-delimiter",
            "_",
            "--header-token",
            "0",
            "--include-last-column",
            "--parallel",
        ]);
        let config = cli.to_config();
        assert_eq!(config.index_column, "date");
        assert_eq!(config.header.delimiter, '_');
        assert_eq!(config.header.token_index, 0);
        assert_eq!(config.terminal_column, TerminalColumnPolicy::Include);
        assert!(config.parallel);
    }

    #[test]
    fn test_missing_positional_is_rejected() {
        let result = Cli::try_parse_from(["shoreline-segments", "t.geojson", "i.csv"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_accepts_good_paths() {
        let dir = tempfile::tempdir().unwrap();
        let transects = touch(dir.path(), "transects.geojson");
        let intersects = touch(dir.path(), "intersects.csv");
        let output = dir.path().join("out.geojson");

        let cli = parse(&[
            transects.to_str().unwrap(),
            intersects.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let intersects = touch(dir.path(), "intersects.csv");
        let missing = dir.path().join("transects.geojson");
        let output = dir.path().join("out.geojson");

        let cli = parse(&[
            missing.to_str().unwrap(),
            intersects.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        let err = cli.validate().unwrap_err();
        assert!(matches!(err, CliError::NotFound(ref p) if p == &missing));
        assert!(err.to_string().contains("transects.geojson"));
    }

    #[test]
    fn test_validate_rejects_wrong_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let transects = touch(dir.path(), "transects.json");
        let intersects = touch(dir.path(), "intersects.csv");
        let output = dir.path().join("out.geojson");

        let cli = parse(&[
            transects.to_str().unwrap(),
            intersects.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert!(matches!(
            cli.validate(),
            Err(CliError::WrongExtension { expected: "geojson", .. })
        ));

        let transects = touch(dir.path(), "transects.geojson");
        let intersects = touch(dir.path(), "intersects.txt");
        let cli = parse(&[
            transects.to_str().unwrap(),
            intersects.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert!(matches!(
            cli.validate(),
            Err(CliError::WrongExtension { expected: "csv", .. })
        ));

        let intersects = touch(dir.path(), "intersects.csv");
        let bad_output = dir.path().join("out.json");
        let cli = parse(&[
            transects.to_str().unwrap(),
            intersects.to_str().unwrap(),
            bad_output.to_str().unwrap(),
        ]);
        assert!(matches!(
            cli.validate(),
            Err(CliError::WrongExtension { expected: "geojson", .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_output_directory() {
        let dir = tempfile::tempdir().unwrap();
        let transects = touch(dir.path(), "transects.geojson");
        let intersects = touch(dir.path(), "intersects.csv");
        let output = dir.path().join("nowhere").join("out.geojson");

        let cli = parse(&[
            transects.to_str().unwrap(),
            intersects.to_str().unwrap(),
            output.to_str().unwrap(),
        ]);
        assert!(matches!(
            cli.validate(),
            Err(CliError::MissingOutputDirectory(_))
        ));
    }
}

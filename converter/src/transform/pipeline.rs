//! High-level conversion API.
//!
//! Combines all steps: header resolution, literal parsing, normalization
//! and JSONL writing.
//!
//! # Example
//!
//! ```rust
//! use credits_jsonl::transform::pipeline::convert;
//!
//! let csv = "cast,crew,id\n\"[{'name': 'Tom'}]\",[],862\n";
//! let mut out = Vec::new();
//! let summary = convert(csv.as_bytes(), &mut out).unwrap();
//!
//! assert_eq!(summary.written, 1);
//! assert!(String::from_utf8(out).unwrap().starts_with("{\"id\":862,"));
//! ```

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use super::headers::resolve_columns;
use super::normalizer::normalize;
use crate::config::RunConfig;
use crate::error::{ConvertResult, SetupError};
use crate::input::CreditsTable;
use crate::logs::{log_debug, log_debug_indent, log_info, log_success};
use crate::models::{ColumnRef, ColumnSelection};
use crate::writer::JsonlWriter;

/// Outcome of a conversion run
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertSummary {
    /// Number of records (lines) written
    pub written: u64,

    /// Header row of the input
    pub headers: Vec<String>,

    /// Columns chosen for cast, crew and id
    pub columns: ColumnSelection,
}

/// Convert a CSV stream into JSONL.
///
/// Rows are processed one at a time, in input order. The output is flushed
/// once at the end but not closed.
pub fn convert<R: Read, W: Write>(input: R, output: W) -> ConvertResult<ConvertSummary> {
    let mut table = CreditsTable::from_reader(input)?;
    let headers = table.headers().to_vec();
    let columns = resolve_columns(&headers);

    log_debug(format!("CSV has {} columns", headers.len()));
    log_debug_indent(format!("cast: {}", describe(&columns.cast)), 1);
    log_debug_indent(format!("crew: {}", describe(&columns.crew)), 1);
    log_debug_indent(format!("id:   {}", describe(&columns.id)), 1);
    if columns.cast.is_none() || columns.crew.is_none() {
        log_info("Cast or crew column unresolved; those fields will be empty");
    }

    let mut writer = JsonlWriter::new(output);
    for row in table.rows() {
        let record = normalize(&row?, &columns);
        writer.write_record(&record)?;
    }
    writer.flush()?;

    Ok(ConvertSummary {
        written: writer.written(),
        headers,
        columns,
    })
}

fn describe(column: &Option<ColumnRef>) -> String {
    match column {
        Some(c) => c.to_string(),
        None => "unresolved".to_string(),
    }
}

/// Check that the input exists and is non-empty, then open it.
pub fn open_input(path: &Path) -> Result<File, SetupError> {
    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(SetupError::InputMissing { path: path.to_path_buf() });
        }
        Err(source) => {
            return Err(SetupError::InputOpen { path: path.to_path_buf(), source });
        }
    };

    if !metadata.is_file() {
        return Err(SetupError::InputMissing { path: path.to_path_buf() });
    }
    if metadata.len() == 0 {
        return Err(SetupError::InputEmpty { path: path.to_path_buf() });
    }

    File::open(path).map_err(|source| SetupError::InputOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Create (or truncate) the output file, creating its directory first.
pub fn create_output(path: &Path) -> Result<File, SetupError> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|source| SetupError::OutputDir {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    File::create(path).map_err(|source| SetupError::OutputOpen {
        path: path.to_path_buf(),
        source,
    })
}

/// Convert the files named by `config`.
///
/// The input is checked before the output is touched, so a missing or empty
/// input leaves no output file behind.
pub fn convert_file(config: &RunConfig) -> ConvertResult<ConvertSummary> {
    let input = open_input(&config.input)?;
    log_info(format!("Reading {}", config.input.display()));

    let output = create_output(&config.output)?;
    let summary = convert(BufReader::new(input), BufWriter::new(output))?;

    log_success(format!("{} records converted", summary.written));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConvertError, InputError};
    use crate::logs::default_directive;
    use std::sync::{Arc, Mutex};
    use tracing_subscriber::EnvFilter;

    fn run(csv: &str) -> (ConvertSummary, Vec<String>) {
        let mut out = Vec::new();
        let summary = convert(csv.as_bytes(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        (summary, text.lines().map(str::to_string).collect())
    }

    #[test]
    fn test_reference_row() {
        let csv = "cast,crew,id\n\"[{'name': 'Tom'}]\",\"[{'name':'Jane','job':'Director'}]\",862\n";
        let (summary, lines) = run(csv);

        assert_eq!(summary.written, 1);
        assert_eq!(
            lines,
            vec![
                r#"{"id":862,"cast":[{"name":"Tom"}],"crew":[{"name":"Jane","job":"Director"}],"cast_names":["Tom"],"top_cast":["Tom"],"crew_by_job":{"Director":["Jane"]}}"#
            ]
        );
    }

    #[test]
    fn test_output_order_matches_input_order() {
        let csv = "cast,crew,id\n[],[],3\n[],[],1\n[],[],2\n";
        let (summary, lines) = run(csv);

        assert_eq!(summary.written, 3);
        let ids: Vec<i64> = lines
            .iter()
            .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["id"].as_i64().unwrap())
            .collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_trailing_id_column_without_id_header() {
        let csv = "cast,crew,movie\n[],[],862\n";
        let (summary, lines) = run(csv);

        assert_eq!(summary.columns.id, None);
        assert!(lines[0].starts_with(r#"{"id":862,"#));
    }

    #[test]
    fn test_wide_integers_written_exactly() {
        let csv = "cast,crew,id\n\"[{'credit_id': 12345678901234567891}]\",[],99999999999999999999\n";
        let (_, lines) = run(csv);

        assert!(lines[0].starts_with(r#"{"id":99999999999999999999,"cast":[{"credit_id":12345678901234567891}],"#));
    }

    #[test]
    fn test_bad_rows_do_not_stop_the_run() {
        let csv = "cast,crew,id\nnot a list,\"[{'job': 'X'\",1\n\"[{'name': 'A'}]\",[],2\n";
        let (summary, lines) = run(csv);

        assert_eq!(summary.written, 2);
        assert!(lines[0].contains(r#""cast":[],"crew":[]"#));
        assert!(lines[1].contains(r#""cast_names":["A"]"#));
    }

    #[test]
    fn test_header_only_writes_nothing() {
        let (summary, lines) = run("cast,crew,id\n");
        assert_eq!(summary.written, 0);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_empty_stream_is_an_error() {
        let result = convert("".as_bytes(), Vec::new());
        assert!(matches!(result, Err(ConvertError::Input(InputError::NoHeader))));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `csv` under a subscriber filtered for `verbosity`, returning what it logged.
    fn logged(csv: &str, verbosity: i8) -> String {
        let captured = Captured::default();
        let sink = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(default_directive(verbosity)))
            .with_writer(move || sink.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || run(csv));
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_single_column_degrades_to_empty_fields() {
        let (summary, lines) = run("title\nToy Story\n");

        assert_eq!(summary.columns, ColumnSelection::default());
        assert_eq!(
            lines[0],
            r#"{"id":"Toy Story","cast":[],"crew":[],"cast_names":[],"top_cast":[],"crew_by_job":{}}"#
        );
    }

    #[test]
    fn test_unresolved_columns_are_silent_by_default() {
        assert_eq!(logged("title\nToy Story\n", 0), "");
        assert!(logged("title\nToy Story\n", 1).contains("Cast or crew column unresolved"));
    }

    #[test]
    fn test_summary_reports_columns() {
        let (summary, _) = run("Movie_ID,Cast,Crew\n");
        assert_eq!(summary.headers, vec!["Movie_ID", "Cast", "Crew"]);
        assert_eq!(summary.columns.cast, Some(ColumnRef::new(1, "Cast")));
        assert_eq!(summary.columns.crew, Some(ColumnRef::new(2, "Crew")));
        assert_eq!(summary.columns.id, Some(ColumnRef::new(0, "Movie_ID")));
    }
}

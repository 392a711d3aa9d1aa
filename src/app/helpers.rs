//! Input handling and small pure helpers used by the runners.

use std::{
    fs::read_to_string,
    io::{self, IsTerminal, Read},
    path::Path
};

use crate::{
    config::ColorMode,
    error::{AppResult, input_read_error, usage_error}
};

/// Read the plan from `path`, or from stdin for `None` and `-`.
///
/// An interactive stdin is refused rather than waited on.
pub fn read_input(path: Option<&Path>) -> AppResult<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => {
            read_to_string(path).map_err(|e| input_read_error(&path.display().to_string(), e))
        }
        Some(_) => read_stdin(),
        None => {
            if io::stdin().is_terminal() {
                return Err(usage_error(
                    "EXPLAIN output must be piped in or given as a file"
                ));
            }
            read_stdin()
        }
    }
}

fn read_stdin() -> AppResult<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .map_err(|e| input_read_error("stdin", e))?;
    Ok(buffer)
}

/// SQL from the argument, falling back to a piped stdin.
pub fn read_query(query: Option<String>) -> AppResult<String> {
    let sql = match query {
        Some(sql) => sql,
        None => {
            if io::stdin().is_terminal() {
                return Err(usage_error("Provide a query as an argument or on stdin"));
            }
            read_stdin()?
        }
    };
    if sql.trim().is_empty() {
        return Err(usage_error("The query is empty"));
    }
    Ok(sql)
}

/// Prefix `sql` with an `EXPLAIN (ANALYZE, BUFFERS)` clause.
///
/// The statement text is kept as given apart from trailing whitespace, and
/// the result ends with exactly one newline.
pub fn wrap_explain(sql: &str, json: bool) -> String {
    let options = if json {
        "ANALYZE, BUFFERS, FORMAT JSON"
    } else {
        "ANALYZE, BUFFERS"
    };
    format!("EXPLAIN ({})\n{}\n", options, sql.trim_end())
}

/// Whether plan output gets escape codes.
///
/// `auto` honours the `NO_COLOR` convention on top of the terminal check.
pub fn emphasis_enabled(mode: ColorMode, stdout_is_terminal: bool, no_color_env: bool) -> bool {
    match mode {
        ColorMode::Auto => stdout_is_terminal && !no_color_env,
        other => other.enabled(stdout_is_terminal)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_wrap_explain_text() {
        assert_eq!(
            wrap_explain("SELECT 1;\n\n", false),
            "EXPLAIN (ANALYZE, BUFFERS)\nSELECT 1;\n"
        );
    }

    #[test]
    fn test_wrap_explain_json() {
        assert_eq!(
            wrap_explain("SELECT *\nFROM t", true),
            "EXPLAIN (ANALYZE, BUFFERS, FORMAT JSON)\nSELECT *\nFROM t\n"
        );
    }

    #[test]
    fn test_read_input_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Result  (cost=0.00..0.01 rows=1 width=4)").unwrap();
        let text = read_input(Some(file.path())).unwrap();
        assert!(text.starts_with("Result"));
    }

    #[test]
    fn test_read_input_missing_file() {
        let result = read_input(Some(Path::new("/nonexistent/plan.txt")));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_query_rejects_blank() {
        assert!(read_query(Some("  \n".to_string())).is_err());
        assert_eq!(read_query(Some("SELECT 1".to_string())).unwrap(), "SELECT 1");
    }

    #[test]
    fn test_emphasis_enabled() {
        assert!(emphasis_enabled(ColorMode::Auto, true, false));
        assert!(!emphasis_enabled(ColorMode::Auto, true, true));
        assert!(!emphasis_enabled(ColorMode::Auto, false, false));
        assert!(emphasis_enabled(ColorMode::Always, false, true));
        assert!(!emphasis_enabled(ColorMode::Never, true, false));
    }
}

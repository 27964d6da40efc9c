//! Comma-separated export of a result snapshot.
//!
//! Layout:
//!
//! ```text
//! # params,k=15,h=120,t=0.003,b=0.01,L=0.03,Tb=900,Tinf=600
//! # m [1/m],83.26663997864532
//! # Q [W],11.089928503119824
//! # eta [-],0.3949404737578284
//! # eps [-],10.26845231770354
//! x [m],T [K]
//! 0,900
//! ...
//! ```
//!
//! Numbers use the shortest representation that parses back to the same
//! `f64`.

use crate::snapshot::{ResultSnapshot, SnapshotCell};
use crate::{ResultsError, ResultsResult};
use fin_solver::{FinParameters, ParameterUpdate};
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

const PARAMS_TAG: &str = "# params";
const M_TAG: &str = "# m [1/m]";
const Q_TAG: &str = "# Q [W]";
const ETA_TAG: &str = "# eta [-]";
const EPS_TAG: &str = "# eps [-]";
const HEADER: &str = "x [m],T [K]";

/// Contents of an exported table.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTable {
    pub params: FinParameters,
    pub m: f64,
    pub q: f64,
    pub eta: f64,
    pub eps: f64,
    pub positions: Vec<f64>,
    pub temperatures: Vec<f64>,
}

pub fn write_table<W: Write>(snapshot: &ResultSnapshot, out: &mut W) -> ResultsResult<()> {
    out.write_all(to_table_string(snapshot)?.as_bytes())?;
    Ok(())
}

pub fn to_table_string(snapshot: &ResultSnapshot) -> ResultsResult<String> {
    let mut out = String::new();
    format_table(snapshot, &mut out)?;
    Ok(out)
}

fn format_table<W: fmt::Write>(snapshot: &ResultSnapshot, out: &mut W) -> fmt::Result {
    let p = &snapshot.params;
    let metrics = &snapshot.result.metrics;
    writeln!(
        out,
        "{PARAMS_TAG},k={},h={},t={},b={},L={},Tb={},Tinf={}",
        p.k, p.h, p.thickness, p.width, p.length, p.t_base, p.t_inf
    )?;
    writeln!(out, "{M_TAG},{}", metrics.m)?;
    writeln!(out, "{Q_TAG},{}", metrics.q)?;
    writeln!(out, "{ETA_TAG},{}", metrics.eta)?;
    writeln!(out, "{EPS_TAG},{}", metrics.eps)?;
    writeln!(out, "{HEADER}")?;
    for (x, t) in snapshot.result.samples() {
        writeln!(out, "{x},{t}")?;
    }
    Ok(())
}

/// Write the current snapshot to `path`. Refuses when there is none.
pub fn export_table(cell: &SnapshotCell, path: &Path) -> ResultsResult<Arc<ResultSnapshot>> {
    let snapshot = cell.get().ok_or(ResultsError::NoSnapshot)?;
    let mut file = std::io::BufWriter::new(std::fs::File::create(path)?);
    write_table(&snapshot, &mut file)?;
    file.flush()?;
    tracing::info!(path = %path.display(), samples = snapshot.result.len(), "table exported");
    Ok(snapshot)
}

pub fn load_table(path: &Path) -> ResultsResult<ParsedTable> {
    let content = std::fs::read_to_string(path)?;
    read_table(&content)
}

pub fn read_table(content: &str) -> ResultsResult<ParsedTable> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let mut next_line = |expect: &str| {
        lines.next().ok_or_else(|| ResultsError::Parse {
            line: 0,
            message: format!("unexpected end of table, expected {expect}"),
        })
    };

    let (line, params_row) = next_line(PARAMS_TAG)?;
    let params = parse_params(line, params_row)?;
    let (line, row) = next_line(M_TAG)?;
    let m = parse_scalar(line, row, M_TAG)?;
    let (line, row) = next_line(Q_TAG)?;
    let q = parse_scalar(line, row, Q_TAG)?;
    let (line, row) = next_line(ETA_TAG)?;
    let eta = parse_scalar(line, row, ETA_TAG)?;
    let (line, row) = next_line(EPS_TAG)?;
    let eps = parse_scalar(line, row, EPS_TAG)?;

    let (line, header) = next_line(HEADER)?;
    if header != HEADER {
        return Err(parse_error(line, format!("expected header '{HEADER}'")));
    }

    let mut positions = Vec::new();
    let mut temperatures = Vec::new();
    for (line, row) in lines {
        let (x, t) = row
            .split_once(',')
            .ok_or_else(|| parse_error(line, "expected 'x,T'"))?;
        positions.push(parse_number(line, x)?);
        temperatures.push(parse_number(line, t)?);
    }

    Ok(ParsedTable {
        params,
        m,
        q,
        eta,
        eps,
        positions,
        temperatures,
    })
}

fn parse_error(line: usize, message: impl Into<String>) -> ResultsError {
    ResultsError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_number(line: usize, field: &str) -> ResultsResult<f64> {
    field
        .trim()
        .parse::<f64>()
        .map_err(|e| parse_error(line, format!("'{}': {e}", field.trim())))
}

fn parse_scalar(line: usize, row: &str, tag: &str) -> ResultsResult<f64> {
    let value = row
        .strip_prefix(tag)
        .and_then(|rest| rest.strip_prefix(','))
        .ok_or_else(|| parse_error(line, format!("expected '{tag},<value>'")))?;
    parse_number(line, value)
}

fn parse_params(line: usize, row: &str) -> ResultsResult<FinParameters> {
    let rest = row
        .strip_prefix(PARAMS_TAG)
        .ok_or_else(|| parse_error(line, format!("expected '{PARAMS_TAG}' row")))?;

    let mut update = ParameterUpdate::default();
    for cell in rest.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let (name, value) = cell
            .split_once('=')
            .ok_or_else(|| parse_error(line, format!("expected name=value, got '{cell}'")))?;
        let value = Some(parse_number(line, value)?);
        match name.trim() {
            "k" => update.k = value,
            "h" => update.h = value,
            "t" => update.thickness = value,
            "b" => update.width = value,
            "L" => update.length = value,
            "Tb" => update.t_base = value,
            "Tinf" => update.t_inf = value,
            other => return Err(parse_error(line, format!("unknown parameter '{other}'"))),
        }
    }

    match update {
        ParameterUpdate {
            k: Some(k),
            h: Some(h),
            thickness: Some(thickness),
            width: Some(width),
            length: Some(length),
            t_base: Some(t_base),
            t_inf: Some(t_inf),
        } => Ok(FinParameters {
            k,
            h,
            thickness,
            width,
            length,
            t_base,
            t_inf,
        }),
        _ => Err(parse_error(line, "all seven parameters are required")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fin_solver::solve;

    fn small_snapshot() -> ResultSnapshot {
        let params = FinParameters::default();
        ResultSnapshot::new(params, solve(params, 4).unwrap())
    }

    #[test]
    fn layout_matches_expected_rows() {
        let text = to_table_string(&small_snapshot()).unwrap();
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 6 + 4);
        assert_eq!(
            rows[0],
            "# params,k=15,h=120,t=0.003,b=0.01,L=0.03,Tb=900,Tinf=600"
        );
        assert!(rows[1].starts_with("# m [1/m],"));
        assert!(rows[2].starts_with("# Q [W],"));
        assert!(rows[3].starts_with("# eta [-],"));
        assert!(rows[4].starts_with("# eps [-],"));
        assert_eq!(rows[5], "x [m],T [K]");
        assert!(rows[6].starts_with("0,"));
    }

    #[test]
    fn missing_parameter_rejected() {
        let text = "# params,k=15,h=120\n";
        let err = read_table(text).unwrap_err();
        assert!(matches!(err, ResultsError::Parse { line: 1, .. }), "{err}");
    }

    #[test]
    fn bad_sample_row_reports_line() {
        let mut text = to_table_string(&small_snapshot()).unwrap();
        text.push_str("0.04;601\n");
        let err = read_table(&text).unwrap_err();
        assert!(matches!(err, ResultsError::Parse { line: 11, .. }), "{err}");
    }

    #[test]
    fn truncated_table() {
        let text = "# params,k=15,h=120,t=0.003,b=0.01,L=0.03,Tb=900,Tinf=600\n# m [1/m],83\n";
        let err = read_table(text).unwrap_err();
        assert!(err.to_string().contains("# Q [W]"), "{err}");
    }

    #[test]
    fn writer_output_matches_string_form() {
        let snapshot = small_snapshot();
        let mut buf = Vec::new();
        write_table(&snapshot, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), to_table_string(&snapshot).unwrap());
    }

    #[test]
    fn failing_writer_propagates_error() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::other("disk full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let err = write_table(&small_snapshot(), &mut Broken).unwrap_err();
        assert!(matches!(err, ResultsError::Io(_)), "{err}");
    }

    #[test]
    fn export_requires_snapshot() {
        let cell = SnapshotCell::new();
        let path = std::env::temp_dir().join("fin_results_no_snapshot.csv");
        let err = export_table(&cell, &path).unwrap_err();
        assert!(matches!(err, ResultsError::NoSnapshot));
    }
}

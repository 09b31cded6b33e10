use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use ndarray::Array2;
use serde::Deserialize;

use super::model::Matrix;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a labelled matrix from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – header row of column names, first column of row names
/// * `.json`         – `{ "rows": [...], "columns": [...], "values": [[...]] }`
pub fn load_file(path: &Path) -> Result<Matrix> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;

    let matrix = match ext.as_str() {
        "csv" => read_delimited(file, b',')?,
        "tsv" | "txt" => read_delimited(file, b'\t')?,
        "json" => read_json(file)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    log::debug!(
        "Parsed {} as a {}x{} matrix",
        path.display(),
        matrix.nrows(),
        matrix.ncols()
    );
    Ok(matrix)
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Delimited layout:
///
/// ```text
/// gene,sample_1,sample_2
/// BRCA1,5.1,7.2
/// TP53,0.4,NA
/// ```
///
/// The first header cell is ignored. Empty, `NA` and `NaN` cells become NaN.
pub fn read_delimited<R: Read>(reader: R, delimiter: u8) -> Result<Matrix> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(reader);

    let column_names: Vec<String> = reader
        .headers()
        .context("reading header row")?
        .iter()
        .skip(1)
        .map(|h| h.trim().to_string())
        .collect();

    let mut row_names = Vec::new();
    let mut flat = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("row {row_no}"))?;
        let name = record.get(0).unwrap_or("").trim().to_string();

        for (col_no, cell) in record.iter().skip(1).enumerate() {
            flat.push(parse_cell(cell).with_context(|| {
                format!("row {row_no} ('{name}'), column {col_no}: '{cell}' is not a number")
            })?);
        }
        row_names.push(name);
    }

    let values = Array2::from_shape_vec((row_names.len(), column_names.len()), flat)
        .context("assembling matrix")?;
    Ok(Matrix::new(values, Some(row_names), Some(column_names))?)
}

fn parse_cell(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("na") || s.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    Ok(s.parse::<f64>()?)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct JsonMatrix {
    #[serde(default)]
    rows: Option<Vec<String>>,
    #[serde(default)]
    columns: Option<Vec<String>>,
    values: Vec<Vec<Option<f64>>>,
}

/// Expected JSON schema (`null` cells become NaN, labels are optional):
///
/// ```json
/// {
///   "rows": ["BRCA1", "TP53"],
///   "columns": ["sample_1", "sample_2"],
///   "values": [[5.1, 7.2], [0.4, null]]
/// }
/// ```
pub fn read_json<R: Read>(reader: R) -> Result<Matrix> {
    let parsed: JsonMatrix = serde_json::from_reader(reader).context("parsing JSON")?;

    let rows: Vec<Vec<f64>> = parsed
        .values
        .into_iter()
        .map(|row| row.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        .collect();

    let matrix = Matrix::from_rows(rows)?.with_labels(parsed.rows, parsed.columns)?;
    Ok(matrix)
}

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::core::exposure::ExposureTable;
use crate::core::observation::{Observation, ObservationTable};
use crate::parsing::ParseError;
use crate::utils::validation::{check_row_limit, normalize_code};

/// Column names for the exposure reference table
#[derive(Debug, Clone)]
pub struct ExposureColumns {
    pub code: String,
    pub score: String,
}

impl Default for ExposureColumns {
    fn default() -> Self {
        Self {
            code: "soc_code".to_string(),
            score: "aioe".to_string(),
        }
    }
}

/// Column names for the observation table.
///
/// The title column is optional: it is used when present in the header and
/// silently skipped otherwise.
#[derive(Debug, Clone)]
pub struct ObservationColumns {
    pub code: String,
    pub group: String,
    pub weight: String,
    pub title: String,
}

impl Default for ObservationColumns {
    fn default() -> Self {
        Self {
            code: "occ_code".to_string(),
            group: "group".to_string(),
            weight: "weight".to_string(),
            title: "group_title".to_string(),
        }
    }
}

/// Pick a delimiter from the file extension: `.tsv`/`.tab` (optionally
/// gzipped) are tab-separated, everything else comma-separated.
#[must_use]
pub fn detect_delimiter(path: &Path) -> char {
    let name = path.to_string_lossy().to_lowercase();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    if name.ends_with(".tsv") || name.ends_with(".tab") {
        '\t'
    } else {
        ','
    }
}

/// Read a file to a string, transparently decompressing `.gz` input
fn read_to_string(path: &Path) -> Result<String, ParseError> {
    let file = std::fs::File::open(path)?;
    let mut content = String::new();
    if path.to_string_lossy().to_lowercase().ends_with(".gz") {
        GzDecoder::new(file).read_to_string(&mut content)?;
    } else {
        let mut file = file;
        file.read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Load the exposure reference table from a delimited file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::MissingColumn`
/// if the header lacks a required column, `ParseError::InvalidFormat` for rows
/// with too few fields or unparseable scores, or `ParseError::TooManyRows` if
/// the row limit is exceeded.
pub fn load_exposure_file(
    path: &Path,
    columns: &ExposureColumns,
    delimiter: Option<char>,
) -> Result<ExposureTable, ParseError> {
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(path));
    load_exposure_text(&read_to_string(path)?, columns, delimiter)
}

/// Parse the exposure reference table from delimited text.
///
/// # Errors
///
/// See [`load_exposure_file`].
pub fn load_exposure_text(
    text: &str,
    columns: &ExposureColumns,
    delimiter: char,
) -> Result<ExposureTable, ParseError> {
    let mut lines = data_lines(text);
    let header = parse_header(lines.next(), delimiter)?;
    let code_idx = find_column(&header, &columns.code)?;
    let score_idx = find_column(&header, &columns.score)?;
    let min_fields = code_idx.max(score_idx) + 1;

    let mut table = ExposureTable::new();
    for (line_num, line) in lines {
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() < min_fields {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than {min_fields} fields"
            )));
        }

        let code = normalize_code(fields[code_idx]);
        let score = parse_number(fields[score_idx], line_num, &columns.score)?;

        if check_row_limit(table.len()).is_some() {
            return Err(ParseError::TooManyRows(table.len()));
        }
        table.insert(code, score);
    }

    Ok(table)
}

/// Load the observation table from a delimited file.
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, `ParseError::MissingColumn`
/// if the header lacks a required column, `ParseError::InvalidFormat` for rows
/// with too few fields or invalid weights, or `ParseError::TooManyRows` if the
/// row limit is exceeded.
pub fn load_observations_file(
    path: &Path,
    columns: &ObservationColumns,
    delimiter: Option<char>,
) -> Result<ObservationTable, ParseError> {
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(path));
    load_observations_text(&read_to_string(path)?, columns, delimiter)
}

/// Parse the observation table from delimited text.
///
/// # Errors
///
/// See [`load_observations_file`].
pub fn load_observations_text(
    text: &str,
    columns: &ObservationColumns,
    delimiter: char,
) -> Result<ObservationTable, ParseError> {
    let mut lines = data_lines(text);
    let header = parse_header(lines.next(), delimiter)?;
    let code_idx = find_column(&header, &columns.code)?;
    let group_idx = find_column(&header, &columns.group)?;
    let weight_idx = find_column(&header, &columns.weight)?;
    // Title is descriptive only; absent column means no titles
    let title_idx = find_column(&header, &columns.title).ok();
    let min_fields = code_idx.max(group_idx).max(weight_idx) + 1;

    let mut rows = Vec::new();
    for (line_num, line) in lines {
        let fields: Vec<&str> = line.split(delimiter).collect();
        if fields.len() < min_fields {
            return Err(ParseError::InvalidFormat(format!(
                "Line {line_num} has fewer than {min_fields} fields"
            )));
        }

        let weight = parse_number(fields[weight_idx], line_num, &columns.weight)?;
        if weight < 0.0 {
            return Err(ParseError::InvalidFormat(format!(
                "Negative weight on line {line_num}: '{weight}'"
            )));
        }

        let mut observation = Observation::new(
            fields[code_idx].trim(),
            fields[group_idx].trim(),
            weight,
        );
        if let Some(idx) = title_idx {
            let title = fields.get(idx).map_or("", |t| t.trim());
            if !title.is_empty() {
                observation = observation.with_title(title);
            }
        }

        if check_row_limit(rows.len()).is_some() {
            return Err(ParseError::TooManyRows(rows.len()));
        }
        rows.push(observation);
    }

    Ok(ObservationTable::new(rows))
}

/// Non-blank, non-comment lines with their 1-based line numbers
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn parse_header(
    line: Option<(usize, &str)>,
    delimiter: char,
) -> Result<Vec<String>, ParseError> {
    let (_, line) =
        line.ok_or_else(|| ParseError::InvalidFormat("No header row found".to_string()))?;
    Ok(line
        .split(delimiter)
        .map(|field| field.trim().to_lowercase())
        .collect())
}

/// Locate a named column in the header, case-insensitively
fn find_column(header: &[String], name: &str) -> Result<usize, ParseError> {
    let wanted = name.trim().to_lowercase();
    header
        .iter()
        .position(|field| *field == wanted)
        .ok_or_else(|| ParseError::MissingColumn(name.to_string()))
}

fn parse_number(field: &str, line_num: usize, column: &str) -> Result<f64, ParseError> {
    let value: f64 = field.trim().parse().map_err(|_| {
        ParseError::InvalidFormat(format!(
            "Invalid {column} on line {line_num}: '{}'",
            field.trim()
        ))
    })?;
    if !value.is_finite() {
        return Err(ParseError::InvalidFormat(format!(
            "Non-finite {column} on line {line_num}: '{}'",
            field.trim()
        )));
    }
    Ok(value)
}

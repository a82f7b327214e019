use std::{num::ParseFloatError, str::FromStr};

use thiserror::Error;

use super::Mat;

#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseMatError {
	#[error("Matrix text contained no rows")]
	Empty,
	#[error("Row {row} on line {line} has no values")]
	EmptyRow {
		row: usize,
		line: usize,
	},
	#[error("Bad number at line {line} (row {row}, column {col})")]
	Float {
		row: usize,
		col: usize,
		line: usize,
		#[source]
		source: ParseFloatError,
	},
	#[error("Row {row} on line {line} has {actual} values (expected: {expected})")]
	Ragged {
		row: usize,
		line: usize,
		expected: usize,
		actual: usize,
	},
}

/// Rows are separated by newlines or `;`, values by whitespace or `,`.
/// Blank rows and `#` comments are skipped.
///
/// Errors report `row` as the 0-based matrix row and `line` as the 1-based
/// line of the source text it came from.
impl FromStr for Mat {
	type Err = ParseMatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut rows: Vec<Vec<f64>> = Vec::new();

		let segments = s.lines()
			.enumerate()
			.map(|(idx, text)| (idx + 1, text.split('#').next().unwrap_or("")))
			.flat_map(|(line, text)| text.split(';').map(move |seg| (line, seg.trim())))
			.filter(|(_, seg)| !seg.is_empty());

		for (row, (line, seg)) in segments.enumerate() {
			let values = seg
				.split(|c: char| c.is_whitespace() || c == ',')
				.filter(|tok| !tok.is_empty())
				.enumerate()
				.map(|(col, tok)| tok.parse::<f64>()
					.map_err(|source| ParseMatError::Float { row, col, line, source }))
				.collect::<Result<Vec<_>, _>>()?;

			// Only separators, e.g. ",,"
			if values.is_empty() {
				return Err(ParseMatError::EmptyRow { row, line });
			}

			if let Some(first) = rows.first() {
				if first.len() != values.len() {
					return Err(ParseMatError::Ragged {
						row,
						line,
						expected: first.len(),
						actual: values.len(),
					});
				}
			}
			rows.push(values);
		}

		if rows.is_empty() {
			return Err(ParseMatError::Empty);
		}
		Ok(Mat::from_rows(&rows))
	}
}

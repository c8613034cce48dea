#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loader for the plain-text scenario format.
//!
//! A scenario lists, in order: one line of wall tokens per interior row, the
//! points of interest (`row col v|f`), the fires (`row col`), the doors
//! (`row col row col`) and the entry points (`row col`). Coordinates are
//! 1-based interior coordinates. The decoded building is padded with an
//! empty outer ring, so interior `(row r, col c)` becomes
//! `CellCoord::new(c, r)`. Blank lines are ignored.

use std::{iter::Enumerate, str::Lines};

use fire_rescue_core::{CellCoord, DoorKey, Layout, LayoutError, PoiKind, PoiPlacement, WallMask};
use log::debug;
use thiserror::Error;

/// Bundled Flash Point building in the default scenario shape.
pub const FLASH_POINT: &str = include_str!("../scenarios/flash_point.txt");

/// Section sizes of a scenario file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScenarioShape {
    /// Interior rows, one wall line each.
    pub rows: u32,
    /// Interior columns, one wall token per line each.
    pub columns: u32,
    /// Point of interest lines.
    pub pois: usize,
    /// Fire lines.
    pub fires: usize,
    /// Door lines.
    pub doors: usize,
    /// Entry point lines.
    pub entry_points: usize,
}

impl Default for ScenarioShape {
    fn default() -> Self {
        Self {
            rows: 6,
            columns: 8,
            pois: 3,
            fires: 10,
            doors: 8,
            entry_points: 4,
        }
    }
}

/// Reasons a scenario cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ScenarioFormatError {
    /// The text ended before a section was complete.
    #[error("line {line}: expected {section} but the scenario ended")]
    UnexpectedEnd {
        /// Line the missing entry should have been on.
        line: usize,
        /// Section being read.
        section: &'static str,
    },
    /// A line holds the wrong number of fields.
    #[error("line {line}: expected {expected} fields in {section} but found {found}")]
    FieldCount {
        /// Offending line.
        line: usize,
        /// Section being read.
        section: &'static str,
        /// Fields the section requires.
        expected: usize,
        /// Fields present.
        found: usize,
    },
    /// A wall token is not four binary digits.
    #[error("line {line}: wall token '{token}' is not four binary digits")]
    WallToken {
        /// Offending line.
        line: usize,
        /// Token as written.
        token: String,
    },
    /// A coordinate is not a number.
    #[error("line {line}: '{token}' is not a coordinate")]
    Number {
        /// Offending line.
        line: usize,
        /// Token as written.
        token: String,
    },
    /// A coordinate lies outside the interior.
    #[error("line {line}: ({row}, {column}) lies outside the {rows}x{columns} interior")]
    OutsideInterior {
        /// Offending line.
        line: usize,
        /// Row as written.
        row: u32,
        /// Column as written.
        column: u32,
        /// Interior rows.
        rows: u32,
        /// Interior columns.
        columns: u32,
    },
    /// A point of interest kind is neither `v` nor `f`.
    #[error("line {line}: '{token}' is not a point of interest kind")]
    PoiKind {
        /// Offending line.
        line: usize,
        /// Token as written.
        token: String,
    },
    /// Content follows the last section.
    #[error("line {line}: unexpected content after the entry points")]
    TrailingContent {
        /// First extra line.
        line: usize,
    },
    /// The decoded building is inconsistent.
    #[error("scenario describes an invalid building: {0}")]
    Layout(#[from] LayoutError),
}

/// Decodes a scenario with the default section sizes.
pub fn parse_scenario(text: &str) -> Result<Layout, ScenarioFormatError> {
    parse_scenario_with(text, ScenarioShape::default())
}

/// Decodes a scenario with custom section sizes.
pub fn parse_scenario_with(
    text: &str,
    shape: ScenarioShape,
) -> Result<Layout, ScenarioFormatError> {
    let mut reader = Reader::new(text, shape);
    let width = shape.columns + 2;
    let height = shape.rows + 2;

    let mut walls = vec![WallMask::EMPTY; (width as usize) * (height as usize)];
    for row in 1..=shape.rows {
        let (line, fields) = reader.fields("wall row", shape.columns as usize)?;
        for (column, token) in (1..=shape.columns).zip(fields) {
            let mask = parse_wall(token).ok_or_else(|| ScenarioFormatError::WallToken {
                line,
                token: token.to_owned(),
            })?;
            walls[(row * width + column) as usize] = mask;
        }
    }

    let mut pois = Vec::with_capacity(shape.pois);
    for _ in 0..shape.pois {
        let (line, fields) = reader.fields("point of interest", 3)?;
        let cell = reader.cell(line, fields[0], fields[1])?;
        let kind = match fields[2] {
            "v" | "V" => PoiKind::Victim,
            "f" | "F" => PoiKind::FalseAlarm,
            other => {
                return Err(ScenarioFormatError::PoiKind {
                    line,
                    token: other.to_owned(),
                })
            }
        };
        pois.push(PoiPlacement { cell, kind });
    }

    let mut fires = Vec::with_capacity(shape.fires);
    for _ in 0..shape.fires {
        let (line, fields) = reader.fields("fire", 2)?;
        fires.push(reader.cell(line, fields[0], fields[1])?);
    }

    let mut doors = Vec::with_capacity(shape.doors);
    for _ in 0..shape.doors {
        let (line, fields) = reader.fields("door", 4)?;
        let first = reader.cell(line, fields[0], fields[1])?;
        let second = reader.cell(line, fields[2], fields[3])?;
        doors.push(DoorKey::new(first, second));
    }

    let mut entry_points = Vec::with_capacity(shape.entry_points);
    for _ in 0..shape.entry_points {
        let (line, fields) = reader.fields("entry point", 2)?;
        entry_points.push(reader.cell(line, fields[0], fields[1])?);
    }

    if let Some((line, _)) = reader.next_line() {
        return Err(ScenarioFormatError::TrailingContent { line });
    }

    let layout = Layout {
        width,
        height,
        walls,
        pois,
        fires,
        doors,
        entry_points,
    };
    layout.validate()?;
    debug!(
        "scenario decoded: {width}x{height} grid, {} fires, {} doors",
        layout.fires.len(),
        layout.doors.len()
    );
    Ok(layout)
}

/// Parses a wall token such as `1001` (north, west, south, east).
fn parse_wall(token: &str) -> Option<WallMask> {
    if token.len() != 4 || !token.bytes().all(|byte| byte == b'0' || byte == b'1') {
        return None;
    }
    u8::from_str_radix(token, 2).ok().and_then(WallMask::from_bits)
}

struct Reader<'a> {
    lines: Enumerate<Lines<'a>>,
    last_line: usize,
    shape: ScenarioShape,
}

impl<'a> Reader<'a> {
    fn new(text: &'a str, shape: ScenarioShape) -> Self {
        Self {
            lines: text.lines().enumerate(),
            last_line: 0,
            shape,
        }
    }

    /// Next non-blank line with its 1-based number.
    fn next_line(&mut self) -> Option<(usize, &'a str)> {
        for (index, line) in self.lines.by_ref() {
            self.last_line = index + 1;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Some((index + 1, trimmed));
            }
        }
        None
    }

    fn fields(
        &mut self,
        section: &'static str,
        expected: usize,
    ) -> Result<(usize, Vec<&'a str>), ScenarioFormatError> {
        let Some((line, text)) = self.next_line() else {
            return Err(ScenarioFormatError::UnexpectedEnd {
                line: self.last_line + 1,
                section,
            });
        };
        let fields: Vec<&str> = text.split_whitespace().collect();
        if fields.len() != expected {
            return Err(ScenarioFormatError::FieldCount {
                line,
                section,
                expected,
                found: fields.len(),
            });
        }
        Ok((line, fields))
    }

    fn cell(
        &self,
        line: usize,
        row: &str,
        column: &str,
    ) -> Result<CellCoord, ScenarioFormatError> {
        let row = number(line, row)?;
        let column = number(line, column)?;
        if !(1..=self.shape.rows).contains(&row) || !(1..=self.shape.columns).contains(&column) {
            return Err(ScenarioFormatError::OutsideInterior {
                line,
                row,
                column,
                rows: self.shape.rows,
                columns: self.shape.columns,
            });
        }
        Ok(CellCoord::new(column, row))
    }
}

fn number(line: usize, token: &str) -> Result<u32, ScenarioFormatError> {
    token.parse().map_err(|_| ScenarioFormatError::Number {
        line,
        token: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fire_rescue_core::Direction;

    #[test]
    fn wall_tokens_follow_north_west_south_east_order() {
        let mask = parse_wall("1001").expect("valid token");
        assert!(mask.has(Direction::North));
        assert!(mask.has(Direction::East));
        assert!(!mask.has(Direction::West));
        assert_eq!(parse_wall("10a1"), None);
        assert_eq!(parse_wall("10011"), None);
        assert_eq!(parse_wall("+101"), None);
    }

    #[test]
    fn blank_lines_are_skipped_and_numbered() {
        let mut reader = Reader::new("\n  \n1 2\n", ScenarioShape::default());
        assert_eq!(reader.next_line(), Some((3, "1 2")));
        assert_eq!(reader.next_line(), None);
    }
}

use std::collections::BTreeMap;

use puzzle_types::{ConflictKind, Crosser, GeometryError, HorizontalConflict, Puzzle};

/// Outcome of a geometry validation pass. Valid iff no errors were collected.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GeometryReport {
    pub errors: Vec<GeometryError>,
}

impl GeometryReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Check that every crosser intersects the main word consistently.
///
/// All failures are collected and reported together rather than aborting on
/// the first one, so an authoring UI can show every problem at once. Pure
/// and deterministic: this knows nothing about solved/unsolved state, only
/// authored geometry.
pub fn validate_intersections(
    main_text: &str,
    main_row: i32,
    main_col: i32,
    crossers: &[Crosser],
) -> GeometryReport {
    let main_len = main_text.chars().count();
    let main_end_col = main_col + main_len as i32 - 1;
    let mut errors = Vec::new();

    for crosser in crossers {
        let len = crosser.len();

        let in_range = (main_col..=main_end_col).contains(&crosser.col);
        if !in_range {
            errors.push(GeometryError::OutsideMainWordRange {
                crosser: crosser.id,
                col: crosser.col,
            });
        }

        if !(crosser.row..=crosser.end_row()).contains(&main_row) {
            errors.push(GeometryError::MissesMainRow {
                crosser: crosser.id,
                row: crosser.row,
            });
        }

        let index_ok = crosser.intersection_index < len;
        if !index_ok {
            errors.push(GeometryError::IntersectionOutOfBounds {
                crosser: crosser.id,
                index: crosser.intersection_index,
                len,
            });
        }

        // Letter comparison only makes sense once both offsets resolve.
        if in_range && index_ok {
            let offset = (crosser.col - main_col) as usize;
            let expected = main_text
                .chars()
                .nth(offset)
                .map(|c| c.to_ascii_lowercase());
            let found = crosser.intersection_letter();
            if let (Some(expected), Some(found)) = (expected, found)
                && expected != found
            {
                errors.push(GeometryError::LetterMismatch {
                    crosser: crosser.id,
                    expected,
                    found,
                });
            }
        }

        // Independent cross-check of the row arithmetic.
        if crosser.row + crosser.intersection_index as i32 != main_row {
            errors.push(GeometryError::RowMisaligned {
                crosser: crosser.id,
                row: crosser.row,
                index: crosser.intersection_index,
            });
        }
    }

    GeometryReport { errors }
}

/// Scan crosser letters row by row (excluding the main word's row) for
/// accidental horizontal word formations: contiguous runs of three or more
/// letters, or two or more non-adjacent letters sharing a row. Advisory
/// warnings only, never hard errors.
pub fn check_horizontal_conflicts(main_row: i32, crossers: &[Crosser]) -> Vec<HorizontalConflict> {
    let mut rows: BTreeMap<i32, Vec<i32>> = BTreeMap::new();
    for crosser in crossers {
        for offset in 0..crosser.len() as i32 {
            let row = crosser.row + offset;
            if row != main_row {
                rows.entry(row).or_default().push(crosser.col);
            }
        }
    }

    let mut conflicts = Vec::new();
    for (row, mut cols) in rows {
        cols.sort_unstable();
        cols.dedup();
        if cols.len() < 2 {
            continue;
        }

        // Contiguous runs of length >= 3.
        let mut run_start = 0;
        for i in 1..=cols.len() {
            let run_broken = i == cols.len() || cols[i] != cols[i - 1] + 1;
            if run_broken {
                if i - run_start >= 3 {
                    conflicts.push(HorizontalConflict {
                        row,
                        cols: cols[run_start..i].to_vec(),
                        kind: ConflictKind::Run,
                    });
                }
                run_start = i;
            }
        }

        // Any gap means at least two letters on this row are non-adjacent.
        if cols.windows(2).any(|pair| pair[1] - pair[0] > 1) {
            conflicts.push(HorizontalConflict {
                row,
                cols,
                kind: ConflictKind::Scattered,
            });
        }
    }

    conflicts
}

/// Defensive re-validation run at session start on already-authored data:
/// grid-bounds checks for every footprint, then the intersection checks.
/// A failure here is a hard load error, not a crash.
pub fn validate_puzzle(puzzle: &Puzzle) -> GeometryReport {
    let mut errors = Vec::new();

    let main = &puzzle.main_word;
    if main.row < 0 || main.row >= puzzle.rows || main.col < 0 || main.end_col() >= puzzle.cols {
        errors.push(GeometryError::MainWordOutsideGrid);
    }

    for crosser in &puzzle.crossers {
        if crosser.row < 0
            || crosser.end_row() >= puzzle.rows
            || crosser.col < 0
            || crosser.col >= puzzle.cols
        {
            errors.push(GeometryError::CrosserOutsideGrid { crosser: crosser.id });
        }
    }

    let mut report = validate_intersections(&main.text, main.row, main.col, &puzzle.crossers);
    errors.append(&mut report.errors);
    GeometryReport { errors }
}

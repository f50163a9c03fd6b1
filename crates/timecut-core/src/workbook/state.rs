use crate::error::{Result, TimecutError};
use std::path::PathBuf;
use timecut_engine::grid::{Grid, new_grid};

/// The year with no sheet of its own; it shares the sheet of the year before.
const SHARED_YEAR: u32 = 4;

/// One named worksheet.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    /// Cells of the sheet (clones share the same cells)
    pub grid: Grid,
}

impl Sheet {
    pub fn new(name: &str) -> Self {
        Sheet {
            name: name.to_string(),
            grid: new_grid(),
        }
    }
}

/// An ordered collection of sheets plus where they came from.
#[derive(Clone, Debug, Default)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
    /// Current file path
    pub file_path: Option<PathBuf>,
}

impl Workbook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sheets(sheets: Vec<Sheet>) -> Self {
        Workbook {
            sheets,
            file_path: None,
        }
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }

    /// The sheet holding the timetable for a year of study.
    pub fn sheet_for_year(&self, year: u32) -> Result<&Sheet> {
        let index = sheet_index_for_year(year, self.sheets.len())?;
        Ok(&self.sheets[index])
    }
}

/// Zero-based sheet index for a year of study.
///
/// Year `n` lives on sheet `n`, except year 4, which uses sheet 3.
pub fn sheet_index_for_year(year: u32, available: usize) -> Result<usize> {
    if available == 0 {
        return Err(TimecutError::NoSheets);
    }
    let sheet = match year {
        0 => return Err(TimecutError::InvalidYear),
        SHARED_YEAR => SHARED_YEAR - 1,
        n => n,
    };
    let sheet = sheet as usize;
    if sheet > available {
        return Err(TimecutError::YearOutOfRange {
            year,
            sheet,
            available,
        });
    }
    Ok(sheet - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_map_to_matching_sheets() {
        assert_eq!(sheet_index_for_year(1, 5).unwrap(), 0);
        assert_eq!(sheet_index_for_year(2, 5).unwrap(), 1);
        assert_eq!(sheet_index_for_year(3, 5).unwrap(), 2);
        assert_eq!(sheet_index_for_year(5, 5).unwrap(), 4);
    }

    #[test]
    fn year_four_shares_sheet_three() {
        assert_eq!(sheet_index_for_year(4, 5).unwrap(), 2);
        assert_eq!(sheet_index_for_year(4, 3).unwrap(), 2);
    }

    #[test]
    fn invalid_years_are_errors() {
        assert!(matches!(
            sheet_index_for_year(0, 3),
            Err(TimecutError::InvalidYear)
        ));
        assert!(matches!(
            sheet_index_for_year(3, 2),
            Err(TimecutError::YearOutOfRange {
                year: 3,
                sheet: 3,
                available: 2
            })
        ));
        assert!(matches!(sheet_index_for_year(1, 0), Err(TimecutError::NoSheets)));
    }

    #[test]
    fn sheet_for_year_returns_named_sheet() {
        let wb = Workbook::with_sheets(vec![Sheet::new("Y1"), Sheet::new("Y2"), Sheet::new("Y3")]);
        assert_eq!(wb.sheet_for_year(4).unwrap().name, "Y3");
        assert_eq!(wb.sheet_names(), vec!["Y1", "Y2", "Y3"]);
    }
}

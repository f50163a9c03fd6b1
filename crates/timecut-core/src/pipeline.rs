//! One filtering run over a workbook.
//!
//! [`FilterJob::run`] resolves the year's sheet before touching any cell, then
//! scans it in place. The caller saves the workbook and finally calls
//! [`FilterJob::run_hooks`] for follow-up work such as calendar export.

use crate::error::Result;
use crate::workbook::{Sheet, Workbook, sheet_index_for_year};
use timecut_engine::scan::{AllowList, ScanConfig, ScanOutcome, TimetableFilter};
use tracing::{info, warn};

/// What a hook gets to see after the scan.
pub struct HookContext<'a> {
    pub sheet: &'a Sheet,
    pub outcome: &'a ScanOutcome,
    pub allow: &'a AllowList,
    pub config: &'a ScanConfig,
    pub year: u32,
}

/// Post-processing over a filtered sheet.
pub trait ScanHook {
    fn name(&self) -> &str;
    fn run(&mut self, ctx: &HookContext<'_>) -> Result<()>;
}

/// Inputs of a run.
#[derive(Clone, Debug)]
pub struct FilterJob {
    pub year: u32,
    pub allow: AllowList,
    pub config: ScanConfig,
}

/// Result of [`FilterJob::run`].
#[derive(Debug)]
pub struct JobReport {
    pub sheet_index: usize,
    pub sheet_name: String,
    pub outcome: ScanOutcome,
}

impl FilterJob {
    pub fn new(year: u32, allow: AllowList, config: ScanConfig) -> Self {
        FilterJob {
            year,
            allow,
            config,
        }
    }

    /// Filter the year's sheet of `workbook` in place.
    pub fn run(&self, workbook: &Workbook) -> Result<JobReport> {
        let sheet_index = sheet_index_for_year(self.year, workbook.sheets.len())?;
        let sheet = &workbook.sheets[sheet_index];
        info!(
            year = self.year,
            sheet = %sheet.name,
            courses = self.allow.len(),
            "filtering sheet"
        );

        let outcome = TimetableFilter::new(&self.config, &self.allow).run(&sheet.grid);
        Ok(JobReport {
            sheet_index,
            sheet_name: sheet.name.clone(),
            outcome,
        })
    }

    /// Run hooks in order. Stops at the first failing hook.
    pub fn run_hooks(
        &self,
        workbook: &Workbook,
        report: &JobReport,
        hooks: &mut [Box<dyn ScanHook>],
    ) -> Result<()> {
        let Some(sheet) = workbook.sheet(report.sheet_index) else {
            warn!(sheet = report.sheet_index, "sheet vanished before hooks ran");
            return Ok(());
        };
        let ctx = HookContext {
            sheet,
            outcome: &report.outcome,
            allow: &self.allow,
            config: &self.config,
            year: self.year,
        };
        for hook in hooks.iter_mut() {
            info!(hook = hook.name(), "running hook");
            hook.run(&ctx)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TimecutError;
    use std::cell::RefCell;
    use std::path::PathBuf;
    use std::rc::Rc;
    use timecut_engine::grid::{CellRef, CellValue};

    fn fixture(name: &str) -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures")
            .join(name)
    }

    fn job(year: u32, courses: &[&str]) -> FilterJob {
        FilterJob::new(year, AllowList::new(courses), ScanConfig::default())
    }

    struct Recorder(Rc<RefCell<Vec<String>>>);

    impl ScanHook for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn run(&mut self, ctx: &HookContext<'_>) -> Result<()> {
            self.0
                .borrow_mut()
                .push(format!("{}:{}", ctx.sheet.name, ctx.outcome.registry.len()));
            Ok(())
        }
    }

    struct Failing;

    impl ScanHook for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn run(&mut self, _ctx: &HookContext<'_>) -> Result<()> {
            Err(TimecutError::NoFilePath)
        }
    }

    #[test]
    fn filters_the_years_sheet_only() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        let report = job(2, &["GR"]).run(&wb).unwrap();

        assert_eq!(report.sheet_name, "Year 2");
        assert!(report.outcome.registry.contains("GR"));
        assert!(report.outcome.registry.contains("QO"));

        // Metadata blocks F1:K1 and F2:K2 are blanked in full.
        let year2 = &wb.sheets[1];
        for col in 5..=10 {
            for row in 0..2 {
                let at = CellRef::new(col, row);
                assert_eq!(year2.grid.get(&at).unwrap().value, CellValue::Empty, "{}", at);
            }
        }

        // Year 1 is untouched.
        let year1 = &wb.sheets[0];
        assert_eq!(
            year1.grid.get(&CellRef::new(2, 1)).unwrap().value,
            CellValue::text("[AB]")
        );
    }

    #[test]
    fn filtered_workbook_matches_expected() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        job(2, &["GR"]).run(&wb).unwrap();

        let actual = crate::storage::write_grd_content(&wb.sheets);
        let expected = std::fs::read_to_string(fixture("timetable.filtered.grd")).unwrap();
        let normalize = |text: String| text.replace("\r\n", "\n");
        assert_eq!(normalize(actual), normalize(expected));
    }

    #[test]
    fn year_four_runs_on_third_sheet() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        let report = job(4, &["MP"]).run(&wb).unwrap();
        assert_eq!(report.sheet_name, "Year 3");
    }

    #[test]
    fn bad_year_fails_before_scanning() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        assert!(matches!(
            job(9, &["GR"]).run(&wb),
            Err(TimecutError::YearOutOfRange { year: 9, .. })
        ));
        assert!(wb.sheets[1].grid.iter().all(|c| c.fill.is_none()));
    }

    #[test]
    fn hooks_see_filtered_sheet() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        let job = job(2, &["GR"]);
        let report = job.run(&wb).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: Vec<Box<dyn ScanHook>> = vec![Box::new(Recorder(seen.clone()))];
        job.run_hooks(&wb, &report, &mut hooks).unwrap();
        assert_eq!(*seen.borrow(), vec!["Year 2:2".to_string()]);
    }

    #[test]
    fn failing_hook_stops_later_hooks() {
        let wb = Workbook::open(&fixture("timetable.grd")).unwrap();
        let job = job(2, &["GR"]);
        let report = job.run(&wb).unwrap();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut hooks: Vec<Box<dyn ScanHook>> =
            vec![Box::new(Failing), Box::new(Recorder(seen.clone()))];
        assert!(job.run_hooks(&wb, &report, &mut hooks).is_err());
        assert!(seen.borrow().is_empty());
    }
}

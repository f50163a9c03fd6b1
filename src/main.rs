//! Timecut - cut a timetable workbook down to the courses you take.

mod config;
mod logging;

use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use timecut_core::calendar::{IcsExport, ScriptExport, ScriptRenderer};
use timecut_core::workbook::Format;
use timecut_core::{AllowList, CourseRegistry, FilterJob, ScanHook, Workbook};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "timecut", version)]
#[command(about = "Removes all but the given courses from a timetable workbook")]
#[command(
    long_about = "Removes all but the given courses from a timetable workbook, one year's \
sheet at a time. Cells between a CUT and an END_CUT cell describe a course \
(abbreviation, name, tutor, location); they are read, then blanked. \
Time ranges such as 09-10 or 3-4 become 24-hour start labels (9:00, 15:00).",
    after_help = "Example: timecut timetable.grd 2 -c GR QO"
)]
struct Args {
    /// Timetable workbook (.grd, .csv; .xlsx/.ods with the xlsx feature).
    /// Spreadsheets are read only: the result is saved beside them as .grd,
    /// since fill and alignment cannot be written back to .xlsx/.ods.
    path: PathBuf,

    /// Year of study; year 4 shares the third sheet
    year: u32,

    /// Courses to keep (abbreviations)
    #[arg(short, long, value_name = "C", num_args = 1..)]
    courses: Vec<String>,

    /// Log debug output to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Save the filtered workbook here instead of over the input
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Filter without saving
    #[arg(long)]
    dry_run: bool,

    /// Write the kept lectures as an iCalendar file
    #[arg(long, value_name = "FILE")]
    ics: Option<PathBuf>,

    /// Rhai template with `fn render(lecture)`, run once per lecture
    #[arg(long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Where template output goes (default: stdout)
    #[arg(long, value_name = "FILE", requires = "template")]
    render_out: Option<PathBuf>,

    /// Settings file (default: <config dir>/timecut/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Ignore any settings file
    #[arg(long, conflicts_with = "config")]
    no_config: bool,

    /// Print the course registry as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_tracing(args.verbose);

    let (settings, warnings) = if args.no_config {
        (config::Settings::default(), Vec::new())
    } else {
        config::load_settings(args.config.as_deref())
    };
    for warning in warnings {
        warn!("{}", warning);
    }

    let courses = if args.courses.is_empty() {
        settings.default_courses.clone()
    } else {
        args.courses.clone()
    };
    let allow = AllowList::new(&courses);

    let mut workbook = Workbook::open(&args.path)
        .with_context(|| format!("Failed to open {}", args.path.display()))?;
    let job = FilterJob::new(args.year, allow, settings.scan.clone());
    let report = job.run(&workbook)?;

    if args.dry_run {
        info!("dry run; workbook not saved");
    } else {
        let out = output_path(&args.path, args.output.as_deref())?;
        workbook
            .save_as(&out)
            .with_context(|| format!("Failed to save {}", out.display()))?;
        eprintln!("Saved {} to {}", report.sheet_name, out.display());
    }

    print_registry(&report.outcome.registry, args.json)?;

    let mut hooks: Vec<Box<dyn ScanHook>> = Vec::new();
    if let Some(path) = &args.ics {
        hooks.push(Box::new(IcsExport {
            path: path.clone(),
            minutes: settings.lecture_minutes,
        }));
    }
    if let Some(template) = &args.template {
        let renderer = ScriptRenderer::from_file(template, settings.lecture_minutes)
            .with_context(|| format!("Failed to load template {}", template.display()))?;
        let sink: Box<dyn Write + Send> = match &args.render_out {
            Some(path) => Box::new(
                std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?,
            ),
            None => Box::new(std::io::stdout()),
        };
        hooks.push(Box::new(ScriptExport { renderer, sink }));
    }
    job.run_hooks(&workbook, &report, &mut hooks)?;

    Ok(())
}

/// Where to save: `--output`, else the input itself. Inputs that cannot be
/// written back are saved next to the input as .grd.
fn output_path(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = output {
        return Ok(path.to_path_buf());
    }
    if Format::from_path(input)?.can_write() {
        return Ok(input.to_path_buf());
    }
    let fallback = input.with_extension("grd");
    warn!(
        "{} cannot be written back; saving to {}",
        input.display(),
        fallback.display()
    );
    Ok(fallback)
}

fn print_registry(registry: &CourseRegistry, json: bool) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if json {
        serde_json::to_writer_pretty(&mut stdout, registry)?;
        writeln!(stdout)?;
        return Ok(());
    }
    for course in registry {
        writeln!(
            stdout,
            "{}\t{}\t{}\t{}",
            course.abbrev, course.name, course.tutor, course.location
        )?;
    }
    Ok(())
}

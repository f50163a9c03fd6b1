//! Render lectures through a user Rhai script.
//!
//! The script defines `fn render(lecture)`; `lecture` is a map with the keys
//! `abbrev`, `name`, `tutor`, `location`, `date` (`YYYY-MM-DD`), `weekday`,
//! `time` (`H:00`), `start`, `end` (`YYYY-MM-DDTHH:MM:SS`) and `year`. The
//! returned string is written out once per lecture.
//!
//! ```rhai
//! fn render(lecture) {
//!     `${lecture.date} ${lecture.time} ${lecture.name} @ ${lecture.location}`
//! }
//! ```

use super::{Lecture, collect_lectures};
use crate::error::{Result, TimecutError};
use crate::pipeline::{HookContext, ScanHook};
use chrono::Duration;
use rhai::{AST, Dynamic, Engine, Map, Scope};
use std::io::Write;
use std::path::Path;
use tracing::info;

const RENDER_FN: &str = "render";
const MAX_SCRIPT_BYTES: u64 = 1_048_576; // 1 MiB

pub struct ScriptRenderer {
    engine: Engine,
    ast: AST,
    minutes: u32,
}

impl ScriptRenderer {
    /// Compile a template script. `minutes` sets each lecture's `end`.
    pub fn new(script: &str, minutes: u32) -> Result<Self> {
        let engine = Engine::new();
        let ast = engine
            .compile(script)
            .map_err(|e| TimecutError::TemplateCompile(format!("Error in template: {}", e)))?;
        Ok(ScriptRenderer {
            engine,
            ast,
            minutes,
        })
    }

    pub fn from_file(path: &Path, minutes: u32) -> Result<Self> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > MAX_SCRIPT_BYTES {
            return Err(TimecutError::Io(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!(
                    "Refusing to read {}: template too large ({} bytes, max {})",
                    path.display(),
                    meta.len(),
                    MAX_SCRIPT_BYTES
                ),
            )));
        }
        Self::new(&std::fs::read_to_string(path)?, minutes)
    }

    pub fn render(&self, lecture: &Lecture) -> Result<String> {
        let mut scope = Scope::new();
        let rendered = self.engine.call_fn::<String>(
            &mut scope,
            &self.ast,
            RENDER_FN,
            (self.lecture_map(lecture),),
        )?;
        Ok(rendered)
    }

    fn lecture_map(&self, lecture: &Lecture) -> Map {
        let end = lecture.start + Duration::minutes(i64::from(self.minutes));
        let mut map = Map::new();
        let mut put = |key: &str, value: Dynamic| {
            map.insert(key.into(), value);
        };
        put("abbrev", lecture.abbrev.clone().into());
        put("name", lecture.name.clone().into());
        put("tutor", lecture.tutor.clone().into());
        put("location", lecture.location.clone().into());
        put("date", lecture.date.format("%Y-%m-%d").to_string().into());
        put("weekday", lecture.date.format("%a").to_string().into());
        put("time", lecture.time.clone().into());
        put("start", lecture.start.format("%Y-%m-%dT%H:%M:%S").to_string().into());
        put("end", end.format("%Y-%m-%dT%H:%M:%S").to_string().into());
        put("year", Dynamic::from(lecture.year as rhai::INT));
        map
    }
}

/// Renders every lecture of the run into `sink`, one block per lecture.
pub struct ScriptExport {
    pub renderer: ScriptRenderer,
    pub sink: Box<dyn Write + Send>,
}

impl ScanHook for ScriptExport {
    fn name(&self) -> &str {
        "template"
    }

    fn run(&mut self, ctx: &HookContext<'_>) -> Result<()> {
        let lectures = collect_lectures(
            &ctx.sheet.grid,
            ctx.outcome,
            ctx.allow,
            ctx.config,
            ctx.year,
        );
        for lecture in &lectures {
            let rendered = self.renderer.render(lecture)?;
            writeln!(self.sink, "{}", rendered)?;
        }
        self.sink.flush()?;
        info!(lectures = lectures.len(), "rendered template");
        Ok(())
    }
}

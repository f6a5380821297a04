//! Run records: the parsed state of one benchmark execution.
//!
//! A [`RunRecord`] is built from the stdout and stderr captures of one run.
//! It instantiates every parser and handler listed in its [`RunConfig`],
//! replays stdout fully and then stderr fully (the captures carry no shared
//! timestamps, so only per-stream order is meaningful), and finally runs
//! every `check()` in registration order. A failing check aborts the record.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, Result};
use crate::metrics::METRICS;
use crate::obs;
use crate::parsers::{
    CounterLines, DepthLines, EquivLines, LineParser, ParserFactory, RunLim, Stream, TimingLines,
};
use crate::verdict::{BoundVerdict, HandlerFactory, ResultHandler, TimerVerdict};

/// Log layout produced by a family of checking tools.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    /// CEGAR-style checker: depth, equivalence, counter and timing tags plus
    /// the colourised timer summary.
    #[default]
    Cegar,
    /// MILP encoding solved externally; the verdict comes from the objective.
    Milp,
    /// Oldest layout: resource trailer with depth and equivalence tags only.
    Resources,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Cegar => "cegar",
            Dialect::Milp => "milp",
            Dialect::Resources => "resources",
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = BenchError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "cegar" => Ok(Dialect::Cegar),
            "milp" => Ok(Dialect::Milp),
            "resources" => Ok(Dialect::Resources),
            other => Err(BenchError::Config(format!("unknown dialect '{other}'"))),
        }
    }
}

/// Which parsers and handlers a run record instantiates, in registration order.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub stdout: Vec<ParserFactory>,
    pub stderr: Vec<ParserFactory>,
    pub dual: Vec<HandlerFactory>,
}

impl RunConfig {
    /// An empty configuration; add parsers with the `with_*` builders.
    pub fn empty() -> Self {
        Self {
            stdout: Vec::new(),
            stderr: Vec::new(),
            dual: Vec::new(),
        }
    }

    /// The preset for a dialect.
    pub fn for_dialect(dialect: Dialect) -> Self {
        match dialect {
            Dialect::Cegar => Self::empty()
                .with_stdout(DepthLines::factory)
                .with_stdout(EquivLines::factory)
                .with_stdout(CounterLines::factory)
                .with_stdout(TimingLines::factory)
                .with_stderr(RunLim::factory)
                .with_dual(TimerVerdict::factory),
            Dialect::Milp => Self::empty()
                .with_stderr(RunLim::factory)
                .with_dual(BoundVerdict::factory),
            Dialect::Resources => Self::empty()
                .with_stdout(DepthLines::factory)
                .with_stdout(EquivLines::factory)
                .with_stderr(RunLim::factory),
        }
    }

    pub fn with_stdout(mut self, factory: ParserFactory) -> Self {
        self.stdout.push(factory);
        self
    }

    pub fn with_stderr(mut self, factory: ParserFactory) -> Self {
        self.stderr.push(factory);
        self
    }

    pub fn with_dual(mut self, factory: HandlerFactory) -> Self {
        self.dual.push(factory);
        self
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::for_dialect(Dialect::default())
    }
}

/// Parsed state of one benchmark run.
pub struct RunRecord {
    stdout: Vec<Box<dyn LineParser>>,
    stderr: Vec<Box<dyn LineParser>>,
    dual: Vec<Box<dyn ResultHandler>>,
}

impl std::fmt::Debug for RunRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunRecord")
            .field("parsers", &self.names())
            .finish()
    }
}

impl RunRecord {
    /// Parse the stdout and stderr captures at the given paths.
    pub fn from_files(stdout: &Path, stderr: &Path, config: &RunConfig) -> Result<Self> {
        let out = File::open(stdout).map_err(|e| BenchError::io(stdout, e))?;
        let err = File::open(stderr).map_err(|e| BenchError::io(stderr, e))?;
        Self::replay(
            BufReader::new(out),
            BufReader::new(err),
            config,
            (stdout, stderr),
        )
    }

    /// Parse captures from in-memory readers.
    pub fn from_streams<O: BufRead, E: BufRead>(
        stdout: O,
        stderr: E,
        config: &RunConfig,
    ) -> Result<Self> {
        Self::replay(
            stdout,
            stderr,
            config,
            (Path::new("<stdout>"), Path::new("<stderr>")),
        )
    }

    fn replay<O: BufRead, E: BufRead>(
        stdout: O,
        stderr: E,
        config: &RunConfig,
        paths: (&Path, &Path),
    ) -> Result<Self> {
        let mut record = Self::instantiate(config)?;

        let mut lines = record.feed(stdout, Stream::Stdout, paths.0)?;
        lines += record.feed(stderr, Stream::Stderr, paths.1)?;
        METRICS.add_lines(lines);

        record.check()?;
        METRICS.inc_records_parsed();
        obs::emit_record_parsed(lines, record.succeeded());
        Ok(record)
    }

    fn instantiate(config: &RunConfig) -> Result<Self> {
        let record = Self {
            stdout: config.stdout.iter().map(|f| f()).collect(),
            stderr: config.stderr.iter().map(|f| f()).collect(),
            dual: config.dual.iter().map(|f| f()).collect(),
        };

        let names = record.names();
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(BenchError::DuplicateParser(*name));
            }
        }
        Ok(record)
    }

    /// Captures are not guaranteed to be UTF-8; invalid bytes decode to
    /// U+FFFD and are skipped by the scanners like any other stray character.
    fn feed<R: BufRead>(&mut self, mut reader: R, stream: Stream, path: &Path) -> Result<u64> {
        let parsers = match stream {
            Stream::Stdout => &mut self.stdout,
            Stream::Stderr => &mut self.stderr,
        };
        let mut count = 0;
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader
                .read_until(b'\n', &mut buf)
                .map_err(|e| BenchError::io(path, e))?;
            if read == 0 {
                break;
            }
            let text = String::from_utf8_lossy(&buf);
            let line = text.trim();
            for parser in parsers.iter_mut() {
                parser.handle(line);
            }
            for handler in self.dual.iter_mut() {
                handler.handle(line, stream);
            }
            count += 1;
        }
        Ok(count)
    }

    fn check(&self) -> Result<()> {
        for parser in self.stdout.iter().chain(self.stderr.iter()) {
            parser.check()?;
        }
        for handler in &self.dual {
            handler.check()?;
        }
        Ok(())
    }

    /// Registered parser and handler names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .map(|p| p.name())
            .chain(self.dual.iter().map(|h| h.name()))
            .collect()
    }

    /// Look up a single-stream parser by name.
    pub fn get(&self, name: &str) -> Option<&dyn LineParser> {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .find(|p| p.name() == name)
            .map(Box::as_ref)
    }

    /// Look up a dual-stream handler by name.
    pub fn handler(&self, name: &str) -> Option<&dyn ResultHandler> {
        self.dual
            .iter()
            .find(|h| h.name() == name)
            .map(Box::as_ref)
    }

    /// Typed access to a single-stream parser's state.
    pub fn parser<T: LineParser>(&self) -> Option<&T> {
        self.stdout
            .iter()
            .chain(self.stderr.iter())
            .find_map(|p| p.as_any().downcast_ref::<T>())
    }

    /// Typed access to a dual-stream handler's state.
    pub fn handler_as<T: ResultHandler>(&self) -> Option<&T> {
        self.dual
            .iter()
            .find_map(|h| h.as_any().downcast_ref::<T>())
    }

    /// The primary verdict: the first registered dual-stream handler.
    pub fn verdict(&self) -> Option<&dyn ResultHandler> {
        self.dual.first().map(Box::as_ref)
    }

    pub fn runlim(&self) -> Option<&RunLim> {
        self.parser::<RunLim>()
    }

    /// Status token from the verdict, falling back to the runlim trailer.
    pub fn status(&self) -> Option<&str> {
        self.verdict()
            .and_then(|v| v.status())
            .or_else(|| self.runlim().and_then(|r| r.status.as_deref()))
    }

    /// Whether the run succeeded; without a verdict handler this is `status == ok`.
    pub fn succeeded(&self) -> bool {
        match self.verdict() {
            Some(verdict) => verdict.did_succeed(),
            None => self.runlim().is_some_and(RunLim::is_ok),
        }
    }

    /// Equivalence flag from the verdict; `true` when no verdict handler ran.
    pub fn is_equiv(&self) -> bool {
        self.verdict().map_or(true, |v| v.is_equiv())
    }

    /// All parser and handler state as a JSON object keyed by name.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for parser in self.stdout.iter().chain(self.stderr.iter()) {
            map.insert(parser.name().to_string(), parser.snapshot());
        }
        for handler in &self.dual {
            map.insert(handler.name().to_string(), handler.snapshot());
        }
        serde_json::Value::Object(map)
    }
}

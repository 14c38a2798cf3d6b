//! Command-line runtime for the jobseek engine.
//!
//! Reads an interaction script from stdin, one command per line, feeds the resulting
//! events to the library's event handler and executes the returned actions. Time is
//! virtual: `wait` advances the clock and delivers due timer ticks, so a script
//! replays identically on every run. Lookups run on the real worker thread.
//!
//! # Script Commands
//!
//! ```text
//! type <text>          replace the query text
//! keys <text> <ms>     type <text> one character at a time, <ms> apart
//! wait <ms>            advance the clock, firing due ticks and collecting lookups
//! focus                focus the search input
//! click <x> <y>        pointer press at a position
//! click-outside        pointer press far away from the control
//! select <n>           choose suggestion n (0-based)
//! view-all             choose "view all results"
//! submit               press Enter in the search input
//! toggle <group> <v>   toggle a facet value
//! clear                clear all facet filters
//! back                 browser back
//! forward              browser forward
//! goto <location>      external navigation, e.g. /search?q=qa
//! reload <path>        swap the worker's job catalog
//! show                 print the page snapshot
//! ```
//!
//! Every command that changes what is on screen prints the page view model as one
//! JSON line; navigations print `{"navigate": "<location>"}`.
//!
//! # Example
//!
//! ```text
//! $ printf 'keys engineer 50\nwait 300\nview-all\n' | jobseek --address /search
//! ```

#![allow(clippy::multiple_crate_versions)]

use clap::Parser;
use jobseek::lookup::{JsonCatalog, LookupService};
use jobseek::search::{Bounds, Point};
use jobseek::worker::{LookupWorker, WorkerHandle, WorkerMessage};
use jobseek::{handle_event, Action, AppState, Config, Event, JobseekError, Location, Result};
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use std::time::{Duration, Instant};

/// How long to wait for the worker to answer an outstanding lookup.
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(5);

const CONTROL_BOUNDS: Bounds = Bounds {
    x: 0,
    y: 0,
    width: 640,
    height: 320,
};

#[derive(Debug, Parser)]
#[command(name = "jobseek", version, about = "Debounced job search and URL-backed facet filters, driven by a stdin script")]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, env = "JOBSEEK_CONFIG")]
    config: Option<PathBuf>,

    /// JSON job catalog (overrides `catalog_path` from the configuration)
    #[arg(long, env = "JOBSEEK_CATALOG")]
    catalog: Option<PathBuf>,

    /// Location the page is opened at
    #[arg(short, long, default_value = "/search")]
    address: String,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// One line of the interaction script.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Type(String),
    Keys { text: String, gap: Duration },
    Wait(Duration),
    Focus,
    Click(Point),
    ClickOutside,
    Select(usize),
    ViewAll,
    Submit,
    Toggle { group: String, value: String },
    Clear,
    Back,
    Forward,
    Goto(Location),
    Reload(String),
    Show,
}

impl FromStr for Command {
    type Err = JobseekError;

    fn from_str(line: &str) -> Result<Self> {
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let invalid = |what: &str| JobseekError::Config(format!("invalid script line `{line}`: {what}"));
        let millis = |s: &str| {
            s.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| invalid("expected milliseconds"))
        };

        let command = match verb {
            "type" => Self::Type(rest.to_string()),
            "keys" => {
                let (text, gap) = rest.rsplit_once(' ').ok_or_else(|| invalid("expected `keys <text> <ms>`"))?;
                Self::Keys {
                    text: text.to_string(),
                    gap: millis(gap)?,
                }
            }
            "wait" => Self::Wait(millis(rest)?),
            "focus" => Self::Focus,
            "click" => {
                let (x, y) = rest.trim().split_once(' ').ok_or_else(|| invalid("expected `click <x> <y>`"))?;
                let coord = |s: &str| s.trim().parse::<i32>().map_err(|_| invalid("expected integer coordinates"));
                Self::Click(Point { x: coord(x)?, y: coord(y)? })
            }
            "click-outside" => Self::ClickOutside,
            "select" => Self::Select(rest.trim().parse().map_err(|_| invalid("expected an index"))?),
            "view-all" => Self::ViewAll,
            "submit" => Self::Submit,
            "toggle" => {
                let (group, value) = rest.trim().split_once(' ').ok_or_else(|| invalid("expected `toggle <group> <value>`"))?;
                Self::Toggle {
                    group: group.to_string(),
                    value: value.trim().to_string(),
                }
            }
            "clear" => Self::Clear,
            "back" => Self::Back,
            "forward" => Self::Forward,
            "goto" => Self::Goto(rest.trim().parse().unwrap_or_default()),
            "reload" => Self::Reload(rest.trim().to_string()),
            "show" => Self::Show,
            other => return Err(invalid(&format!("unknown command `{other}`"))),
        };
        Ok(command)
    }
}

/// Script runtime: the library state plus the effects it asks for.
struct Runtime {
    app: AppState,
    worker: WorkerHandle,
    now: Instant,
    next_tick: Option<Instant>,
    outstanding: usize,
}

impl Runtime {
    fn new(app: AppState, worker: WorkerHandle) -> Self {
        Self {
            app,
            worker,
            now: Instant::now(),
            next_tick: None,
            outstanding: 0,
        }
    }

    fn run_command(&mut self, command: Command) -> Result<()> {
        let _span = tracing::debug_span!("script_command", command = ?command).entered();

        let render = match command {
            Command::Type(text) => self.dispatch(&Event::QueryChanged { text, now: self.now })?,
            Command::Keys { text, gap } => self.type_keys(&text, gap)?,
            Command::Wait(duration) => self.advance(duration)?,
            Command::Focus => self.dispatch(&Event::FocusIn)?,
            Command::Click(point) => self.dispatch(&Event::PointerDown { point })?,
            Command::ClickOutside => self.dispatch(&Event::PointerDown {
                point: Point { x: -10_000, y: -10_000 },
            })?,
            Command::Select(index) => self.dispatch(&Event::SelectSuggestion(index))?,
            Command::ViewAll => self.dispatch(&Event::ViewAllResults)?,
            Command::Submit => self.dispatch(&Event::Submit)?,
            Command::Toggle { group, value } => self.dispatch(&Event::ToggleFacet { group, value })?,
            Command::Clear => self.dispatch(&Event::ClearFilters)?,
            Command::Back => self.dispatch(&Event::NavigateBack)?,
            Command::Forward => self.dispatch(&Event::NavigateForward)?,
            Command::Goto(location) => self.dispatch(&Event::Navigated(location))?,
            Command::Reload(path) => {
                self.worker.post(&WorkerMessage::reload_catalog(path))?;
                self.collect_one()?
            }
            Command::Show => true,
        };

        if render {
            self.print_page()?;
        }
        Ok(())
    }

    fn type_keys(&mut self, text: &str, gap: Duration) -> Result<bool> {
        let mut render = false;
        for (i, (offset, ch)) in text.char_indices().enumerate() {
            if i > 0 {
                render |= self.advance(gap)?;
            }
            let typed = text[..offset + ch.len_utf8()].to_string();
            render |= self.dispatch(&Event::QueryChanged { text: typed, now: self.now })?;
        }
        Ok(render)
    }

    /// Moves the clock forward by `duration`, delivering every tick that falls due.
    ///
    /// Lookups issued along the way are answered before the clock moves on.
    fn advance(&mut self, duration: Duration) -> Result<bool> {
        let target = self.now + duration;
        let mut render = false;

        while let Some(at) = self.next_tick.filter(|at| *at <= target) {
            self.next_tick = None;
            self.now = self.now.max(at);
            render |= self.dispatch(&Event::Tick { now: self.now })?;
            render |= self.collect_outstanding()?;
        }

        self.now = target;
        render |= self.collect_outstanding()?;
        Ok(render)
    }

    fn collect_outstanding(&mut self) -> Result<bool> {
        let mut render = false;
        while self.outstanding > 0 {
            render |= self.collect_one()?;
            self.outstanding -= 1;
        }
        Ok(render)
    }

    fn collect_one(&mut self) -> Result<bool> {
        let response = self
            .worker
            .recv_timeout(RESPONSE_TIMEOUT)?
            .ok_or_else(|| JobseekError::Worker("timed out waiting for lookup worker".to_string()))?;
        self.dispatch(&Event::WorkerResponse(response))
    }

    fn dispatch(&mut self, event: &Event) -> Result<bool> {
        let (render, actions) = handle_event(&mut self.app, event)?;
        tracing::debug!(action_count = actions.len(), render, "event handled");
        for action in actions {
            self.execute_action(action)?;
        }
        Ok(render)
    }

    fn execute_action(&mut self, action: Action) -> Result<()> {
        match action {
            Action::PostToWorker(message) => {
                self.worker.post(&message)?;
                if matches!(message, WorkerMessage::Lookup { .. }) {
                    self.outstanding += 1;
                }
            }
            Action::ScheduleTick { at } => {
                self.next_tick = Some(self.next_tick.map_or(at, |pending| pending.max(at)));
            }
            Action::LoadResults(location) => {
                println!("{}", serde_json::json!({ "navigate": location.to_string() }));
            }
        }
        Ok(())
    }

    fn print_page(&self) -> Result<()> {
        let page = serde_json::to_string(&self.app.compute_page())
            .map_err(|e| JobseekError::Worker(format!("failed to serialize page: {e}")))?;
        println!("{page}");
        Ok(())
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if let Some(catalog) = &cli.catalog {
        config.catalog_path = Some(catalog.display().to_string());
    }
    match cli.verbose {
        0 => {}
        1 => config.trace_level = Some("debug".to_string()),
        _ => config.trace_level = Some("trace".to_string()),
    }
    Ok(config)
}

fn load_service(config: &Config) -> Result<Box<dyn LookupService>> {
    let catalog = match &config.catalog_path {
        Some(path) => JsonCatalog::from_file(&jobseek::infrastructure::expand_tilde(path))?,
        None => JsonCatalog::sample()?,
    };
    tracing::debug!(records = catalog.len(), "lookup catalog ready");
    Ok(Box::new(catalog))
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;
    jobseek::observability::init_tracing(&config);

    let initial: Location = cli.address.parse().unwrap_or_default();
    let worker = LookupWorker::new(load_service(&config)?).spawn()?;
    let mut runtime = Runtime::new(jobseek::initialize(&config, initial), worker);

    runtime.dispatch(&Event::Mount)?;
    runtime.dispatch(&Event::Layout { bounds: CONTROL_BOUNDS })?;
    runtime.print_page()?;

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let line = line.trim_end();
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => runtime.run_command(command)?,
            Err(e) => tracing::warn!(error = %e, "skipping script line"),
        }
    }

    runtime.collect_outstanding()?;
    runtime.dispatch(&Event::Unmount)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

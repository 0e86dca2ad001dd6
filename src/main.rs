// SPDX-License-Identifier: MIT
//
// vimterp: run Vim-style key scripts against a text file, headless.
//
// The binary wires the interpreter core to the filesystem:
//
//   --keys / --script → parse_keys → Engine::feed_key → Buffer edits
//   Host requests     → save, reload, new buffer, close
//
// The engine never touches files itself. It asks its host, and the host
// here queues each request so the loop below can carry it out against the
// buffer between keys. Messages and errors go to stderr, the final text to
// stdout with `--print`.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Parser};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use vimterp_core::key::parse_keys;
use vimterp_core::options::Options;
use vimterp_core::{Buffer, Engine, EngineError, Host, Mode, TextBuffer};

// ─── CLI ────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "vimterp", version, about = "Run Vim key scripts against a text file")]
struct Args {
    /// File to edit. Without one the script runs on an empty, unnamed buffer.
    file: Option<PathBuf>,

    /// Keys in Vim notation, e.g. `dd3j<Esc>:w<CR>`.
    #[arg(short, long)]
    keys: Option<String>,

    /// Read the keys from a file (`-` for stdin). Line breaks are ignored;
    /// write `<CR>` for Enter.
    #[arg(short, long, conflicts_with = "keys")]
    script: Option<PathBuf>,

    /// TOML file with option defaults (`shiftwidth`, `expandtab`, ...).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the final buffer to stdout.
    #[arg(short, long)]
    print: bool,

    /// More logging (`-v` debug, `-vv` trace). `RUST_LOG` wins when set.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

// ─── Errors ─────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config {}: shiftwidth must be at least 1", path.display())]
    ZeroShiftWidth { path: PathBuf },
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: EngineError },

    #[error("cannot read key script: {0}")]
    Script(#[source] io::Error),

    #[error("cannot write output: {0}")]
    Output(#[source] io::Error),
}

// ─── Configuration ──────────────────────────────────────────────────────────

fn load_options(path: Option<&Path>) -> Result<Options, ConfigError> {
    let Some(path) = path else {
        return Ok(Options::default());
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_options(&text, path)
}

fn parse_options(text: &str, path: &Path) -> Result<Options, ConfigError> {
    let options: Options = toml::from_str(text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if options.shiftwidth == 0 {
        return Err(ConfigError::ZeroShiftWidth {
            path: path.to_path_buf(),
        });
    }
    Ok(options)
}

// ─── Host ───────────────────────────────────────────────────────────────────

/// Something the engine asked for that needs the buffer or the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Save,
    Reload,
    NewFile,
    Close,
}

/// Headless host: queues file requests, prints messages and errors.
#[derive(Debug, Default)]
struct ScriptHost {
    requests: Vec<Request>,
    clipboard: Option<String>,
    errors: usize,
}

impl Host for ScriptHost {
    fn save(&mut self) {
        self.requests.push(Request::Save);
    }

    fn close(&mut self) {
        self.requests.push(Request::Close);
    }

    fn new_file(&mut self) {
        self.requests.push(Request::NewFile);
    }

    fn reload(&mut self) {
        self.requests.push(Request::Reload);
    }

    fn open_dialog(&mut self) {
        eprintln!("vimterp: no file dialog in headless mode");
    }

    fn next_tab(&mut self) {
        debug!("single buffer, no next tab");
    }

    fn prev_tab(&mut self) {
        debug!("single buffer, no previous tab");
    }

    fn goto_tab(&mut self, index: usize) {
        debug!(index, "single buffer, no tab to go to");
    }

    fn set_clipboard(&mut self, text: &str) {
        self.clipboard = Some(text.to_string());
    }

    fn mode_changed(&mut self, mode: Mode) {
        debug!(%mode, "mode");
    }

    fn report(&mut self, error: &EngineError) {
        self.errors += 1;
        eprintln!("vimterp: {error}");
    }

    fn message(&mut self, text: &str) {
        eprintln!("{text}");
    }
}

// ─── Session ────────────────────────────────────────────────────────────────

/// Whether the script keeps running after a batch of requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// Feed `script` key by key, carrying out host requests as they arrive.
/// Stops early on `:q` / `ZZ`.
fn run_script(engine: &mut Engine<Buffer, ScriptHost>, script: &str) -> Flow {
    for key in parse_keys(script) {
        engine.feed_key(key);
        if apply_requests(engine) == Flow::Quit {
            return Flow::Quit;
        }
    }
    Flow::Continue
}

fn apply_requests(engine: &mut Engine<Buffer, ScriptHost>) -> Flow {
    let requests = std::mem::take(&mut engine.host_mut().requests);
    for request in requests {
        debug!(?request, "host request");
        let result = match request {
            Request::Save => engine.buffer_mut().save(),
            Request::Reload => engine.buffer_mut().reload(),
            Request::NewFile => {
                *engine.buffer_mut() = Buffer::new();
                Ok(())
            }
            Request::Close => return Flow::Quit,
        };
        match result {
            Ok(()) => {
                if request == Request::Save {
                    let path = engine.buffer().path().map(Path::to_path_buf);
                    info!(?path, "written");
                }
            }
            Err(err) => {
                warn!(%err, ?request, "host request failed");
                engine.host_mut().report(&err);
            }
        }
    }
    Flow::Continue
}

fn read_script(args: &Args) -> Result<String, AppError> {
    let raw = match (&args.keys, &args.script) {
        (Some(keys), _) => return Ok(keys.clone()),
        (None, Some(path)) if path.as_os_str() == "-" => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text).map_err(AppError::Script)?;
            text
        }
        (None, Some(path)) => fs::read_to_string(path).map_err(AppError::Script)?,
        (None, None) => String::new(),
    };
    Ok(strip_line_breaks(&raw))
}

/// Script files spread keys over lines for readability; the breaks are not
/// keys.
fn strip_line_breaks(text: &str) -> String {
    text.lines().collect()
}

fn open_buffer(path: Option<&Path>) -> Result<Buffer, AppError> {
    match path {
        Some(path) if path.exists() => Buffer::from_file(path).map_err(|source| AppError::Open {
            path: path.to_path_buf(),
            source,
        }),
        Some(path) => {
            // New file: `:w` creates it.
            let mut buffer = Buffer::new();
            buffer.set_path(path.to_path_buf());
            Ok(buffer)
        }
        None => Ok(Buffer::new()),
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn run(args: &Args) -> Result<usize, AppError> {
    let options = load_options(args.config.as_deref())?;
    let buffer = open_buffer(args.file.as_deref())?;
    debug!(
        line_ending = %buffer.line_ending(),
        lines = buffer.line_count(),
        "buffer opened"
    );
    let script = read_script(args)?;

    let mut engine = Engine::with_options(buffer, ScriptHost::default(), options);
    let flow = run_script(&mut engine, &script);

    let cursor = engine.buffer().position(engine.buffer().cursor());
    info!(mode = %engine.mode(), %cursor, ?flow, "script done");

    let (buffer, host) = engine.into_parts();
    if let Some(text) = &host.clipboard {
        debug!(len = text.len(), "clipboard at exit");
    }
    if buffer.is_modified() && buffer.path().is_some() {
        warn!("unsaved changes were not written");
    }
    if args.print {
        let mut out = io::stdout().lock();
        out.write_all(buffer.text().as_bytes())
            .and_then(|()| out.flush())
            .map_err(AppError::Output)?;
    }
    Ok(host.errors)
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(0) => {}
        Ok(errors) => {
            debug!(errors, "script reported errors");
            process::exit(2);
        }
        Err(e) => {
            eprintln!("vimterp: {e}");
            process::exit(1);
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn engine_with(text: &str) -> Engine<Buffer, ScriptHost> {
        Engine::new(Buffer::from_text(text), ScriptHost::default())
    }

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("vimterp-{}-{name}", process::id()))
    }

    // ── Configuration ─────────────────────────────────────────────────────

    #[test]
    fn config_fills_missing_keys_with_defaults() {
        let options = parse_options("shiftwidth = 2\nhlsearch = false\n", Path::new("c.toml"))
            .unwrap();
        assert_eq!(
            options,
            Options {
                shiftwidth: 2,
                hlsearch: false,
                ..Options::default()
            }
        );
    }

    #[test]
    fn config_errors() {
        let path = Path::new("c.toml");
        assert!(matches!(
            parse_options("shiftwidth = \"wide\"", path),
            Err(ConfigError::Parse { .. })
        ));
        assert!(matches!(
            parse_options("shiftwidth = 0", path),
            Err(ConfigError::ZeroShiftWidth { .. })
        ));
        assert!(matches!(
            load_options(Some(Path::new("/nonexistent/vimterp.toml"))),
            Err(ConfigError::Read { .. })
        ));
    }

    #[test]
    fn no_config_means_defaults() {
        assert_eq!(load_options(None).unwrap(), Options::default());
    }

    // ── Scripts ───────────────────────────────────────────────────────────

    #[test]
    fn script_edits_the_buffer() {
        let mut e = engine_with("one\ntwo\nthree");
        assert_eq!(run_script(&mut e, "jddGp"), Flow::Continue);
        assert_eq!(e.buffer().text(), "one\nthree\ntwo");
    }

    #[test]
    fn quit_stops_the_script() {
        let mut e = engine_with("abc");
        assert_eq!(run_script(&mut e, "x:q<CR>x"), Flow::Quit);
        assert_eq!(e.buffer().text(), "bc");
    }

    #[test]
    fn save_without_a_path_is_reported() {
        let mut e = engine_with("abc");
        run_script(&mut e, ":w<CR>");
        assert_eq!(e.host().errors, 1);
    }

    #[test]
    fn new_file_replaces_the_buffer() {
        let mut e = engine_with("abc");
        run_script(&mut e, ":n<CR>ihi<Esc>");
        assert_eq!(e.buffer().text(), "hi");
        assert_eq!(e.buffer().path(), None);
    }

    #[test]
    fn yanks_reach_the_host_clipboard() {
        let mut e = engine_with("abc\ndef");
        run_script(&mut e, "jyy");
        assert_eq!(e.host().clipboard.as_deref(), Some("def\n"));
    }

    #[test]
    fn write_quit_round_trip() {
        let path = temp_path("roundtrip.txt");
        fs::write(&path, "alpha\r\nbeta\r\n").unwrap();

        let mut e = Engine::new(open_buffer(Some(&path)).unwrap(), ScriptHost::default());
        assert_eq!(run_script(&mut e, "ddp:wq<CR>"), Flow::Quit);
        assert_eq!(e.host().errors, 0);
        assert_eq!(fs::read_to_string(&path).unwrap(), "beta\r\nalpha\r\n");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn reload_discards_unsaved_edits() {
        let path = temp_path("reload.txt");
        fs::write(&path, "keep me").unwrap();

        let mut e = Engine::new(open_buffer(Some(&path)).unwrap(), ScriptHost::default());
        run_script(&mut e, "dd:e<CR>");
        assert_eq!(e.buffer().text(), "keep me");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_starts_empty_with_its_path() {
        let path = temp_path("missing.txt");
        let buffer = open_buffer(Some(&path)).unwrap();
        assert!(buffer.is_empty());
        assert_eq!(buffer.path(), Some(path.as_path()));
    }

    #[test]
    fn script_line_breaks_are_not_keys() {
        assert_eq!(strip_line_breaks("dd\n3j\r\n:w<CR>\n"), "dd3j:w<CR>");
    }
}

use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use codepanel::app::CodePanelController;
use codepanel::config::Config;
use codepanel::config_io::DirectoryContext;
use codepanel::input::keybindings;
use codepanel::model::GenerationResponse;
use codepanel::services::clipboard::{ClipboardService, MemoryClipboard};
use codepanel::services::generation::{load_response_file, GenerationClient, GenerationSession};
use codepanel::services::terminal_modes::{self, TerminalModes};
use codepanel::services::time_source::RealTimeSource;
use codepanel::services::{log_dirs, tracing_setup};
use crossterm::event::{poll as event_poll, read as event_read, Event as CrosstermEvent, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Browse AI-generated source files in a terminal file tree and code viewer
#[derive(Parser, Debug)]
#[command(name = "codepanel")]
#[command(about = "A terminal file tree and code viewer for generated artifacts", long_about = None)]
#[command(version)]
struct Args {
    /// Generation response (JSON) to display. Use "-" for stdin.
    #[arg(value_name = "RESPONSE")]
    response: Option<PathBuf>,

    /// Send this prompt to the generation service on startup
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Generation service base URL (overrides the config)
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file for diagnostics (default: per-user log directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Start with the code panel closed
    #[arg(long)]
    closed: bool,

    /// Reopen the last successful generation response
    #[arg(long, conflicts_with = "response")]
    resume: bool,

    /// Print the file tree of the response and exit
    #[arg(long)]
    print_tree: bool,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the directories used by codepanel and exit
    #[arg(long)]
    show_paths: bool,

    /// Override the locale (e.g., 'en')
    #[arg(long, value_name = "LOCALE")]
    locale: Option<String>,
}

fn load_config(args: &Args, dir_context: &DirectoryContext) -> AnyhowResult<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => {
            let working_dir = std::env::current_dir().unwrap_or_default();
            Config::load_for_working_dir(&working_dir, dir_context)
        }
    };

    if let Some(endpoint) = &args.endpoint {
        config.generation.endpoint = endpoint.clone();
    }
    if args.closed {
        config.panel.start_open = false;
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// Response named on the command line, or the archived one for `--resume`
fn initial_response(
    args: &Args,
    dir_context: &DirectoryContext,
) -> AnyhowResult<Option<GenerationResponse>> {
    if let Some(path) = &args.response {
        let response = load_response_file(path)
            .with_context(|| format!("Failed to read response from {}", path.display()))?;
        return Ok(Some(response));
    }

    if args.resume {
        let path = dir_context.last_response_path();
        if !path.exists() {
            anyhow::bail!("No saved response at {}", path.display());
        }
        let response = load_response_file(&path)
            .with_context(|| format!("Failed to read saved response {}", path.display()))?;
        return Ok(Some(response));
    }

    Ok(None)
}

fn print_tree(config: Config, response: Option<GenerationResponse>) {
    let indent = config.panel.indent;
    let mut panel = CodePanelController::new(
        config,
        ClipboardService::memory(MemoryClipboard::new()),
        RealTimeSource::shared(),
    );
    if let Some(response) = response {
        panel.load_response(response);
    }

    for issue in panel.issues() {
        eprintln!("warning: {}", issue);
    }
    if let Some(view) = panel.file_tree() {
        print!(
            "{}",
            codepanel::ui::file_explorer::outline(view, panel.selection(), indent)
        );
    }
}

fn init_logging(log_file: &Path) -> Option<codepanel::services::warning_log::WarningLogHandle> {
    let handle = tracing_setup::init_global(log_file);
    log_dirs::cleanup_stale_logs();
    tracing::info!("codepanel starting");

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    handle
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    let dir_context =
        DirectoryContext::from_system().context("Failed to determine codepanel directories")?;

    if args.show_paths {
        log_dirs::print_all_paths(&dir_context.config_dir);
        return Ok(());
    }

    let config = load_config(&args, &dir_context)?;

    if args.dump_config {
        let json =
            serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    if let Some(locale) = &args.locale {
        rust_i18n::set_locale(locale);
    }

    // Read the response before raw mode takes over stdin
    let response = initial_response(&args, &dir_context)?;

    if args.print_tree {
        print_tree(config, response);
        return Ok(());
    }

    let log_file = args.log_file.clone().unwrap_or_else(log_dirs::main_log_path);
    let warning_log_handle = init_logging(&log_file);

    let backend: Arc<GenerationClient> = Arc::new(GenerationClient::new(&config.generation));
    tracing::info!("Generation endpoint: {}", backend.url());

    let clipboard = ClipboardService::system(config.viewer.osc52_clipboard);
    let mut panel = CodePanelController::new(config, clipboard, RealTimeSource::shared());
    panel.set_generation_session(GenerationSession::new(backend));
    panel.set_response_archive(dir_context.last_response_path());
    if let Some(handle) = warning_log_handle {
        tracing::debug!("Warnings are also written to {}", handle.path.display());
        panel.set_warning_receiver(handle.receiver);
    }

    if let Some(response) = response {
        panel.load_response(response);
    }
    if let Some(prompt) = args.prompt.clone() {
        panel.request_generation(prompt);
    }

    let mut terminal_modes = TerminalModes::enable().context("Failed to set up the terminal")?;
    let mut terminal =
        Terminal::new(CrosstermBackend::new(stdout())).context("Failed to create terminal")?;
    terminal.clear().context("Failed to clear terminal")?;

    let result = run_event_loop(&mut panel, &mut terminal);

    terminal_modes.undo();
    tracing::info!("codepanel exiting");
    result.context("Event loop returned an error")
}

fn run_event_loop(
    panel: &mut CodePanelController,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16);
    const IDLE_POLL: Duration = Duration::from_millis(50);

    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        // Background work (copies, generation, expiring notifications) can change the screen
        let before = render_key(panel);
        panel.tick();
        if render_key(panel) != before || panel.is_generating() {
            needs_render = true;
        }

        if panel.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| codepanel::ui::render(frame, panel))?;
            last_render = Instant::now();
            needs_render = false;
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            IDLE_POLL
        };
        if !event_poll(timeout)? {
            continue;
        }

        match event_read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press {
                    if let Some(action) = keybindings::resolve(&key_event, panel.key_context()) {
                        tracing::trace!("Key {:?} -> {:?}", key_event.code, action);
                        panel.handle_action(action);
                    }
                    needs_render = true;
                }
            }
            CrosstermEvent::Paste(text) => {
                panel.handle_paste(&text);
                needs_render = true;
            }
            CrosstermEvent::Resize(_, _) => needs_render = true,
            _ => {}
        }
    }

    Ok(())
}

/// Cheap fingerprint of the state `tick()` can change
fn render_key(panel: &CodePanelController) -> (u64, Option<String>, usize) {
    (
        panel.epoch(),
        panel.notification().map(|n| n.message.clone()),
        panel.warning_count(),
    )
}

// Test harness driving a CodePanelController against a virtual terminal

use codepanel::app::CodePanelController;
use codepanel::config::Config;
use codepanel::input::keybindings;
use codepanel::model::Artifact;
use codepanel::services::clipboard::{ClipboardService, MemoryClipboard};
use codepanel::services::time_source::TestTimeSource;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::backend::TestBackend;
use ratatui::Terminal;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Panel plus a `TestBackend` terminal, a controllable clock and an
/// in-memory clipboard
pub struct PanelTestHarness {
    panel: CodePanelController,
    terminal: Terminal<TestBackend>,
    time: Arc<TestTimeSource>,
    clipboard: MemoryClipboard,
}

impl PanelTestHarness {
    /// Harness with highlighting off so screens only depend on the text
    pub fn new(width: u16, height: u16) -> anyhow::Result<Self> {
        let mut config = Config::default();
        config.viewer.syntax_highlighting = false;
        Self::with_config(width, height, config)
    }

    pub fn with_config(width: u16, height: u16, config: Config) -> anyhow::Result<Self> {
        Self::with_clipboard(width, height, config, MemoryClipboard::new())
    }

    pub fn with_clipboard(
        width: u16,
        height: u16,
        config: Config,
        clipboard: MemoryClipboard,
    ) -> anyhow::Result<Self> {
        super::tracing::init_tracing_from_env();

        let time = TestTimeSource::shared();
        let panel = CodePanelController::new(
            config,
            ClipboardService::memory(clipboard.clone()),
            time.clone(),
        );
        let terminal = Terminal::new(TestBackend::new(width, height))?;

        Ok(Self {
            panel,
            terminal,
            time,
            clipboard,
        })
    }

    pub fn panel(&self) -> &CodePanelController {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut CodePanelController {
        &mut self.panel
    }

    pub fn clipboard(&self) -> &MemoryClipboard {
        &self.clipboard
    }

    /// Load artifacts and draw
    pub fn load(&mut self, artifacts: Vec<Artifact>) -> anyhow::Result<()> {
        self.panel.load_artifacts(artifacts);
        self.render()
    }

    /// Resolve a key the way the event loop does, apply it, tick and draw
    pub fn send_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> anyhow::Result<()> {
        let event = KeyEvent::new(code, modifiers);
        if let Some(action) = keybindings::resolve(&event, self.panel.key_context()) {
            self.panel.handle_action(action);
        }
        self.panel.tick();
        self.render()
    }

    /// Send a plain key several times
    pub fn send_key_repeat(&mut self, code: KeyCode, count: usize) -> anyhow::Result<()> {
        for _ in 0..count {
            self.send_key(code, KeyModifiers::NONE)?;
        }
        Ok(())
    }

    pub fn type_text(&mut self, text: &str) -> anyhow::Result<()> {
        for c in text.chars() {
            self.send_key(KeyCode::Char(c), KeyModifiers::NONE)?;
        }
        Ok(())
    }

    pub fn render(&mut self) -> anyhow::Result<()> {
        let panel = &mut self.panel;
        self.terminal
            .draw(|frame| codepanel::ui::render(frame, panel))?;
        Ok(())
    }

    /// Move the test clock forward, then tick and draw
    pub fn advance_time(&mut self, duration: Duration) -> anyhow::Result<()> {
        self.time.advance(duration);
        self.panel.tick();
        self.render()
    }

    /// Tick until `condition` holds; background work runs on real threads
    pub fn wait_until<F>(&mut self, mut condition: F) -> anyhow::Result<()>
    where
        F: FnMut(&Self) -> bool,
    {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            self.panel.tick();
            self.render()?;
            if condition(self) {
                return Ok(());
            }
            if Instant::now() > deadline {
                anyhow::bail!("condition not met within 5s; screen:\n{}", self.screen_to_string());
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    /// Screen contents, one line per row, trailing spaces removed
    pub fn screen_to_string(&self) -> String {
        let buffer = self.terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| self.row_text(y))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn row_text(&self, y: u16) -> String {
        let buffer = self.terminal.backend().buffer();
        let row: String = (0..buffer.area.width)
            .map(|x| buffer[(x, y)].symbol().to_string())
            .collect();
        row.trim_end().to_string()
    }

    /// Row index of the first line containing `text`
    pub fn find_row(&self, text: &str) -> Option<u16> {
        let height = self.terminal.backend().buffer().area.height;
        (0..height).find(|&y| self.row_text(y).contains(text))
    }

    pub fn assert_screen_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            screen.contains(text),
            "expected screen to contain {text:?}, screen was:\n{screen}"
        );
    }

    pub fn assert_screen_not_contains(&self, text: &str) {
        let screen = self.screen_to_string();
        assert!(
            !screen.contains(text),
            "expected screen not to contain {text:?}, screen was:\n{screen}"
        );
    }
}

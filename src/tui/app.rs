use crate::config::AppConfig;
use crate::debounce::Debouncer;
use crate::diagnostics::{self, Diagnostics};
use crate::fetch::FetchController;
use crate::remote::ContactSource;
use crate::tui::search::SearchState;
use crate::tui::table::TableState;
use crate::tui::ui;
use crossbeam_channel::{Receiver, TryRecvError};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::DefaultTerminal;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct App {
    // Input
    pub search: SearchState,
    pub debouncer: Debouncer<String>,

    // Data
    pub fetch: FetchController,
    pub table: TableState,

    // Diagnostics strip
    pub diagnostics: Diagnostics,
    diagnostics_rx: Option<Receiver<Diagnostics>>,

    // Animation
    pub spinner_frame: usize,

    // Quit flag
    pub should_quit: bool,
}

impl App {
    /// Mount the view: the first retrieval and the diagnostics probe start
    /// immediately.
    pub fn new(source: Arc<dyn ContactSource>, config: &AppConfig) -> Self {
        let initial = config.initial_query.clone();

        let mut fetch = FetchController::new(Arc::clone(&source));
        fetch.retrieve(&initial);

        Self {
            search: SearchState::with_query(initial.clone()),
            debouncer: Debouncer::new(initial, config.debounce),
            fetch,
            table: TableState::default(),
            diagnostics: Diagnostics::default(),
            diagnostics_rx: Some(diagnostics::spawn(source)),
            spinner_frame: 0,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> crate::Result<()> {
        let tick_rate = Duration::from_millis(80);
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|frame| ui::draw(frame, self))?;

            // Never sleep past a pending debounce deadline.
            let mut timeout = tick_rate.saturating_sub(last_tick.elapsed());
            if let Some(due) = self.debouncer.time_until_due(Instant::now()) {
                timeout = timeout.min(due);
            }

            if event::poll(timeout)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key, Instant::now());
                    }
                }
            }

            self.tick(Instant::now());

            if last_tick.elapsed() >= tick_rate {
                self.spinner_frame = self.spinner_frame.wrapping_add(1);
                last_tick = Instant::now();
            }

            if self.should_quit {
                // Teardown: a pending query must not fire after unmount.
                self.debouncer.cancel();
                info!("leaving contact view");
                return Ok(());
            }
        }
    }

    /// Advance timers and apply background results. Returns whether
    /// anything visible changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(query) = self.debouncer.poll(now) {
            debug!(%query, "search settled");
            self.fetch.retrieve(&query);
            changed = true;
        }

        if self.fetch.pump() {
            self.table.reset(self.fetch.machine().contacts().len());
            // Hand the keyboard to the error panel unless an edit is in flight.
            if self.fetch.machine().error().is_some() && !self.debouncer.is_pending() {
                self.search.focused = false;
            }
            changed = true;
        }

        if let Some(rx) = &self.diagnostics_rx {
            match rx.try_recv() {
                Ok(diagnostics) => {
                    self.diagnostics = diagnostics;
                    self.diagnostics_rx = None;
                    changed = true;
                }
                Err(TryRecvError::Disconnected) => self.diagnostics_rx = None,
                Err(TryRecvError::Empty) => {}
            }
        }

        changed
    }

    /// Re-issue the current query after a failure.
    pub fn retry(&mut self) {
        if let Some(ticket) = self.fetch.retry() {
            info!(ticket = ticket.id(), "retrying contact fetch");
        }
    }

    // --- Key handling ---

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        // Global keys
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q')
                if key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.should_quit = true;
                return;
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.retry();
                return;
            }
            KeyCode::Esc => {
                if self.search.focused && !self.search.query.is_empty() {
                    self.search.clear();
                    self.query_changed(now);
                } else if self.search.focused {
                    self.search.focused = false;
                } else {
                    self.should_quit = true;
                }
                return;
            }
            _ => {}
        }

        if self.search.focused {
            self.handle_search_key(key, now);
        } else {
            self.handle_table_key(key, now);
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent, now: Instant) {
        match key.code {
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.insert(c);
                self.query_changed(now);
            }
            KeyCode::Backspace => {
                if self.search.backspace() {
                    self.query_changed(now);
                }
            }
            KeyCode::Delete => {
                if self.search.delete() {
                    self.query_changed(now);
                }
            }
            KeyCode::Left => self.search.move_left(),
            KeyCode::Right => self.search.move_right(),
            KeyCode::Home => self.search.home(),
            KeyCode::End => self.search.end(),
            KeyCode::Enter
                if self.fetch.machine().error().is_some() && !self.debouncer.is_pending() =>
            {
                self.retry();
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.search.focused = false;
            }
            _ => {}
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent, now: Instant) {
        let total = self.fetch.machine().contacts().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.table.select_prev(total),
            KeyCode::Down | KeyCode::Char('j') => self.table.select_next(total),
            KeyCode::PageUp => self.table.page_up(total),
            KeyCode::PageDown => self.table.page_down(total),
            KeyCode::Home => self.table.select_first(total),
            KeyCode::End => self.table.select_last(total),

            KeyCode::Char('r') | KeyCode::Enter if self.fetch.machine().error().is_some() => {
                self.retry();
            }

            KeyCode::Tab | KeyCode::Char('/') => {
                self.search.focused = true;
            }

            // Any other printable char focuses search and types it
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.search.focused = true;
                self.search.end();
                self.search.insert(c);
                self.query_changed(now);
            }

            _ => {}
        }
    }

    fn query_changed(&mut self, now: Instant) {
        self.debouncer.arm(self.search.query.clone(), now);
    }
}

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::app::{CommandOutcome, TodoApp};
use crate::config::Config;
use crate::error::Result;
use crate::filter::FilterMode;
use crate::notice::{Notice, NoticeQueue};
use crate::render::{ListView, TaskRow};
use crate::storage::KeyValueStore;

use super::editor::{EditorAction, EditorKind, EditorState};
use super::view;

const EVENT_POLL_MS: u64 = 120;
/// Overdue badges depend on the clock, so the list is rebuilt this often
const CLOCK_REFRESH_SECS: u64 = 30;

pub(crate) struct DeleteConfirmState {
    pub(crate) task_id: String,
    pub(crate) text: String,
}

pub struct AppState<K> {
    pub(crate) todo: TodoApp<K>,
    pub(crate) view: ListView,
    pub(crate) selected: usize,
    pub(crate) editor: Option<EditorState>,
    pub(crate) delete_confirm: Option<DeleteConfirmState>,
    pub(crate) show_help: bool,
    pub(crate) notices: NoticeQueue,
}

impl<K: KeyValueStore> AppState<K> {
    pub fn new(todo: TodoApp<K>, notices: NoticeQueue, now: Instant) -> Self {
        let view = todo.view();
        let mut app = Self {
            todo,
            view,
            selected: 0,
            editor: None,
            delete_confirm: None,
            show_help: false,
            notices,
        };
        let warnings = app.todo.load_warnings().to_vec();
        for warning in warnings {
            app.notices.push(Notice::warning(warning), now);
        }
        app
    }

    pub fn view(&self) -> &ListView {
        &self.view
    }

    pub fn selected_row(&self) -> Option<&TaskRow> {
        self.view.rows().get(self.selected)
    }

    /// Rebuild the list from the store, keeping the selection in range
    pub fn refresh(&mut self) {
        self.view = self.todo.view();
        self.clamp_selection();
    }

    /// Drop expired notices; true when something changed on screen
    pub fn tick(&mut self, now: Instant) -> bool {
        !self.notices.expire(now).is_empty()
    }

    pub(crate) fn footer_hint(&self) -> &'static str {
        if self.delete_confirm.is_some() {
            return "y confirm delete  esc cancel";
        }
        if self.editor.is_some() {
            return "tab next field  enter save  esc cancel";
        }
        "a add  e edit  space toggle  d delete  tab filter  ? help  q quit"
    }

    /// Handle one key press; returns true when the view should close
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }

        if let Some(confirm) = self.delete_confirm.take() {
            match key.code {
                KeyCode::Char('y') | KeyCode::Enter => {
                    let result = self.todo.delete(&confirm.task_id);
                    self.apply(result, now);
                }
                KeyCode::Char('n') | KeyCode::Char('q') | KeyCode::Esc => {}
                _ => self.delete_confirm = Some(confirm),
            }
            return false;
        }

        if let Some(mut editor) = self.editor.take() {
            match editor.handle_key(key) {
                EditorAction::None => self.editor = Some(editor),
                EditorAction::Cancel => {
                    if editor.kind() == EditorKind::EditTask {
                        self.todo.cancel_edit();
                    }
                }
                EditorAction::Submit => self.submit_editor(editor, now),
            }
            return false;
        }

        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return false;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('?') => self.show_help = true,
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(-1),
            KeyCode::Home | KeyCode::Char('g') => self.selected = 0,
            KeyCode::End | KeyCode::Char('G') => {
                self.selected = self.view.rows().len().saturating_sub(1);
            }
            KeyCode::Char('a') => {
                self.todo.cancel_edit();
                self.editor = Some(EditorState::new_task());
            }
            KeyCode::Char('e') | KeyCode::Enter => self.open_editor(now),
            KeyCode::Char(' ') | KeyCode::Char('x') => {
                if let Some(id) = self.selected_id() {
                    let result = self.todo.toggle(&id);
                    self.apply(result, now);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(row) = self.selected_row() {
                    self.delete_confirm = Some(DeleteConfirmState {
                        task_id: row.id.clone(),
                        text: row.text.clone(),
                    });
                }
            }
            KeyCode::Char('1') => self.set_filter(FilterMode::All),
            KeyCode::Char('2') => self.set_filter(FilterMode::Active),
            KeyCode::Char('3') => self.set_filter(FilterMode::Completed),
            KeyCode::Tab => self.set_filter(self.todo.filter().next()),
            _ => {}
        }
        false
    }

    fn open_editor(&mut self, now: Instant) {
        let Some(id) = self.selected_id() else {
            return;
        };
        match self.todo.begin_edit(&id) {
            Ok(input) => self.editor = Some(EditorState::edit_task(&input)),
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()), now);
                self.refresh();
            }
        }
    }

    fn submit_editor(&mut self, mut editor: EditorState, now: Instant) {
        let input = match editor.build_input(self.todo.now().date()) {
            Ok(input) => input,
            Err(message) => {
                editor.set_error(message);
                self.editor = Some(editor);
                return;
            }
        };
        match self.todo.submit(input) {
            Ok(outcome) => {
                let id = outcome.task.id.clone();
                self.show_outcome(outcome, now);
                self.select_id(&id);
            }
            Err(err) => {
                editor.set_error(err.to_string());
                self.editor = Some(editor);
            }
        }
    }

    fn apply(&mut self, result: Result<CommandOutcome>, now: Instant) {
        match result {
            Ok(outcome) => self.show_outcome(outcome, now),
            Err(err) => {
                self.notices.push(Notice::error(err.to_string()), now);
                self.refresh();
            }
        }
    }

    fn show_outcome(&mut self, outcome: CommandOutcome, now: Instant) {
        for notice in outcome.notices {
            self.notices.push(notice, now);
        }
        self.view = outcome.view;
        self.clamp_selection();
    }

    fn set_filter(&mut self, filter: FilterMode) {
        let previous = self.selected_id();
        self.view = self.todo.set_filter(filter);
        match previous {
            Some(id) => self.select_id(&id),
            None => self.clamp_selection(),
        }
    }

    fn selected_id(&self) -> Option<String> {
        self.selected_row().map(|row| row.id.clone())
    }

    fn select_id(&mut self, id: &str) {
        match self.view.rows().iter().position(|row| row.id == id) {
            Some(pos) => self.selected = pos,
            None => self.clamp_selection(),
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let len = self.view.rows().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        let next = (self.selected as isize + delta).clamp(0, len as isize - 1);
        self.selected = next as usize;
    }

    fn clamp_selection(&mut self) {
        let len = self.view.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }
}

/// Run the interactive view until the user quits
pub fn run<K: KeyValueStore>(todo: TodoApp<K>, config: &Config) -> Result<()> {
    let notices = NoticeQueue::new(Duration::from_millis(config.notices.ttl_ms));
    let mut app = AppState::new(todo, notices, Instant::now());
    run_terminal(&mut app)
}

fn run_terminal<K: KeyValueStore>(app: &mut AppState<K>) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_loop<K: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut AppState<K>,
) -> Result<()> {
    let mut dirty = true;
    let mut last_refresh = Instant::now();
    loop {
        let now = Instant::now();
        if app.tick(now) {
            dirty = true;
        }
        if now.duration_since(last_refresh) >= Duration::from_secs(CLOCK_REFRESH_SECS) {
            app.refresh();
            last_refresh = now;
            dirty = true;
        }

        if dirty {
            terminal.draw(|frame| view::render(frame, app))?;
            dirty = false;
        }

        if event::poll(Duration::from_millis(EVENT_POLL_MS))? {
            match event::read()? {
                Event::Key(key) => {
                    if handle_key_event(app, key) {
                        break;
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event<K: KeyValueStore>(app: &mut AppState<K>, key: KeyEvent) -> bool {
    // Windows reports both press and release
    if key.kind != event::KeyEventKind::Press {
        return false;
    }
    app.handle_key(key, Instant::now())
}

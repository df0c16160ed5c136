use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::TaskInput;
use crate::task::{format_due_time, parse_due_date, parse_due_time, DATE_FORMAT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    NewTask,
    EditTask,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFieldId {
    Text,
    Date,
    Time,
}

#[derive(Debug, Clone)]
pub struct EditorField {
    pub id: EditorFieldId,
    pub label: &'static str,
    pub value: String,
    pub required: bool,
    pub hint: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAction {
    None,
    Cancel,
    Submit,
}

/// Add/edit form. Values stay as typed until a submit succeeds.
#[derive(Debug, Clone)]
pub struct EditorState {
    kind: EditorKind,
    fields: Vec<EditorField>,
    active: usize,
    cursor: usize,
    error: Option<String>,
}

impl EditorState {
    pub fn new_task() -> Self {
        Self::with_values(EditorKind::NewTask, String::new(), String::new(), String::new())
    }

    pub fn edit_task(input: &TaskInput) -> Self {
        Self::with_values(
            EditorKind::EditTask,
            input.text.clone(),
            input
                .due_date
                .map(|date| date.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            input.due_time.map(format_due_time).unwrap_or_default(),
        )
    }

    fn with_values(kind: EditorKind, text: String, date: String, time: String) -> Self {
        let cursor = text.chars().count();
        Self {
            kind,
            fields: vec![
                EditorField {
                    id: EditorFieldId::Text,
                    label: "Task",
                    value: text,
                    required: true,
                    hint: "what needs doing",
                },
                EditorField {
                    id: EditorFieldId::Date,
                    label: "Due date",
                    value: date,
                    required: false,
                    hint: "YYYY-MM-DD, today, tomorrow",
                },
                EditorField {
                    id: EditorFieldId::Time,
                    label: "Due time",
                    value: time,
                    required: false,
                    hint: "HH:MM",
                },
            ],
            active: 0,
            cursor,
            error: None,
        }
    }

    pub fn kind(&self) -> EditorKind {
        self.kind
    }

    pub fn fields(&self) -> &[EditorField] {
        &self.fields
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> EditorAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('u') {
            if let Some(field) = self.current_field_mut() {
                field.value.clear();
            }
            self.cursor = 0;
            self.error = None;
            return EditorAction::None;
        }

        match key.code {
            KeyCode::Esc => return EditorAction::Cancel,
            KeyCode::Enter => return EditorAction::Submit,
            KeyCode::Tab | KeyCode::Down => self.move_active(1),
            KeyCode::BackTab | KeyCode::Up => self.move_active(-1),
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.current_len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.current_len(),
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    let at = self.cursor - 1;
                    if let Some(field) = self.current_field_mut() {
                        remove_char(&mut field.value, at);
                    }
                    self.cursor = at;
                }
            }
            KeyCode::Delete => {
                let at = self.cursor;
                if let Some(field) = self.current_field_mut() {
                    remove_char(&mut field.value, at);
                }
            }
            KeyCode::Char(ch) => {
                if key.modifiers.contains(KeyModifiers::CONTROL) || ch.is_control() {
                    return EditorAction::None;
                }
                let at = self.cursor;
                if let Some(field) = self.current_field_mut() {
                    insert_char(&mut field.value, at, ch);
                }
                self.cursor += 1;
            }
            _ => return EditorAction::None,
        }

        self.error = None;
        EditorAction::None
    }

    /// Parse the form. Text rules are left to the task store.
    pub fn build_input(&self, today: NaiveDate) -> Result<TaskInput, String> {
        let date = self.field_value(EditorFieldId::Date).trim();
        let due_date = if date.is_empty() {
            None
        } else {
            Some(parse_due_date(date, today).map_err(|err| err.to_string())?)
        };
        let time = self.field_value(EditorFieldId::Time).trim();
        let due_time = if time.is_empty() {
            None
        } else {
            Some(parse_due_time(time).map_err(|err| err.to_string())?)
        };
        Ok(TaskInput::new(self.field_value(EditorFieldId::Text)).due(due_date, due_time))
    }

    fn move_active(&mut self, delta: isize) {
        let len = self.fields.len() as isize;
        if len == 0 {
            self.active = 0;
            return;
        }
        let next = (self.active as isize + delta).rem_euclid(len);
        self.active = next as usize;
        self.cursor = self.current_len();
    }

    fn current_len(&self) -> usize {
        self.fields
            .get(self.active)
            .map(|field| field.value.chars().count())
            .unwrap_or(0)
    }

    fn current_field_mut(&mut self) -> Option<&mut EditorField> {
        self.fields.get_mut(self.active)
    }

    fn field_value(&self, id: EditorFieldId) -> &str {
        self.fields
            .iter()
            .find(|field| field.id == id)
            .map(|field| field.value.as_str())
            .unwrap_or("")
    }
}

fn byte_index(value: &str, char_index: usize) -> usize {
    value
        .char_indices()
        .nth(char_index)
        .map(|(idx, _)| idx)
        .unwrap_or(value.len())
}

fn insert_char(value: &mut String, at: usize, ch: char) {
    let idx = byte_index(value, at);
    value.insert(idx, ch);
}

fn remove_char(value: &mut String, at: usize) {
    let idx = byte_index(value, at);
    if idx < value.len() {
        value.remove(idx);
    }
}

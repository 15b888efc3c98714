//! Modal form widget: field focus, text editing, option cycling, and the
//! single-in-flight submit guard.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::forms::FieldErrors;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum FormKind {
    Login,
    Register,
    CreateDoctor,
    CreateQualification,
    CreateSchedule,
    CreateAvailability,
    BookAppointment,
}

pub(super) enum FieldKind {
    Text { secret: bool },
    /// (value, label) pairs; cycling moves the selection.
    Select { options: Vec<(String, String)>, selected: Option<usize> },
}

pub(super) struct FormField {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub buf: String,
    pub error: Option<String>,
}

impl FormField {
    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text { secret: false },
            buf: String::new(),
            error: None,
        }
    }

    pub fn secret(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text { secret: true },
            buf: String::new(),
            error: None,
        }
    }

    pub fn select(
        name: &'static str,
        label: &'static str,
        options: Vec<(String, String)>,
    ) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select {
                options,
                selected: None,
            },
            buf: String::new(),
            error: None,
        }
    }

    /// Submitted value: the selected option's id for selects, the typed
    /// buffer otherwise.
    pub fn value(&self) -> &str {
        match &self.kind {
            FieldKind::Text { .. } => &self.buf,
            FieldKind::Select { options, selected } => selected
                .and_then(|i| options.get(i))
                .map(|(value, _)| value.as_str())
                .unwrap_or_default(),
        }
    }

    pub fn replace_options(&mut self, options: Vec<(String, String)>) {
        if let FieldKind::Select {
            options: current,
            selected,
        } = &mut self.kind
        {
            *current = options;
            *selected = None;
        }
    }

    fn cycle(&mut self, step: isize) -> bool {
        let FieldKind::Select { options, selected } = &mut self.kind else {
            return false;
        };
        if options.is_empty() {
            return false;
        }
        let len = options.len() as isize;
        let next = match *selected {
            None => {
                if step >= 0 { 0 } else { len - 1 }
            }
            Some(i) => (i as isize + step).rem_euclid(len),
        };
        *selected = Some(next as usize);
        true
    }
}

pub(super) enum ModalAction {
    None,
    Close,
    Submit,
    /// A select field changed; dependent fields may need refreshed options.
    FieldChanged(&'static str),
}

pub(super) struct FormModal {
    pub title: &'static str,
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    pub submitting: bool,
}

impl FormModal {
    pub fn new(title: &'static str, kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            title,
            kind,
            fields,
            focus: 0,
            submitting: false,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn value(&self, name: &str) -> String {
        self.field(name).map(|f| f.value().to_string()).unwrap_or_default()
    }

    pub fn set_errors(&mut self, errs: &FieldErrors) {
        for field in &mut self.fields {
            field.error = errs.get(field.name).map(str::to_string);
        }
        // List-field errors (time[0], ...) collapse onto the list field.
        if let Some(field) = self.fields.iter_mut().find(|f| f.name == "time") {
            if field.error.is_none() {
                field.error = errs
                    .iter()
                    .find(|(name, _)| name.starts_with("time["))
                    .map(|(_, msg)| msg.to_string());
            }
        }
    }

    pub fn clear_errors(&mut self) {
        for field in &mut self.fields {
            field.error = None;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> ModalAction {
        // One in-flight submission per form instance: ignore everything but
        // dismissal while a submit runs.
        if self.submitting {
            return ModalAction::None;
        }

        match key.code {
            KeyCode::Esc => return ModalAction::Close,
            KeyCode::Enter => return ModalAction::Submit,
            KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % self.fields.len().max(1);
            }
            KeyCode::BackTab | KeyCode::Up => {
                let len = self.fields.len().max(1);
                self.focus = (self.focus + len - 1) % len;
            }
            KeyCode::Left => {
                if let Some(field) = self.fields.get_mut(self.focus)
                    && field.cycle(-1)
                {
                    return ModalAction::FieldChanged(field.name);
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.fields.get_mut(self.focus)
                    && field.cycle(1)
                {
                    return ModalAction::FieldChanged(field.name);
                }
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus)
                    && matches!(field.kind, FieldKind::Text { .. })
                {
                    field.buf.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(field) = self.fields.get_mut(self.focus)
                    && matches!(field.kind, FieldKind::Text { .. })
                {
                    field.buf.push(c);
                }
            }
            _ => {}
        }
        ModalAction::None
    }

    pub fn draw(&self, frame: &mut ratatui::Frame) {
        let area = frame.area();
        // Preferred size, then whatever the terminal actually has.
        let w = area
            .width
            .saturating_sub(6)
            .max(30)
            .min(80)
            .min(area.width);
        let h = (self.fields.len() as u16 * 2 + 4)
            .max(8)
            .min(area.height);
        let x = area.x + (area.width.saturating_sub(w)) / 2;
        let y = area.y + (area.height.saturating_sub(h)) / 2;
        let box_area = Rect {
            x,
            y,
            width: w,
            height: h,
        };

        frame.render_widget(Clear, box_area);
        let title = if self.submitting {
            format!("{} (submitting...)", self.title)
        } else {
            self.title.to_string()
        };
        let block = Block::default().borders(Borders::ALL).title(title);
        frame.render_widget(block.clone(), box_area);
        let inner = block.inner(box_area);

        let constraints: Vec<Constraint> = self
            .fields
            .iter()
            .map(|_| Constraint::Length(2))
            .chain(std::iter::once(Constraint::Min(0)))
            .collect();
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, field) in self.fields.iter().enumerate() {
            let focused = i == self.focus;
            let marker = if focused { "> " } else { "  " };
            let shown = match &field.kind {
                FieldKind::Text { secret: true } => "*".repeat(field.buf.chars().count()),
                FieldKind::Text { secret: false } => field.buf.clone(),
                FieldKind::Select { options, selected } => match selected {
                    Some(sel) => options
                        .get(*sel)
                        .map(|(_, label)| format!("< {} >", label))
                        .unwrap_or_default(),
                    None if options.is_empty() => "(nothing to select)".to_string(),
                    None => "< select >".to_string(),
                },
            };

            let mut spans = vec![
                Span::raw(marker),
                Span::styled(
                    format!("{}: ", field.label),
                    if focused {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    },
                ),
                Span::raw(shown),
            ];
            if let Some(err) = &field.error {
                spans.push(Span::styled(
                    format!("  {}", err),
                    Style::default().fg(Color::Red),
                ));
            }
            frame.render_widget(Paragraph::new(Line::from(spans)), rows[i]);
        }

        let hint = "Enter submit  Esc cancel  Tab next  Left/Right choose";
        frame.render_widget(
            Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
            rows[self.fields.len()],
        );
    }
}

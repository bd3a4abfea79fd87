//! Login form component
//!
//! Owns the credential inputs and the inline error. While a submission is
//! outstanding every input is disabled; the form only re-enables once the
//! result comes back.

use crate::login::LoginError;
use crate::tui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Focusable parts of the form, in Tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Field {
    #[default]
    Username,
    Password,
    ShowPassword,
    Submit,
}

impl Field {
    const ORDER: [Field; 4] = [
        Field::Username,
        Field::Password,
        Field::ShowPassword,
        Field::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    fn prev(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }
}

/// What the caller should do after a key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    None,
    /// Submit these credentials
    Submit { username: String, password: String },
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub show_password: bool,
    pub focus: Field,
    pub error: Option<String>,
    submitting: bool,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// Handle a key press. Ignored entirely while submitting.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormAction {
        if self.submitting {
            return FormAction::None;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.prev(),
            KeyCode::Enter => {
                if self.focus == Field::ShowPassword {
                    self.show_password = !self.show_password;
                } else {
                    return self.submit();
                }
            }
            KeyCode::Char(' ') if self.focus == Field::ShowPassword => {
                self.show_password = !self.show_password;
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_text() {
                    field.pop();
                }
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                if let Some(field) = self.focused_text() {
                    field.push(c);
                }
            }
            _ => {}
        }
        FormAction::None
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focus {
            Field::Username => Some(&mut self.username),
            Field::Password => Some(&mut self.password),
            _ => None,
        }
    }

    fn submit(&mut self) -> FormAction {
        if self.username.trim().is_empty() || self.password.is_empty() {
            self.error = Some(LoginError::MissingCredentials.to_string());
            return FormAction::None;
        }
        self.error = None;
        self.submitting = true;
        FormAction::Submit {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        }
    }

    /// Apply the outcome of a submission
    pub fn finish(&mut self, result: Result<(), LoginError>) {
        match result {
            // The outstanding submission will report back itself
            Err(LoginError::InFlight) => return,
            Ok(()) => {
                self.password.clear();
                self.error = None;
            }
            Err(e) => {
                self.password.clear();
                self.focus = Field::Password;
                self.error = Some(e.to_string());
            }
        }
        self.submitting = false;
    }

    /// Render the form centred in `area`
    pub fn render(&self, f: &mut Frame, area: Rect, theme: &Theme, demo: bool) {
        let width = 52.min(area.width);
        let height = 14.min(area.height);
        let form_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        f.render_widget(Clear, form_area);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.highlight))
            .title(Line::from(" Sign in ").alignment(Alignment::Center))
            .style(Style::default().bg(theme.background));
        let inner = block.inner(form_area);
        f.render_widget(block, form_area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(1),
            ])
            .split(inner);

        let masked;
        let password: &str = if self.show_password {
            &self.password
        } else {
            masked = "•".repeat(self.password.chars().count());
            &masked
        };

        self.render_input(f, rows[0], "Username", &self.username, Field::Username, theme);
        self.render_input(f, rows[1], "Password", password, Field::Password, theme);

        let toggle = format!(
            "[{}] Show password",
            if self.show_password { "x" } else { " " }
        );
        f.render_widget(
            Paragraph::new(toggle).style(self.field_style(Field::ShowPassword, theme)),
            rows[2],
        );

        let button = if self.submitting {
            "  Signing in…  "
        } else {
            "[ Sign in ]"
        };
        f.render_widget(
            Paragraph::new(button)
                .alignment(Alignment::Center)
                .style(self.field_style(Field::Submit, theme)),
            rows[3],
        );

        let mut footer = Vec::new();
        if let Some(error) = &self.error {
            footer.push(Line::from(Span::styled(
                error.as_str(),
                Style::default().fg(theme.error),
            )));
        }
        if demo {
            footer.push(Line::from(Span::styled(
                "demo: admin / admin123, client_user / client123",
                Style::default().fg(theme.muted),
            )));
        }
        f.render_widget(Paragraph::new(footer).alignment(Alignment::Center), rows[4]);
    }

    fn render_input(
        &self,
        f: &mut Frame,
        area: Rect,
        label: &str,
        value: &str,
        field: Field,
        theme: &Theme,
    ) {
        let focused = self.focus == field && !self.submitting;
        let border = if focused { theme.highlight } else { theme.border };
        let text = if focused {
            format!("{}▏", value)
        } else {
            value.to_string()
        };
        let input = Paragraph::new(text)
            .style(self.field_style(field, theme))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(theme.border_type)
                    .border_style(Style::default().fg(border))
                    .title(format!(" {} ", label)),
            );
        f.render_widget(input, area);
    }

    fn field_style(&self, field: Field, theme: &Theme) -> Style {
        if self.submitting {
            Style::default().fg(theme.muted)
        } else if self.focus == field {
            Style::default()
                .fg(theme.foreground)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.foreground)
        }
    }
}

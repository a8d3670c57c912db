use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::ui::render_alert;

pub enum LoginAction {
    Exit,
    Submit { email: String, password: String },
}

#[derive(Clone, PartialEq, Copy)]
pub enum LoginField {
    Email,
    Password,
}

// Represents the state of the login screen
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub current_field: LoginField,
    pub editing: bool,
    pub alert: Option<String>,
}

impl LoginState {
    pub fn new() -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            current_field: LoginField::Email,
            editing: false,
            alert: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            LoginField::Email => LoginField::Password,
            LoginField::Password => LoginField::Email,
        };
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = match self.current_field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        };

        match key {
            KeyCode::Char(c) => {
                field.push(c);
            }
            KeyCode::Backspace => {
                field.pop();
            }
            _ => {}
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

pub fn render_login<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(6),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    let title = Paragraph::new("Admin Sign In")
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Switch field | S - Sign in | Esc - Quit"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);

    if let Some(message) = &state.alert {
        render_alert(frame, size, message);
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut LoginState, area: Rect) {
    // Password characters are never echoed
    let masked: String = "*".repeat(state.password.len());
    let field_names = ["Email", "Password"];
    let field_values = [state.email.clone(), masked];

    let items: Vec<ListItem> = field_names
        .iter()
        .zip(field_values.iter())
        .enumerate()
        .map(|(i, (name, value))| {
            let selected = i == state.current_field as usize;
            let content = if selected && state.editing {
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), Style::default().fg(Color::Yellow)),
                    Span::styled(
                        format!("{}|", value),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                let style = if selected {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{}: ", name), style),
                    Span::raw(value),
                ])
            };

            ListItem::new(content)
        })
        .collect();

    let form_list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Credentials"));

    frame.render_widget(form_list, area);
}

pub fn handle_input(state: &mut LoginState) -> Result<Option<LoginAction>> {
    if let Event::Key(key) = event::read()? {
        if state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                state.alert = None;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Esc => {
                if state.editing {
                    state.toggle_editing();
                } else {
                    return Ok(Some(LoginAction::Exit));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up | KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() {
                    return Ok(Some(LoginAction::Submit {
                        email: state.email.clone(),
                        password: state.password.clone(),
                    }));
                }
            }
            _ if state.editing => {
                state.edit_current_field(key.code);
            }
            _ => {}
        }
    }

    Ok(None)
}

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::models::Project;
use crate::reorder::MoveDirection;
use crate::ui::{centered_rect, render_alert};

// Represents the state of the admin project list screen
pub struct DashboardState {
    projects: Vec<Project>,
    list_state: ListState,
    show_delete_confirmation: bool,
    pub alert: Option<String>,
}

impl DashboardState {
    pub fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            show_delete_confirmation: false,
            alert: None,
        }
    }

    /// Replace the list after a reload, keeping the selection in range.
    pub fn set_projects(&mut self, projects: Vec<Project>) {
        let selected = self
            .list_state
            .selected()
            .map(|i| i.min(projects.len().saturating_sub(1)));
        self.projects = projects;
        self.list_state
            .select(if self.projects.is_empty() { None } else { selected.or(Some(0)) });
    }

    pub fn next(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i >= self.projects.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.projects.is_empty() {
            return;
        }

        let i = match self.list_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.projects.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn toggle_delete_confirmation(&mut self) {
        self.show_delete_confirmation = !self.show_delete_confirmation;
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.list_state.selected().and_then(|i| self.projects.get(i))
    }

    pub fn selected_project_id(&self) -> Option<i64> {
        self.selected_project().map(|p| p.id)
    }
}

pub enum DashboardAction {
    Quit,
    Logout,
    NewProject,
    EditProject(i64),   // Contains project_id
    DeleteProject(i64), // Contains project_id
    MoveProject(i64, MoveDirection),
}

pub fn render_dashboard<B: Backend>(frame: &mut Frame<B>, state: &mut DashboardState) {
    // Create the layout
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)].as_ref())
        .split(size);

    // Create and render the projects list
    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            ListItem::new(Spans::from(vec![
                Span::raw(format!("{:>2}. ", project.sort_order)),
                Span::styled(&project.title, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw("  ("),
                Span::raw(&project.stack),
                Span::raw(")"),
            ]))
        })
        .collect();

    let projects_list = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(projects_list, chunks[0], &mut state.list_state);

    // Create and render the buttons
    let buttons_text = if state.selected_project().is_some() {
        "<N> New | <E> Edit | <D> Delete | <Shift+Up/Down> Reorder | <L> Logout | <Q> Quit"
            .to_string()
    } else {
        "<N> New | <L> Logout | <Q> Quit".to_string()
    };

    let buttons = Paragraph::new(buttons_text)
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::White));

    frame.render_widget(buttons, chunks[1]);

    // Render delete confirmation popup if needed
    if state.show_delete_confirmation {
        render_delete_confirmation(frame, size);
    }

    if let Some(message) = &state.alert {
        render_alert(frame, size, message);
    }
}

fn render_delete_confirmation<B: Backend>(frame: &mut Frame<B>, size: Rect) {
    let popup_area = centered_rect(50, 20, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from("Are you sure you want to delete this project?"),
        Spans::from(""),
        Spans::from("<Y> Yes  <N> No"),
    ])
    .block(Block::default().title("Confirm Delete").borders(Borders::ALL))
    .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut DashboardState) -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        if state.alert.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                state.alert = None;
            }
            return Ok(None);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(DashboardAction::Quit));
                }
            }
            KeyCode::Char('l') => {
                if !state.show_delete_confirmation {
                    return Ok(Some(DashboardAction::Logout));
                }
            }
            KeyCode::Char('n') => {
                if state.show_delete_confirmation {
                    state.toggle_delete_confirmation();
                } else {
                    return Ok(Some(DashboardAction::NewProject));
                }
            }
            KeyCode::Char('e') => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(DashboardAction::EditProject(id)));
                    }
                }
            }
            KeyCode::Char('d') => {
                if !state.show_delete_confirmation && state.selected_project().is_some() {
                    state.toggle_delete_confirmation();
                }
            }
            KeyCode::Char('y') => {
                if state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        state.toggle_delete_confirmation();
                        return Ok(Some(DashboardAction::DeleteProject(id)));
                    }
                }
            }
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(DashboardAction::MoveProject(id, MoveDirection::Up)));
                    }
                }
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                if !state.show_delete_confirmation {
                    if let Some(id) = state.selected_project_id() {
                        return Ok(Some(DashboardAction::MoveProject(id, MoveDirection::Down)));
                    }
                }
            }
            KeyCode::Down => {
                if !state.show_delete_confirmation {
                    state.next();
                }
            }
            KeyCode::Up => {
                if !state.show_delete_confirmation {
                    state.previous();
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tracing::warn;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::models::Project;
use crate::remote::Remote;
use crate::ui::centered_rect;

/// Placeholder cards shown when the fetch fails; the visitor never
/// sees an error.
const STATIC_PROJECTS: &[(&str, &str, &str)] = &[
    (
        "Neon Drift",
        "Unity, C#, FMOD",
        "An arcade racer with a synthwave soundtrack and a drift-focused handling model.",
    ),
    (
        "Hollow Depths",
        "Godot, GDScript",
        "A 2D metroidvania prototype exploring procedurally linked cave systems.",
    ),
    (
        "Turret Protocol",
        "Unreal Engine 5, Blueprints",
        "A tower defense jam entry built in 72 hours for Ludum Dare.",
    ),
];

// Represents the state of the public portfolio view
pub struct SiteState {
    projects: Vec<Project>,
    list_state: ListState,
    modal: Option<usize>, // index of the project shown in the detail modal
}

impl SiteState {
    fn new(projects: Vec<Project>) -> Self {
        let mut list_state = ListState::default();
        if !projects.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            projects,
            list_state,
            modal: None,
        }
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

    pub fn open_modal(&mut self) {
        self.modal = self.list_state.selected();
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }
}

pub enum SiteAction {
    Exit,
}

fn fallback_projects() -> Vec<Project> {
    STATIC_PROJECTS
        .iter()
        .enumerate()
        .map(|(i, (title, stack, desc))| Project {
            id: -(i as i64) - 1,
            title: title.to_string(),
            stack: stack.to_string(),
            desc: desc.to_string(),
            image_url: None,
            sort_order: i as i32,
        })
        .collect()
}

/// Fetch the ordered portfolio. A failed fetch falls back silently to
/// the static content; the failure is only logged.
pub async fn load_site(remote: &Remote) -> SiteState {
    match remote.list_projects().await {
        Ok(projects) if !projects.is_empty() => SiteState::new(projects),
        Ok(_) => SiteState::new(fallback_projects()),
        Err(err) => {
            warn!("using static projects: {}", err);
            SiteState::new(fallback_projects())
        }
    }
}

pub fn render_site<B: Backend>(frame: &mut Frame<B>, state: &mut SiteState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(3),
        ])
        .split(size);

    let header = Paragraph::new("Game Dev Portfolio")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, chunks[0]);

    // Each card shows title, stack, and a description line
    let items: Vec<ListItem> = state
        .projects
        .iter()
        .map(|project| {
            ListItem::new(vec![
                Spans::from(Span::styled(
                    project.title.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Spans::from(Span::styled(
                    project.stack.clone(),
                    Style::default().fg(Color::Magenta),
                )),
                Spans::from(Span::raw(project.desc.clone())),
                Spans::from(""),
            ])
        })
        .collect();

    let cards = List::new(items)
        .block(Block::default().title("Projects").borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));

    frame.render_stateful_widget(cards, chunks[1], &mut state.list_state);

    let help = Paragraph::new("<Enter> View Details | <Up/Down> Browse | <Q> Quit")
        .block(Block::default().borders(Borders::TOP))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(help, chunks[2]);

    // Detail modal, populated from the row already in memory
    if let Some(index) = state.modal {
        if let Some(project) = state.projects.get(index) {
            render_modal(frame, size, project);
        }
    }
}

fn render_modal<B: Backend>(frame: &mut Frame<B>, size: Rect, project: &Project) {
    let popup_area = centered_rect(70, 70, size);

    let mut lines = vec![
        Spans::from(Span::styled(
            project.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Spans::from(Span::styled(
            project.stack.clone(),
            Style::default().fg(Color::Magenta),
        )),
        Spans::from(""),
        Spans::from(project.desc.clone()),
    ];
    if let Some(url) = &project.image_url {
        lines.push(Spans::from(""));
        lines.push(Spans::from(Span::styled(
            url.clone(),
            Style::default().fg(Color::Blue),
        )));
    }
    lines.push(Spans::from(""));
    lines.push(Spans::from("<Esc> Close"));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Project").borders(Borders::ALL))
        .style(Style::default().fg(Color::White).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

pub fn handle_input(state: &mut SiteState) -> Result<Option<SiteAction>> {
    if let Event::Key(key) = event::read()? {
        match key.code {
            KeyCode::Char('q') => {
                return Ok(Some(SiteAction::Exit));
            }
            KeyCode::Esc => {
                if state.modal.is_some() {
                    state.close_modal();
                } else {
                    return Ok(Some(SiteAction::Exit));
                }
            }
            KeyCode::Enter => {
                if state.modal.is_none() {
                    state.open_modal();
                }
            }
            KeyCode::Down => {
                if state.modal.is_none() {
                    state.next();
                }
            }
            KeyCode::Up => {
                if state.modal.is_none() {
                    state.previous();
                }
            }
            _ => {}
        }
    }
    Ok(None)
}

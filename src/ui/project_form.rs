use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use crossterm::event::{self, Event, KeyCode};
use tracing::info;
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{Project, ProjectFields};
use crate::remote::{object_key, Remote, RemoteError};
use crate::reorder::next_sort_order;
use crate::ui::render_alert;

pub enum ProjectFormAction {
    Cancel,
    Save(ProjectDraft),
}

/// What the form hands back on save: the edited fields plus an optional
/// local file to upload before the row is written.
#[derive(Debug, Clone)]
pub struct ProjectDraft {
    pub id: Option<i64>,
    pub fields: ProjectFields,
    pub image_file: Option<PathBuf>,
}

#[derive(Clone, PartialEq, Copy)]
pub enum FormField {
    Title,
    Stack,
    Desc,
    ImageUrl,
    ImageFile,
}

pub struct ProjectFormState {
    project_id: Option<i64>,
    pub title: String,
    pub stack: String,
    pub desc: String,
    pub image_url: String,
    pub image_file: String,
    pub current_field: FormField,
    pub editing: bool,
    pub alert: Option<String>,
}

impl ProjectFormState {
    pub fn new() -> Self {
        Self {
            project_id: None,
            title: String::new(),
            stack: String::new(),
            desc: String::new(),
            image_url: String::new(),
            image_file: String::new(),
            current_field: FormField::Title,
            editing: false,
            alert: None,
        }
    }

    pub fn from_existing(project: &Project) -> Self {
        Self {
            project_id: Some(project.id),
            title: project.title.clone(),
            stack: project.stack.clone(),
            desc: project.desc.clone(),
            image_url: project.image_url.clone().unwrap_or_default(),
            image_file: String::new(),
            current_field: FormField::Title,
            editing: false,
            alert: None,
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
    }

    pub fn next_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::Stack,
            FormField::Stack => FormField::Desc,
            FormField::Desc => FormField::ImageUrl,
            FormField::ImageUrl => FormField::ImageFile,
            FormField::ImageFile => FormField::Title,
        };
    }

    pub fn previous_field(&mut self) {
        self.current_field = match self.current_field {
            FormField::Title => FormField::ImageFile,
            FormField::Stack => FormField::Title,
            FormField::Desc => FormField::Stack,
            FormField::ImageUrl => FormField::Desc,
            FormField::ImageFile => FormField::ImageUrl,
        };
    }

    fn current_value_mut(&mut self) -> &mut String {
        match self.current_field {
            FormField::Title => &mut self.title,
            FormField::Stack => &mut self.stack,
            FormField::Desc => &mut self.desc,
            FormField::ImageUrl => &mut self.image_url,
            FormField::ImageFile => &mut self.image_file,
        }
    }

    pub fn edit_current_field(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        let field = self.current_value_mut();
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
        !self.title.is_empty()
    }

    pub fn draft(&self) -> ProjectDraft {
        ProjectDraft {
            id: self.project_id,
            fields: ProjectFields {
                title: self.title.clone(),
                stack: self.stack.clone(),
                desc: self.desc.clone(),
                image_url: if self.image_url.is_empty() {
                    None
                } else {
                    Some(self.image_url.clone())
                },
            },
            image_file: if self.image_file.is_empty() {
                None
            } else {
                Some(PathBuf::from(&self.image_file))
            },
        }
    }
}

/// Save a draft: upload the image first when a file is given, so the
/// row never commits without its public URL, then insert or update.
/// New rows are appended after the current maximum sort_order.
pub async fn save_project(remote: &Remote, draft: &ProjectDraft) -> Result<(), RemoteError> {
    let mut fields = draft.fields.clone();

    if let Some(path) = &draft.image_file {
        let filename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                RemoteError::Backend(format!("not a file path: {}", path.display()))
            })?;
        let bytes = tokio::fs::read(path).await.map_err(|err| {
            RemoteError::Backend(format!("failed to read {}: {}", path.display(), err))
        })?;

        let key = object_key(Utc::now().timestamp_millis(), filename);
        remote.upload_image(&key, bytes).await?;
        fields.image_url = Some(remote.public_image_url(&key));
        info!(%key, "image uploaded");
    }

    match draft.id {
        Some(id) => remote.update_project(id, &fields).await,
        None => {
            let projects = remote.list_projects().await?;
            remote
                .insert_project(&fields, next_sort_order(&projects))
                .await?;
            Ok(())
        }
    }
}

pub fn render_project_form<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectFormState) {
    let size = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(size);

    // Title with appropriate text based on whether we're editing or creating
    let title_text = if state.project_id.is_none() {
        "Add Project"
    } else {
        "Edit Project"
    };

    let title = Paragraph::new(title_text)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    render_form(frame, state, chunks[1]);

    let help_text = if state.editing {
        "Enter - Save field | Esc - Cancel editing"
    } else {
        "Enter - Edit field | Up/Down - Navigate fields | S - Save project | Esc - Cancel"
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, chunks[2]);

    if let Some(message) = &state.alert {
        render_alert(frame, size, message);
    }
}

fn render_form<B: Backend>(frame: &mut Frame<B>, state: &mut ProjectFormState, area: Rect) {
    let field_names = ["Title", "Stack", "Description", "Image URL", "Image file"];
    let field_values = [
        state.title.clone(),
        state.stack.clone(),
        state.desc.clone(),
        state.image_url.clone(),
        state.image_file.clone(),
    ];

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
        .block(Block::default().borders(Borders::ALL).title("Project Details"))
        .highlight_style(Style::default().fg(Color::Yellow));

    frame.render_widget(form_list, area);
}

pub fn handle_input(state: &mut ProjectFormState) -> Result<Option<ProjectFormAction>> {
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
                    return Ok(Some(ProjectFormAction::Cancel));
                }
            }
            KeyCode::Enter => {
                state.toggle_editing();
            }
            KeyCode::Up if !state.editing => {
                state.previous_field();
            }
            KeyCode::Down if !state.editing => {
                state.next_field();
            }
            KeyCode::Char('s') if !state.editing => {
                if state.is_valid() {
                    return Ok(Some(ProjectFormAction::Save(state.draft())));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_maps_empty_strings_to_none() {
        let state = ProjectFormState::new();
        let draft = state.draft();
        assert!(draft.fields.image_url.is_none());
        assert!(draft.image_file.is_none());
    }

    #[test]
    fn draft_keeps_explicit_image_url() {
        let mut state = ProjectFormState::new();
        state.image_url = "https://example.com/shot.png".to_string();
        let draft = state.draft();
        assert_eq!(
            draft.fields.image_url.as_deref(),
            Some("https://example.com/shot.png")
        );
    }
}

mod config;
mod models;
mod remote;
mod reorder;
mod ui;

use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::models::Session;
use crate::remote::Remote;
use crate::reorder::plan_move;
use crate::ui::{
    dashboard::{render_dashboard, handle_input as handle_dashboard_input, DashboardAction, DashboardState},
    login::{render_login, handle_input as handle_login_input, LoginAction, LoginState},
    project_form::{render_project_form, handle_input as handle_form_input, save_project, ProjectFormAction, ProjectFormState},
    site::{render_site, handle_input as handle_site_input, load_site, SiteAction},
};

#[derive(Parser)]
#[command(name = "portfolio_manager", about = "Portfolio site and admin panel")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Browse the public portfolio
    Site,
    /// Manage projects (requires sign-in)
    Admin,
}

// Represents the current screen of the admin surface
enum AdminScreen {
    Login,
    Dashboard,
    ProjectForm,
}

// Admin surface state
struct AdminState {
    auth_rx: watch::Receiver<Option<Session>>,
    screen: AdminScreen,
    login_state: Option<LoginState>,
    dashboard_state: Option<DashboardState>,
    form_state: Option<ProjectFormState>,
}

impl AdminState {
    fn new(auth_rx: watch::Receiver<Option<Session>>) -> Self {
        Self {
            auth_rx,
            screen: AdminScreen::Login,
            login_state: None,
            dashboard_state: None,
            form_state: None,
        }
    }
}

fn init_logging() -> Result<()> {
    // The terminal belongs to the UI, so logs go to a file
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open("portfolio-manager.log")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;
    init_logging()?;

    let remote = Remote::new(&config);

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = match cli.command.unwrap_or(Command::Site) {
        Command::Site => run_site(&mut terminal, &remote).await,
        Command::Admin => run_admin(&mut terminal, &remote).await,
    };

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = result {
        println!("Error: {}", err);
    }

    Ok(())
}

async fn run_site<B: Backend>(terminal: &mut Terminal<B>, remote: &Remote) -> Result<()> {
    let mut state = load_site(remote).await;

    loop {
        terminal.draw(|f| render_site(f, &mut state))?;

        if let Some(SiteAction::Exit) = handle_site_input(&mut state)? {
            break;
        }
    }

    Ok(())
}

async fn run_admin<B: Backend>(terminal: &mut Terminal<B>, remote: &Remote) -> Result<()> {
    // Initial state comes from the session check on startup
    remote.restore_session().await;

    let mut app_state = AdminState::new(remote.subscribe_auth());
    sync_auth_state(&mut app_state, remote).await?;

    loop {
        // Render current screen
        terminal.draw(|f| match app_state.screen {
            AdminScreen::Login => {
                if let Some(state) = &mut app_state.login_state {
                    render_login(f, state);
                }
            }
            AdminScreen::Dashboard => {
                if let Some(state) = &mut app_state.dashboard_state {
                    render_dashboard(f, state);
                }
            }
            AdminScreen::ProjectForm => {
                if let Some(state) = &mut app_state.form_state {
                    render_project_form(f, state);
                }
            }
        })?;

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AdminScreen::Login => handle_login_screen(&mut app_state, remote).await?,
            AdminScreen::Dashboard => handle_dashboard_screen(&mut app_state, remote).await?,
            AdminScreen::ProjectForm => handle_form_screen(&mut app_state, remote).await?,
        };

        if should_quit {
            break;
        }

        // Follow auth-state notifications: a session appearing or
        // vanishing moves the surface between LoggedOut and LoggedIn
        if app_state.auth_rx.has_changed()? {
            sync_auth_state(&mut app_state, remote).await?;
        }
    }

    Ok(())
}

/// Reconcile the current screen with the auth subscription.
async fn sync_auth_state(app_state: &mut AdminState, remote: &Remote) -> Result<()> {
    let logged_in = app_state.auth_rx.borrow_and_update().is_some();

    match (&app_state.screen, logged_in) {
        (AdminScreen::Login, true) => {
            load_dashboard_screen(app_state, remote).await?;
        }
        (AdminScreen::Login, false) => {
            if app_state.login_state.is_none() {
                app_state.login_state = Some(LoginState::new());
            }
        }
        (_, false) => {
            app_state.login_state = Some(LoginState::new());
            app_state.screen = AdminScreen::Login;
        }
        (_, true) => {}
    }

    Ok(())
}

async fn load_dashboard_screen(app_state: &mut AdminState, remote: &Remote) -> Result<()> {
    let fetched = remote.list_projects().await;

    // Reload in place so the selection survives refreshes
    let state = app_state
        .dashboard_state
        .get_or_insert_with(|| DashboardState::new(Vec::new()));
    match fetched {
        Ok(projects) => state.set_projects(projects),
        Err(err) => state.alert = Some(format!("Error loading projects: {}", err)),
    }

    app_state.screen = AdminScreen::Dashboard;

    Ok(())
}

async fn handle_login_screen(app_state: &mut AdminState, remote: &Remote) -> Result<bool> {
    if let Some(state) = &mut app_state.login_state {
        match handle_login_input(state)? {
            Some(LoginAction::Exit) => {
                return Ok(true);
            }
            Some(LoginAction::Submit { email, password }) => {
                // Success is observed through the auth subscription
                if let Err(err) = remote.sign_in(&email, &password).await {
                    state.alert = Some(format!("Login failed: {}", err));
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_dashboard_screen(app_state: &mut AdminState, remote: &Remote) -> Result<bool> {
    if let Some(state) = &mut app_state.dashboard_state {
        match handle_dashboard_input(state)? {
            Some(DashboardAction::Quit) => {
                return Ok(true);
            }
            Some(DashboardAction::Logout) => {
                remote.sign_out().await;
            }
            Some(DashboardAction::NewProject) => {
                app_state.form_state = Some(ProjectFormState::new());
                app_state.screen = AdminScreen::ProjectForm;
            }
            Some(DashboardAction::EditProject(id)) => {
                if let Some(project) = state.selected_project().filter(|p| p.id == id) {
                    app_state.form_state = Some(ProjectFormState::from_existing(project));
                    app_state.screen = AdminScreen::ProjectForm;
                }
            }
            Some(DashboardAction::DeleteProject(id)) => {
                // Deletion was already confirmed in the popup
                match remote.delete_project(id).await {
                    Ok(()) => load_dashboard_screen(app_state, remote).await?,
                    Err(err) => state.alert = Some(format!("Error deleting: {}", err)),
                }
            }
            Some(DashboardAction::MoveProject(id, direction)) => {
                // Plan against a fresh ordering, never the rendered list;
                // another session may have edited it since the last fetch
                match remote.list_projects().await {
                    Ok(current) => {
                        if let Some(batch) = plan_move(&current, id, direction) {
                            if let Err(err) = remote.upsert_order(&batch).await {
                                state.alert = Some(format!("Error reordering: {}", err));
                            }
                        }
                        load_dashboard_screen(app_state, remote).await?;
                    }
                    Err(err) => state.alert = Some(format!("Error reordering: {}", err)),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

async fn handle_form_screen(app_state: &mut AdminState, remote: &Remote) -> Result<bool> {
    if let Some(state) = &mut app_state.form_state {
        match handle_form_input(state)? {
            Some(ProjectFormAction::Cancel) => {
                load_dashboard_screen(app_state, remote).await?;
            }
            Some(ProjectFormAction::Save(draft)) => {
                match save_project(remote, &draft).await {
                    Ok(()) => load_dashboard_screen(app_state, remote).await?,
                    Err(err) => state.alert = Some(format!("Error saving project: {}", err)),
                }
            }
            None => {}
        }
    }

    Ok(false)
}

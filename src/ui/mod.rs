pub mod dashboard;
pub mod login;
pub mod project_form;
pub mod site;

use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Spans,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Blocking error popup for failed admin operations. Input is consumed
/// until the alert is dismissed.
pub fn render_alert<B: Backend>(frame: &mut Frame<B>, size: Rect, message: &str) {
    let popup_area = centered_rect(60, 30, size);

    let popup = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(message.to_string()),
        Spans::from(""),
        Spans::from("<Enter> Dismiss"),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Error").borders(Borders::ALL))
    .style(Style::default().fg(Color::Red).bg(Color::Black));

    frame.render_widget(popup, popup_area);
}

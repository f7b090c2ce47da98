use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const KEY_HELP: &str = "c: comments | s: summarize | y: copy | q: quit | r: quit + copy report";
const MENU_HELP: &str = "↑/↓ or j/k: move | Enter: subscribe | q/Esc: cancel";

/// One frame handed to the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Trees(TreeScreen),
    TopicMenu(TopicMenu),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TreeScreen {
    /// Render port output
    pub text: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopicMenu {
    pub topics: Vec<String>,
    pub selected: usize,
}

/// Main render function
pub fn render_screen(frame: &mut Frame, screen: &Screen) {
    match screen {
        Screen::Trees(trees) => render_trees(frame, trees),
        Screen::TopicMenu(menu) => render_topic_menu(frame, menu),
    }
}

fn render_trees(frame: &mut Frame, screen: &TreeScreen) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Trees
            Constraint::Length(1), // Status
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    frame.render_widget(Paragraph::new(screen.text.as_str()), chunks[0]);
    frame.render_widget(
        Paragraph::new(screen.status.as_str()).style(Style::default().fg(Color::Cyan)),
        chunks[1],
    );
    render_footer(frame, chunks[2], KEY_HELP);
}

fn render_topic_menu(frame: &mut Frame, menu: &TopicMenu) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.area());

    let items: Vec<ListItem> = menu
        .topics
        .iter()
        .map(|topic| ListItem::new(topic.as_str()))
        .collect();
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Select a ProcessingTimeTree topic "),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(menu.selected));
    frame.render_stateful_widget(list, chunks[0], &mut state);

    render_footer(frame, chunks[1], MENU_HELP);
}

fn render_footer(frame: &mut Frame, area: Rect, help: &str) {
    let footer = Paragraph::new(help).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, area);
}

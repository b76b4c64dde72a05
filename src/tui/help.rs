use ratatui::{
    layout::Rect,
    style::Color,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

fn key_line(key: &'static str, desc: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{key:<12}"), Style::default().fg(Color::Magenta)),
        Span::raw(desc),
    ])
}

pub fn draw_help(area: Rect, f: &mut Frame, store_url: &str) {
    let p = Paragraph::new(vec![
        Line::from("Keybinds:"),
        key_line("q / Ctrl-C", "Quit"),
        key_line("f / r", "Fetch movies"),
        key_line("a / i", "Add a movie (focus the form)"),
        key_line("tab", "Switch tabs"),
        key_line("?", "Show this help"),
        Line::from(""),
        Line::from("Add-movie form:"),
        key_line("tab / ↓", "Next field"),
        key_line("shift-tab / ↑", "Previous field"),
        key_line("enter", "Next field, submit on the last one"),
        key_line("Ctrl-S", "Submit"),
        key_line("esc", "Back to the list"),
        Line::from(""),
        Line::from("New movies appear after the next fetch."),
        Line::from(""),
        Line::from("Store:"),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(store_url.to_string(), Style::default().fg(Color::Cyan)),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(p, area);
}

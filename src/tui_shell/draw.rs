use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::model::Pagination;

use super::{App, LANDING_MENU, Screen};

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, rows[0]);
    match app.screen {
        Screen::Landing => draw_landing(frame, app, rows[1]),
        Screen::Admin => draw_admin(frame, app, rows[1]),
        Screen::Doctor => draw_doctor(frame, app, rows[1]),
        Screen::Patient => draw_patient(frame, app, rows[1]),
    }
    draw_footer(frame, app, rows[2]);

    if let Some(modal) = &app.modal {
        modal.draw(frame);
    }
}

fn draw_header(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let who = match &app.session {
        Some(session) => format!(
            "{} ({})",
            session.display_name(),
            session.user.role
        ),
        None => "not logged in".to_string(),
    };
    let line = Line::from(vec![
        Span::styled("MediBook", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(who, Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_footer(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let text = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            notice.as_str(),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            key_hints(app.screen),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(text), area);
}

fn key_hints(screen: Screen) -> &'static str {
    match screen {
        Screen::Landing => "Up/Down choose  Enter open  q quit",
        Screen::Admin => {
            "n/p page  d doctor  u qualification  s schedule  a availability  o logout  q quit"
        }
        Screen::Doctor => {
            "n/p page  Enter slots  [/] slot page  h holiday  o logout  q quit"
        }
        Screen::Patient => "n/p page  Enter book  o logout  q quit",
    }
}

fn draw_landing(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Welcome to MediBook");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from("Find the best healthcare services here."),
        Line::from(""),
    ];
    for (i, item) in LANDING_MENU.iter().enumerate() {
        let style = if i == app.landing_cursor {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(format!("  {}  ", item), style)));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn pagination_title(base: &str, pagination: Option<&Pagination>) -> String {
    match pagination {
        Some(p) => {
            let mut nav = String::new();
            if p.has_prev() {
                nav.push_str(" <prev");
            }
            if p.has_next() {
                nav.push_str(" next>");
            }
            format!("{} - {}{}", base, p.summary(), nav)
        }
        None => base.to_string(),
    }
}

fn draw_doctor_table(frame: &mut ratatui::Frame, app: &App, area: Rect, title: &str) {
    let rows: Vec<Row> = app
        .doctors
        .items()
        .iter()
        .enumerate()
        .map(|(i, d)| {
            let degrees = d
                .qualifications
                .iter()
                .map(|q| q.degree.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            let row = Row::new(vec![
                Cell::from(d.first_name.clone()),
                Cell::from(d.last_name.clone()),
                Cell::from(d.email.clone()),
                Cell::from(degrees),
            ]);
            if i == app.row {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(35),
            Constraint::Percentage(25),
        ],
    )
    .header(
        Row::new(vec!["First Name", "Last Name", "Email", "Qualifications"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(pagination_title(title, app.doctors.pagination())),
    );
    frame.render_widget(table, area);
}

fn draw_admin(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    draw_doctor_table(frame, app, area, "Doctors");
}

fn draw_patient(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    draw_doctor_table(frame, app, area, "Doctors - select and press Enter to book");
}

fn draw_doctor(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let rows: Vec<Row> = app
        .schedules
        .items()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let status = if s.is_holiday { "Holiday" } else { "" };
            let row = Row::new(vec![Cell::from(s.date.clone()), Cell::from(status)]);
            if i == app.row {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else {
                row
            }
        })
        .collect();
    let table = Table::new(rows, [Constraint::Percentage(70), Constraint::Percentage(30)])
        .header(Row::new(vec!["Date", "Status"]).style(Style::default().add_modifier(Modifier::BOLD)))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(pagination_title("Schedules", app.schedules.pagination())),
        );
    frame.render_widget(table, panes[0]);

    let slot_lines: Vec<Line> = if app.slots.items().is_empty() {
        vec![Line::from("Press Enter on a schedule to load its slots")]
    } else {
        app.slots
            .items()
            .iter()
            .map(|a| Line::from(a.time.clone()))
            .collect()
    };
    frame.render_widget(
        Paragraph::new(slot_lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(pagination_title("Availabilities", app.slots.pagination())),
        ),
        panes[1],
    );
}

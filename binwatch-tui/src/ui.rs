use binwatch_core::{
    model::AnnotatedDustbin, ranker::SkipReason, service::TriageReport, severity::Severity,
};
use chrono::{DateTime, Local, Utc};
use ratatui::{
    prelude::*,
    widgets::{
        Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState, Wrap,
    },
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    let header = Paragraph::new("binwatch – nearby dustbins by distance and fill level")
        .block(Block::default().borders(Borders::ALL).title("Binwatch"));
    frame.render_widget(header, *header_area);

    match app.screen {
        Screen::SourceSelect => draw_source_select(frame, app, *content_area),
        Screen::ObserverInput => draw_observer_input(frame, app, *content_area),
        Screen::TriageView => draw_triage_view(frame, app, *content_area),
    }

    let nav_hint = match app.screen {
        Screen::SourceSelect => "↑/↓ move · Enter/Space select source · q/Ctrl-C quit",
        Screen::ObserverInput => "Type lat, lng[, radius m] · Enter triage · Esc back · Ctrl-C quit",
        Screen::TriageView => "↑/↓ move · r refresh · Esc/←/b edit location · q/Ctrl-C quit",
    };

    let status_text = if app.is_loading {
        format!("Loading… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.is_loading {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_source_select(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app
        .sources
        .iter()
        .enumerate()
        .map(|(idx, (_id, name))| {
            let prefix = if idx == app.source_list_index {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{prefix}{name}"))
        })
        .collect::<Vec<ListItem<'_>>>();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Select snapshot source (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.sources.is_empty() {
        state.select(Some(app.source_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_observer_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // input
            Constraint::Min(0),    // help
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [input_area, help_area] = chunks else {
        return;
    };

    let input = Paragraph::new(app.observer_input.as_str())
        .block(Block::default().borders(Borders::ALL).title(format!(
            "Observer for {} (lat, lng[, radius m], Enter)",
            app.selected_source_name()
        )))
        .wrap(Wrap { trim: true });
    frame.render_widget(input, *input_area);

    let help = Paragraph::new(vec![
        Line::from(format!(
            "Last location: {} within {} m",
            app.observer, app.radius_meters
        )),
        Line::from("Bins at 80 % or more are critical and take priority over nearer bins."),
        Line::from(legend()),
    ])
    .block(Block::default().borders(Borders::ALL).title("Triage"))
    .wrap(Wrap { trim: true });
    frame.render_widget(help, *help_area);
}

fn draw_triage_view(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let title = format!(
        "{} · {} m around {} (Esc/←/b to edit)",
        app.selected_source_name(),
        app.radius_meters,
        app.observer
    );

    let Some(report) = &app.report else {
        let paragraph = Paragraph::new("No triage run yet.")
            .block(Block::default().borders(Borders::ALL).title(title));
        frame.render_widget(paragraph, area);
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(5)])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [table_area, summary_area] = chunks else {
        return;
    };

    if report.ranking.entries.is_empty() {
        let paragraph = Paragraph::new("No dustbins within the radius.")
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, *table_area);
    } else {
        draw_ranked_table(frame, app, report, title, *table_area);
    }

    frame.render_widget(summary_paragraph(report), *summary_area);
}

fn draw_ranked_table(
    frame: &mut Frame<'_>,
    app: &App,
    report: &TriageReport,
    title: String,
    area: Rect,
) {
    let highlight_id = report.highlight.as_ref().map(AnnotatedDustbin::id);

    let rows = report.ranking.entries.iter().map(|entry| {
        let is_highlight = highlight_id == Some(entry.id());
        let marker = if is_highlight { "★" } else { "" };

        let mut style = Style::default().fg(severity_color(entry.severity));
        if is_highlight {
            style = style.add_modifier(Modifier::BOLD);
        }

        Row::new(vec![
            Cell::from(marker),
            Cell::from(entry.id().to_string()),
            Cell::from(distance_label(entry.distance_meters)),
            Cell::from(format!("{} %", entry.fill_percent)),
            Cell::from(entry.severity.label()),
            Cell::from(updated_label(entry.record.last_updated)),
        ])
        .style(style)
    });

    let column_widths = [
        Constraint::Length(2),
        Constraint::Length(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(9),
        Constraint::Min(16),
    ];

    let table = Table::new(rows, column_widths)
        .header(
            Row::new(vec!["", "Bin", "Distance", "Fill", "Severity", "Updated"])
                .style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .column_spacing(1);

    let mut state = TableState::default().with_selected(Some(app.row_index));
    frame.render_stateful_widget(table, area, &mut state);
}

fn summary_paragraph(report: &TriageReport) -> Paragraph<'static> {
    let counts = Severity::ALL
        .iter()
        .map(|severity| {
            Span::styled(
                format!("{severity}: {}  ", report.summary.count(*severity)),
                Style::default().fg(severity_color(*severity)),
            )
        })
        .collect::<Vec<_>>();

    let highlight = report.highlight.as_ref().map_or_else(
        || "Highlight: none".to_owned(),
        |entry| {
            format!(
                "Highlight: bin {} ({}, {})",
                entry.id(),
                entry.severity,
                distance_label(entry.distance_meters)
            )
        },
    );

    let mut lines = vec![Line::from(counts), Line::from(highlight)];

    let skipped = &report.ranking.skipped;
    let clamped = &report.ranking.clamped;
    if !skipped.is_empty() || !clamped.is_empty() {
        let bad_location = skipped
            .iter()
            .filter(|record| record.reason == SkipReason::InvalidCoordinate)
            .count();
        let no_level = skipped.len() - bad_location;
        lines.push(Line::styled(
            format!(
                "Skipped {} malformed records ({bad_location} bad location, {no_level} no fill level) · {} fill levels clamped",
                skipped.len(),
                clamped.len()
            ),
            Style::default().fg(Color::Yellow),
        ));
    }

    Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Summary"))
        .wrap(Wrap { trim: true })
}

fn legend() -> Vec<Span<'static>> {
    Severity::ALL
        .iter()
        .map(|severity| {
            Span::styled(
                format!("■ {severity}  "),
                Style::default().fg(severity_color(*severity)),
            )
        })
        .collect()
}

fn severity_color(severity: Severity) -> Color {
    let (red, green, blue) = severity.rgb();
    Color::Rgb(red, green, blue)
}

fn distance_label(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{meters:.0} m")
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

fn updated_label(stamp: Option<DateTime<Utc>>) -> String {
    stamp.map_or_else(
        || "–".to_owned(),
        |stamp| {
            stamp
                .with_timezone(&Local)
                .format("%d.%m.%Y %H:%M")
                .to_string()
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_switch_to_kilometers() {
        assert_eq!(distance_label(0.0), "0 m");
        assert_eq!(distance_label(349.6), "350 m");
        assert_eq!(distance_label(1500.0), "1.50 km");
    }

    #[test]
    fn missing_timestamp_renders_dash() {
        assert_eq!(updated_label(None), "–");
    }
}

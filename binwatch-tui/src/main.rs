//! Terminal UI for binwatch that ranks nearby dustbins and highlights the one to empty first.

mod app;
mod config;
mod input;
mod ui;

use std::{fs::File, io, sync::Arc, time::Duration as StdDuration};

use anyhow::{Context, Result};
use binwatch_core::{
    model::{Coordinate, SourceId},
    plugin::SourceRegistry,
    ports::{FixedObserver, PortError},
    service::{BinwatchService, TriageReport},
};
use binwatch_provider_http as municipal;
use binwatch_provider_seed as seed;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{error, info};
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;

use crate::app::App;
use crate::config::Config;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_logging(&config)?;
    info!("Starting binwatch with backend {}", config.api_url);

    // HTTP + service setup
    let client = Client::builder().user_agent("binwatch/0.1").build()?;

    let plugins = vec![
        municipal::plugin(client, config.api_url.clone()),
        seed::plugin(),
    ];
    let registry = Arc::new(SourceRegistry::new(plugins));
    let service = Arc::new(BinwatchService::new(registry));

    // App state
    let app = App::new(service, config.observer, config.radius_meters);

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}

/// Send log output to a file; the terminal belongs to the UI.
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("cannot open log file {}", config.log_file))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    loop {
        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::RunTriage => {
                    match parse_observer_input(&app.observer_input, app.radius_meters) {
                        Ok((observer, radius_meters)) => {
                            app.observer = observer;
                            app.radius_meters = radius_meters;
                        }
                        Err(msg) => {
                            app.error_message = Some(msg);
                            continue;
                        }
                    }
                    run_triage(terminal, &mut app).await?;
                }
                Action::Refresh => {
                    run_triage(terminal, &mut app).await?;
                }
            }
        }
    }

    Ok(())
}

async fn run_triage(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let Some(source) = app.selected_source.clone() else {
        app.error_message = Some("Select a source first".into());
        return Ok(());
    };

    app.is_loading = true;
    app.error_message = None;
    terminal.draw(|frame| ui::draw(frame, app))?;

    let res = triage_at_observer(app, source).await;

    app.is_loading = false;
    match res {
        Ok(report) => app.show_report(report),
        Err(err) => {
            error!("Triage failed: {err}");
            app.error_message = Some(format!("Failed to load dustbins: {err}"));
        }
    }
    Ok(())
}

/// Triage `source` around the observer the user entered last.
async fn triage_at_observer(app: &App, source: SourceId) -> Result<TriageReport, PortError> {
    let observer = FixedObserver::new(app.observer)?;
    app.service
        .triage_located(source, &observer, app.radius_meters)
        .await
}

/// Parse `lat, lng[, radius]`; a missing radius keeps `current_radius`.
fn parse_observer_input(input: &str, current_radius: f64) -> Result<(Coordinate, f64), String> {
    let parts: Vec<&str> = input
        .split([',', ' ', ';'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();

    let (lat, lng, radius) = match parts.as_slice() {
        [lat, lng] => (*lat, *lng, None),
        [lat, lng, radius] => (*lat, *lng, Some(*radius)),
        _ => return Err("Enter a location as: lat, lng[, radius in m]".into()),
    };

    let parse = |label: &str, raw: &str| {
        raw.parse::<f64>()
            .map_err(|_parse_err| format!("{label} {raw:?} is not a number"))
    };

    let observer = Coordinate::new(parse("Latitude", lat)?, parse("Longitude", lng)?)
        .map_err(|err| err.to_string())?;

    let radius_meters = match radius {
        Some(raw) => parse("Radius", raw)?,
        None => current_radius,
    };
    if radius_meters.is_nan() || radius_meters <= 0.0 {
        return Err("Radius must be a positive number of meters".into());
    }

    Ok((observer, radius_meters))
}

#[cfg(test)]
mod tests {
    use binwatch_core::{model::Sources, severity::Severity};

    use super::*;

    fn seed_app(observer: Coordinate) -> App {
        let registry = Arc::new(SourceRegistry::new(vec![seed::plugin()]));
        App::new(Arc::new(BinwatchService::new(registry)), observer, 1000.0)
    }

    #[tokio::test]
    async fn triages_seed_bins_around_entered_observer() {
        let app = seed_app(seed::default_observer());
        let report = triage_at_observer(&app, Sources::Seed.into())
            .await
            .expect("seed triage succeeds");

        assert_eq!(report.observer, seed::default_observer());
        assert!(!report.ranking.entries.is_empty());
        assert!(
            report
                .ranking
                .entries
                .iter()
                .all(|entry| entry.distance_meters <= 1000.0 && entry.severity < Severity::Critical)
        );
    }

    #[tokio::test]
    async fn out_of_range_observer_is_rejected_before_fetching() {
        let app = seed_app(Coordinate { lat: 91.0, lng: 0.0 });
        let result = triage_at_observer(&app, Sources::Seed.into()).await;
        assert!(matches!(result, Err(PortError::InvalidObserver(_))));
    }

    #[test]
    fn parses_location_with_radius() {
        let (observer, radius) =
            parse_observer_input("21.0932, 78.9816, 500", 1000.0).expect("valid input");
        assert_eq!(observer, Coordinate { lat: 21.0932, lng: 78.9816 });
        assert!((radius - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn keeps_current_radius_when_omitted() {
        let (_, radius) = parse_observer_input("21.0932 78.9816", 750.0).expect("valid input");
        assert!((radius - 750.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_observer_input("", 1000.0).is_err());
        assert!(parse_observer_input("21.0", 1000.0).is_err());
        assert!(parse_observer_input("north, 78.9", 1000.0).is_err());
        assert!(parse_observer_input("999, 78.9", 1000.0).is_err());
        assert!(parse_observer_input("21.0, 78.9, 0", 1000.0).is_err());
        assert!(parse_observer_input("21.0, 78.9, 5, 6", 1000.0).is_err());
    }

    #[test]
    fn round_trips_the_prefilled_input() {
        let observer = Coordinate { lat: 21.0932, lng: 78.9816 };
        let text = crate::app::format_observer_input(observer, 1000.0);
        let (parsed, radius) = parse_observer_input(&text, 1.0).expect("prefill parses");
        assert_eq!(parsed, observer);
        assert!((radius - 1000.0).abs() < f64::EPSILON);
    }
}

use std::sync::Arc;

use binwatch_core::{
    model::{Coordinate, SourceId},
    service::{BinwatchService, TriageReport},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    SourceSelect,
    ObserverInput,
    TriageView,
}

pub(crate) struct App {
    pub service: Arc<BinwatchService>,

    pub screen: Screen,
    pub sources: Vec<(SourceId, String)>,
    pub source_list_index: usize,
    pub selected_source: Option<SourceId>,

    pub observer_input: String,
    pub observer: Coordinate,
    pub radius_meters: f64,

    pub report: Option<TriageReport>,
    pub row_index: usize,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(
        service: Arc<BinwatchService>,
        observer: Coordinate,
        radius_meters: f64,
    ) -> Self {
        let sources = service.sources();
        Self {
            service,
            screen: Screen::SourceSelect,
            sources,
            source_list_index: 0,
            selected_source: None,
            observer_input: format_observer_input(observer, radius_meters),
            observer,
            radius_meters,
            report: None,
            row_index: 0,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn select_current_source(&mut self) {
        if let Some((id, _name)) = self.sources.get(self.source_list_index) {
            self.selected_source = Some(id.clone());
            self.screen = Screen::ObserverInput;
        }
    }

    pub(crate) fn selected_source_name(&self) -> &str {
        self.selected_source
            .as_ref()
            .and_then(|selected| self.sources.iter().find(|(id, _)| id == selected))
            .map_or("<no source>", |(_, name)| name.as_str())
    }

    /// Store a fresh report and point the cursor at its highlighted row.
    pub(crate) fn show_report(&mut self, report: TriageReport) {
        self.row_index = report
            .highlight
            .as_ref()
            .and_then(|highlight| {
                report
                    .ranking
                    .entries
                    .iter()
                    .position(|entry| entry.id() == highlight.id())
            })
            .unwrap_or(0);
        self.report = Some(report);
        self.screen = Screen::TriageView;
    }

    pub(crate) fn ranked_len(&self) -> usize {
        self.report
            .as_ref()
            .map_or(0, |report| report.ranking.entries.len())
    }
}

pub(crate) fn format_observer_input(observer: Coordinate, radius_meters: f64) -> String {
    format!("{}, {}, {radius_meters}", observer.lat, observer.lng)
}

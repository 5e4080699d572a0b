//! Client view state
//!
//! The screens a client walks through (landing, dashboard, type selection,
//! input, visualization) as one enum with an explicit transition function.
//! Payloads ride inside the state that renders them.

use crate::models::{ChartRecord, DiagramRecord};
use crate::payload::{ChartPayload, ChartType, DiagramPayload, DiagramType};

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Landing,
    Dashboard,
    ChartSelection,
    DataInput {
        chart_type: ChartType,
    },
    Visualization {
        chart_type: ChartType,
        payload: ChartPayload,
    },
    DiagramSelection,
    DiagramInput {
        diagram_type: DiagramType,
    },
    DiagramVisualization {
        diagram_type: DiagramType,
        payload: DiagramPayload,
    },
}

#[derive(Debug, Clone)]
pub enum ViewEvent {
    GetStarted { authenticated: bool },
    OpenDashboard,
    CreateChart,
    SelectChart(ChartType),
    DataProcessed(ChartPayload),
    ViewSavedChart(Box<ChartRecord>),
    CreateDiagram,
    SelectDiagram(DiagramType),
    DiagramProcessed(DiagramPayload),
    ViewSavedDiagram(Box<DiagramRecord>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ViewError {
    #[error("sign in required")]
    AuthenticationRequired,

    #[error("saved record has unsupported type {0:?}")]
    UnsupportedType(String),

    #[error("cannot handle {event} while in {from}")]
    InvalidTransition {
        from: &'static str,
        event: &'static str,
    },
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            View::Landing => "landing",
            View::Dashboard => "dashboard",
            View::ChartSelection => "chart-selection",
            View::DataInput { .. } => "data-input",
            View::Visualization { .. } => "visualization",
            View::DiagramSelection => "diagram-selection",
            View::DiagramInput { .. } => "diagram-input",
            View::DiagramVisualization { .. } => "diagram-visualization",
        }
    }

    /// Apply one event. The current state is consumed; on error the caller
    /// keeps its previous clone.
    pub fn transition(self, event: ViewEvent) -> Result<View, ViewError> {
        use View::*;
        use ViewEvent as E;

        match (self, event) {
            (Landing, E::GetStarted { authenticated: true }) => Ok(Dashboard),
            (Landing, E::GetStarted { authenticated: false }) => {
                Err(ViewError::AuthenticationRequired)
            }

            (from, E::OpenDashboard) if from != Landing => Ok(Dashboard),
            (from, E::CreateChart) if from != Landing => Ok(ChartSelection),
            (from, E::CreateDiagram) if from != Landing => Ok(DiagramSelection),

            (ChartSelection, E::SelectChart(chart_type)) => Ok(DataInput { chart_type }),
            (DataInput { chart_type }, E::DataProcessed(payload)) => {
                Ok(Visualization { chart_type, payload })
            }
            (Dashboard, E::ViewSavedChart(record)) => {
                let chart_type = record
                    .chart_type
                    .parse()
                    .map_err(|_| ViewError::UnsupportedType(record.chart_type.clone()))?;
                Ok(Visualization {
                    chart_type,
                    payload: ChartPayload::from(*record),
                })
            }

            (DiagramSelection, E::SelectDiagram(diagram_type)) => Ok(DiagramInput { diagram_type }),
            (DiagramInput { diagram_type }, E::DiagramProcessed(payload)) => {
                Ok(DiagramVisualization { diagram_type, payload })
            }
            (Dashboard, E::ViewSavedDiagram(record)) => {
                let diagram_type = record
                    .diagram_type
                    .parse()
                    .map_err(|_| ViewError::UnsupportedType(record.diagram_type.clone()))?;
                Ok(DiagramVisualization {
                    diagram_type,
                    payload: DiagramPayload::from(*record),
                })
            }

            (from, event) => Err(ViewError::InvalidTransition {
                from: from.name(),
                event: event.name(),
            }),
        }
    }
}

impl ViewEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ViewEvent::GetStarted { .. } => "get-started",
            ViewEvent::OpenDashboard => "open-dashboard",
            ViewEvent::CreateChart => "create-chart",
            ViewEvent::SelectChart(_) => "select-chart",
            ViewEvent::DataProcessed(_) => "data-processed",
            ViewEvent::ViewSavedChart(_) => "view-saved-chart",
            ViewEvent::CreateDiagram => "create-diagram",
            ViewEvent::SelectDiagram(_) => "select-diagram",
            ViewEvent::DiagramProcessed(_) => "diagram-processed",
            ViewEvent::ViewSavedDiagram(_) => "view-saved-diagram",
        }
    }
}

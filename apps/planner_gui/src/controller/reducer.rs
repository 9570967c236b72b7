//! Maps UI actions and backend events onto session transitions.

use client_core::{Effect, PlannerSession};
use shared::domain::{CampusName, CourseName, DegreeId};

use crate::controller::events::UiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    ToggleDegree(DegreeId),
    SelectCampus(Option<CampusName>),
    /// Raised by both the course list entry and the chip close control.
    ToggleCourse(CourseName),
    SetFilter(String),
    Submit,
}

/// Validation failures are recorded on the session and shown inline, so they
/// produce no effects here.
pub fn reduce_action(session: &mut PlannerSession, action: UiAction) -> Vec<Effect> {
    match action {
        UiAction::ToggleDegree(degree) => session.toggle_degree(degree),
        UiAction::SelectCampus(campus) => session.select_campus(campus),
        UiAction::ToggleCourse(course) => {
            session.toggle_course(&course);
            Vec::new()
        }
        UiAction::SetFilter(filter) => {
            session.set_filter(filter);
            Vec::new()
        }
        UiAction::Submit => session.submit().unwrap_or_default(),
    }
}

pub enum EventOutcome {
    Effects(Vec<Effect>),
    Status(String),
    Error(crate::controller::events::UiError),
}

pub fn reduce_event(session: &mut PlannerSession, event: UiEvent) -> EventOutcome {
    match event {
        UiEvent::Completed(completion) => EventOutcome::Effects(session.complete(completion)),
        UiEvent::Info(message) => EventOutcome::Status(message),
        UiEvent::Error(err) => EventOutcome::Error(err),
    }
}

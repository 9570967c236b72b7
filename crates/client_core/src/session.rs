//! The single planner state object and its transition functions.
//!
//! Transitions never perform I/O. They mutate state and return the [`Effect`]s a
//! driver must execute; results come back as [`Completion`]s through
//! [`PlannerSession::complete`]. Completions carrying a superseded ticket are
//! dropped without touching state.

use std::time::Duration;

use shared::{
    domain::{CampusName, CourseName, DegreeId},
    error::ValidationError,
    protocol::{CampusesRequest, CoursesRequest, GenerateRequest, GenerateResponse},
};
use tracing::{debug, info};

use crate::{
    error::CatalogError,
    loaders::{CampusLoader, CourseLoader, Resolution},
    selection::{render_chips, render_course_list, Chip, CourseEntry, DegreeSet, SelectedCourses},
    sequence::Ticket,
    submit::{ProgressIndicator, SubmissionStatus, SubmitController},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ResolveCampuses {
        ticket: Ticket,
        request: CampusesRequest,
    },
    ResolveCourses {
        ticket: Ticket,
        request: CoursesRequest,
    },
    Generate {
        ticket: Ticket,
        request: GenerateRequest,
    },
    DeliverArtifact {
        ticket: Ticket,
    },
    DismissIndicator {
        ticket: Ticket,
        after: Duration,
    },
}

impl Effect {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResolveCampuses { .. } => "resolve_campuses",
            Self::ResolveCourses { .. } => "resolve_courses",
            Self::Generate { .. } => "generate",
            Self::DeliverArtifact { .. } => "deliver_artifact",
            Self::DismissIndicator { .. } => "dismiss_indicator",
        }
    }
}

#[derive(Debug)]
pub enum Completion {
    Campuses {
        ticket: Ticket,
        result: Result<Vec<CampusName>, CatalogError>,
    },
    Courses {
        ticket: Ticket,
        result: Result<Vec<CourseName>, CatalogError>,
    },
    Generated {
        ticket: Ticket,
        result: Result<GenerateResponse, CatalogError>,
    },
    Delivered {
        ticket: Ticket,
        result: Result<std::path::PathBuf, String>,
    },
    DismissDue {
        ticket: Ticket,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DegreeToggle {
    pub degree: DegreeId,
    pub selected: bool,
}

/// Everything a front-end needs to draw, derived from state on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionView {
    pub degrees: Vec<DegreeToggle>,
    pub campus_options: Vec<CampusName>,
    pub selected_campus: Option<CampusName>,
    pub campuses_loading: bool,
    pub courses: Vec<CourseEntry>,
    pub courses_loading: bool,
    pub chips: Vec<Chip>,
    pub filter: String,
    pub notice: Option<String>,
    pub validation: Option<ValidationError>,
    pub status: SubmissionStatus,
    pub indicator: Option<ProgressIndicator>,
}

#[derive(Debug, Default)]
pub struct PlannerSession {
    available_degrees: Vec<DegreeId>,
    degrees: DegreeSet,
    campuses: CampusLoader,
    courses: CourseLoader,
    selected: SelectedCourses,
    filter: String,
    notice: Option<String>,
    submit: SubmitController,
}

impl PlannerSession {
    pub fn new(available_degrees: Vec<DegreeId>, dismiss_after: Duration) -> Self {
        Self {
            available_degrees,
            submit: SubmitController::new(dismiss_after),
            ..Self::default()
        }
    }

    pub fn toggle_degree(&mut self, degree: DegreeId) -> Vec<Effect> {
        let selected = self.degrees.toggle(degree.clone());
        debug!(degree = %degree, selected, "degree toggled");
        self.notice = None;
        self.submit.clear_validation();
        // The pending course request was keyed on the previous degree set.
        self.courses.invalidate();
        self.refresh_campuses()
    }

    fn refresh_campuses(&mut self) -> Vec<Effect> {
        match self.campuses.refresh(&self.degrees) {
            Some((ticket, request)) => vec![Effect::ResolveCampuses { ticket, request }],
            None => self.refresh_courses(),
        }
    }

    /// Selecting `None` clears the campus; an unknown campus is ignored.
    pub fn select_campus(&mut self, campus: Option<CampusName>) -> Vec<Effect> {
        if !self.campuses.select(campus) {
            debug!("ignoring campus outside the current options");
            return Vec::new();
        }
        self.notice = None;
        self.submit.clear_validation();
        self.refresh_courses()
    }

    fn refresh_courses(&mut self) -> Vec<Effect> {
        match self
            .courses
            .refresh(&self.degrees, self.campuses.selected())
        {
            Some((ticket, request)) => vec![Effect::ResolveCourses { ticket, request }],
            None => {
                self.selected.clear();
                Vec::new()
            }
        }
    }

    /// Adds or removes a course. Works the same from a list entry or a chip.
    /// Courses outside the current catalog can be removed but never added.
    pub fn toggle_course(&mut self, course: &CourseName) -> bool {
        if !self.selected.contains(course) && !self.courses.catalog().contains(course) {
            debug!(course = %course, "ignoring toggle for course outside the catalog");
            return false;
        }
        let selected = self.selected.toggle(course);
        self.submit.clear_validation();
        debug!(course = %course, selected, "course toggled");
        selected
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
    }

    pub fn submit(&mut self) -> Result<Vec<Effect>, ValidationError> {
        let (ticket, request) =
            self.submit
                .submit(&self.degrees, self.campuses.selected(), &self.selected)?;
        Ok(vec![Effect::Generate { ticket, request }])
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        match completion {
            Completion::Campuses { ticket, result } => {
                match self.campuses.resolve(ticket, result) {
                    Resolution::Stale => Vec::new(),
                    Resolution::Applied => self.refresh_courses(),
                    Resolution::Degraded(err) => {
                        self.notice =
                            Some(format!("Could not load campuses: {}", err.user_message()));
                        self.refresh_courses()
                    }
                }
            }
            Completion::Courses { ticket, result } => {
                match self.courses.resolve(ticket, result) {
                    Resolution::Stale => return Vec::new(),
                    Resolution::Applied => {}
                    Resolution::Degraded(err) => {
                        self.notice =
                            Some(format!("Could not load courses: {}", err.user_message()));
                    }
                }
                let dropped = self.selected.reconcile(self.courses.catalog());
                if !dropped.is_empty() {
                    info!(dropped = dropped.len(), "dropped selections no longer offered");
                }
                Vec::new()
            }
            Completion::Generated { ticket, result } => {
                if self.submit.resolve_generation(ticket, result) {
                    vec![
                        Effect::DeliverArtifact { ticket },
                        Effect::DismissIndicator {
                            ticket,
                            after: self.submit.dismiss_after(),
                        },
                    ]
                } else {
                    Vec::new()
                }
            }
            Completion::Delivered { ticket, result } => {
                self.submit.resolve_delivery(ticket, result);
                Vec::new()
            }
            Completion::DismissDue { ticket } => {
                self.submit.dismiss(ticket);
                Vec::new()
            }
        }
    }

    pub fn view(&self) -> SessionView {
        SessionView {
            degrees: self
                .available_degrees
                .iter()
                .map(|degree| DegreeToggle {
                    degree: degree.clone(),
                    selected: self.degrees.contains(degree),
                })
                .collect(),
            campus_options: self.campuses.options().to_vec(),
            selected_campus: self.campuses.selected().cloned(),
            campuses_loading: self.campuses.in_flight(),
            courses: render_course_list(self.courses.catalog(), &self.selected, &self.filter),
            courses_loading: self.courses.in_flight(),
            chips: render_chips(&self.selected),
            filter: self.filter.clone(),
            notice: self.notice.clone(),
            validation: self.submit.validation(),
            status: self.submit.status(),
            indicator: self.submit.indicator().cloned(),
        }
    }

    pub fn degrees(&self) -> &DegreeSet {
        &self.degrees
    }

    pub fn campus_options(&self) -> &[CampusName] {
        self.campuses.options()
    }

    pub fn selected_campus(&self) -> Option<&CampusName> {
        self.campuses.selected()
    }

    pub fn catalog(&self) -> &[CourseName] {
        self.courses.catalog()
    }

    pub fn selected_courses(&self) -> &[CourseName] {
        self.selected.as_slice()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.submit.status()
    }

    pub fn delivered_to(&self) -> Option<&std::path::PathBuf> {
        self.submit.delivered_to()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;

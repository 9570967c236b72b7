//! Submission validation and the progress indicator lifecycle.

use std::{path::PathBuf, time::Duration};

use shared::{
    domain::CampusName,
    error::ValidationError,
    protocol::{GenerateRequest, GenerateResponse},
};
use tracing::{debug, error, info};

use crate::{
    error::CatalogError,
    selection::{DegreeSet, SelectedCourses},
    sequence::{RequestSequencer, Ticket},
};

pub const AWAITING_TEXT: &str = "Generating timetable, please wait...";
pub const SUCCEEDED_TEXT: &str = "Generated successfully";
pub const FAILED_PREFIX: &str = "Error generating files";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    AwaitingServer,
    Succeeded,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressIndicator {
    pub text: String,
    pub busy: bool,
}

/// Builds the immutable generation snapshot, or the first missing facet.
pub fn validate_selection(
    degrees: &DegreeSet,
    campus: Option<&CampusName>,
    courses: &SelectedCourses,
) -> Result<GenerateRequest, ValidationError> {
    if degrees.is_empty() {
        return Err(ValidationError::MissingDegrees);
    }
    let campus = campus
        .filter(|campus| !campus.as_str().trim().is_empty())
        .ok_or(ValidationError::MissingCampus)?;
    if courses.is_empty() {
        return Err(ValidationError::MissingCourses);
    }
    Ok(GenerateRequest {
        degrees: degrees.to_vec(),
        campus: campus.clone(),
        courses: courses.as_slice().to_vec(),
    })
}

#[derive(Debug)]
pub struct SubmitController {
    status: SubmissionStatus,
    indicator: Option<ProgressIndicator>,
    validation: Option<ValidationError>,
    delivered_to: Option<PathBuf>,
    sequencer: RequestSequencer,
    dismiss_after: Duration,
}

impl Default for SubmitController {
    fn default() -> Self {
        Self::new(Duration::from_millis(2000))
    }
}

impl SubmitController {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            status: SubmissionStatus::Idle,
            indicator: None,
            validation: None,
            delivered_to: None,
            sequencer: RequestSequencer::default(),
            dismiss_after,
        }
    }

    /// Validation failures issue nothing. A finished submission returns to
    /// `Idle`; one still awaiting the server keeps waiting.
    pub fn submit(
        &mut self,
        degrees: &DegreeSet,
        campus: Option<&CampusName>,
        courses: &SelectedCourses,
    ) -> Result<(Ticket, GenerateRequest), ValidationError> {
        let request = match validate_selection(degrees, campus, courses) {
            Ok(request) => request,
            Err(err) => {
                info!("submission rejected: {err}");
                self.validation = Some(err);
                if self.status != SubmissionStatus::AwaitingServer {
                    self.status = SubmissionStatus::Idle;
                    self.indicator = None;
                }
                return Err(err);
            }
        };

        let ticket = self.sequencer.issue();
        self.validation = None;
        self.delivered_to = None;
        self.status = SubmissionStatus::AwaitingServer;
        self.indicator = Some(ProgressIndicator {
            text: AWAITING_TEXT.to_string(),
            busy: true,
        });
        info!(
            %ticket,
            degrees = request.degrees.len(),
            campus = %request.campus,
            courses = request.courses.len(),
            "submitting generation request"
        );
        Ok((ticket, request))
    }

    /// Returns true when the artifact should now be delivered.
    pub fn resolve_generation(
        &mut self,
        ticket: Ticket,
        result: Result<GenerateResponse, CatalogError>,
    ) -> bool {
        if !self.sequencer.settle(ticket) || self.status != SubmissionStatus::AwaitingServer {
            debug!(%ticket, "discarding superseded generation response");
            return false;
        }
        match result {
            Ok(response) if response.artifact_produced() => {
                self.status = SubmissionStatus::Succeeded;
                self.indicator = Some(ProgressIndicator {
                    text: SUCCEEDED_TEXT.to_string(),
                    busy: false,
                });
                true
            }
            Ok(response) => {
                let reason = response
                    .message
                    .unwrap_or_else(|| "the server produced no artifact".to_string());
                self.fail(ticket, &reason);
                false
            }
            Err(err) => {
                self.fail(ticket, &err.user_message());
                false
            }
        }
    }

    /// Also applies once the success indicator is gone, so a slow write still lands.
    pub fn resolve_delivery(&mut self, ticket: Ticket, result: Result<PathBuf, String>) {
        let settled = matches!(
            self.status,
            SubmissionStatus::Succeeded | SubmissionStatus::Idle
        );
        if !self.sequencer.is_latest(ticket) || !settled {
            debug!(%ticket, "discarding superseded artifact delivery");
            return;
        }
        match result {
            Ok(path) => {
                info!(%ticket, path = %path.display(), "artifact delivered");
                self.delivered_to = Some(path);
            }
            Err(reason) => self.fail(ticket, &format!("could not deliver artifact: {reason}")),
        }
    }

    /// Hides the indicator after a success. Returns false if a newer submission took over.
    pub fn dismiss(&mut self, ticket: Ticket) -> bool {
        if !self.sequencer.is_latest(ticket) || self.status != SubmissionStatus::Succeeded {
            return false;
        }
        self.status = SubmissionStatus::Idle;
        self.indicator = None;
        true
    }

    pub fn clear_validation(&mut self) {
        self.validation = None;
    }

    fn fail(&mut self, ticket: Ticket, reason: &str) {
        error!(%ticket, "generation failed: {reason}");
        self.status = SubmissionStatus::Failed;
        self.indicator = Some(ProgressIndicator {
            text: format!("{FAILED_PREFIX}: {reason}"),
            busy: false,
        });
    }

    pub fn status(&self) -> SubmissionStatus {
        self.status
    }

    pub fn indicator(&self) -> Option<&ProgressIndicator> {
        self.indicator.as_ref()
    }

    pub fn validation(&self) -> Option<ValidationError> {
        self.validation
    }

    pub fn delivered_to(&self) -> Option<&PathBuf> {
        self.delivered_to.as_ref()
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }
}

#[cfg(test)]
mod tests {
    use shared::domain::{CourseName, DegreeId};

    use super::*;

    fn complete_selection() -> (DegreeSet, CampusName, SelectedCourses) {
        let mut degrees = DegreeSet::default();
        degrees.toggle(DegreeId::from("CS"));
        let mut courses = SelectedCourses::default();
        courses.toggle(&CourseName::from("Algorithms"));
        (degrees, CampusName::from("North"), courses)
    }

    fn produced() -> GenerateResponse {
        GenerateResponse {
            message: Some("ok".into()),
            zip: Some(shared::protocol::ArtifactMarker::Flag(true)),
        }
    }

    #[test]
    fn empty_campus_is_a_validation_error() {
        let mut degrees = DegreeSet::default();
        degrees.toggle(DegreeId::from("CS"));
        let mut controller = SubmitController::default();

        let err = controller
            .submit(
                &degrees,
                Some(&CampusName::from("")),
                &SelectedCourses::default(),
            )
            .expect_err("incomplete selection");
        assert_eq!(err, ValidationError::MissingCampus);
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.indicator().is_none());
        assert_eq!(controller.validation(), Some(ValidationError::MissingCampus));
    }

    #[test]
    fn success_then_dismiss_returns_to_idle() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, request) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");
        assert_eq!(request.courses, vec![CourseName::from("Algorithms")]);
        assert_eq!(controller.status(), SubmissionStatus::AwaitingServer);
        assert!(controller.indicator().is_some_and(|i| i.busy));

        assert!(controller.resolve_generation(ticket, Ok(produced())));
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert_eq!(
            controller.indicator().map(|i| i.text.as_str()),
            Some(SUCCEEDED_TEXT)
        );

        controller.resolve_delivery(ticket, Ok(PathBuf::from("/tmp/out.zip")));
        assert!(controller.dismiss(ticket));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.indicator().is_none());
    }

    #[test]
    fn server_message_becomes_failure_text() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");

        let delivered = controller.resolve_generation(
            ticket,
            Err(CatalogError::Status {
                endpoint: "generate",
                status: 400,
                message: "no timetable possible".into(),
            }),
        );
        assert!(!delivered);
        assert_eq!(controller.status(), SubmissionStatus::Failed);
        let text = &controller.indicator().expect("indicator").text;
        assert!(text.starts_with(FAILED_PREFIX));
        assert!(text.contains("no timetable possible"));
        assert!(!controller.dismiss(ticket));
    }

    #[test]
    fn missing_artifact_counts_as_failure() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");

        let response = GenerateResponse {
            message: None,
            zip: Some(shared::protocol::ArtifactMarker::Flag(false)),
        };
        assert!(!controller.resolve_generation(ticket, Ok(response)));
        assert_eq!(controller.status(), SubmissionStatus::Failed);
    }

    #[test]
    fn resubmission_supersedes_pending_generation() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (first, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");
        let (second, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");

        assert!(!controller.resolve_generation(first, Ok(produced())));
        assert_eq!(controller.status(), SubmissionStatus::AwaitingServer);
        assert!(controller.resolve_generation(second, Ok(produced())));
        assert!(!controller.dismiss(first));
        assert!(controller.dismiss(second));
    }

    #[test]
    fn rejected_resubmit_after_failure_returns_to_idle() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");
        controller.resolve_generation(
            ticket,
            Err(CatalogError::Status {
                endpoint: "generate",
                status: 500,
                message: "internal error".into(),
            }),
        );
        assert_eq!(controller.status(), SubmissionStatus::Failed);

        let err = controller
            .submit(&degrees, Some(&campus), &SelectedCourses::default())
            .expect_err("no courses");
        assert_eq!(err, ValidationError::MissingCourses);
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.indicator().is_none());
        assert_eq!(controller.validation(), Some(ValidationError::MissingCourses));
    }

    #[test]
    fn rejected_resubmit_keeps_pending_generation() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");

        controller
            .submit(&degrees, None, &courses)
            .expect_err("no campus");
        assert_eq!(controller.status(), SubmissionStatus::AwaitingServer);
        assert!(controller.indicator().is_some_and(|i| i.busy));
        assert!(controller.resolve_generation(ticket, Ok(produced())));
    }

    #[test]
    fn delivery_after_dismiss_is_still_recorded() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");
        controller.resolve_generation(ticket, Ok(produced()));
        assert!(controller.dismiss(ticket));

        controller.resolve_delivery(ticket, Ok(PathBuf::from("/tmp/out.zip")));
        assert_eq!(controller.delivered_to(), Some(&PathBuf::from("/tmp/out.zip")));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[test]
    fn delivery_failure_moves_to_failed() {
        let (degrees, campus, courses) = complete_selection();
        let mut controller = SubmitController::default();
        let (ticket, _) = controller
            .submit(&degrees, Some(&campus), &courses)
            .expect("valid");
        controller.resolve_generation(ticket, Ok(produced()));

        controller.resolve_delivery(ticket, Err("disk full".into()));
        assert_eq!(controller.status(), SubmissionStatus::Failed);
        assert!(!controller.dismiss(ticket));
    }
}

//! Sequential driver for non-interactive front-ends.

use std::collections::VecDeque;

use shared::{
    domain::{CampusName, CourseName, DegreeId},
    error::ValidationError,
};
use tracing::debug;

use crate::{
    artifact::ArtifactSink,
    effects::execute,
    session::{Effect, PlannerSession},
    submit::SubmissionStatus,
    CatalogService,
};

/// Runs every effect to quiescence after each action. Indicator dismissal is
/// skipped so the final submission status stays observable.
pub struct Planner<S, A> {
    session: PlannerSession,
    service: S,
    sink: A,
}

impl<S, A> Planner<S, A>
where
    S: CatalogService,
    A: ArtifactSink,
{
    pub fn new(session: PlannerSession, service: S, sink: A) -> Self {
        Self {
            session,
            service,
            sink,
        }
    }

    pub fn session(&self) -> &PlannerSession {
        &self.session
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub async fn toggle_degree(&mut self, degree: DegreeId) {
        let effects = self.session.toggle_degree(degree);
        self.run(effects).await;
    }

    pub async fn select_campus(&mut self, campus: Option<CampusName>) {
        let effects = self.session.select_campus(campus);
        self.run(effects).await;
    }

    pub fn toggle_course(&mut self, course: &CourseName) -> bool {
        self.session.toggle_course(course)
    }

    pub async fn submit(&mut self) -> Result<SubmissionStatus, ValidationError> {
        let effects = self.session.submit()?;
        self.run(effects).await;
        Ok(self.session.status())
    }

    async fn run(&mut self, effects: Vec<Effect>) {
        let mut queue: VecDeque<Effect> = effects.into();
        while let Some(effect) = queue.pop_front() {
            if matches!(effect, Effect::DismissIndicator { .. }) {
                continue;
            }
            debug!(effect = effect.name(), "executing effect");
            let completion = execute(&self.service, &self.sink, effect).await;
            queue.extend(self.session.complete(completion));
        }
    }
}

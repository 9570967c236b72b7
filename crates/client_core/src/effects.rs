use tracing::warn;

use crate::{
    artifact::ArtifactSink,
    session::{Completion, Effect},
    CatalogService,
};

/// Performs one effect. Failures are carried inside the completion, never returned.
pub async fn execute<S, A>(service: &S, sink: &A, effect: Effect) -> Completion
where
    S: CatalogService + ?Sized,
    A: ArtifactSink + ?Sized,
{
    match effect {
        Effect::ResolveCampuses { ticket, request } => Completion::Campuses {
            ticket,
            result: service.resolve_campuses(&request).await,
        },
        Effect::ResolveCourses { ticket, request } => Completion::Courses {
            ticket,
            result: service.resolve_courses(&request).await,
        },
        Effect::Generate { ticket, request } => Completion::Generated {
            ticket,
            result: service.generate(&request).await,
        },
        Effect::DeliverArtifact { ticket } => {
            let result = match service.fetch_artifact().await {
                Ok(artifact) => sink.deliver(artifact).await.map_err(|err| format!("{err:#}")),
                Err(err) => Err(err.user_message()),
            };
            if let Err(reason) = &result {
                warn!(%ticket, "artifact delivery failed: {reason}");
            }
            Completion::Delivered { ticket, result }
        }
        Effect::DismissIndicator { ticket, after } => {
            tokio::time::sleep(after).await;
            Completion::DismissDue { ticket }
        }
    }
}

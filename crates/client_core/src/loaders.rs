//! Campus and course resolution slots.
//!
//! Each loader owns its own [`RequestSequencer`]; a response only applies while
//! its ticket is the newest issued, so a slow request can never overwrite the
//! options established by a later one. Options are replaced wholesale, never
//! merged.

use shared::{
    domain::{CampusName, CourseName},
    protocol::{CampusesRequest, CoursesRequest},
};
use tracing::{debug, warn};

use crate::{
    error::CatalogError,
    selection::DegreeSet,
    sequence::{RequestSequencer, Ticket},
};

#[derive(Debug)]
pub enum Resolution {
    Applied,
    /// The request failed; options were emptied instead of left stale.
    Degraded(CatalogError),
    Stale,
}

impl Resolution {
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale)
    }
}

#[derive(Debug, Default)]
pub struct CampusLoader {
    options: Vec<CampusName>,
    selected: Option<CampusName>,
    sequencer: RequestSequencer,
}

impl CampusLoader {
    /// Returns the request to issue, or `None` when the slot was cleared synchronously.
    pub fn refresh(&mut self, degrees: &DegreeSet) -> Option<(Ticket, CampusesRequest)> {
        if degrees.is_empty() {
            self.clear();
            return None;
        }
        let ticket = self.sequencer.issue();
        Some((
            ticket,
            CampusesRequest {
                degrees: degrees.to_vec(),
            },
        ))
    }

    pub fn clear(&mut self) {
        self.sequencer.invalidate();
        self.options.clear();
        self.selected = None;
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CampusName>, CatalogError>,
    ) -> Resolution {
        if !self.sequencer.settle(ticket) {
            debug!(%ticket, "discarding superseded campus response");
            return Resolution::Stale;
        }
        match result {
            Ok(options) => {
                self.replace(options);
                Resolution::Applied
            }
            Err(err) => {
                warn!(%ticket, "campus resolution failed: {err}");
                self.options.clear();
                self.selected = None;
                Resolution::Degraded(err)
            }
        }
    }

    fn replace(&mut self, options: Vec<CampusName>) {
        self.selected = self.selected.take().filter(|campus| options.contains(campus));
        self.options = options;
    }

    /// Accepts `None` or a campus from the current options; rejects anything else.
    pub fn select(&mut self, campus: Option<CampusName>) -> bool {
        match campus {
            Some(campus) if !self.options.contains(&campus) => false,
            campus => {
                self.selected = campus;
                true
            }
        }
    }

    pub fn options(&self) -> &[CampusName] {
        &self.options
    }

    pub fn selected(&self) -> Option<&CampusName> {
        self.selected.as_ref()
    }

    pub fn in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }
}

#[derive(Debug, Default)]
pub struct CourseLoader {
    catalog: Vec<CourseName>,
    sequencer: RequestSequencer,
}

impl CourseLoader {
    /// Returns the request to issue, or `None` when the catalog was cleared synchronously.
    pub fn refresh(
        &mut self,
        degrees: &DegreeSet,
        campus: Option<&CampusName>,
    ) -> Option<(Ticket, CoursesRequest)> {
        let Some(campus) = campus.filter(|_| !degrees.is_empty()) else {
            self.clear();
            return None;
        };
        let ticket = self.sequencer.issue();
        Some((
            ticket,
            CoursesRequest {
                degrees: degrees.to_vec(),
                campus: campus.clone(),
            },
        ))
    }

    pub fn clear(&mut self) {
        self.sequencer.invalidate();
        self.catalog.clear();
    }

    /// Retires the in-flight request without touching the displayed catalog.
    pub fn invalidate(&mut self) {
        self.sequencer.invalidate();
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<CourseName>, CatalogError>,
    ) -> Resolution {
        if !self.sequencer.settle(ticket) {
            debug!(%ticket, "discarding superseded course response");
            return Resolution::Stale;
        }
        match result {
            Ok(catalog) => {
                self.catalog = catalog;
                Resolution::Applied
            }
            Err(err) => {
                warn!(%ticket, "course resolution failed: {err}");
                self.catalog.clear();
                Resolution::Degraded(err)
            }
        }
    }

    pub fn catalog(&self) -> &[CourseName] {
        &self.catalog
    }

    pub fn in_flight(&self) -> bool {
        self.sequencer.in_flight()
    }
}

use std::fmt;

/// Identifies one issued request. Only the latest ticket of a sequencer may apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    #[cfg(test)]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic per-slot request counter.
///
/// Responses are applied in issuance order rather than completion order: a
/// response is accepted only while its ticket is still the newest one issued,
/// and `invalidate` retires every outstanding ticket without issuing a new one.
#[derive(Debug, Default)]
pub struct RequestSequencer {
    latest: u64,
    outstanding: bool,
}

impl RequestSequencer {
    pub fn issue(&mut self) -> Ticket {
        self.latest += 1;
        self.outstanding = true;
        Ticket(self.latest)
    }

    pub fn invalidate(&mut self) {
        if self.outstanding {
            self.latest += 1;
            self.outstanding = false;
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.outstanding && ticket.0 == self.latest
    }

    /// True for the most recently issued ticket, whether or not it has settled.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }

    /// Marks the current ticket as resolved. Returns false for superseded tickets.
    pub fn settle(&mut self, ticket: Ticket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.outstanding = false;
        true
    }

    pub fn in_flight(&self) -> bool {
        self.outstanding
    }
}

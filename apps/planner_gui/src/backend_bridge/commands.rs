//! Backend commands queued from UI to backend worker.

use client_core::Effect;

pub enum BackendCommand {
    Execute(Effect),
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute(effect) => effect.name(),
        }
    }
}

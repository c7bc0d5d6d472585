use std::cell::RefCell;

use crate::boundary::ReleaseWarning;
use crate::error::Result;
use crate::ui::Reporter;

/// Something a reporter was told.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportEvent {
    Info(String),
    Warning(ReleaseWarning),
    StartGroup(String),
    EndGroup,
    Output { name: String, value: String },
    Failed(String),
}

/// Reporter that keeps every event in memory
#[derive(Debug, Default)]
pub struct MemoryReporter {
    events: RefCell<Vec<ReportEvent>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.borrow().clone()
    }

    pub fn warnings(&self) -> Vec<ReleaseWarning> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::Warning(w) => Some(w.clone()),
                _ => None,
            })
            .collect()
    }

    /// Last value published under `name`
    pub fn output(&self, name: &str) -> Option<String> {
        self.events.borrow().iter().rev().find_map(|e| match e {
            ReportEvent::Output { name: n, value } if n == name => Some(value.clone()),
            _ => None,
        })
    }

    pub fn groups(&self) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ReportEvent::StartGroup(title) => Some(title.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for MemoryReporter {
    fn info(&self, message: &str) {
        self.push(ReportEvent::Info(message.to_string()));
    }

    fn warning(&self, warning: &ReleaseWarning) {
        self.push(ReportEvent::Warning(warning.clone()));
    }

    fn start_group(&self, title: &str) {
        self.push(ReportEvent::StartGroup(title.to_string()));
    }

    fn end_group(&self) {
        self.push(ReportEvent::EndGroup);
    }

    fn set_output(&self, name: &str, value: &str) -> Result<()> {
        self.push(ReportEvent::Output {
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn set_failed(&self, message: &str) {
        self.push(ReportEvent::Failed(message.to_string()));
    }
}

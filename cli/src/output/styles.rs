//! Colours for terminal output. Everything stays plain until `colorize` runs.

use owo_colors::Style;
use svcmgr_common::LifecyclePhase;

#[derive(Default, Clone)]
pub struct Styles {
    /// Completed steps and healthy stacks.
    pub success: Style,
    /// Kept containers, failed stacks, unrecognised replies.
    pub warning: Style,
    pub error: Style,
    /// Step markers while a deploy or dispose runs.
    pub info: Style,
    /// Keys in key/value listings.
    pub dim: Style,
    pub bold: Style,
    pub header: Style,
}

impl Styles {
    pub fn colorize(&mut self) {
        self.success = Style::new().green();
        self.warning = Style::new().yellow();
        self.error = Style::new().red();
        self.info = Style::new().blue();
        self.dim = Style::new().dimmed();
        self.bold = Style::new().bold();
        self.header = Style::new().bold().cyan();
    }

    /// Style for an entity's lifecycle phase.
    #[must_use]
    pub fn phase(&self, phase: LifecyclePhase) -> Style {
        match phase {
            LifecyclePhase::RemoteActive => self.success,
            LifecyclePhase::Failed => self.error,
            LifecyclePhase::New | LifecyclePhase::Disposed => self.dim,
            _ => self.warning,
        }
    }
}

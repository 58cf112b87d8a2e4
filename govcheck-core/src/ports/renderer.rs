// govcheck-core/src/ports/renderer.rs

use crate::domain::governance::ValidationReport;
use crate::error::GovcheckError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Include passing checks in the output.
    pub show_passed: bool,
}

pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &ValidationReport, options: RenderOptions) -> Result<String, GovcheckError>;
}

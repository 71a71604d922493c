mod intervention;
mod report;

pub use intervention::{Intervention, InterventionStatus};
pub use report::{Report, ReportMedia, ReportStatus};

pub mod report;
pub mod span;
pub mod verdict;

pub use report::{DocumentStatus, Issue, IssueRecord, RiskAssessment, RiskLevel, ScanResponse};
pub use span::{BoundingBox, PageGeometries, PageGeometry, RgbColor, TextSpan};
pub use verdict::{VisibilityCategory, VisibilityVerdict};

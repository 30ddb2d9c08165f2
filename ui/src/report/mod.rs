pub mod data;

mod modal;
pub use modal::ReportModal;

mod plan;
pub use plan::{plan_charts, ChartName, PlannedChart};

mod scroll;
pub use scroll::{PageScroll, ScrollLock};

mod summary;
pub use summary::{manholes_table, summary_cards, timeline_cards, InfoCard, ReportTable};

pub use data::{AnalysisType, ManholeRow, PerformanceComparison, RankedRobot, ReportData};

//! Figure registry and plotters renderers for the department performance
//! visuals: the best/worst comparison figure and the four-panel dashboard.

pub mod comparison;
pub mod dashboard;
mod draw;
pub mod figure;
pub mod panels;
pub mod style;

pub use comparison::{ComparisonChart, COMPARISON_SIZE};
pub use dashboard::{DashboardChart, DashboardReport, DASHBOARD_SIZE};
pub use figure::{Figure, FigureBook, FigureHandle, FigureSpec};
pub use panels::{MatrixPanel, PanelOutcome, PanelStatus, StrategicPanel, StrategicPoint};

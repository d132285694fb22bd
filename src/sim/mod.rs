pub mod driver;
pub mod report;
pub mod spec;

pub use driver::{Algorithm, simulate};
pub use report::{Gantt, ProcessRow, Report, TimelineRow};
pub use spec::{ProcessSpec, WorkloadConfig, bernoulli_workload, parse_numbers};

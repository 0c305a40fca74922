// 跨多個資源的寫入流程

pub mod booking;
pub mod release;
pub mod saga;

pub use booking::{BookingForm, BookingOutcome, BookingWorkflow};
pub use release::{ReleaseRecordOutcome, ReleaseReport, ReleaseWorkflow};
pub use saga::{Compensation, Saga, StepRecord, StepStatus, TaskLog};

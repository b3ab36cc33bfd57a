pub mod observation;
pub mod report;

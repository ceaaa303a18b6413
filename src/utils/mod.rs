//! Small helpers shared by detectors and reports

pub mod score;
pub mod string;

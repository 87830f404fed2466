pub mod answer;
pub mod candidate;
pub mod interview;
pub mod report;

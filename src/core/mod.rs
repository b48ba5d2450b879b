/// Core module for the summary and rename pipelines
///
/// This module contains the table model and its loader, the report builder,
/// and the rename planner/executor pair.

pub mod rename;
pub mod report;
pub mod table;

/// Utility modules shared by both tools
///
/// This module contains path handling, directory listing, console and file
/// output, and logger setup.

pub mod file_utils;
pub mod logging;
pub mod output_formatter;

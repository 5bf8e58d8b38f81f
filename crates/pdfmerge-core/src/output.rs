//! Output file naming and size formatting

use chrono::NaiveDate;

const PDF_EXTENSION: &str = ".pdf";

/// Name used when the user leaves the output name empty
pub fn default_output_name(date: NaiveDate) -> String {
    format!("merged-{}", date.format("%Y-%m-%d"))
}

/// Turn the user's input into a download file name ending in `.pdf`
pub fn resolve_output_name(input: &str, date: NaiveDate) -> String {
    let trimmed = input.trim();
    let mut name = if trimmed.is_empty() {
        default_output_name(date)
    } else {
        trimmed.to_string()
    };

    if !name.to_lowercase().ends_with(PDF_EXTENSION) {
        name.push_str(PDF_EXTENSION);
    }
    name
}

/// Format bytes as a human-readable string
pub fn format_bytes(bytes: usize) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    if unit == 0 || value >= 10.0 {
        format!("{:.0} {}", value, UNITS[unit])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

//! Terminal output utilities.
//!
//! Provides the end-of-run summary.

use super::report::Report;
use colored::Colorize;

/// Right-align `label` to `width` and append `value`.
pub fn format_row<T: ToString>(label: &str, value: T, width: usize) -> String {
    format!("{label:>width$}: {}", value.to_string())
}

/// Summary lines for a finished run.
pub fn summary_lines(report: &Report, rejected_count: usize) -> Vec<String> {
    const WIDTH: usize = 16;
    vec![
        format_row("ASN-DROP", &report.asn_drop, WIDTH),
        format_row("DROP v4", &report.drop_v4, WIDTH),
        format_row("DROP v6", &report.drop_v6, WIDTH),
        format_row("consolidated v4", &report.consolidated_v4, WIDTH),
        format_row("consolidated v6", &report.consolidated_v6, WIDTH),
        format_row("rejected", rejected_count, WIDTH),
    ]
}

/// Print the run summary to stdout, flagging rejected tokens.
pub fn print_summary(report: &Report, rejected_count: usize, output_file: &str) {
    println!("#{}# {}", "SUMMARY".on_blue(), report.timestamp);
    for line in summary_lines(report, rejected_count) {
        println!("{line}");
    }
    if rejected_count > 0 {
        println!(
            "#{}# {rejected_count} invalid entries skipped, see log for details",
            "NOTE".on_red()
        );
    }
    println!("#{}# {output_file}", "WROTE".on_green());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row_short() {
        assert_eq!(format_row("v4", "3 IPv4 ranges", 6), "    v4: 3 IPv4 ranges");
    }

    #[test]
    fn test_format_row_long_label() {
        assert_eq!(format_row("consolidated v4", 1, 4), "consolidated v4: 1");
    }

    #[test]
    fn test_summary_lines() {
        let report = Report {
            comment: String::new(),
            timestamp: String::new(),
            asn_drop: "2 entries, converted to 5 unique IP ranges".to_string(),
            drop_v4: "3 entries".to_string(),
            drop_v6: "1 entries".to_string(),
            consolidated_v4: "4 IPv4 ranges".to_string(),
            consolidated_v6: "1 IPv6 ranges".to_string(),
            v4: vec![],
            v6: vec![],
        };
        let lines = summary_lines(&report, 2);
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[1], "         DROP v4: 3 entries");
        assert_eq!(lines[5], "        rejected: 2");
    }
}

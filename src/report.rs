/*!
 * Reporting functionality for dagdump
 *
 * Renders the end-of-run summary with the tabled library.
 */

use std::time::Duration;

use chrono::{DateTime, Local};
use tabled::{
    settings::{object::Columns, Alignment, Modify, Padding, Style},
    Table, Tabled,
};

use crate::config::OutputPaths;
use crate::utils::{abbreviate_cid, format_number};
use crate::walker::CrawlStatistics;

/// Everything shown after a crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Root CID of the crawl
    pub root_cid: String,
    /// Node the crawl ran against
    pub node_address: String,
    /// Output files
    pub outputs: OutputPaths,
    /// When the crawl started
    pub started_at: DateTime<Local>,
    /// Time taken to crawl
    pub duration: Duration,
    /// Run counters
    pub statistics: CrawlStatistics,
}

/// Format of the report output
pub enum ReportFormat {
    /// Console table output
    ConsoleTable,
}

/// Report generator for crawl results
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    /// Create a new reporter
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Generate a report string
    pub fn generate_report(&self, report: &CrawlReport) -> String {
        match self.format {
            ReportFormat::ConsoleTable => self.generate_console_report(report),
        }
    }

    /// Print the report to stdout
    pub fn print_report(&self, report: &CrawlReport) {
        println!("\n{}", self.generate_report(report));
    }

    fn style(table: &mut Table) -> String {
        table
            .with(Style::rounded())
            .with(Padding::new(1, 1, 0, 0))
            .with(Modify::new(Columns::new(..)).with(Alignment::left()));

        table.to_string()
    }

    fn create_summary_table(&self, report: &CrawlReport) -> String {
        #[derive(Tabled)]
        struct SummaryRow {
            #[tabled(rename = "Metric")]
            key: String,

            #[tabled(rename = "Value")]
            value: String,
        }

        let stats = &report.statistics;
        let mut rows = vec![
            SummaryRow {
                key: "Root CID".to_string(),
                value: abbreviate_cid(&report.root_cid, 40),
            },
            SummaryRow {
                key: "Node".to_string(),
                value: report.node_address.clone(),
            },
            SummaryRow {
                key: "Started".to_string(),
                value: report.started_at.to_rfc3339(),
            },
            SummaryRow {
                key: "Crawl Time".to_string(),
                value: format!("{:.4?}", report.duration),
            },
            SummaryRow {
                key: "Remote Queries".to_string(),
                value: format_number(stats.queries),
            },
            SummaryRow {
                key: "Visited".to_string(),
                value: format_number(stats.visited),
            },
            SummaryRow {
                key: "Duplicates Skipped".to_string(),
                value: format_number(stats.duplicates_skipped),
            },
        ];

        if stats.failures() > 0 {
            rows.push(SummaryRow {
                key: "Failures".to_string(),
                value: format!(
                    "{} (ls {} / stat {} / dag {})",
                    stats.failures(),
                    stats.listings_failed,
                    stats.stats_failed,
                    stats.dag_failed
                ),
            });
        }

        if stats.interrupted {
            rows.push(SummaryRow {
                key: "Status".to_string(),
                value: "interrupted, output is partial".to_string(),
            });
        }

        Self::style(&mut Table::new(rows))
    }

    fn create_outputs_table(&self, report: &CrawlReport) -> String {
        #[derive(Tabled)]
        struct OutputRow {
            #[tabled(rename = "Stream")]
            stream: String,

            #[tabled(rename = "Rows")]
            rows: String,

            #[tabled(rename = "File")]
            path: String,
        }

        let stats = &report.statistics;
        let rows: Vec<OutputRow> = report
            .outputs
            .iter()
            .map(|(stream, path)| {
                let count = match stream {
                    "directories" => stats.directories,
                    "files" => stats.files,
                    _ => stats.blocks,
                };
                OutputRow {
                    stream: stream.to_string(),
                    rows: format_number(count),
                    path: path.display().to_string(),
                }
            })
            .collect();

        Self::style(&mut Table::new(rows))
    }

    fn generate_console_report(&self, report: &CrawlReport) -> String {
        let outputs_table = self.create_outputs_table(report);
        let summary_table = self.create_summary_table(report);

        let summary_title = if report.statistics.interrupted {
            "CRAWL INTERRUPTED"
        } else {
            "CRAWL COMPLETE"
        };

        format!(
            "OUTPUT FILES\n{}\n\n{}\n{}",
            outputs_table, summary_title, summary_table
        )
    }
}

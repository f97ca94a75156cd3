//! Human-readable formatting for sizes, durations and CLI text output.

use crate::aggregate::{FolderProgress, WorkSummary};
use crate::service::{FileDetail, FolderDetail, MatchExplanation, TreeReport};
use crate::totals::ArchiveTotals;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;

const SIZE_UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];

/// Bytes in binary units: `0 B`, `512 B`, `1.5 KB`, `2.00 GB`
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    match unit {
        0 => format!("{} {}", bytes, SIZE_UNITS[0]),
        1 | 2 => format!("{:.1} {}", size, SIZE_UNITS[unit]),
        _ => format!("{:.2} {}", size, SIZE_UNITS[unit]),
    }
}

/// Coarse running time: `0h`, `45 min`, `12.5 hrs`, `1,234 hrs`
pub fn format_duration(seconds: f64) -> String {
    if seconds <= 0.0 {
        return "0h".to_string();
    }
    let hours = seconds / 3600.0;
    if hours >= 1000.0 {
        format!("{} hrs", group_thousands(hours.round() as u64))
    } else if hours >= 1.0 {
        format!("{:.1} hrs", hours)
    } else {
        format!("{:.0} min", seconds / 60.0)
    }
}

/// `HH:MM:SS`; hours are not wrapped at 24
pub fn format_timecode(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!(
        "{:02}:{:02}:{:02}",
        total / 3600,
        (total % 3600) / 60,
        total % 60
    )
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Section heading with bold/underline. Respects NO_COLOR and TTY.
pub fn format_section_heading(title: &str) -> String {
    format!("{}", title.bold().underline())
}

/// Percentage cell, green once complete
fn format_percent(value: f64, complete: bool) -> String {
    let text = format!("{:.1}%", value);
    if complete {
        format!("{}", text.green())
    } else {
        text
    }
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(header);
    table
}

fn work_cell(summary: Option<&WorkSummary>) -> String {
    match summary {
        Some(ws) => format!(
            "{}/{} {} (ledger {})",
            ws.total_done,
            ws.total_files,
            format_percent(ws.combined_progress, ws.is_complete),
            format_percent(ws.actual_progress, ws.is_complete),
        ),
        None => "-".to_string(),
    }
}

fn category_cell(record: &FolderProgress) -> String {
    record
        .category
        .as_ref()
        .map(|c| c.category.clone())
        .unwrap_or_else(|| "-".to_string())
}

fn push_tree_rows(table: &mut Table, record: &FolderProgress, indent: usize) {
    let md = &record.metadata_summary;
    let mut name = format!("{}{}", "  ".repeat(indent), record.folder.name);
    if record.children_omitted > 0 {
        name.push_str(&format!(" (+{} more)", record.children_omitted));
    }
    table.add_row(vec![
        name,
        record.folder.file_count.to_string(),
        record.folder.size_formatted.clone(),
        category_cell(record),
        record.matching_method.as_str().to_string(),
        work_cell(record.work_summary.as_ref()),
        format!("{}/{} {:.1}%", md.files_matched, md.total_files, md.avg_progress),
    ]);
    for child in &record.children {
        push_tree_rows(table, child, indent + 1);
    }
}

fn format_totals_lines(totals: &ArchiveTotals) -> String {
    format!(
        "  Files: {}\n  Size: {}\n  Duration: {}\n  Ledger: {}/{} done\n",
        totals.total_files,
        totals.total_size_formatted,
        totals.total_duration_formatted,
        totals.ledger_done,
        totals.ledger_total,
    )
}

/// Format a progress tree as human-readable text.
pub fn format_tree_text(report: &TreeReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading("Progress Tree")));
    if report.tree.is_empty() {
        out.push_str("No folders found.\n\n");
    } else {
        let mut table = new_table(vec![
            "Folder", "Files", "Size", "Category", "Method", "Work", "Metadata",
        ]);
        for record in &report.tree {
            push_tree_rows(&mut table, record, 0);
        }
        out.push_str(&format!("{}\n\n", table));
    }
    out.push_str(&format!("{}\n\n", format_section_heading("Archive")));
    out.push_str(&format_totals_lines(&report.root_stats));
    out
}

/// Format a folder detail as human-readable text.
pub fn format_folder_detail_text(detail: &FolderDetail) -> String {
    let folder = &detail.folder;
    let md = &folder.metadata_summary;
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(&folder.folder.path)));
    out.push_str(&format!(
        "  Files: {} ({})\n",
        folder.folder.file_count, folder.folder.size_formatted
    ));
    out.push_str(&format!(
        "  Category: {} [{}]\n",
        category_cell(folder),
        folder.matching_method.as_str()
    ));
    out.push_str(&format!("  Work: {}\n", work_cell(folder.work_summary.as_ref())));
    out.push_str(&format!(
        "  Metadata: {} matched, {} hands, {} complete, avg {:.1}%\n\n",
        md.files_matched, md.hand_count, md.completed_files, md.avg_progress
    ));

    if let Some(files) = &folder.files {
        out.push_str(&format!("{}\n\n", format_section_heading("Files")));
        let mut table = new_table(vec!["File", "Duration", "Title", "Hands", "Progress"]);
        for file in files {
            table.add_row(vec![
                file.name.clone(),
                file.duration_formatted.clone(),
                file.matched_title.clone().unwrap_or_else(|| "-".to_string()),
                file.hand_count.to_string(),
                format_percent(file.progress_percent, file.is_complete),
            ]);
        }
        out.push_str(&format!("{}\n", table));
        if folder.files_omitted > 0 {
            out.push_str(&format!("  ... {} more files\n", folder.files_omitted));
        }
        out.push('\n');
    }

    out.push_str(&format!("{}\n\n", format_section_heading("Children")));
    if detail.children.is_empty() {
        out.push_str("No child folders.\n");
        return out;
    }
    let mut table = new_table(vec!["Folder", "Files", "Category", "Method", "Work"]);
    for child in &detail.children {
        table.add_row(vec![
            child.folder.name.clone(),
            child.folder.file_count.to_string(),
            child
                .category
                .as_ref()
                .map(|c| c.category.clone())
                .unwrap_or_else(|| "-".to_string()),
            child.matching_method.as_str().to_string(),
            work_cell(child.work_summary.as_ref()),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    if detail.children_omitted > 0 {
        out.push_str(&format!("  ... {} more folders\n", detail.children_omitted));
    }
    out
}

/// Format a file detail as human-readable text.
pub fn format_file_detail_text(detail: &FileDetail) -> String {
    let file = &detail.file;
    let mut out = String::new();
    out.push_str(&format!("{}\n\n", format_section_heading(&file.path)));
    out.push_str(&format!("  Duration: {}\n", file.duration_formatted));
    match &file.matched_title {
        Some(title) => out.push_str(&format!("  Title: {}\n", title)),
        None => {
            out.push_str("  Title: no metadata match\n");
            return out;
        }
    }
    out.push_str(&format!(
        "  Coverage: {} up to {}\n\n",
        format_percent(file.progress_percent, file.is_complete),
        file.max_timecode_formatted
    ));
    if !detail.rows.is_empty() {
        let mut table = new_table(vec!["In", "Out", "Grade", "Winner"]);
        for row in &detail.rows {
            table.add_row(vec![
                format_timecode(row.timecode_in_sec),
                format_timecode(row.timecode_out_sec),
                row.hand_grade.clone().unwrap_or_default(),
                row.winner.clone().unwrap_or_default(),
            ]);
        }
        out.push_str(&format!("{}\n", table));
    }
    out
}

/// Format archive totals as human-readable text.
pub fn format_totals_text(totals: &ArchiveTotals) -> String {
    format!(
        "{}\n\n{}",
        format_section_heading("Archive"),
        format_totals_lines(totals)
    )
}

/// Format a match explanation as human-readable text.
pub fn format_match_text(explanation: &MatchExplanation) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{}\n\n",
        format_section_heading(&explanation.folder_name)
    ));
    out.push_str(&format!("  Normalized: {}\n", explanation.normalized));
    match &explanation.winner {
        Some(winner) => out.push_str(&format!(
            "  Match: {} ({}, {:.2})\n\n",
            winner.category,
            winner.rule.as_str(),
            winner.score
        )),
        None => {
            out.push_str("  Match: none\n");
            return out;
        }
    }
    let mut table = new_table(vec!["Category", "Rule", "Score", "Done ratio"]);
    for candidate in &explanation.candidates {
        table.add_row(vec![
            candidate.category.clone(),
            candidate.rule.as_str().to_string(),
            format!("{:.2}", candidate.score),
            format!("{:.2}", candidate.completion_ratio),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

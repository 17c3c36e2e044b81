//! Plain-text rendering of console pages

use orgdesk_client::{Collection, Notice, Snapshot};
use orgdesk_core::{Branch, ContactMessage, Route, SummaryRow};

/// Dashboard: three count cards followed by the recent lists
pub(crate) fn dashboard(snapshot: &Snapshot) -> String {
    let mut out = String::from("Admin Dashboard\n\n");

    for (title, count) in [
        ("Contact Requests", snapshot.contacts.count),
        ("Total Branches", snapshot.branches.count),
        ("Total Routes", snapshot.routes.count),
    ] {
        out.push_str(&format!("  {title:<18} {count:>6}\n"));
    }

    recent_section(&mut out, "Recent Contact Requests", &snapshot.contacts);
    recent_section(&mut out, "Recent Branches", &snapshot.branches);
    recent_section(&mut out, "Recent Routes", &snapshot.routes);
    out
}

fn recent_section<'a, T>(out: &mut String, title: &str, collection: &'a Collection<T>)
where
    SummaryRow: From<&'a T>,
{
    out.push_str(&format!("\n{title}\n"));
    let rows = collection.rows();
    if rows.is_empty() {
        out.push_str("  (none)\n");
    }
    for row in rows {
        out.push_str(&format!("  {}\n", row.title));
        out.push_str(&format!("    {}\n", row.subtitle));
        if !row.meta.is_empty() {
            out.push_str(&format!("    {}\n", row.meta));
        }
    }
}

/// Branch management table
pub(crate) fn branch_table(branches: &[Branch]) -> String {
    if branches.is_empty() {
        return "No branches found.\n".to_string();
    }
    table(
        &["ID", "Branch", "District", "Address", "Phone", "Manager", "Hours"],
        branches
            .iter()
            .map(|b| {
                vec![
                    b.id.clone(),
                    b.name.clone(),
                    b.district.clone(),
                    b.address.clone(),
                    b.phone.clone(),
                    b.manager.clone(),
                    b.hours.clone(),
                ]
            })
            .collect(),
    )
}

/// Contact request table
pub(crate) fn contacts_table(messages: &[ContactMessage]) -> String {
    if messages.is_empty() {
        return "No contact requests found.\n".to_string();
    }
    table(
        &["ID", "Name", "Subject", "Received"],
        messages
            .iter()
            .map(|m| {
                let row = SummaryRow::from(m);
                vec![row.key, row.title, row.subtitle, row.meta]
            })
            .collect(),
    )
}

/// Route table
pub(crate) fn routes_table(routes: &[Route]) -> String {
    if routes.is_empty() {
        return "No routes found.\n".to_string();
    }
    table(
        &["ID", "Route", "District", "Manager"],
        routes
            .iter()
            .map(|r| {
                vec![
                    r.id.clone(),
                    r.name.clone(),
                    r.district.clone(),
                    r.manager_name.clone(),
                ]
            })
            .collect(),
    )
}

/// One notice line
pub(crate) fn notice(notice: &Notice) -> String {
    if notice.is_error() {
        failure(&notice.message)
    } else {
        success(&notice.message)
    }
}

pub(crate) fn success(message: &str) -> String {
    format!("✔ {message}")
}

pub(crate) fn failure(message: &str) -> String {
    format!("✘ {message}")
}

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, headers.iter().copied(), &widths);
    write_row(
        &mut out,
        widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>().iter().map(String::as_str),
        &widths,
    );
    for row in &rows {
        write_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn write_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

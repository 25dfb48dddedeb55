use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde_json::Value;

use crate::models::{column_catalog, ColumnDescriptor, SortDirection, UserRecord};

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Filter, sort, pagination, column-visibility and selection settings for
/// the user table. Selection is keyed by username and survives page turns
/// and filter changes; it is only pruned when a record leaves the
/// unfiltered set.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub filter_text: String,
    pub selected_carreras: BTreeSet<String>,
    pub selected_groups: BTreeSet<String>,
    pub sort_column: Option<String>,
    pub sort_direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
    pub visible_columns: BTreeSet<String>,
    pub selected_rows: BTreeSet<String>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter_text: String::new(),
            selected_carreras: BTreeSet::new(),
            selected_groups: BTreeSet::new(),
            sort_column: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            visible_columns: column_catalog().iter().map(|c| c.key.to_string()).collect(),
            selected_rows: BTreeSet::new(),
        }
    }
}

impl ViewState {
    /// An empty category set means "no restriction".
    fn matches_categories(&self, record: &UserRecord) -> bool {
        (self.selected_carreras.is_empty() || self.selected_carreras.contains(&record.ou))
            && (self.selected_groups.is_empty()
                || record.groups.iter().any(|g| self.selected_groups.contains(g)))
    }

    /// Plain case-insensitive substring test over every field, visible or
    /// not. Column visibility never changes which records pass.
    fn matches_text(&self, record: &UserRecord) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let needle = self.filter_text.to_lowercase();
        column_catalog()
            .iter()
            .any(|c| record.field_text(c.key).to_lowercase().contains(&needle))
    }

    /// Flip one row's selection. Usernames absent from the unfiltered set
    /// are never added, keeping the selection a subset of the record set.
    pub fn toggle_row(&mut self, records: &[UserRecord], username: &str) {
        if self.selected_rows.contains(username) {
            self.selected_rows.remove(username);
        } else if records.iter().any(|r| r.username == username) {
            self.selected_rows.insert(username.to_string());
        }
    }

    /// All-or-nothing toggle over the currently visible slice: if every
    /// visible row is already selected, deselect exactly those; otherwise
    /// select them all. Rows on other pages are untouched.
    pub fn toggle_visible(&mut self, visible: &[UserRecord]) {
        let all_selected = !visible.is_empty()
            && visible.iter().all(|r| self.selected_rows.contains(&r.username));
        if all_selected {
            for record in visible {
                self.selected_rows.remove(&record.username);
            }
        } else {
            for record in visible {
                self.selected_rows.insert(record.username.clone());
            }
        }
    }

    pub fn prune_selection(&mut self, records: &[UserRecord]) {
        self.selected_rows
            .retain(|username| records.iter().any(|r| &r.username == username));
    }

    /// Keys rendered for each row: the fixed columns plus whatever the
    /// operator left visible, in catalog order.
    pub fn visible_keys(&self) -> Vec<&'static str> {
        column_catalog()
            .iter()
            .filter(|c| c.fixed || self.visible_columns.contains(c.key))
            .map(|c| c.key)
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct Projection {
    pub rows: Vec<UserRecord>,
    pub total_count: usize,
    pub total_pages: usize,
    /// The page actually rendered, clamped into `[1, max(total_pages, 1)]`.
    pub page: usize,
}

fn compare_column(a: &UserRecord, b: &UserRecord, key: &str) -> Ordering {
    match key {
        "logonCount" => a.logon_count.cmp(&b.logon_count),
        "lastLogon" => a.last_logon.cmp(&b.last_logon),
        _ => a
            .field_text(key)
            .to_lowercase()
            .cmp(&b.field_text(key).to_lowercase()),
    }
}

/// Category filter, then text filter, then a stable sort. `desc` flips the
/// comparator output only, so ties keep their original relative order in
/// both directions.
fn filtered_sorted<'a>(
    records: &'a [UserRecord],
    view: &ViewState,
    columns: &[ColumnDescriptor],
) -> Vec<&'a UserRecord> {
    let mut kept: Vec<&UserRecord> = records
        .iter()
        .filter(|r| view.matches_categories(r))
        .filter(|r| view.matches_text(r))
        .collect();

    if let Some(key) = view.sort_column.as_deref() {
        if columns.iter().any(|c| c.key == key && c.sortable) {
            kept.sort_by(|a, b| {
                let ordering = compare_column(a, b, key);
                match view.sort_direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
    }

    kept
}

/// Derive the visible slice from the raw record set. The requested page is
/// clamped rather than trusted, so a filter that narrows the result can
/// never leave the view pointing past the end.
pub fn project(
    records: &[UserRecord],
    view: &ViewState,
    columns: &[ColumnDescriptor],
) -> Projection {
    let kept = filtered_sorted(records, view, columns);

    let total_count = kept.len();
    let page_size = view.page_size.max(1);
    let total_pages = (total_count + page_size - 1) / page_size;
    let page = view.page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let rows = kept
        .iter()
        .skip(start)
        .take(page_size)
        .map(|r| (*r).clone())
        .collect();

    Projection {
        rows,
        total_count,
        total_pages,
        page,
    }
}

/// Render rows as JSON objects carrying only the visible columns.
pub fn export_rows(rows: &[UserRecord], view: &ViewState) -> Vec<Value> {
    let keys = view.visible_keys();
    rows.iter()
        .map(|record| {
            let mut object = serde_json::Map::new();
            for key in &keys {
                object.insert((*key).to_string(), record.field_json(key));
            }
            Value::Object(object)
        })
        .collect()
}

/// CSV of the whole filtered+sorted set (all pages), visible columns only.
pub fn export_csv(
    records: &[UserRecord],
    view: &ViewState,
    columns: &[ColumnDescriptor],
) -> String {
    let kept = filtered_sorted(records, view, columns);
    let keys = view.visible_keys();

    let mut out = String::new();
    let header: Vec<String> = keys
        .iter()
        .filter_map(|k| column_catalog().iter().find(|c| &c.key == k))
        .map(|c| csv_field(c.label))
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    for record in kept {
        let line: Vec<String> = keys
            .iter()
            .map(|k| csv_field(&record.field_text(k)))
            .collect();
        out.push_str(&line.join(","));
        out.push('\n');
    }

    out
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

use crate::config::Period;
use crate::report::{Change, Report, ReportRow, Section};
use crate::Result;
use askama::Template;
use chrono::NaiveDate;

/// The whole email body; see `templates/report.html`.
#[derive(Template)]
#[template(path = "report.html")]
struct ReportTemplate<'a> {
    long_date: String,
    periods: &'a [Period],
    sections: Vec<SectionView<'a>>,
}

struct SectionView<'a> {
    category: &'a str,
    rows: Vec<RowView<'a>>,
}

struct RowView<'a> {
    symbol: &'a str,
    price: String,
    /// Change vs Reference, Daily Change, then one per period.
    cells: Vec<Cell>,
}

/// A change column; `class` is empty for `N/A`.
struct Cell {
    text: String,
    class: &'static str,
}

impl From<Option<Change>> for Cell {
    fn from(change: Option<Change>) -> Self {
        match change {
            Some(change) => Self {
                text: change.to_string(),
                class: change.tone().css_class(),
            },
            None => Self {
                text: "N/A".to_string(),
                class: "",
            },
        }
    }
}

impl<'a> From<&'a Section> for SectionView<'a> {
    fn from(section: &'a Section) -> Self {
        Self {
            category: &section.category,
            rows: section.rows.iter().map(RowView::from).collect(),
        }
    }
}

impl<'a> From<&'a ReportRow> for RowView<'a> {
    fn from(row: &'a ReportRow) -> Self {
        let cells = [row.vs_reference, Some(row.daily)]
            .into_iter()
            .chain(row.periods.iter().copied())
            .map(Cell::from)
            .collect();
        Self {
            symbol: &row.symbol,
            price: row.formatted_price(),
            cells,
        }
    }
}

/// Render the report as a self-contained HTML document.
///
/// `periods` must be the watch-list periods the report was built with; they
/// name the trailing columns of every table.
pub fn render(report: &Report, periods: &[Period], date: NaiveDate) -> Result<String> {
    let template = ReportTemplate {
        long_date: date.format("%B %d, %Y").to_string(),
        periods,
        sections: report.sections.iter().map(SectionView::from).collect(),
    };
    Ok(template.render()?)
}

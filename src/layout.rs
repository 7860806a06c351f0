//! Places a [`Summary`] on a single fixed-size page.
//!
//! Coordinates are PDF points with the origin at the bottom-left corner, so
//! the layout walks `y` downwards from the top margin.

use crate::entry::CategoryPath;
use crate::grouping::Grouping;
use crate::report::{Balance, Summary};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Style {
    /// Column titles.
    Title,
    /// Main category headings.
    Heading,
    /// Sub-category headings.
    SubHeading,
    /// Entry descriptions and amounts.
    Body,
    /// The totals block and the income/expense comparison.
    Total,
}

impl Style {
    pub fn is_bold(self) -> bool {
        !matches!(self, Style::Body)
    }
}

/// A run of text anchored at `(x, y)`. Right-aligned text ends at `x`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextItem {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub style: Style,
    pub align: Align,
    pub text: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub width: f32,
    pub height: f32,
    pub items: Vec<TextItem>,
}

impl Page {
    /// Whether anything was placed below the bottom edge of the page.
    pub fn overflows(&self) -> bool {
        self.items.iter().any(|item| item.y < 0.0)
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.text.as_str())
    }
}

/// Offsets, steps and font sizes of the report page.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Layout {
    pub page_width: f32,
    pub page_height: f32,
    pub top_margin: f32,
    pub income_x: f32,
    pub expense_x: f32,

    /// Distance from a column's x to the right edge of its amounts.
    pub amount_offset: f32,

    /// Indentation of sub-headings and entry lines.
    pub indent: f32,

    pub title_step: f32,
    pub heading_step: f32,
    pub sub_heading_step: f32,
    pub line_step: f32,
    pub group_gap: f32,
    pub totals_gap: f32,
    pub comparison_step: f32,

    pub title_size: f32,
    pub heading_size: f32,
    pub sub_heading_size: f32,
    pub body_size: f32,
    pub total_size: f32,
}

impl Default for Layout {
    /// A4 portrait.
    fn default() -> Self {
        Self {
            page_width: 595.28,
            page_height: 841.89,
            top_margin: 50.0,
            income_x: 40.0,
            expense_x: 320.0,
            amount_offset: 200.0,
            indent: 20.0,
            title_step: 25.0,
            heading_step: 20.0,
            sub_heading_step: 18.0,
            line_step: 18.0,
            group_gap: 10.0,
            totals_gap: 30.0,
            comparison_step: 20.0,
            title_size: 18.0,
            heading_size: 16.0,
            sub_heading_size: 15.0,
            body_size: 15.0,
            total_size: 16.0,
        }
    }
}

impl Layout {
    fn size_of(&self, style: Style) -> f32 {
        match style {
            Style::Title => self.title_size,
            Style::Heading => self.heading_size,
            Style::SubHeading => self.sub_heading_size,
            Style::Body => self.body_size,
            Style::Total => self.total_size,
        }
    }
}

/// Fixed report wording.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Labels {
    pub income: String,
    pub expense: String,
    pub total_income: String,
    pub total_expense: String,
    pub income_exceeds_expense: String,
    pub income_below_expense: String,
    pub income_equals_expense: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            income: "Income".to_string(),
            expense: "Expense".to_string(),
            total_income: "Total income".to_string(),
            total_expense: "Total expense".to_string(),
            income_exceeds_expense: "Income exceeds expense".to_string(),
            income_below_expense: "Income below expense".to_string(),
            income_equals_expense: "Income equals expense".to_string(),
        }
    }
}

impl Labels {
    pub fn for_balance(&self, balance: &Balance) -> &str {
        match balance {
            Balance::Surplus(_) => &self.income_exceeds_expense,
            Balance::Deficit(_) => &self.income_below_expense,
            Balance::Even => &self.income_equals_expense,
        }
    }
}

struct PageBuilder<'a> {
    layout: &'a Layout,
    items: Vec<TextItem>,
}

impl<'a> PageBuilder<'a> {
    fn text(&mut self, x: f32, y: f32, style: Style, align: Align, text: impl Into<String>) {
        self.items.push(TextItem {
            x,
            y,
            size: self.layout.size_of(style),
            style,
            align,
            text: text.into(),
        });
    }

    /// A label at `x` with `amount` right-aligned at the column's amount edge.
    fn amount_row(&mut self, x: f32, y: f32, style: Style, label: &str, amount: String) {
        let indent = if style == Style::Body { self.layout.indent } else { 0.0 };
        self.text(x + indent, y, style, Align::Left, label);
        self.text(x + self.layout.amount_offset, y, style, Align::Right, amount);
    }

    /// Lays out one column and returns the `y` below its last group.
    ///
    /// A main heading is only drawn when it differs from the previous
    /// bucket's main category, so a category that reappears after another
    /// one gets its heading again.
    fn column(&mut self, grouping: &Grouping, x: f32, top: f32) -> f32 {
        let layout = self.layout;
        let mut y = top;
        let mut previous_main: Option<String> = None;

        for bucket in grouping.buckets() {
            let path = CategoryPath::parse(&bucket.category);

            if previous_main.as_deref() != Some(path.main.as_str()) {
                self.text(x, y, Style::Heading, Align::Left, path.main.as_str());
                y -= layout.heading_step;
                previous_main = Some(path.main.clone());
            }

            if let Some(sub) = &path.sub {
                self.text(x + layout.indent, y, Style::SubHeading, Align::Left, sub.as_str());
                y -= layout.sub_heading_step;
            }

            for line in &bucket.lines {
                self.amount_row(x, y, Style::Body, &line.description, line.amount.to_string());
                y -= layout.line_step;
            }

            y -= layout.group_gap;
        }

        y
    }
}

/// Lays out the two columns, the totals block and the comparison line.
pub fn layout_page(summary: &Summary, layout: &Layout, labels: &Labels) -> Page {
    let mut page = PageBuilder {
        layout,
        items: Vec::new(),
    };

    let mut y = layout.page_height - layout.top_margin;
    page.text(layout.income_x, y, Style::Title, Align::Left, labels.income.as_str());
    page.text(layout.expense_x, y, Style::Title, Align::Left, labels.expense.as_str());
    y -= layout.title_step;

    let income_end = page.column(summary.income(), layout.income_x, y);
    let expense_end = page.column(summary.expense(), layout.expense_x, y);

    let mut y = income_end.min(expense_end) - layout.totals_gap;
    page.amount_row(
        layout.income_x,
        y,
        Style::Total,
        &labels.total_income,
        summary.total_income().to_string(),
    );
    page.amount_row(
        layout.expense_x,
        y,
        Style::Total,
        &labels.total_expense,
        summary.total_expense().to_string(),
    );

    y -= layout.comparison_step;
    let balance = summary.balance();
    page.amount_row(
        layout.expense_x,
        y,
        Style::Total,
        labels.for_balance(&balance),
        balance.display_value(),
    );

    let page = Page {
        width: layout.page_width,
        height: layout.page_height,
        items: page.items,
    };
    if page.overflows() {
        warn!("report content runs past the bottom of the page and will be clipped");
    }

    page
}

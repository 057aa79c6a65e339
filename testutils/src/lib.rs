//! Fixtures and matchers used in tests in multiple crates within the
//! workspace.

use std::{
    fmt::{Debug, Display},
    marker::PhantomData,
};

use googletest::{
    description::Description,
    matcher::{Matcher, MatcherBase, MatcherResult},
};

/// Creates a matcher against an `anyhow::Error` that downcasts to the given
/// type and matches the inner matcher. Context added with `context` or
/// `with_context` is seen through.
pub fn anyhow_downcasts_to<E, M>(inner: M) -> AnyhowDowncastTo<E, M> {
    AnyhowDowncastTo::<E, M> {
        inner,
        phantom_e: Default::default(),
    }
}

pub struct AnyhowDowncastTo<E, M> {
    inner: M,
    phantom_e: PhantomData<E>,
}

impl<E, M> AnyhowDowncastTo<E, M> {
    fn type_name() -> &'static str {
        std::any::type_name::<E>()
    }
}

impl<E, M> MatcherBase for AnyhowDowncastTo<E, M> {}

impl<E, M> Matcher<&anyhow::Error> for AnyhowDowncastTo<E, M>
where
    E: Display + Debug + Send + Sync + 'static,
    M: for<'a> Matcher<&'a E>,
{
    fn matches(&self, actual: &anyhow::Error) -> MatcherResult {
        actual
            .downcast_ref::<E>()
            .map(|e| self.inner.matches(e))
            .unwrap_or(MatcherResult::NoMatch)
    }

    fn describe(&self, matcher_result: MatcherResult) -> Description {
        match matcher_result {
            MatcherResult::Match => format!(
                "is an anyhow::Error containing {} which {}",
                Self::type_name(),
                self.inner.describe(MatcherResult::Match)
            )
            .into(),
            MatcherResult::NoMatch => format!(
                "is not an anyhow::Error containing {} which {}",
                Self::type_name(),
                self.inner.describe(MatcherResult::Match)
            )
            .into(),
        }
    }

    fn explain_match(&self, actual: &anyhow::Error) -> Description {
        match actual.downcast_ref::<E>() {
            Some(e) => Description::new()
                .text(format!(
                    "which contains the expected concrete error type {}",
                    Self::type_name()
                ))
                .text("with value")
                .nested(self.inner.explain_match(e)),
            None => Description::new().text(format!(
                "which does not contain the expected concrete error type {}",
                Self::type_name()
            )),
        }
    }
}

/// Converts rows of cell text into `(row, column, content)` tuples. Empty
/// strings are treated as absent cells and produce no tuple.
pub fn grid_cells(rows: &[&[&str]]) -> Vec<(usize, usize, String)> {
    rows.iter()
        .enumerate()
        .flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, text)| !text.is_empty())
                .map(move |(col, text)| (row, col, text.to_string()))
        })
        .collect()
}

/// Builds the HTML of a single `<table>` one row at a time.
#[derive(Default)]
pub struct HtmlTableBuilder {
    rows: Vec<String>,
}

impl HtmlTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row of plain cells.
    pub fn row(mut self, cells: &[&str]) -> Self {
        let mut html = String::from("<tr>");
        for cell in cells {
            push_cell(&mut html, cell, None);
        }
        html.push_str("</tr>");
        self.rows.push(html);
        self
    }

    /// Appends a row whose first cell is a label spanning `row_span` rows.
    /// Line breaks in `label` are rendered as `<br>`.
    pub fn label_row(mut self, label: &str, row_span: usize, cells: &[&str]) -> Self {
        let mut html = String::from("<tr>");
        push_cell(&mut html, &label.replace('\n', "<br>"), Some(row_span));
        for cell in cells {
            push_cell(&mut html, cell, None);
        }
        html.push_str("</tr>");
        self.rows.push(html);
        self
    }

    pub fn build(&self) -> String {
        format!("<table>{}</table>", self.rows.join(""))
    }
}

fn push_cell(html: &mut String, text: &str, row_span: Option<usize>) {
    match row_span {
        Some(span) => html.push_str(&format!(r#"<td rowspan="{span}">{text}</td>"#)),
        None => html.push_str(&format!("<td>{text}</td>")),
    }
}

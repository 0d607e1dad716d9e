use std::fmt::Display;

use ansi_term::Style;

const PADDING: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Bordered table for the terminal. Styles are applied after padding, so escape codes don't break
/// the alignment.
#[derive(Default)]
pub struct Table {
    alignments: Vec<Alignment>,
    column_styles: Vec<Option<Style>>,
    rows: Vec<(Vec<String>, Option<Style>)>,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_column(mut self, alignment: Alignment, style: Option<Style>) -> Self {
        self.alignments.push(alignment);
        self.column_styles.push(style);
        self
    }

    /// Row style takes precedence over column styles.
    pub fn push(&mut self, cells: Vec<String>, style: Option<Style>) {
        self.rows.push((cells, style));
    }

    fn widths(&self) -> Vec<usize> {
        let columns = self.rows.iter().map(|(v, _)| v.len()).max().unwrap_or(0);
        (0..columns)
            .map(|column| {
                self.rows
                    .iter()
                    .filter_map(|(cells, _)| cells.get(column))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let widths = self.widths();
        let border = widths
            .iter()
            .map(|width| "-".repeat(width + PADDING * 2))
            .collect::<Vec<_>>()
            .join("+");
        let padding = " ".repeat(PADDING);

        writeln!(f, "+{border}+")?;
        for (cells, row_style) in &self.rows {
            write!(f, "|")?;
            for (column, width) in widths.iter().enumerate() {
                let cell = cells.get(column).map(String::as_str).unwrap_or("");
                let fill = " ".repeat(width - cell.chars().count());
                let aligned = match self.alignments.get(column) {
                    Some(Alignment::Right) => format!("{fill}{cell}"),
                    _ => format!("{cell}{fill}"),
                };
                let style = row_style.or_else(|| self.column_styles.get(column).copied().flatten());
                match style {
                    Some(style) => write!(f, "{padding}{}{padding}|", style.paint(aligned))?,
                    None => write!(f, "{padding}{aligned}{padding}|")?,
                }
            }
            writeln!(f)?;
        }
        write!(f, "+{border}+")
    }
}

#[cfg(test)]
mod tests {
    use super::{Alignment, Table};

    #[test]
    fn test_table_aligns_columns() {
        let mut table = Table::new()
            .with_column(Alignment::Right, None)
            .with_column(Alignment::Left, None);
        table.push(vec!["Title".into(), "Write spec".into()], None);
        table.push(vec!["Status".into(), "todo".into()], None);

        assert_eq!(
            table.to_string(),
            "+----------+--------------+\n\
             |   Title  |  Write spec  |\n\
             |  Status  |  todo        |\n\
             +----------+--------------+"
        );
    }

    #[test]
    fn test_table_handles_missing_cells() {
        let mut table = Table::new();
        table.push(vec!["a".into(), "b".into()], None);
        table.push(vec!["c".into()], None);

        assert_eq!(
            table.to_string(),
            "+-----+-----+\n\
             |  a  |  b  |\n\
             |  c  |     |\n\
             +-----+-----+"
        );
    }
}

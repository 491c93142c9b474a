//! Terminal UI utilities.
//!
//! A small box-drawn table that shrinks its widest column to fit the
//! terminal, used to show probe settings and platform rules.

use colored::*;
use console::{measure_text_width, truncate_str};

pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Self {
            headers: headers.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Rows with the wrong number of cells are ignored.
    pub fn add_row(&mut self, row: Vec<String>) {
        if row.len() == self.headers.len() {
            self.rows.push(row);
        }
    }

    pub fn print(&self) {
        let (_, term_width) = console::Term::stdout().size();
        print!("{}", self.render(term_width as usize));
    }

    pub fn render(&self, max_width: usize) -> String {
        if self.headers.is_empty() {
            return String::new();
        }

        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(measure_text_width(&flatten(cell)));
            }
        }

        // indent + borders + padding
        let overhead = 3 + 3 * widths.len();
        while overhead + widths.iter().sum::<usize>() > max_width {
            let Some((idx, &widest)) = widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
                break;
            };
            if widest <= 8 {
                break;
            }
            widths[idx] -= 1;
        }

        let sep = |left: &str, mid: &str, right: &str| -> String {
            let inner: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("  {}{}{}\n", left, inner.join(mid), right)
        };
        let line = |cells: Vec<String>| -> String {
            let mut s = String::from("  │");
            for (cell, width) in cells.iter().zip(&widths) {
                let shown = truncate_str(cell, *width, "...");
                let padding = width.saturating_sub(measure_text_width(&shown));
                s.push_str(&format!(" {}{} │", shown, " ".repeat(padding)));
            }
            s.push('\n');
            s
        };

        let mut out = sep("┌", "┬", "┐");
        out.push_str(&line(
            self.headers.iter().map(|h| h.bold().to_string()).collect(),
        ));
        out.push_str(&sep("├", "┼", "┤"));
        for row in &self.rows {
            out.push_str(&line(row.iter().map(|c| flatten(c)).collect()));
        }
        out.push_str(&sep("└", "┴", "┘"));
        out
    }
}

fn flatten(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            _ => c,
        })
        .collect()
}

/// Join a list for display, or a dash when empty.
pub fn list(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(" ")
    }
}

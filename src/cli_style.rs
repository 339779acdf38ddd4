use clap::builder::styling::{AnsiColor, Color, Style};
use clap::builder::Styles;
use crossterm::style::{Attribute, Stylize};
use unicode_width::UnicodeWidthStr;

// ═══════════════════════════════════════════════════════════════════════════════
// Clap Styles
// ═══════════════════════════════════════════════════════════════════════════════

pub fn get_styles() -> Styles {
    let heading = Style::new()
        .bold()
        .underline()
        .fg_color(Some(Color::Ansi(AnsiColor::Cyan)));
    let good = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Green)));
    let bad = Style::new()
        .bold()
        .fg_color(Some(Color::Ansi(AnsiColor::Red)));

    Styles::styled()
        .usage(heading)
        .header(heading)
        .literal(good)
        .valid(good)
        .invalid(bad)
        .error(bad)
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::BrightBlack))))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Palette
// ═══════════════════════════════════════════════════════════════════════════════

pub mod colors {
    use crossterm::style::Color;

    pub const CYAN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 255,
    };
    pub const GREEN: Color = Color::Rgb {
        r: 0,
        g: 255,
        b: 136,
    };
    pub const ORANGE: Color = Color::Rgb {
        r: 255,
        g: 165,
        b: 0,
    };
    pub const RED: Color = Color::Rgb {
        r: 255,
        g: 85,
        b: 85,
    };
    pub const DIM: Color = Color::Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status Lines
// ═══════════════════════════════════════════════════════════════════════════════

pub fn print_success(message: &str) {
    println!(" {} {}", "✓".with(colors::GREEN).bold(), message.with(colors::GREEN));
}

pub fn print_warning(message: &str) {
    println!(" {} {}", "⚠".with(colors::ORANGE).bold(), message.with(colors::ORANGE));
}

pub fn print_error(message: &str) {
    println!(" {} {}", "✗".with(colors::RED).bold(), message.with(colors::RED));
}

pub fn print_dim(message: &str) {
    println!("   {}", message.with(colors::DIM).attribute(Attribute::Italic));
}

pub fn print_section_header(title: &str) {
    let width: usize = 60;
    let fill = width.saturating_sub(title.width() + 4);
    println!();
    println!(
        "{} {} {}",
        "──".with(colors::CYAN),
        title.with(colors::CYAN).bold(),
        "─".repeat(fill).with(colors::CYAN)
    );
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", format!("{}:", key).with(colors::DIM), value);
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tables
// ═══════════════════════════════════════════════════════════════════════════════

/// Plain box-drawn table. The first column is left aligned, the rest are
/// numeric and right aligned.
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    col_widths: Vec<usize>,
}

impl Table {
    pub fn new(headers: &[&str]) -> Self {
        Table {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
            col_widths: headers.iter().map(|h| h.width()).collect(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        for (width, cell) in self.col_widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.width());
        }
        self.rows.push(row);
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.border('┌', '┬', '┐'));
        out.push_str(&self.line(&self.headers));
        out.push_str(&self.border('├', '┼', '┤'));
        for row in &self.rows {
            out.push_str(&self.line(row));
        }
        out.push_str(&self.border('└', '┴', '┘'));
        out
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn border(&self, left: char, mid: char, right: char) -> String {
        let segments: Vec<String> = self.col_widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{}{}{}\n", left, segments.join(&mid.to_string()), right)
    }

    fn line(&self, cells: &[String]) -> String {
        let mut out = String::from("│");
        for (i, width) in self.col_widths.iter().enumerate() {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            let pad = " ".repeat(width.saturating_sub(cell.width()));
            if i == 0 {
                out.push_str(&format!(" {}{} │", cell, pad));
            } else {
                out.push_str(&format!(" {}{} │", pad, cell));
            }
        }
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_render() {
        let mut table = Table::new(&["Week", "CUME"]);
        table.add_row(vec!["2024-01-07".to_string(), "2000".to_string()]);
        table.add_row(vec!["2024-01-14".to_string(), "15".to_string()]);

        let expected = "\
┌────────────┬──────┐
│ Week       │ CUME │
├────────────┼──────┤
│ 2024-01-07 │ 2000 │
│ 2024-01-14 │   15 │
└────────────┴──────┘
";
        assert_eq!(table.render(), expected);
    }

    #[test]
    fn test_table_short_rows_are_padded() {
        let mut table = Table::new(&["A", "B"]);
        table.add_row(vec!["x".to_string()]);
        assert!(table.render().contains("│ x │   │"));
    }
}

//! Bordered display panels.
//!
//! Panels are pure formatting: a title border on top, the body verbatim, a
//! closing border below, everything sized to the live terminal width.

use unicode_width::UnicodeWidthStr;

/// Assemble one panel. `width` is the terminal width in display columns.
pub fn compose(title: &str, body: &[String], width: usize) -> String {
    let mut out = top_border(title, width);
    for line in body {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&bottom_border(width));
    out
}

fn top_border(title: &str, width: usize) -> String {
    let head = format!("┌─ {title} ");
    let fill = width.saturating_sub(head.width() + 1);
    format!("{head}{}┐\n", "─".repeat(fill))
}

fn bottom_border(width: usize) -> String {
    format!("└{}┘\n", "─".repeat(width.saturating_sub(2)))
}

/// Grid geometry for `cell` column wide entries on a `width` column terminal:
/// how many cells fit one line and the extra padding spread between them.
pub fn grid(cell: usize, width: usize) -> (usize, usize) {
    let per_line = (width / cell.max(1)).max(1);
    let padding = (width % cell.max(1)) / per_line;
    (per_line, padding)
}

#[cfg(test)]
mod test {
    use super::*;
    use unicode_width::UnicodeWidthStr;

    #[test]
    fn test_borders_fill_the_terminal() {
        for width in [40, 80, 120] {
            let panel = compose("Register", &["x".to_string()], width);
            let lines: Vec<&str> = panel.lines().collect();

            assert_eq!(lines.len(), 3);
            assert_eq!(lines[0].width(), width, "top border at width {width}");
            assert_eq!(lines[2].width(), width, "bottom border at width {width}");
            assert!(lines[0].starts_with("┌─ Register "));
            assert!(lines[0].ends_with('┐'));
            assert_eq!(lines[1], "x");
            assert!(lines[2].starts_with('└'));
            assert!(lines[2].ends_with('┘'));
        }
    }

    #[test]
    fn test_body_is_untouched() {
        let body = vec![String::new(), "\tline".to_string(), String::new()];
        let panel = compose("Stack", &body, 30);
        assert_eq!(panel.lines().count(), 5);
        assert_eq!(panel.lines().nth(2), Some("\tline"));
    }

    #[test]
    fn test_degenerate_width_does_not_panic() {
        let panel = compose("Assembly", &[], 4);
        assert!(panel.lines().all(|l| !l.is_empty()));
    }

    #[test]
    fn test_grid_geometry() {
        struct TestCase {
            cell: usize,
            width: usize,
            expected: (usize, usize),
        }
        let test_cases = [
            TestCase {
                cell: 25,
                width: 80,
                expected: (3, 1),
            },
            TestCase {
                cell: 25,
                width: 100,
                expected: (4, 0),
            },
            TestCase {
                cell: 25,
                width: 24,
                expected: (1, 24),
            },
            TestCase {
                cell: 0,
                width: 80,
                expected: (80, 0),
            },
        ];

        for tc in test_cases {
            assert_eq!(
                grid(tc.cell, tc.width),
                tc.expected,
                "cell {} width {}",
                tc.cell,
                tc.width
            );
        }
    }
}

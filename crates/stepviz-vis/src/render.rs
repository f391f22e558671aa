//! Text rendering of steps for the terminal driver.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use stepviz_engine::{Layout, Role, Step};
use stepviz_structures::Value;

/// Widest bar drawn, in cells.
const BAR_WIDTH: usize = 40;

/// Draws a [`Step`] as lines of text, optionally with ANSI colours.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextCanvas {
    color: bool,
}

impl TextCanvas {
    pub fn plain() -> Self {
        Self { color: false }
    }

    pub fn ansi() -> Self {
        Self { color: true }
    }

    /// Render one frame. The result ends with a newline.
    pub fn render(&self, step: &Step) -> String {
        let mut out = String::new();
        let roles = step.roles();
        if step.values.is_empty() {
            out.push_str("(empty)\n");
        } else {
            match step.layout {
                Layout::Bars => self.bars(&mut out, step, &roles),
                Layout::SinglyLinked => self.linked(&mut out, &step.values, &roles, false),
                Layout::DoublyLinked => self.linked(&mut out, &step.values, &roles, true),
                Layout::Stack => self.stack(&mut out, &step.values, &roles),
                Layout::Queue => self.queue(&mut out, &step.values, &roles),
            }
        }
        if let Some(caption) = &step.caption {
            let _ = writeln!(out, "{caption}");
        }
        out
    }

    fn bars(&self, out: &mut String, step: &Step, roles: &[Role]) {
        let values = &step.values;
        let peak = values.iter().fold(0.0, |peak: Value, v| peak.max(v.abs()));
        let peak = if peak > 0.0 { peak } else { 1.0 };
        let index_width = values.len().saturating_sub(1).to_string().len();

        for (index, (&value, &role)) in values.iter().zip(roles).enumerate() {
            if index > 0 && step.separators.contains(&index) {
                let _ = writeln!(out, "{:-<width$}", "", width = index_width + BAR_WIDTH + 12);
            }
            let cells = scaled(value, peak);
            let glyph = if value < 0.0 { "-" } else { "#" };
            let bar = glyph.repeat(cells.max(1));
            let _ = writeln!(
                out,
                "{index:>index_width$} | {} {value}{}",
                self.paint(&format!("{bar:<BAR_WIDTH$}"), role),
                marker(role),
            );
        }
    }

    fn linked(&self, out: &mut String, values: &[Value], roles: &[Role], doubly: bool) {
        let link = if doubly { " <-> " } else { " -> " };
        if doubly {
            out.push_str("None <- ");
        }
        let nodes: Vec<String> = values
            .iter()
            .zip(roles)
            .map(|(value, &role)| self.node(*value, role))
            .collect();
        out.push_str(&nodes.join(link));
        out.push_str(" -> None\n");
    }

    fn stack(&self, out: &mut String, values: &[Value], roles: &[Role]) {
        let width = values.iter().map(|v| v.to_string().len()).max().unwrap_or(1) + 2;
        for (index, (value, &role)) in values.iter().zip(roles).enumerate().rev() {
            let cell = self.paint(&format!("{value:^width$}"), role);
            let top = if index + 1 == values.len() { "  <- top" } else { "" };
            let _ = writeln!(out, "|{cell}|{top}");
        }
        let _ = writeln!(out, "+{:-<width$}+", "");
    }

    fn queue(&self, out: &mut String, values: &[Value], roles: &[Role]) {
        let nodes: Vec<String> = values
            .iter()
            .zip(roles)
            .map(|(value, &role)| self.node(*value, role))
            .collect();
        let _ = writeln!(out, "front -> {} <- rear", nodes.join(" "));
    }

    fn node(&self, value: Value, role: Role) -> String {
        format!("{}{}", self.paint(&format!("[{value}]"), role), marker(role))
    }

    fn paint(&self, text: &str, role: Role) -> String {
        if !self.color {
            return text.to_string();
        }
        match role {
            Role::Normal => text.to_string(),
            Role::Comparing => text.red().to_string(),
            Role::Pivot => text.magenta().to_string(),
            Role::Range => text.yellow().to_string(),
            Role::Found => text.cyan().to_string(),
            Role::Sorted => text.green().to_string(),
        }
    }
}

/// Bar length in cells; `peak` is positive.
fn scaled(value: Value, peak: Value) -> usize {
    (value.abs() / peak * BAR_WIDTH as Value) as usize
}

fn marker(role: Role) -> &'static str {
    match role {
        Role::Normal => "",
        Role::Comparing => " *",
        Role::Pivot => " P",
        Role::Range => " ~",
        Role::Found => " !",
        Role::Sorted => " =",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_scale_to_the_largest_value() {
        let step = Step::bars(&[4.0, 2.0]).with(0, Role::Comparing);
        let text = TextCanvas::plain().render(&step);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("0 | ########################################"));
        assert!(lines[0].ends_with("4 *"));
        assert!(lines[1].starts_with(&format!("1 | {}{}", "#".repeat(20), " ".repeat(20))));
        assert!(lines[1].ends_with(" 2"));
    }

    #[test]
    fn bucket_separators_draw_dividers() {
        let step = Step::bars(&[1.0, 2.0, 9.0]).with_separators(vec![2]);
        let text = TextCanvas::plain().render(&step);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].chars().all(|c| c == '-'));
    }

    #[test]
    fn linked_lists() {
        let singly = Step::new(Layout::SinglyLinked, vec![1.0, 2.0]).with(1, Role::Found);
        assert_eq!(TextCanvas::plain().render(&singly), "[1] -> [2] ! -> None\n");

        let doubly = Step::new(Layout::DoublyLinked, vec![1.0, 2.0]).with_caption("Inserted 2");
        assert_eq!(
            TextCanvas::plain().render(&doubly),
            "None <- [1] <-> [2] -> None\nInserted 2\n"
        );
    }

    #[test]
    fn stack_draws_top_first() {
        let step = Step::new(Layout::Stack, vec![1.0, 20.0]);
        let text = TextCanvas::plain().render(&step);
        assert_eq!(text, "| 20 |  <- top\n| 1  |\n+----+\n");
    }

    #[test]
    fn queue_and_empty() {
        let step = Step::new(Layout::Queue, vec![3.0, 4.0]);
        assert_eq!(TextCanvas::plain().render(&step), "front -> [3] [4] <- rear\n");
        let empty = Step::new(Layout::Queue, Vec::new()).with_caption("Queue is empty");
        assert_eq!(TextCanvas::plain().render(&empty), "(empty)\nQueue is empty\n");
    }

    #[test]
    fn ansi_colours_highlighted_elements() {
        let step = Step::new(Layout::Queue, vec![3.0, 4.0]).with(0, Role::Sorted);
        let text = TextCanvas::ansi().render(&step);
        assert!(text.contains(&"[3]".green().to_string()));
        assert!(text.starts_with("front -> \x1b[32m[3]"));
        assert!(text.contains(" [4] <- rear"));
        assert!(!TextCanvas::plain().render(&step).contains('\x1b'));
    }

    #[test]
    fn decimals_scale_against_the_largest_magnitude() {
        let step = Step::bars(&[0.5, -0.25]).with(1, Role::Pivot);
        let text = TextCanvas::plain().render(&step);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with(&format!("0 | {}", "#".repeat(BAR_WIDTH))));
        assert!(lines[0].ends_with(" 0.5"));
        assert!(lines[1].starts_with(&format!("1 | {} ", "-".repeat(BAR_WIDTH / 2))));
        assert!(lines[1].ends_with(" -0.25 P"));

        let ansi = TextCanvas::ansi().render(&step);
        assert!(ansi.contains(&format!("{:<BAR_WIDTH$}", "-".repeat(20)).magenta().to_string()));
    }
}

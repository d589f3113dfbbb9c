//! Rendering a transition list as Mermaid text.

use super::ExportStyle;

/// Render `(name, from, to)` edges in order, one line each, after the
/// style's header line. Every line ends with `\n`.
pub fn render<'a, I>(style: ExportStyle, edges: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
{
    let mut out = String::new();
    out.push_str(style.header());
    out.push('\n');

    for (name, from, to) in edges {
        let line = match style {
            ExportStyle::Labeled => format!("{from} -- {name} --> {to}\n"),
            ExportStyle::Plain => format!("{from} --> {to}\n"),
        };
        out.push_str(&line);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_renders_header_only() {
        assert_eq!(render(ExportStyle::Labeled, []), "graph LR\n");
        assert_eq!(render(ExportStyle::Plain, []), "stateDiagram-v2\n");
    }

    #[test]
    fn labeled_lines_carry_transition_names() {
        let edges = [("T1", "Start", "Process"), ("T2", "Process", "End")];

        let text = render(ExportStyle::Labeled, edges);

        assert_eq!(
            text,
            "graph LR\nStart -- T1 --> Process\nProcess -- T2 --> End\n"
        );
    }

    #[test]
    fn plain_lines_drop_names() {
        let edges = [("T1", "Start", "Process")];

        let text = render(ExportStyle::Plain, edges);

        assert_eq!(text, "stateDiagram-v2\nStart --> Process\n");
    }
}

use crate::rank::ResultRecord;

/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
pub(crate) fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '[' | ']' | '(' | ')' => {
                out.push('\\');
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out
}

/// Sanitize user input for embedding in a Markdown heading.
/// Replaces newlines (which would break heading structure) with spaces.
pub(crate) fn sanitize_heading(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

pub fn format_results(query: &str, records: &[ResultRecord]) -> String {
    let mut output = format!("# Results: {}\n\n", sanitize_heading(query));

    if records.is_empty() {
        output.push_str("No results.\n");
        return output;
    }

    for (i, record) in records.iter().enumerate() {
        output.push_str(&format!(
            "{}. [{}]({}) ({}, {:.3})\n",
            i + 1,
            escape_md_link(&sanitize_heading(&record.title)),
            escape_md_link(&record.link),
            record.source,
            record.normalized_score
        ));
    }

    output
}

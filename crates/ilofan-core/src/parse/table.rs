// Fixed-column table extraction

/// How to recognise a table in command output.
#[derive(Debug, Clone, Copy)]
pub struct TableSpec {
    /// Column names that must all appear (case-insensitive) on the header line.
    pub markers: &'static [&'static str],
    /// Rows with fewer whitespace-separated fields are skipped.
    pub min_fields: usize,
}

/// Field vectors for every data row after the header.
///
/// Separator lines (`----`, `====`, blank) are ignored. Returns `None` when
/// no header line is found; a header with no rows yields `Some(vec![])`.
pub fn table_rows<'a>(text: &'a str, spec: &TableSpec) -> Option<Vec<Vec<&'a str>>> {
    let mut lines = text.lines();
    if !lines.by_ref().any(|line| is_header(line, spec.markers)) {
        return None;
    }

    Some(
        lines
            .filter(|line| !is_separator(line))
            .map(|line| line.split_whitespace().collect::<Vec<_>>())
            .filter(|fields| fields.len() >= spec.min_fields)
            .collect(),
    )
}

/// Numeric cell, or `None` for `N/A`, `-`, `NaN` and other junk.
pub fn parse_field(field: &str) -> Option<f64> {
    field
        .trim()
        .trim_end_matches('%')
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn is_header(line: &str, markers: &[&str]) -> bool {
    let upper = line.to_ascii_uppercase();
    let tokens: Vec<&str> = upper.split_whitespace().collect();
    !markers.is_empty()
        && markers
            .iter()
            .all(|m| tokens.iter().any(|t| t.contains(&m.to_ascii_uppercase())))
}

fn is_separator(line: &str) -> bool {
    line.chars()
        .all(|c| c.is_whitespace() || matches!(c, '-' | '=' | '+' | '|' | '*'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SPEC: TableSpec = TableSpec {
        markers: &["PID", "SP", "OUT"],
        min_fields: 3,
    };

    #[test]
    fn rows_follow_header() {
        let text = "\
preamble text
PID  SP  OUT
---  --  ---
0    40  12
1    45  30
";
        let rows = table_rows(text, &SPEC).unwrap();
        assert_eq!(rows, vec![vec!["0", "40", "12"], vec!["1", "45", "30"]]);
    }

    #[test]
    fn header_match_is_case_insensitive() {
        let rows = table_rows("pid sp output\n7 1 2\n", &SPEC).unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn short_rows_are_skipped() {
        let rows = table_rows("PID SP OUT\n1 2\n\n3 4 5\n", &SPEC).unwrap();
        assert_eq!(rows, vec![vec!["3", "4", "5"]]);
    }

    #[test]
    fn missing_header_is_none() {
        assert_eq!(table_rows("0 40 12\n1 45 30\n", &SPEC), None);
        assert_eq!(table_rows("", &SPEC), None);
    }

    #[test]
    fn header_without_rows_is_empty() {
        assert_eq!(table_rows("PID SP OUT\n---\n", &SPEC), Some(vec![]));
    }

    #[test]
    fn parse_field_tolerates_junk() {
        assert_eq!(parse_field("42.5"), Some(42.5));
        assert_eq!(parse_field("60%"), Some(60.0));
        assert_eq!(parse_field("N/A"), None);
        assert_eq!(parse_field("NaN"), None);
        assert_eq!(parse_field("-"), None);
    }
}

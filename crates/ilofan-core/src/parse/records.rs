// record<N> enumeration

/// Sequence numbers of every `record<digits>` line, in emission order.
///
/// Callers must not assume numeric order; sort if it matters.
pub fn record_numbers(text: &str) -> Vec<u32> {
    text.lines()
        .filter_map(|line| {
            let rest = line.trim().strip_prefix("record")?;
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            // `record12` or `record12 <anything>`, never `recordings`.
            if digits_end == 0 || !rest[digits_end..].chars().next().is_none_or(char::is_whitespace) {
                return None;
            }
            rest[..digits_end].parse().ok()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enumerates_targets_in_emission_order() {
        let text = "\
/system1/log1
  Targets
    record17
    record13
    record14
  Properties
  Verbs
    cd version exit show
";
        assert_eq!(record_numbers(text), vec![17, 13, 14]);
    }

    #[test]
    fn ignores_non_record_lines() {
        let text = "recordings\nrecord\n  record5 \nmy record6\nrecord7x\nrecord8";
        assert_eq!(record_numbers(text), vec![5, 8]);
    }

    #[test]
    fn empty_output_is_empty() {
        assert!(record_numbers("").is_empty());
    }
}

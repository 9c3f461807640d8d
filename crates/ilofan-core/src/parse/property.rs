// key=value property extraction

/// Value of the first `key=` line in `text`, trimmed and unquoted.
///
/// Leading indentation is ignored; the key match is exact. Returns `None`
/// when no line carries the key.
pub fn property(text: &str, key: &str) -> Option<String> {
    text.lines().find_map(|line| {
        let rest = line.trim_start().strip_prefix(key)?;
        let value = rest.strip_prefix('=')?;
        Some(unquote(value.trim()).to_owned())
    })
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|v| v.strip_suffix(quote))
        {
            return inner.trim();
        }
    }
    value
}

/// Leading decimal number of a value such as `"120 Watts"` or `"35%"`.
pub fn leading_number(value: &str) -> Option<f64> {
    let value = value.trim();
    let end = value
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map_or(value.len(), |(i, _)| i);
    value.get(..end)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SYSTEM1: &str = "\
/system1
  Targets
    firmware1
    log1
  Properties
    name=ProLiant DL380p Gen8
    number=CZ12345678
    oemhp_server_name=\"lab-host-01\"
    enabled_state=enabled
  Verbs
    cd version exit show reset start stop
";

    #[test]
    fn finds_indented_property() {
        assert_eq!(property(SYSTEM1, "name").as_deref(), Some("ProLiant DL380p Gen8"));
        assert_eq!(property(SYSTEM1, "number").as_deref(), Some("CZ12345678"));
    }

    #[test]
    fn strips_surrounding_quotes() {
        assert_eq!(
            property(SYSTEM1, "oemhp_server_name").as_deref(),
            Some("lab-host-01")
        );
        assert_eq!(property("k='v'", "k").as_deref(), Some("v"));
    }

    #[test]
    fn key_must_match_exactly() {
        // `name` must not match `oemhp_server_name`, nor `names=` lines.
        assert_eq!(property("names=x\nname=y", "name").as_deref(), Some("y"));
        assert_eq!(property(SYSTEM1, "server_name"), None);
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(property(SYSTEM1, "oemhp_PresentPower"), None);
        assert_eq!(property("", "name"), None);
    }

    #[test]
    fn first_match_wins_and_empty_values_survive() {
        assert_eq!(property("a=1\na=2", "a").as_deref(), Some("1"));
        assert_eq!(property("a=", "a").as_deref(), Some(""));
    }

    #[test]
    fn leading_number_ignores_units() {
        assert_eq!(leading_number("120 Watts"), Some(120.0));
        assert_eq!(leading_number("35%"), Some(35.0));
        assert_eq!(leading_number(" 12.5"), Some(12.5));
        assert_eq!(leading_number("-4 C"), Some(-4.0));
        assert_eq!(leading_number("N/A"), None);
        assert_eq!(leading_number(""), None);
    }
}

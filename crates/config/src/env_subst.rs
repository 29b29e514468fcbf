/// Replace `${ENV_VAR}` placeholders in a raw config string.
///
/// Unresolvable variables are left as-is so parse errors point at the
/// original placeholder.
pub fn substitute_env(input: &str) -> String {
    substitute_env_with(input, |name| std::env::var(name).ok())
}

fn substitute_env_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' || chars.peek() != Some(&'{') {
            out.push(ch);
            continue;
        }
        chars.next(); // consume '{'
        let mut name = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            name.push(c);
        }
        // Malformed or empty placeholders are emitted literally.
        if !closed {
            out.push_str("${");
            out.push_str(&name);
            continue;
        }
        match (!name.is_empty()).then(|| lookup(&name)).flatten() {
            Some(val) => out.push_str(&val),
            None => {
                out.push_str("${");
                out.push_str(&name);
                out.push('}');
            },
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_known_var() {
        let lookup = |name: &str| (name == "CROSSLIST_KEY").then(|| "abc123".to_string());
        assert_eq!(
            substitute_env_with("api_key = \"${CROSSLIST_KEY}\"", lookup),
            "api_key = \"abc123\""
        );
    }

    #[test]
    fn leaves_unknown_var() {
        assert_eq!(
            substitute_env_with("${CROSSLIST_MISSING}", |_| None),
            "${CROSSLIST_MISSING}"
        );
    }

    #[test]
    fn unterminated_placeholder_kept_literal() {
        assert_eq!(substitute_env_with("${OOPS", |_| None), "${OOPS");
    }

    #[test]
    fn no_placeholders() {
        assert_eq!(substitute_env("plain text"), "plain text");
    }
}

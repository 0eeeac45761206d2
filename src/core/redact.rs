use once_cell::sync::Lazy;
use regex::Regex;

pub const REDACTION_MARKER: &str = "[REDACTED_SECRET]";

// prefix (quote, snake_case prefix, keyword, quote, separator, quote) | value | closing quote
static SECRET_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)(['"]?(?:[a-z0-9_]+_)?(?:key|token|secret|password)['"]?\s*[:=]\s*['"]?)([a-z0-9\-_.~+]{10,})(['"]?)"#,
    )
    .unwrap()
});

pub fn redact(line: &str) -> String {
    SECRET_PATTERN
        .replace_all(line, |caps: &regex::Captures| {
            format!("{}{}{}", &caps[1], REDACTION_MARKER, &caps[3])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacts_quoted_assignment() {
        assert_eq!(
            redact(r#"API_KEY = "supersecretkey1""#),
            r#"API_KEY = "[REDACTED_SECRET]""#
        );
    }

    #[test]
    fn test_redacts_json_style_pair() {
        assert_eq!(
            redact(r#"  "auth_token": "abcdef0123456789","#),
            r#"  "auth_token": "[REDACTED_SECRET]","#
        );
    }

    #[test]
    fn test_keyword_is_case_insensitive() {
        assert_eq!(
            redact("+DB_PASSWORD=hunter2hunter2"),
            "+DB_PASSWORD=[REDACTED_SECRET]"
        );
        assert_eq!(
            redact("client_Secret: a1b2c3d4e5f6g7"),
            "client_Secret: [REDACTED_SECRET]"
        );
    }

    #[test]
    fn test_short_values_are_kept() {
        let line = "let key = \"abc\";";
        assert_eq!(redact(line), line);
        assert_eq!(redact("token=123456789"), "token=123456789");
    }

    #[test]
    fn test_lines_without_secrets_are_untouched() {
        for line in [
            "",
            " fn main() {",
            "+    println!(\"hello world\");",
            "@@ -1,3 +1,4 @@",
            "diff --git a/src/keys.rs b/src/keys.rs",
        ] {
            assert_eq!(redact(line), line);
        }
    }

    #[test]
    fn test_redacts_every_match_on_a_line() {
        assert_eq!(
            redact("key=aaaaaaaaaaaa token=bbbbbbbbbbbb"),
            "key=[REDACTED_SECRET] token=[REDACTED_SECRET]"
        );
    }

    #[test]
    fn test_redaction_is_idempotent() {
        let samples = [
            r#"API_KEY = "supersecretkey1""#,
            "password: 'correct-horse-battery'",
            "key=key=abcdefghijkl",
            "token=abcdefghijkl_secret=xyzxyzxyzxyz",
            "secret_key:[REDACTED_SECRET]",
            "nothing to see here",
            "GITHUB_TOKEN=ghp_0123456789abcdefABCDEF",
            "\"private_key\" = \"-----BEGIN\"",
        ];
        for sample in samples {
            let once = redact(sample);
            assert_eq!(redact(&once), once, "not idempotent for {sample:?}");
        }
    }
}

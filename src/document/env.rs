//! `$NAME` substitution over raw document text.

use std::sync::LazyLock;

use regex::{Captures, Regex};

#[expect(clippy::expect_used, reason = "the pattern is a compile-time literal")]
static VARIABLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("variable pattern is valid")
});

/// Replace every `$NAME` in `raw` with the value of `NAME` in `env`.
///
/// Unset variables become the empty string.
pub fn substitute<E: mockable::Env>(raw: &str, env: &E) -> String {
    VARIABLE
        .replace_all(raw, |caps: &Captures<'_>| {
            caps.get(1)
                .and_then(|name| env.string(name.as_str()))
                .unwrap_or_default()
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockable::MockEnv;
    use rstest::{fixture, rstest};

    /// Fixture providing an environment with `HOME` and `TAG` set.
    #[fixture]
    fn env() -> MockEnv {
        let mut env = MockEnv::new();
        env.expect_string().returning(|key| match key {
            "HOME" => Some(String::from("/home/fugu")),
            "TAG" => Some(String::from("1.2")),
            _ => None,
        });
        env
    }

    #[rstest]
    #[case("image: redis:$TAG", "image: redis:1.2")]
    #[case("volume: $HOME/data:/data", "volume: /home/fugu/data:/data")]
    #[case("name: $MISSING", "name: ")]
    #[case("name: a$TAG$TAG", "name: a1.21.2")]
    #[case("cost: $5", "cost: $5")]
    #[case("plain: text", "plain: text")]
    fn substitute_replaces_identifiers(env: MockEnv, #[case] raw: &str, #[case] expected: &str) {
        assert_eq!(substitute(raw, &env), expected);
    }

    #[rstest]
    fn substitute_takes_longest_identifier(env: MockEnv) {
        assert_eq!(substitute("$TAGGED", &env), "");
    }
}

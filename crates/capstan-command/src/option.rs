//! Option rendering helpers.
//!
//! The rendering rules are uniform across every operation: a scalar option
//! with no value renders to nothing, a boolean flag renders bare and only
//! when true, and a repeatable option renders one token per element in
//! declared order, using the element's canonical [`CliValue`] fragment.

use std::fmt;

use capstan_core::CliValue;

/// Renders `--<name>=<value>`, or nothing when the value is absent.
pub fn option(name: &str, value: Option<impl fmt::Display>) -> Option<String> {
    value.map(|value| format!("--{}={}", name, value))
}

/// Renders a bare `--<name>` when the flag is set, nothing otherwise.
pub fn flag(name: &str, enabled: bool) -> Option<String> {
    enabled.then(|| format!("--{}", name))
}

/// Renders one `--<name>=<element>` token per element, preserving order.
pub fn repeated<'a, T>(name: &str, values: impl IntoIterator<Item = &'a T>) -> Vec<String>
where
    T: CliValue + 'a,
{
    values
        .into_iter()
        .map(|value| format!("--{}={}", name, value.cli_option()))
        .collect()
}

/// Renders an option mapping as comma-separated `key=value` pairs,
/// skipping absent values.
///
/// Used for freeform option blocks the engine accepts as one composite
/// flag value.
pub fn inline_options<K, V>(options: &[(K, Option<V>)]) -> String
where
    K: fmt::Display,
    V: fmt::Display,
{
    options
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|value| format!("{}={}", key, value)))
        .collect::<Vec<_>>()
        .join(",")
}

/// Joins the parts with the given separator.
pub fn join<S: AsRef<str>>(parts: &[S], separator: &str) -> String {
    parts
        .iter()
        .map(|part| part.as_ref())
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use capstan_core::NetworkAttachment;

    #[test]
    fn test_option_present_and_absent() {
        assert_eq!(option("time", Some(10)), Some("--time=10".to_string()));
        assert_eq!(option("time", None::<u32>), None);
    }

    #[test]
    fn test_flag_never_carries_a_value() {
        assert_eq!(flag("force", true), Some("--force".to_string()));
        assert_eq!(flag("force", false), None);
    }

    #[test]
    fn test_repeated_preserves_order() {
        let networks = vec![
            NetworkAttachment::new("front"),
            NetworkAttachment::new("back"),
        ];
        assert_eq!(
            repeated("network", &networks),
            vec!["--network=front", "--network=back"]
        );
    }

    #[test]
    fn test_inline_options_skips_absent() {
        let options = [
            ("type", Some("bind")),
            ("readonly", None),
            ("source", Some("/data")),
        ];
        assert_eq!(inline_options(&options), "type=bind,source=/data");
    }

    #[test]
    fn test_inline_options_empty() {
        let options: [(&str, Option<&str>); 2] = [("a", None), ("b", None)];
        assert_eq!(inline_options(&options), "");
    }

    #[test]
    fn test_join() {
        assert_eq!(join(&["a", "b", "c"], ", "), "a, b, c");
        assert_eq!(join::<&str>(&[], ","), "");
    }
}

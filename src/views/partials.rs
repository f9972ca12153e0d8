//! Built-in default partials, compiled into the binary.

const PARTIALS: &[(&str, &str)] = &[
    ("step", include_str!("../../assets/views/step.html")),
    ("cookies", include_str!("../../assets/views/cookies.html")),
    ("terms", include_str!("../../assets/views/terms.html")),
];

/// Look up a built-in template by name.
pub fn lookup(name: &str) -> Option<&'static str> {
    PARTIALS
        .iter()
        .find(|(partial, _)| *partial == name)
        .map(|(_, source)| *source)
}

use regex::Regex;

/// Network share every manifest path is exported under.
pub const SHARE_PREFIX: &str = r"\\ahg-sto-100\nf\";

/// Short-name tokens the export tool writes in place of characters it could
/// not represent, in the order they are replaced.
pub const PATH_ARTIFACTS: &[(&str, &str)] = &[
    ("_2X68Q~7", " "),
    ("N7FNV4~6", "N.D.M."),
    ("CPFVGE~0", "CPeng "),
];

lazy_static::lazy_static! {
    static ref SHARE_PREFIX_REGEX: Regex =
        Regex::new(&format!("(?i)^{}", regex::escape(SHARE_PREFIX)))
            .expect("share prefix pattern is valid");
    static ref BRACKET_SUFFIX_REGEX: Regex =
        Regex::new(r" \[.*\]").expect("bracket pattern is valid");
}

/// Turn a manifest UNC path into a path relative to the source root.
///
/// Pure string work: the share prefix is stripped (case-insensitively),
/// separators become forward slashes, and known export artifacts are replaced.
pub fn normalize_path(raw_path: &str) -> String {
    let stripped = SHARE_PREFIX_REGEX.replace(raw_path, "");
    let path = stripped.replace('\\', "/");
    fix_path_artifacts(&path)
}

fn fix_path_artifacts(path: &str) -> String {
    PATH_ARTIFACTS
        .iter()
        .fold(path.to_string(), |acc, (token, replacement)| {
            acc.replace(token, replacement)
        })
}

/// Drop ` [...]` annotations from a manifest subject. Greedy: everything from
/// the first ` [` to the last `]` goes.
pub fn strip_bracket_suffix(subject: &str) -> String {
    BRACKET_SUFFIX_REGEX.replace_all(subject, "").into_owned()
}

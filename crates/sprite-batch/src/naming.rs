/// Suffix of batch outputs.
pub const OUTPUT_SUFFIX: &str = ".png";

/// Suffix of debug-mode outputs.
pub const DEBUG_SUFFIX: &str = "_debug.png";

const JOINER: char = '-';

fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Output file name for an identifier: `sprite/0006/0001/` → `sprite-0006-0001.png`.
pub fn output_name(identifier: &str, suffix: &str) -> String {
    let trimmed = identifier.trim_matches(is_separator);
    let mut name: String = trimmed
        .chars()
        .map(|c| if is_separator(c) { JOINER } else { c })
        .collect();
    name.push_str(suffix);
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_segments() {
        assert_eq!(output_name("a/b/c/", OUTPUT_SUFFIX), "a-b-c.png");
        assert_eq!(
            output_name("/sprite/0006/0000/0001/", OUTPUT_SUFFIX),
            "sprite-0006-0000-0001.png"
        );
    }

    #[test]
    fn debug_suffix() {
        assert_eq!(output_name("a/b/c/", DEBUG_SUFFIX), "a-b-c_debug.png");
    }

    #[test]
    fn backslashes_are_separators() {
        assert_eq!(output_name("1004\\0001\\", OUTPUT_SUFFIX), "1004-0001.png");
    }

    #[test]
    fn repeated_inner_separators_each_become_a_joiner() {
        assert_eq!(output_name("//a//b//", OUTPUT_SUFFIX), "a--b.png");
    }
}

//! Declarative stderr classification.
//!
//! Every language family owns a [`ClassificationTable`]: an ordered list of
//! regular expressions for the coarse class and another for the detailed
//! class, each with a fallback. The patterns of one list are joined into a
//! single alternation, so the earliest match in stderr wins and ties go to the
//! pattern listed first. Within the winning match the first non-empty capture
//! group is the extracted value.

use once_cell::sync::Lazy;
use regex::Regex;

/// Coarse and detailed failure signature. Both are always present, possibly empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorClass {
    pub error_class: String,
    pub error_class_extra: String,
}

/// What a field falls back to when none of its patterns match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The exit status rendered as a decimal string.
    ExitStatus,
    /// The unmodified stderr text.
    RawStderr,
}

/// Ordered patterns for one output field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub patterns: &'static [&'static str],
    pub fallback: Fallback,
}

/// Patterns for both fields of one language family.
#[derive(Debug, Clone, Copy)]
pub struct ClassificationTable {
    pub class: FieldRule,
    pub extra: FieldRule,
}

// ─── Tables ─────────────────────────────────────────────────────────

pub const INTERPRETED_TABLE: ClassificationTable = ClassificationTable {
    class: FieldRule {
        patterns: &[r"^(\w*Error):.*", r"(\w*Warning):.*"],
        fallback: Fallback::ExitStatus,
    },
    extra: FieldRule {
        patterns: &[r"^(\w*Error:.*).*", r"(\w*Warning:.*).*"],
        fallback: Fallback::RawStderr,
    },
};

pub const NATIVE_TABLE: ClassificationTable = ClassificationTable {
    // Native crashes are told apart by exit status, not by text.
    class: FieldRule {
        patterns: &[],
        fallback: Fallback::ExitStatus,
    },
    extra: FieldRule {
        patterns: &[
            r"(undefined reference .*)",
            r"(\*\*\* stack smashing detected \*\*\*: terminated)",
            r"(\*\*\* buffer overflow detected \*\*\*: terminated)",
            r"(munmap_chunk\(\): .*)",
            r"(segmentation fault \(core dumped\))",
            r"(error: .*)",
            r"(relocation truncated to fit: .*)",
            r"(sysmalloc: .*)",
            r"(malloc\(\): .*)",
            r"(free\(\): .*)",
        ],
        fallback: Fallback::RawStderr,
    },
};

pub const MANAGED_TABLE: ClassificationTable = ClassificationTable {
    class: FieldRule {
        patterns: &[r#"Exception in thread ".*?" ([^:\n]*)"#],
        fallback: Fallback::RawStderr,
    },
    extra: FieldRule {
        patterns: &[r"(Exception .*)"],
        fallback: Fallback::RawStderr,
    },
};

// ─── Compilation ────────────────────────────────────────────────────

/// A [`FieldRule`] with its patterns compiled into one multiline alternation.
pub struct CompiledRule {
    regex: Option<Regex>,
    fallback: Fallback,
}

impl CompiledRule {
    /// # Panics
    /// Panics if a pattern is not a valid regular expression; tables are
    /// constants, so this is caught by the unit tests.
    fn new(rule: &FieldRule) -> Self {
        let regex = if rule.patterns.is_empty() {
            None
        } else {
            let joined = format!("(?m){}", rule.patterns.join("|"));
            Some(Regex::new(&joined).expect("invalid classification pattern"))
        };
        Self {
            regex,
            fallback: rule.fallback,
        }
    }

    fn extract(&self, stderr: &str, exit_status: i32) -> String {
        self.regex
            .as_ref()
            .and_then(|re| first_capture(re, stderr))
            .unwrap_or_else(|| match self.fallback {
                Fallback::ExitStatus => exit_status.to_string(),
                Fallback::RawStderr => stderr.to_string(),
            })
    }
}

pub struct CompiledTable {
    class: CompiledRule,
    extra: CompiledRule,
}

impl CompiledTable {
    pub fn new(table: &ClassificationTable) -> Self {
        Self {
            class: CompiledRule::new(&table.class),
            extra: CompiledRule::new(&table.extra),
        }
    }

    pub fn classify(&self, stderr: &str, exit_status: i32) -> ErrorClass {
        ErrorClass {
            error_class: self.class.extract(stderr, exit_status),
            error_class_extra: self.extra.extract(stderr, exit_status),
        }
    }
}

pub static INTERPRETED: Lazy<CompiledTable> = Lazy::new(|| CompiledTable::new(&INTERPRETED_TABLE));
pub static NATIVE: Lazy<CompiledTable> = Lazy::new(|| CompiledTable::new(&NATIVE_TABLE));
pub static MANAGED: Lazy<CompiledTable> = Lazy::new(|| CompiledTable::new(&MANAGED_TABLE));

/// First match in `text`, reduced to its first non-empty capture group.
fn first_capture(re: &Regex, text: &str) -> Option<String> {
    let caps = re.captures(text)?;
    let value = caps
        .iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        Lazy::force(&INTERPRETED);
        Lazy::force(&NATIVE);
        Lazy::force(&MANAGED);
    }

    #[test]
    fn interpreted_error_line() {
        let stderr = "Traceback (most recent call last):\n  File \"a.py\", line 1, in <module>\n    print(1/0)\nZeroDivisionError: division by zero\n";
        let c = INTERPRETED.classify(stderr, 1);
        assert_eq!(c.error_class, "ZeroDivisionError");
        assert_eq!(c.error_class_extra, "ZeroDivisionError: division by zero");
    }

    #[test]
    fn interpreted_warning_anywhere_on_line() {
        let stderr = "a.py:3: DeprecationWarning: invalid escape sequence\n";
        let c = INTERPRETED.classify(stderr, 0);
        assert_eq!(c.error_class, "DeprecationWarning");
        assert_eq!(c.error_class_extra, "DeprecationWarning: invalid escape sequence");
    }

    #[test]
    fn interpreted_error_must_start_the_line() {
        // "Error:" in the middle of a line is only picked up by the warning
        // pattern, which does not apply here.
        let stderr = "something ValueError: nope";
        let c = INTERPRETED.classify(stderr, 1);
        assert_eq!(c.error_class, "1");
        assert_eq!(c.error_class_extra, stderr);
    }

    #[test]
    fn interpreted_earliest_match_wins() {
        let stderr = "x.py:1: SyntaxWarning: oops\nNameError: name 'y' is not defined\n";
        let c = INTERPRETED.classify(stderr, 1);
        assert_eq!(c.error_class, "SyntaxWarning");
        assert_eq!(c.error_class_extra, "SyntaxWarning: oops");
    }

    #[test]
    fn interpreted_fallbacks() {
        let c = INTERPRETED.classify("", 0);
        assert_eq!(c.error_class, "0");
        assert_eq!(c.error_class_extra, "");

        let c = INTERPRETED.classify("TLEError: Time limit exceeded", -9);
        assert_eq!(c.error_class, "TLEError");
        assert_eq!(c.error_class_extra, "TLEError: Time limit exceeded");
    }

    #[test]
    fn native_class_is_exit_status() {
        let c = NATIVE.classify("*** stack smashing detected ***: terminated\n", -6);
        assert_eq!(c.error_class, "-6");
        assert_eq!(c.error_class_extra, "*** stack smashing detected ***: terminated");
    }

    #[test]
    fn native_allocator_and_linker_messages() {
        let c = NATIVE.classify("free(): invalid pointer\n", -6);
        assert_eq!(c.error_class_extra, "free(): invalid pointer");

        let c = NATIVE.classify("main.o: undefined reference to `foo'\n", 1);
        assert_eq!(c.error_class_extra, "undefined reference to `foo'");

        let c = NATIVE.classify("munmap_chunk(): invalid pointer\n", -6);
        assert_eq!(c.error_class_extra, "munmap_chunk(): invalid pointer");
    }

    #[test]
    fn native_earliest_occurrence_wins() {
        let stderr = "main.c:3: error: expected ';'\nsegmentation fault (core dumped)\n";
        let c = NATIVE.classify(stderr, 139);
        assert_eq!(c.error_class, "139");
        assert_eq!(c.error_class_extra, "error: expected ';'");
    }

    #[test]
    fn native_unmatched_keeps_raw_stderr() {
        let c = NATIVE.classify("Killed\n", -9);
        assert_eq!(c.error_class_extra, "Killed\n");
    }

    #[test]
    fn managed_exception() {
        let stderr = "Exception in thread \"main\" java.lang.ArithmeticException: / by zero\n\tat Main.main(Main.java:5)\n";
        let c = MANAGED.classify(stderr, 1);
        assert_eq!(c.error_class, "java.lang.ArithmeticException");
        assert_eq!(
            c.error_class_extra,
            "Exception in thread \"main\" java.lang.ArithmeticException: / by zero"
        );
    }

    #[test]
    fn managed_fallbacks_are_raw_stderr() {
        let stderr = "Error: Could not find or load main class Main\n";
        let c = MANAGED.classify(stderr, 1);
        assert_eq!(c.error_class, stderr);
        assert_eq!(c.error_class_extra, stderr);
    }
}

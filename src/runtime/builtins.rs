//! Predefined constants and internal classes known without any source.

use crate::core::value::Val;
use crate::parser::ast::ClassKind;
use crate::reflection::class::ReflectionClass;
use indexmap::IndexMap;

const PHP_VERSION_STR: &str = "8.2.0";
const PHP_VERSION_ID_VALUE: i64 = 80200;
const PHP_MAJOR: i64 = 8;
const PHP_MINOR: i64 = 2;
const PHP_RELEASE: i64 = 0;

/// `true`, `false` and `null`, which PHP matches case-insensitively
pub fn keyword_constant(name: &str) -> Option<Val> {
    match name.to_ascii_lowercase().as_str() {
        "true" => Some(Val::Bool(true)),
        "false" => Some(Val::Bool(false)),
        "null" => Some(Val::Null),
        _ => None,
    }
}

/// Reference: $PHP_SRC_PATH/main/main.c - php_module_startup (REGISTER_MAIN_*_CONSTANT)
pub fn core_constants() -> IndexMap<String, Val> {
    let mut constants = IndexMap::new();
    let mut insert = |name: &str, value: Val| {
        constants.insert(name.to_owned(), value);
    };

    // PHP version constants
    insert("PHP_VERSION", Val::from(PHP_VERSION_STR));
    insert("PHP_VERSION_ID", Val::Int(PHP_VERSION_ID_VALUE));
    insert("PHP_MAJOR_VERSION", Val::Int(PHP_MAJOR));
    insert("PHP_MINOR_VERSION", Val::Int(PHP_MINOR));
    insert("PHP_RELEASE_VERSION", Val::Int(PHP_RELEASE));
    insert("PHP_EXTRA_VERSION", Val::from(""));

    // System constants
    insert("PHP_OS", Val::from(std::env::consts::OS));
    insert("PHP_OS_FAMILY", Val::from(os_family()));
    insert("PHP_EOL", Val::from("\n"));
    insert("DIRECTORY_SEPARATOR", Val::from(std::path::MAIN_SEPARATOR_STR));
    insert("PATH_SEPARATOR", Val::from(if cfg!(windows) { ";" } else { ":" }));

    // Numeric limits
    insert("PHP_INT_MAX", Val::Int(i64::MAX));
    insert("PHP_INT_MIN", Val::Int(i64::MIN));
    insert("PHP_INT_SIZE", Val::Int(8));
    insert("PHP_FLOAT_EPSILON", Val::Float(f64::EPSILON));
    insert("PHP_FLOAT_MAX", Val::Float(f64::MAX));
    insert("PHP_FLOAT_MIN", Val::Float(f64::MIN_POSITIVE));
    insert("PHP_FLOAT_DIG", Val::Int(15));
    insert("NAN", Val::Float(f64::NAN));
    insert("INF", Val::Float(f64::INFINITY));

    // Math constants
    insert("M_PI", Val::Float(std::f64::consts::PI));
    insert("M_E", Val::Float(std::f64::consts::E));
    insert("M_SQRT2", Val::Float(std::f64::consts::SQRT_2));

    // Error reporting level constants
    insert("E_ERROR", Val::Int(1));
    insert("E_WARNING", Val::Int(2));
    insert("E_PARSE", Val::Int(4));
    insert("E_NOTICE", Val::Int(8));
    insert("E_CORE_ERROR", Val::Int(16));
    insert("E_CORE_WARNING", Val::Int(32));
    insert("E_COMPILE_ERROR", Val::Int(64));
    insert("E_COMPILE_WARNING", Val::Int(128));
    insert("E_USER_ERROR", Val::Int(256));
    insert("E_USER_WARNING", Val::Int(512));
    insert("E_USER_NOTICE", Val::Int(1024));
    insert("E_STRICT", Val::Int(2048));
    insert("E_RECOVERABLE_ERROR", Val::Int(4096));
    insert("E_DEPRECATED", Val::Int(8192));
    insert("E_USER_DEPRECATED", Val::Int(16384));
    insert("E_ALL", Val::Int(32767));

    // Sorting flags
    insert("SORT_REGULAR", Val::Int(0));
    insert("SORT_NUMERIC", Val::Int(1));
    insert("SORT_STRING", Val::Int(2));

    constants
}

fn os_family() -> &'static str {
    match std::env::consts::OS {
        "windows" => "Windows",
        "macos" | "ios" => "Darwin",
        "linux" | "android" => "Linux",
        "freebsd" | "openbsd" | "netbsd" | "dragonfly" => "BSD",
        "solaris" | "illumos" => "Solaris",
        _ => "Unknown",
    }
}

/// Internal classes whose constants show up in user initializers
pub fn internal_classes() -> Vec<ReflectionClass> {
    vec![
        ReflectionClass::internal(
            "DateTimeInterface",
            ClassKind::Interface,
            None,
            &[],
            IndexMap::from([
                ("ATOM".to_owned(), Val::from("Y-m-d\\TH:i:sP")),
                ("COOKIE".to_owned(), Val::from("l, d-M-Y H:i:s T")),
                ("ISO8601".to_owned(), Val::from("Y-m-d\\TH:i:sO")),
                ("RFC822".to_owned(), Val::from("D, d M y H:i:s O")),
                ("RFC2822".to_owned(), Val::from("D, d M Y H:i:s O")),
                ("RFC3339".to_owned(), Val::from("Y-m-d\\TH:i:sP")),
                ("RFC3339_EXTENDED".to_owned(), Val::from("Y-m-d\\TH:i:s.vP")),
                ("RSS".to_owned(), Val::from("D, d M Y H:i:s O")),
                ("W3C".to_owned(), Val::from("Y-m-d\\TH:i:sP")),
            ]),
        ),
        ReflectionClass::internal(
            "DateTime",
            ClassKind::Class,
            None,
            &["DateTimeInterface"],
            IndexMap::new(),
        ),
        ReflectionClass::internal(
            "DateTimeImmutable",
            ClassKind::Class,
            None,
            &["DateTimeInterface"],
            IndexMap::new(),
        ),
        ReflectionClass::internal(
            "ArrayObject",
            ClassKind::Class,
            None,
            &["IteratorAggregate", "ArrayAccess", "Countable"],
            IndexMap::from([
                ("STD_PROP_LIST".to_owned(), Val::Int(1)),
                ("ARRAY_AS_PROPS".to_owned(), Val::Int(2)),
            ]),
        ),
        ReflectionClass::internal("Traversable", ClassKind::Interface, None, &[], IndexMap::new()),
        ReflectionClass::internal(
            "IteratorAggregate",
            ClassKind::Interface,
            None,
            &["Traversable"],
            IndexMap::new(),
        ),
        ReflectionClass::internal("ArrayAccess", ClassKind::Interface, None, &[], IndexMap::new()),
        ReflectionClass::internal("Countable", ClassKind::Interface, None, &[], IndexMap::new()),
        ReflectionClass::internal("Throwable", ClassKind::Interface, None, &[], IndexMap::new()),
        ReflectionClass::internal(
            "Exception",
            ClassKind::Class,
            None,
            &["Throwable"],
            IndexMap::new(),
        ),
        ReflectionClass::internal(
            "JsonException",
            ClassKind::Class,
            Some("Exception"),
            &[],
            IndexMap::new(),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_constants_ignore_case() {
        assert_eq!(keyword_constant("TRUE"), Some(Val::Bool(true)));
        assert_eq!(keyword_constant("False"), Some(Val::Bool(false)));
        assert_eq!(keyword_constant("NULL"), Some(Val::Null));
        assert_eq!(keyword_constant("PHP_EOL"), None);
    }

    #[test]
    fn test_core_constants() {
        let constants = core_constants();
        assert_eq!(constants.get("PHP_VERSION_ID"), Some(&Val::Int(80200)));
        assert_eq!(constants.get("PHP_INT_MAX"), Some(&Val::Int(i64::MAX)));
        assert_eq!(constants.get("E_ALL"), Some(&Val::Int(32767)));
        assert_eq!(constants.get("PHP_EOL"), Some(&Val::from("\n")));
    }
}

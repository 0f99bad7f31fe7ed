//! Built-in language definitions.
//!
//! These are ordinary [`LanguageDefinition`] values; hosts can clone and tweak them, or replace
//! them entirely with YAML definitions.

use crate::{
    BraceFlavor, IndentSpec, IndentStyle, LanguageDefinition, MatcherSpec, OptionValue, keys,
};

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

fn extensions(list: &[&str]) -> Vec<String> {
    words(list)
}

fn c_comments() -> Vec<MatcherSpec> {
    vec![
        MatcherSpec::line_comment("//"),
        MatcherSpec::block_comment("/*", "*/"),
    ]
}

/// C and C++.
pub fn cpp() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("C++");
    def.file_extensions = extensions(&[
        ".cpp", ".hpp", ".c", ".h", ".m", ".mm", ".hh", ".cc", ".cxx",
    ]);
    def.matchers = c_comments();
    def.matchers.extend([
        MatcherSpec::CppRawString,
        MatcherSpec::EscapedString { quote: '"' },
        MatcherSpec::CharLiteral,
    ]);
    def.keywords = words(&[
        "alignas", "alignof", "asm", "auto", "bool", "break", "case", "catch", "char",
        "char16_t", "char32_t", "class", "const", "constexpr", "const_cast", "continue",
        "decltype", "default", "delete", "do", "double", "dynamic_cast", "else", "enum",
        "explicit", "export", "extern", "false", "float", "for", "friend", "goto", "if",
        "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "nullptr",
        "operator", "private", "protected", "public", "register", "reinterpret_cast", "return",
        "short", "signed", "sizeof", "static", "static_assert", "static_cast", "struct",
        "switch", "template", "this", "thread_local", "throw", "true", "try", "typedef",
        "typeid", "typename", "union", "unsigned", "using", "virtual", "void", "volatile",
        "wchar_t", "while", "and", "and_eq", "bitand", "bitor", "compl", "not", "not_eq", "or",
        "or_eq", "xor", "xor_eq",
    ]);
    def.preprocessor = true;
    def.indent = IndentSpec::new(IndentStyle::Statement {
        flavor: BraceFlavor::Cpp,
    })
    .with_electric(")]}>:#<");
    def
}

/// Java.
pub fn java() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Java");
    def.file_extensions = extensions(&[".java"]);
    def.matchers = c_comments();
    def.matchers.extend([
        MatcherSpec::EscapedString { quote: '"' },
        MatcherSpec::CharLiteral,
    ]);
    def.keywords = words(&[
        "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class",
        "const", "continue", "default", "do", "double", "else", "enum", "extends", "final",
        "finally", "float", "for", "if", "goto", "implements", "import", "instanceof", "int",
        "interface", "long", "native", "new", "package", "private", "protected", "public",
        "return", "short", "static", "strictfp", "super", "switch", "synchronized", "this",
        "throw", "throws", "transient", "try", "void", "volatile", "while", "true", "false",
        "null",
    ]);
    def.preprocessor = true;
    def.indent = IndentSpec::new(IndentStyle::Statement {
        flavor: BraceFlavor::Java,
    })
    .with_electric(")]}>:");
    def
}

/// Rust.
///
/// No character-literal matcher: lifetimes (`'a`) would be reported as broken literals.
pub fn rust() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Rust");
    def.file_extensions = extensions(&[".rs"]);
    def.matchers = c_comments();
    def.matchers.push(MatcherSpec::EscapedString { quote: '"' });
    def.keywords = words(&[
        "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum",
        "extern", "false", "fn", "for", "if", "impl", "in", "let", "loop", "match", "mod",
        "move", "mut", "pub", "ref", "return", "self", "Self", "static", "struct", "super",
        "trait", "true", "type", "unsafe", "use", "where", "while",
    ]);
    def.indent = IndentSpec::new(IndentStyle::Statement {
        flavor: BraceFlavor::CLike,
    })
    .with_electric(")]}>");
    def
}

/// Kotlin.
pub fn kotlin() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Kotlin");
    def.file_extensions = extensions(&[".kt", ".kts"]);
    def.matchers = c_comments();
    def.matchers.extend([
        MatcherSpec::multi_line_string("\"\"\""),
        MatcherSpec::EscapedString { quote: '"' },
        MatcherSpec::CharLiteral,
    ]);
    def.keywords = words(&[
        "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
        "is", "null", "object", "package", "return", "super", "this", "throw", "true", "try",
        "typealias", "typeof", "val", "var", "when", "while", "by", "catch", "constructor",
        "delegate", "dynamic", "field", "file", "finally", "get", "import", "init", "param",
        "property", "receiver", "set", "setparam", "where", "actual", "abstract", "annotation",
        "companion", "const", "crossinline", "data", "enum", "expect", "external", "final",
        "infix", "inline", "inner", "internal", "lateinit", "noinline", "open", "operator",
        "out", "override", "private", "protected", "public", "reified", "sealed", "suspend",
        "tailrec", "vararg", "it", "Boolean", "Byte", "Short", "Int", "Long", "Float",
        "Double", "UByte", "UShort", "UInt", "ULong", "Char", "String", "println",
    ]);
    def.indent = IndentSpec::new(IndentStyle::BracketDepth)
        .with_electric("{}[]():")
        .with_option(keys::INDENT_UNIT, OptionValue::Text("    ".into()));
    def
}

/// Go.
pub fn go() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Go");
    def.file_extensions = extensions(&[".go"]);
    def.matchers = c_comments();
    def.matchers.extend([
        MatcherSpec::multi_line_string("`"),
        MatcherSpec::EscapedString { quote: '"' },
        MatcherSpec::CharLiteral,
    ]);
    def.keywords = words(&[
        "break", "case", "chan", "const", "continue", "default", "defer", "else",
        "fallthrough", "for", "func", "go", "goto", "if", "import", "interface", "map",
        "package", "range", "return", "select", "struct", "switch", "type", "var", "bool",
        "byte", "complex64", "complex128", "error", "float32", "float64", "int", "int8",
        "int16", "int32", "int64", "rune", "string", "uint", "uint8", "uint16", "uint32",
        "uint64", "uintptr", "true", "false", "iota", "nil", "append", "cap", "close",
        "copy", "delete", "len", "make", "new", "panic", "print", "println", "recover",
    ]);
    def.indent = IndentSpec::new(IndentStyle::BracketDepth).with_electric("{}[]():");
    def
}

/// Bash and other Bourne-style shells.
pub fn bash() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Bash");
    def.file_extensions = extensions(&[
        ".sh",
        "bash.bashrc",
        "bash.logout",
        ".bash_profile",
        ".bashrc",
        ".bash_logout",
    ]);
    def.matchers = vec![
        MatcherSpec::line_comment("#"),
        MatcherSpec::multi_line_string("'"),
        MatcherSpec::multi_line_string("\""),
        MatcherSpec::multi_line_string("`"),
        MatcherSpec::HereDoc,
    ];
    // Bash words contain punctuation (`make-source`), so anything but a metacharacter counts.
    def.keyword_pattern = r"\b([^ \t<>;&|]+)\b".to_string();
    def.keywords = words(&[
        "case", "do", "done", "elif", "else", "esac", "for", "fi", "function", "if", "in",
        "select", "then", "until", "while", "source", "alias", "bg", "bind", "break",
        "builtin", "cd", "caller", "command", "compgen", "complete", "continue", "declare",
        "typeset", "dirs", "disown", "echo", "enable", "eval", "exec", "exit", "export", "fc",
        "fg", "getopts", "hash", "help", "history", "jobs", "kill", "let", "local", "logout",
        "popd", "printf", "pushd", "pwd", "read", "readonly", "return", "set", "shift",
        "shopt", "suspend", "test", "times", "trap", "type", "ulimit", "umask", "unalias",
        "unset", "wait",
    ]);
    def.indent = IndentSpec::new(IndentStyle::Pattern {
        indent_after: r"(\bthen|\bdo|\belse|\bin|\{)$".to_string(),
        indent: None,
        unindent: r"^(fi\b|done\b|esac\b|else\b|elif\b|\})".to_string(),
    })
    .with_electric("}iecf");
    def
}

/// Python.
pub fn python() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Python");
    def.file_extensions = extensions(&[".py", "BUILD", ".bzl"]);
    def.matchers = vec![
        MatcherSpec::line_comment("#"),
        MatcherSpec::multi_line_string("\"\"\""),
        MatcherSpec::multi_line_string("'''"),
        MatcherSpec::EscapedString { quote: '"' },
        MatcherSpec::EscapedString { quote: '\'' },
    ];
    def.keywords = words(&[
        "and", "as", "assert", "async", "await", "break", "class", "continue", "def", "del",
        "elif", "else", "except", "False", "finally", "for", "from", "global", "if", "import",
        "in", "is", "lambda", "None", "nonlocal", "not", "or", "pass", "raise", "return",
        "True", "try", "while", "with", "yield", "self",
    ]);
    def.indent = IndentSpec::new(IndentStyle::BlockKeyword)
        .with_electric("abcdefghijklmnopqrstuvwxyz:");
    def
}

/// Plain text: no lexical regions, copy-previous indentation.
pub fn plain_text() -> LanguageDefinition {
    let mut def = LanguageDefinition::new("Plain Text");
    def.file_extensions = extensions(&[".txt"]);
    def.hyperlinks = false;
    def
}

/// Every built-in definition.
pub fn all() -> Vec<LanguageDefinition> {
    vec![
        cpp(),
        java(),
        rust(),
        kotlin(),
        go(),
        bash(),
        python(),
        plain_text(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_validate() {
        for def in all() {
            def.validate()
                .unwrap_or_else(|e| panic!("{} failed validation: {e}", def.name));
        }
    }

    #[test]
    fn test_kotlin_overrides_indent_unit() {
        let options = kotlin().indent.options().unwrap();
        assert_eq!(options.text(keys::INDENT_UNIT), Some("    "));
    }
}

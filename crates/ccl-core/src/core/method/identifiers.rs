use phf::{Set, phf_set};

static CPP_KEYWORDS: Set<&'static str> = phf_set! {
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "compl", "concept",
    "const", "consteval", "constexpr", "constinit", "const_cast", "continue", "co_await",
    "co_return", "co_yield", "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern", "false", "float", "for", "friend", "goto",
    "if", "inline", "int", "long", "mutable", "namespace", "new", "noexcept", "not", "not_eq",
    "nullptr", "operator", "or", "or_eq", "private", "protected", "public", "register",
    "reinterpret_cast", "requires", "return", "short", "signed", "sizeof", "static",
    "static_assert", "static_cast", "struct", "switch", "template", "this", "thread_local",
    "throw", "true", "try", "typedef", "typeid", "typename", "union", "unsigned", "using",
    "virtual", "void", "volatile", "wchar_t", "while", "xor", "xor_eq",
};

// Locals declared by every implementation skeleton around the code fragment.
static RESERVED_LOCALS: Set<&'static str> = phf_set! {
    "n", "m", "molecule", "q", "_q", "results", "method",
};

// Members every generated class declares; unscoped enumerators share their scope.
static RESERVED_MEMBERS: Set<&'static str> = phf_set! {
    "calculate_charges", "get_requirements",
};

pub fn is_keyword(word: &str) -> bool {
    CPP_KEYWORDS.contains(word)
}

pub fn is_reserved_local(word: &str) -> bool {
    RESERVED_LOCALS.contains(word)
}

pub fn is_reserved_member(word: &str) -> bool {
    RESERVED_MEMBERS.contains(word)
}

/// Returns `true` if `word` is a plain C++ identifier that is not a keyword.
pub fn is_identifier(word: &str) -> bool {
    let mut chars = word.chars();
    let starts_well = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_well && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !is_keyword(word)
}

/// Like [`is_identifier`], but also accepts namespace-qualified names such as `ns::Base`.
pub fn is_qualified_identifier(word: &str) -> bool {
    let word = word.strip_prefix("::").unwrap_or(word);
    !word.is_empty() && word.split("::").all(is_identifier)
}

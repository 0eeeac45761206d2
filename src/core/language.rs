use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub display_name: &'static str,
    pub focus_areas: &'static [&'static str],
    pub highlight_tag: &'static str,
}

impl LanguageInfo {
    pub fn is_unknown(&self) -> bool {
        *self == UNKNOWN
    }
}

pub const UNKNOWN: LanguageInfo = LanguageInfo {
    display_name: "Unknown",
    focus_areas: &["general code quality", "security", "best practices"],
    highlight_tag: "",
};

pub const DOCKERFILE: LanguageInfo = LanguageInfo {
    display_name: "Dockerfile",
    focus_areas: &[
        "security",
        "layer optimization",
        "non-root user",
        "secrets",
        "multi-stage builds",
    ],
    highlight_tag: "dockerfile",
};

const PYTHON: LanguageInfo = LanguageInfo {
    display_name: "Python",
    focus_areas: &[
        "PEP 8 style",
        "type hints",
        "exception handling",
        "mutable default arguments",
        "resource management with context managers",
    ],
    highlight_tag: "python",
};

const JAVASCRIPT: LanguageInfo = LanguageInfo {
    display_name: "JavaScript",
    focus_areas: &[
        "async/await and promise handling",
        "null and undefined checks",
        "equality semantics",
        "XSS and injection risks",
        "closure and scope pitfalls",
    ],
    highlight_tag: "javascript",
};

const TYPESCRIPT: LanguageInfo = LanguageInfo {
    display_name: "TypeScript",
    focus_areas: &[
        "type safety and avoiding any",
        "strict null checks",
        "async/await and promise handling",
        "interface and type design",
        "XSS and injection risks",
    ],
    highlight_tag: "typescript",
};

const RUST: LanguageInfo = LanguageInfo {
    display_name: "Rust",
    focus_areas: &[
        "ownership",
        "lifetimes",
        "Result/Option handling",
        "unsafe blocks",
        "error propagation",
    ],
    highlight_tag: "rust",
};

const GO: LanguageInfo = LanguageInfo {
    display_name: "Go",
    focus_areas: &[
        "error handling",
        "goroutine leaks",
        "channel usage",
        "context propagation",
        "defer semantics",
    ],
    highlight_tag: "go",
};

const JAVA: LanguageInfo = LanguageInfo {
    display_name: "Java",
    focus_areas: &[
        "null safety",
        "exception handling",
        "resource management with try-with-resources",
        "thread safety",
        "collections usage",
    ],
    highlight_tag: "java",
};

const KOTLIN: LanguageInfo = LanguageInfo {
    display_name: "Kotlin",
    focus_areas: &[
        "null safety",
        "coroutine scoping",
        "immutability",
        "idiomatic scope functions",
    ],
    highlight_tag: "kotlin",
};

const SWIFT: LanguageInfo = LanguageInfo {
    display_name: "Swift",
    focus_areas: &[
        "optional handling",
        "retain cycles",
        "value vs reference semantics",
        "error handling",
    ],
    highlight_tag: "swift",
};

const C: LanguageInfo = LanguageInfo {
    display_name: "C",
    focus_areas: &[
        "memory management",
        "buffer overflows",
        "undefined behavior",
        "pointer validity",
        "integer overflow",
    ],
    highlight_tag: "c",
};

const CPP: LanguageInfo = LanguageInfo {
    display_name: "C++",
    focus_areas: &[
        "RAII and resource management",
        "smart pointers",
        "undefined behavior",
        "move semantics",
        "exception safety",
    ],
    highlight_tag: "cpp",
};

const CSHARP: LanguageInfo = LanguageInfo {
    display_name: "C#",
    focus_areas: &[
        "async/await usage",
        "IDisposable and using statements",
        "null reference handling",
        "LINQ performance",
    ],
    highlight_tag: "csharp",
};

const RUBY: LanguageInfo = LanguageInfo {
    display_name: "Ruby",
    focus_areas: &[
        "idiomatic Ruby",
        "nil handling",
        "N+1 queries",
        "mass assignment and injection risks",
    ],
    highlight_tag: "ruby",
};

const PHP: LanguageInfo = LanguageInfo {
    display_name: "PHP",
    focus_areas: &[
        "SQL injection",
        "XSS",
        "type declarations",
        "error handling",
    ],
    highlight_tag: "php",
};

const SCALA: LanguageInfo = LanguageInfo {
    display_name: "Scala",
    focus_areas: &[
        "immutability",
        "Option and Either handling",
        "implicit usage",
        "concurrency with futures",
    ],
    highlight_tag: "scala",
};

const SHELL: LanguageInfo = LanguageInfo {
    display_name: "Shell",
    focus_areas: &[
        "quoting and word splitting",
        "error handling with set -euo pipefail",
        "command injection",
        "portability",
    ],
    highlight_tag: "bash",
};

const SQL: LanguageInfo = LanguageInfo {
    display_name: "SQL",
    focus_areas: &[
        "injection risks",
        "index usage",
        "query performance",
        "transaction boundaries",
    ],
    highlight_tag: "sql",
};

const YAML: LanguageInfo = LanguageInfo {
    display_name: "YAML",
    focus_areas: &[
        "indentation and structure",
        "hardcoded secrets",
        "configuration correctness",
    ],
    highlight_tag: "yaml",
};

const JSON: LanguageInfo = LanguageInfo {
    display_name: "JSON",
    focus_areas: &[
        "schema consistency",
        "hardcoded secrets",
        "configuration correctness",
    ],
    highlight_tag: "json",
};

const TOML: LanguageInfo = LanguageInfo {
    display_name: "TOML",
    focus_areas: &[
        "dependency versions",
        "configuration correctness",
        "hardcoded secrets",
    ],
    highlight_tag: "toml",
};

const MARKDOWN: LanguageInfo = LanguageInfo {
    display_name: "Markdown",
    focus_areas: &["clarity", "accuracy", "broken links", "formatting"],
    highlight_tag: "markdown",
};

const HTML: LanguageInfo = LanguageInfo {
    display_name: "HTML",
    focus_areas: &["accessibility", "semantic markup", "XSS risks"],
    highlight_tag: "html",
};

const CSS: LanguageInfo = LanguageInfo {
    display_name: "CSS",
    focus_areas: &["specificity", "responsiveness", "maintainability"],
    highlight_tag: "css",
};

const TERRAFORM: LanguageInfo = LanguageInfo {
    display_name: "Terraform",
    focus_areas: &[
        "least-privilege IAM",
        "hardcoded secrets",
        "state and drift risks",
        "resource tagging",
    ],
    highlight_tag: "hcl",
};

const DART: LanguageInfo = LanguageInfo {
    display_name: "Dart",
    focus_areas: &[
        "null safety",
        "async handling",
        "widget rebuild performance",
    ],
    highlight_tag: "dart",
};

const LUA: LanguageInfo = LanguageInfo {
    display_name: "Lua",
    focus_areas: &["global variable leaks", "nil handling", "table usage"],
    highlight_tag: "lua",
};

const EXTENSIONS: &[(&str, LanguageInfo)] = &[
    ("py", PYTHON),
    ("js", JAVASCRIPT),
    ("jsx", JAVASCRIPT),
    ("mjs", JAVASCRIPT),
    ("ts", TYPESCRIPT),
    ("tsx", TYPESCRIPT),
    ("rs", RUST),
    ("go", GO),
    ("java", JAVA),
    ("kt", KOTLIN),
    ("kts", KOTLIN),
    ("swift", SWIFT),
    ("c", C),
    ("h", C),
    ("cpp", CPP),
    ("cc", CPP),
    ("cxx", CPP),
    ("hpp", CPP),
    ("cs", CSHARP),
    ("rb", RUBY),
    ("php", PHP),
    ("scala", SCALA),
    ("sh", SHELL),
    ("bash", SHELL),
    ("sql", SQL),
    ("yml", YAML),
    ("yaml", YAML),
    ("json", JSON),
    ("toml", TOML),
    ("md", MARKDOWN),
    ("html", HTML),
    ("css", CSS),
    ("scss", CSS),
    ("tf", TERRAFORM),
    ("dart", DART),
    ("lua", LUA),
];

pub fn classify(file_name: &str) -> LanguageInfo {
    if file_name.contains("Dockerfile") {
        return DOCKERFILE;
    }

    let Some(extension) = extension_of(file_name) else {
        return UNKNOWN;
    };

    EXTENSIONS
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, info)| *info)
        .unwrap_or(UNKNOWN)
}

fn extension_of(file_name: &str) -> Option<String> {
    let base = file_name.rsplit('/').next().unwrap_or(file_name);
    let (_, ext) = base.rsplit_once('.')?;
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_lowercase())
    }
}

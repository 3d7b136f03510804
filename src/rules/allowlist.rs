//! Closed lookup tables for R-UNDEFINED and R-UNSAFE (spec §4.4, §6).
//!
//! Built once behind `OnceLock`, the same pattern the repo's own
//! Python analyzer uses for its stdlib module set.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use crate::types::Severity;

/// C standard library functions assumed always-defined for R-UNDEFINED,
/// even when no header is parsed for their declaration.
const C_STDLIB: &[&str] = &[
    "printf", "fprintf", "sprintf", "snprintf", "scanf", "fscanf", "sscanf", "puts", "putchar",
    "getchar", "fopen", "fclose", "fread", "fwrite", "fseek", "ftell", "rewind", "feof", "ferror",
    "malloc", "calloc", "realloc", "free", "memcpy", "memmove", "memset", "memcmp", "strlen",
    "strcpy", "strncpy", "strcat", "strncat", "strcmp", "strncmp", "strchr", "strrchr", "strstr",
    "strtok", "strdup", "atoi", "atol", "atof", "strtol", "strtoul", "strtod", "abs", "labs",
    "rand", "srand", "exit", "abort", "assert", "qsort", "bsearch", "sizeof", "isalpha", "isdigit",
    "isspace", "isupper", "islower", "toupper", "tolower", "sin", "cos", "tan", "sqrt", "pow",
    "floor", "ceil", "fabs", "exp", "log", "log10", "main",
];

/// Python builtins assumed always-defined for R-UNDEFINED.
const PY_BUILTINS: &[&str] = &[
    "print", "len", "range", "int", "float", "str", "bool", "list", "tuple", "dict", "set",
    "frozenset", "bytes", "bytearray", "type", "isinstance", "issubclass", "super", "object",
    "open", "input", "enumerate", "zip", "map", "filter", "sorted", "reversed", "sum", "min",
    "max", "abs", "round", "pow", "divmod", "all", "any", "next", "iter", "hasattr", "getattr",
    "setattr", "delattr", "repr", "format", "id", "hash", "callable", "vars", "dir", "globals",
    "locals", "staticmethod", "classmethod", "property", "exec", "eval", "compile", "__import__",
    "None", "True", "False", "self", "cls", "NotImplemented", "Exception", "ValueError",
    "TypeError", "KeyError", "IndexError", "AttributeError", "StopIteration", "RuntimeError",
    "OSError", "FileNotFoundError", "ZeroDivisionError",
];

pub(crate) fn c_stdlib() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| C_STDLIB.iter().copied().collect())
}

pub(crate) fn python_builtins() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| PY_BUILTINS.iter().copied().collect())
}

pub(crate) struct UnsafeFnInfo {
    pub severity: Severity,
    pub rationale: &'static str,
    pub replacement: &'static str,
}

/// `(name, rationale, replacement)`; severity is `Error` only for
/// `gets`, `Warning` for everything else (spec §4.4 R-UNSAFE).
const UNSAFE_FUNCTIONS: &[(&str, &str, &str)] = &[
    ("gets", "cannot bound the input length, classic buffer overflow vector", "fgets"),
    ("strcpy", "does not bound the copy length", "strncpy or strlcpy"),
    ("strcat", "does not bound the concatenated length", "strncat or strlcat"),
    ("sprintf", "does not bound the formatted output length", "snprintf"),
    ("vsprintf", "does not bound the formatted output length", "vsnprintf"),
    ("scanf", "%s conversion has no field width by default", "fgets + sscanf with width limits"),
    ("sscanf", "%s conversion has no field width by default", "sscanf with explicit width limits"),
    ("fscanf", "%s conversion has no field width by default", "fgets + sscanf with width limits"),
    ("strtok", "uses hidden static state, not reentrant", "strtok_r"),
    ("rand", "not cryptographically secure and low-entropy on some platforms", "arc4random or a CSPRNG"),
    ("tmpnam", "race between name generation and file creation", "mkstemp"),
    ("tempnam", "race between name generation and file creation", "mkstemp"),
    ("mktemp", "race between name generation and file use", "mkstemp"),
    ("gethostbyname", "not thread-safe, deprecated by getaddrinfo", "getaddrinfo"),
    ("gethostbyaddr", "not thread-safe, deprecated by getnameinfo", "getnameinfo"),
    ("getpass", "deprecated, terminal handling is platform-specific", "termios-based manual prompt"),
    ("system", "invokes a shell, vulnerable to injection via unsanitized input", "fork/exec or posix_spawn"),
    ("popen", "invokes a shell, vulnerable to injection via unsanitized input", "fork/exec or posix_spawn"),
    ("execlp", "searches PATH, can run an attacker-controlled binary", "execve with an absolute path"),
    ("execvp", "searches PATH, can run an attacker-controlled binary", "execve with an absolute path"),
    ("atoi", "no error reporting on malformed input", "strtol with errno checking"),
    ("atol", "no error reporting on malformed input", "strtol with errno checking"),
    ("atof", "no error reporting on malformed input", "strtod with errno checking"),
    ("realpath", "fixed-size output buffer on some platforms can overflow", "realpath with PATH_MAX-sized buffer and return checked"),
    ("getwd", "unbounded write into caller's buffer", "getcwd"),
    ("strncpy", "does not guarantee null-termination if source is too long", "strlcpy or manual bounds check"),
    ("strncat", "size argument is remaining space, a common off-by-one source", "strlcat or manual bounds check"),
    ("memccpy", "partial-copy semantics are easy to misuse", "explicit memcpy with a checked length"),
    ("bcopy", "deprecated BSD alias, undefined overlap behavior", "memmove"),
    ("bzero", "deprecated BSD alias", "memset"),
    ("index", "deprecated BSD alias for strchr", "strchr"),
    ("rindex", "deprecated BSD alias for strrchr", "strrchr"),
    ("asctime", "writes into a shared static buffer, not reentrant", "asctime_r or strftime"),
    ("ctime", "writes into a shared static buffer, not reentrant", "ctime_r or strftime"),
    ("gmtime", "writes into a shared static buffer, not reentrant", "gmtime_r"),
    ("localtime", "writes into a shared static buffer, not reentrant", "localtime_r"),
    ("ttyname", "writes into a shared static buffer, not reentrant", "ttyname_r"),
    ("getlogin", "writes into a shared static buffer, not reentrant", "getlogin_r"),
    ("crypt", "uses DES internally on many platforms, trivially brute-forced", "a modern KDF such as argon2 or bcrypt"),
    ("setjmp", "interacts badly with stack unwinding and C++/RAII-style resources", "structured error handling"),
    ("longjmp", "can jump past destructors/cleanup, undefined behavior if misused", "structured error handling"),
    ("alloca", "stack allocation with no overflow check, can blow the stack", "a bounded heap allocation"),
    ("gets_s", "bounds argument is easy to pass incorrectly, still fragile", "fgets"),
    ("vsnprintf", "format string must be trusted input", "validate the format string is a compile-time literal"),
    ("wcscpy", "does not bound the copy length (wide-char strcpy)", "wcsncpy with explicit bounds"),
    ("wcscat", "does not bound the concatenated length (wide-char strcat)", "wcsncat with explicit bounds"),
    ("swprintf", "platform-dependent bounds semantics for the size argument", "snprintf with careful width accounting"),
    ("getenv", "returned pointer may be invalidated by a later setenv call", "copy the value out immediately after the call"),
    ("putenv", "takes ownership of the passed buffer, easy to misuse with locals", "setenv"),
    ("tmpfile", "may collide with predictable names on some platforms", "mkstemp followed by fdopen"),
    ("vfork", "shares the parent's address space until exec, easy to corrupt", "fork or posix_spawn"),
    ("strerror", "writes into a shared static buffer, not reentrant", "strerror_r"),
    ("sprintf_s", "bounds argument is easy to pass incorrectly", "snprintf"),
    ("strcpy_s", "bounds argument is easy to pass incorrectly", "strncpy with explicit bounds"),
    ("freopen", "silently closes the prior stream, error handling is easy to skip", "explicit fclose then fopen"),
    ("setbuf", "cannot report buffer-allocation failure", "setvbuf"),
    ("fflush", "passing a stream opened for reading is undefined on some platforms", "fpurge or platform-specific flush"),
    ("getc_unlocked", "skips locking, unsafe if the stream is shared across threads", "getc"),
    ("putc_unlocked", "skips locking, unsafe if the stream is shared across threads", "putc"),
    ("tmpfile64", "same predictable-name races as tmpfile on affected platforms", "mkstemp followed by fdopen"),
    ("scanf_s", "bounds argument is easy to pass incorrectly, still fragile", "fgets + sscanf with width limits"),
    ("wscanf", "%s-equivalent conversions have no field width by default", "fgetws + swscanf with width limits"),
    ("getopt", "relies on process-global state, not reentrant across threads", "getopt_long with explicit state, single-threaded use only"),
];

pub(crate) fn unsafe_functions() -> &'static HashMap<&'static str, UnsafeFnInfo> {
    static MAP: OnceLock<HashMap<&'static str, UnsafeFnInfo>> = OnceLock::new();
    MAP.get_or_init(|| {
        UNSAFE_FUNCTIONS
            .iter()
            .map(|(name, rationale, replacement)| {
                let severity = if *name == "gets" { Severity::Error } else { Severity::Warning };
                (*name, UnsafeFnInfo { severity, rationale, replacement })
            })
            .collect()
    })
}

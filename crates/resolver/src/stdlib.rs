//! Standard library membership.

use crate::error::{ResolveError, Result};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::process::Command;

/// Package list (Go 1.24) used when the toolchain cannot be asked
const EMBEDDED_STD: &[&str] = &[
    "archive/tar",
    "archive/zip",
    "bufio",
    "builtin",
    "bytes",
    "cmp",
    "compress/bzip2",
    "compress/flate",
    "compress/gzip",
    "compress/lzw",
    "compress/zlib",
    "container/heap",
    "container/list",
    "container/ring",
    "context",
    "crypto/aes",
    "crypto/cipher",
    "crypto/des",
    "crypto/dsa",
    "crypto/ecdh",
    "crypto/ecdsa",
    "crypto/ed25519",
    "crypto/elliptic",
    "crypto/fips140",
    "crypto/hkdf",
    "crypto/hmac",
    "crypto/md5",
    "crypto/mlkem",
    "crypto/pbkdf2",
    "crypto/rand",
    "crypto/rc4",
    "crypto/rsa",
    "crypto/sha1",
    "crypto/sha256",
    "crypto/sha3",
    "crypto/sha512",
    "crypto/subtle",
    "crypto/tls",
    "crypto/x509/pkix",
    "database/sql/driver",
    "debug/buildinfo",
    "debug/dwarf",
    "debug/elf",
    "debug/gosym",
    "debug/macho",
    "debug/pe",
    "debug/plan9obj",
    "embed",
    "encoding/ascii85",
    "encoding/asn1",
    "encoding/base32",
    "encoding/base64",
    "encoding/binary",
    "encoding/csv",
    "encoding/gob",
    "encoding/hex",
    "encoding/json",
    "encoding/pem",
    "encoding/xml",
    "errors",
    "expvar",
    "flag",
    "fmt",
    "go/ast",
    "go/build/constraint",
    "go/constant",
    "go/doc/comment",
    "go/format",
    "go/importer",
    "go/parser",
    "go/printer",
    "go/scanner",
    "go/token",
    "go/types",
    "go/version",
    "hash/adler32",
    "hash/crc32",
    "hash/crc64",
    "hash/fnv",
    "hash/maphash",
    "html/template",
    "image/color/palette",
    "image/draw",
    "image/gif",
    "image/jpeg",
    "image/png",
    "index/suffixarray",
    "io/fs",
    "io/ioutil",
    "iter",
    "log/slog",
    "log/syslog",
    "maps",
    "math/big",
    "math/bits",
    "math/cmplx",
    "math/rand/v2",
    "mime/multipart",
    "mime/quotedprintable",
    "net/http/cgi",
    "net/http/cookiejar",
    "net/http/fcgi",
    "net/http/httptest",
    "net/http/httptrace",
    "net/http/httputil",
    "net/http/pprof",
    "net/mail",
    "net/netip",
    "net/rpc/jsonrpc",
    "net/smtp",
    "net/textproto",
    "net/url",
    "os/exec",
    "os/signal",
    "os/user",
    "path/filepath",
    "plugin",
    "reflect",
    "regexp/syntax",
    "runtime/cgo",
    "runtime/coverage",
    "runtime/debug",
    "runtime/metrics",
    "runtime/pprof",
    "runtime/race",
    "runtime/trace",
    "slices",
    "sort",
    "strconv",
    "strings",
    "sync/atomic",
    "syscall/js",
    "testing/fstest",
    "testing/iotest",
    "testing/quick",
    "testing/slogtest",
    "testing/synctest",
    "text/scanner",
    "text/tabwriter",
    "text/template/parse",
    "time/tzdata",
    "unicode/utf16",
    "unicode/utf8",
    "unique",
    "unsafe",
    "weak",
];

static GLOBAL: OnceCell<StdLib> = OnceCell::new();

/// Import paths shipped with the toolchain, expanded to every `/` prefix
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StdLib {
    members: HashSet<String>,
}

impl StdLib {
    /// Build from listed package paths. Paths under `vendor/` are skipped.
    pub fn from_paths<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut members = HashSet::new();
        members.insert("builtin".to_string());
        for path in paths {
            let path = path.as_ref().trim();
            if path.is_empty() || path.starts_with("vendor/") {
                continue;
            }
            let mut prefix = path;
            loop {
                members.insert(prefix.to_string());
                match prefix.rfind('/') {
                    Some(idx) => prefix = &prefix[..idx],
                    None => break,
                }
            }
        }
        Self { members }
    }

    /// The built-in table
    pub fn embedded() -> Self {
        Self::from_paths(EMBEDDED_STD)
    }

    /// Ask `<go_bin> list std`
    pub fn from_toolchain(go_bin: &str) -> Result<Self> {
        let output = Command::new(go_bin)
            .args(["list", "std"])
            .output()
            .map_err(|e| ResolveError::StdLibList(format!("{go_bin} list std: {e}")))?;
        if !output.status.success() {
            return Err(ResolveError::StdLibList(format!(
                "{go_bin} list std exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        let std = Self::from_paths(stdout.lines());
        if std.members.len() <= 1 {
            return Err(ResolveError::StdLibList(format!(
                "{go_bin} list std returned no packages"
            )));
        }
        Ok(std)
    }

    /// Toolchain listing, or the embedded table if that fails
    pub fn detect(go_bin: &str) -> Self {
        match Self::from_toolchain(go_bin) {
            Ok(std) => {
                log::debug!("Loaded {} standard library paths from {go_bin}", std.len());
                std
            }
            Err(err) => {
                log::warn!("{err}; using embedded standard library table");
                Self::embedded()
            }
        }
    }

    /// Process-wide set, detected on first use
    pub fn global(go_bin: &str) -> &'static StdLib {
        GLOBAL.get_or_init(|| Self::detect(go_bin))
    }

    /// True when `import_path` or any of its `/` prefixes is a member
    pub fn contains(&self, import_path: &str) -> bool {
        let mut prefix = import_path;
        loop {
            if self.members.contains(prefix) {
                return true;
            }
            match prefix.rfind('/') {
                Some(idx) => prefix = &prefix[..idx],
                None => return false,
            }
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

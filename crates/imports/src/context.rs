//! Build context: the target platform and tag set a package is read under.

/// Default highest `go1.N` release tag considered satisfied
pub const GO_RELEASE_MINOR: u32 = 24;

/// Operating systems recognised in `_GOOS` file name suffixes
pub const KNOWN_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "js", "linux",
    "nacl", "netbsd", "openbsd", "plan9", "solaris", "wasip1", "windows", "zos",
];

/// Architectures recognised in `_GOARCH` file name suffixes
pub const KNOWN_ARCH: &[&str] = &[
    "386",
    "amd64",
    "amd64p32",
    "arm",
    "armbe",
    "arm64",
    "arm64be",
    "loong64",
    "mips",
    "mipsle",
    "mips64",
    "mips64le",
    "mips64p32",
    "mips64p32le",
    "ppc",
    "ppc64",
    "ppc64le",
    "riscv",
    "riscv64",
    "s390",
    "s390x",
    "sparc",
    "sparc64",
    "wasm",
];

const UNIX_OS: &[&str] = &[
    "aix", "android", "darwin", "dragonfly", "freebsd", "hurd", "illumos", "ios", "linux",
    "netbsd", "openbsd", "solaris",
];

/// Target platform and tags used to decide which files belong to a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildContext {
    /// Target operating system (`GOOS`)
    pub goos: String,

    /// Target architecture (`GOARCH`)
    pub goarch: String,

    /// Whether files importing "C" are buildable
    pub cgo_enabled: bool,

    /// Compiler name, satisfied as a tag
    pub compiler: String,

    /// Extra user tags (`-tags`)
    pub tags: Vec<String>,
    /// `go1.N` tags up to this minor hold
    pub release_minor: u32,
}

impl Default for BuildContext {
    fn default() -> Self {
        Self::host()
    }
}

impl BuildContext {
    /// Context for the machine this binary was compiled for
    pub fn host() -> Self {
        let goos = host_goos().to_string();
        let goarch = host_goarch().to_string();
        Self {
            goos,
            goarch,
            cgo_enabled: true,
            compiler: "gc".to_string(),
            tags: Vec::new(),
            release_minor: GO_RELEASE_MINOR,
        }
    }

    /// Context for an explicit target platform
    pub fn for_target(goos: impl Into<String>, goarch: impl Into<String>) -> Self {
        Self {
            goos: goos.into(),
            goarch: goarch.into(),
            ..Self::host()
        }
    }

    /// Add a space-separated tag list; blank input adds nothing
    pub fn with_tags(mut self, tags: &str) -> Self {
        self.tags
            .extend(tags.split_whitespace().map(|tag| tag.to_string()));
        self
    }

    pub fn with_cgo(mut self, enabled: bool) -> Self {
        self.cgo_enabled = enabled;
        self
    }

    /// Match the release tags of the installed toolchain
    pub fn with_release_minor(mut self, minor: u32) -> Self {
        self.release_minor = minor;
        self
    }

    /// Whether a single build tag holds in this context
    pub fn matches_tag(&self, tag: &str) -> bool {
        if tag.is_empty() {
            return false;
        }
        if tag == self.goos || tag == self.goarch || tag == self.compiler {
            return true;
        }
        match tag {
            "cgo" => return self.cgo_enabled,
            "unix" => return UNIX_OS.contains(&self.goos.as_str()),
            "linux" if self.goos == "android" => return true,
            "solaris" if self.goos == "illumos" => return true,
            "darwin" if self.goos == "ios" => return true,
            _ => {}
        }
        if let Some(minor) = release_minor(tag) {
            return minor <= self.release_minor;
        }
        self.tags.iter().any(|t| t == tag)
    }

    /// Check the `_GOOS`, `_GOARCH` and `_GOOS_GOARCH` file name suffixes.
    ///
    /// A trailing `_test` is ignored, as is everything before the first `_`.
    pub fn matches_file_name(&self, file_name: &str) -> bool {
        let stem = file_name.split('.').next().unwrap_or(file_name);
        let Some(idx) = stem.find('_') else {
            return true;
        };
        let mut parts: Vec<&str> = stem[idx..].split('_').collect();
        if parts.last() == Some(&"test") {
            parts.pop();
        }
        let n = parts.len();
        if n >= 2 && KNOWN_OS.contains(&parts[n - 2]) && KNOWN_ARCH.contains(&parts[n - 1]) {
            return self.matches_tag(parts[n - 2]) && self.matches_tag(parts[n - 1]);
        }
        if n >= 1 && (KNOWN_OS.contains(&parts[n - 1]) || KNOWN_ARCH.contains(&parts[n - 1])) {
            return self.matches_tag(parts[n - 1]);
        }
        true
    }
}

fn release_minor(tag: &str) -> Option<u32> {
    tag.strip_prefix("go1.")?.parse().ok()
}

fn host_goos() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

fn host_goarch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "loongarch64" => "loong64",
        "powerpc" => "ppc",
        "powerpc64" if cfg!(target_endian = "little") => "ppc64le",
        "powerpc64" => "ppc64",
        "wasm32" => "wasm",
        "mips64" if cfg!(target_endian = "little") => "mips64le",
        "mips" if cfg!(target_endian = "little") => "mipsle",
        other => other,
    }
}

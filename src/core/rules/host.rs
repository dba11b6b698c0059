use std::fmt;

/// Operating system family, named the way release metadata names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Osx,
    Linux,
}

impl OsFamily {
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            OsFamily::Windows
        } else if cfg!(target_os = "macos") {
            OsFamily::Osx
        } else {
            OsFamily::Linux
        }
    }

    /// Identifier used by `os.name` rule predicates and `natives` maps.
    pub fn metadata_name(self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Osx => "osx",
            OsFamily::Linux => "linux",
        }
    }
}

/// Pointer width of the host, substituted for `${arch}` in native classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerWidth {
    Bits32,
    Bits64,
}

impl PointerWidth {
    pub fn current() -> Self {
        if cfg!(target_pointer_width = "64") {
            PointerWidth::Bits64
        } else {
            PointerWidth::Bits32
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            PointerWidth::Bits32 => "32",
            PointerWidth::Bits64 => "64",
        }
    }
}

/// Immutable description of the machine the launcher runs on.
///
/// Built once per process and passed to every component that filters
/// metadata by platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostDescriptor {
    pub os: OsFamily,
    pub width: PointerWidth,
}

impl HostDescriptor {
    pub fn new(os: OsFamily, width: PointerWidth) -> Self {
        Self { os, width }
    }

    pub fn current() -> Self {
        Self::new(OsFamily::current(), PointerWidth::current())
    }

    /// Separator used for classpath and library-path lists.
    pub fn path_list_separator(&self) -> &'static str {
        match self.os {
            OsFamily::Windows => ";",
            _ => ":",
        }
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os.metadata_name(), self.width.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_follows_os() {
        let win = HostDescriptor::new(OsFamily::Windows, PointerWidth::Bits64);
        let linux = HostDescriptor::new(OsFamily::Linux, PointerWidth::Bits64);
        assert_eq!(win.path_list_separator(), ";");
        assert_eq!(linux.path_list_separator(), ":");
        assert_eq!(win.to_string(), "windows-64");
    }
}

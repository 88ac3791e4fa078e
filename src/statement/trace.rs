//! Call-site trace comments prepended to generated SQL.

use serde::{Deserialize, Serialize};

/// The source location that triggered a statement, rendered as a leading
/// SQL comment so server-side logs point back at application code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
    pub member: &'static str,
}

impl CallSite {
    pub fn new(file: &'static str, line: u32, member: &'static str) -> Self {
        Self { file, line, member }
    }

    /// Render as `/* file.rs:42 member() */`, keeping only the basename.
    pub fn comment(&self) -> String {
        let base = self
            .file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file);
        format!("/* {}:{} {}() */", base, self.line, self.member)
    }
}

/// Capture the current call site for statement tracing.
#[macro_export]
macro_rules! call_site {
    ($member:expr) => {
        $crate::statement::CallSite::new(file!(), line!(), $member)
    };
    () => {
        $crate::statement::CallSite::new(file!(), line!(), module_path!())
    };
}

#[cfg(test)]
mod tests {
    use super::CallSite;

    #[test]
    fn comment_keeps_basename_only() {
        let site = CallSite::new("src/handlers/users.rs", 25, "find_user");
        assert_eq!(site.comment(), "/* users.rs:25 find_user() */");
        let windows = CallSite::new("src\\handlers\\users.rs", 7, "list");
        assert_eq!(windows.comment(), "/* users.rs:7 list() */");
    }
}

// ─── Command Line ───
// Ordered argv for the runtime plus its rendering as one quoted string.

use std::borrow::Cow;
use std::path::PathBuf;

/// A fully composed launch, ready for the spawner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    /// Prepended to the platform's native library search variable.
    pub natives_dir: PathBuf,
}

impl LaunchPlan {
    /// `program` followed by `args`.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.to_string_lossy().into_owned())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Single-string form with every token quoted for the Windows argv parser.
    pub fn command_line(&self) -> String {
        self.argv()
            .iter()
            .map(|arg| quote_argument(arg))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote one token so that the Windows argv parser yields it back unchanged.
///
/// Tokens that are non-empty and contain neither whitespace nor `"` are
/// returned as-is. Otherwise the token is wrapped in quotes; a run of N
/// backslashes followed by `"` becomes 2N+1 backslashes and the escaped quote,
/// a run at the end becomes 2N, and any other run is kept literally.
pub fn quote_argument(arg: &str) -> Cow<'_, str> {
    if !arg.is_empty() && !arg.chars().any(|c| c.is_whitespace() || c == '"') {
        return Cow::Borrowed(arg);
    }

    let mut out = String::with_capacity(arg.len() + 2);
    out.push('"');
    let mut backslashes = 0usize;
    for c in arg.chars() {
        match c {
            '\\' => backslashes += 1,
            '"' => {
                push_backslashes(&mut out, backslashes * 2 + 1);
                out.push('"');
                backslashes = 0;
            }
            _ => {
                push_backslashes(&mut out, backslashes);
                out.push(c);
                backslashes = 0;
            }
        }
    }
    push_backslashes(&mut out, backslashes * 2);
    out.push('"');
    Cow::Owned(out)
}

fn push_backslashes(out: &mut String, count: usize) {
    out.extend(std::iter::repeat('\\').take(count));
}

/// Inverse of [`quote_argument`] over a whole line, following the rules of
/// `CommandLineToArgvW`.
#[cfg(test)]
pub(crate) fn split_windows_argv(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = line.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        if chars.peek().is_none() {
            return args;
        }

        let mut current = String::new();
        let mut in_quotes = false;
        loop {
            let mut backslashes = 0usize;
            while chars.peek() == Some(&'\\') {
                backslashes += 1;
                chars.next();
            }

            match chars.peek().copied() {
                Some('"') => {
                    push_backslashes(&mut current, backslashes / 2);
                    chars.next();
                    if backslashes % 2 == 1 {
                        current.push('"');
                    } else {
                        in_quotes = !in_quotes;
                    }
                }
                Some(c) if c.is_whitespace() && !in_quotes => {
                    push_backslashes(&mut current, backslashes);
                    break;
                }
                None => {
                    push_backslashes(&mut current, backslashes);
                    break;
                }
                Some(c) => {
                    push_backslashes(&mut current, backslashes);
                    current.push(c);
                    chars.next();
                }
            }
        }
        args.push(current);
    }
}

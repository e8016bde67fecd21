//! Structured shell command builder
//!
//! Commands are kept as ordered token lists and only rendered to a
//! single `sh` command line when they reach a [`Shell`](crate::Shell).

use std::fmt;
use std::path::Path;

/// A single command-line token
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// Emitted verbatim (program names, flags, literal subcommands)
    Bare(String),
    /// Emitted inside double quotes
    Quoted(String),
}

impl Token {
    fn value(&self) -> &str {
        match self {
            Token::Bare(s) | Token::Quoted(s) => s,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Bare(s) => f.write_str(s),
            Token::Quoted(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    if matches!(c, '"' | '\\' | '$' | '`') {
                        f.write_str("\\")?;
                    }
                    write!(f, "{}", c)?;
                }
                f.write_str("\"")
            }
        }
    }
}

/// Shell command assembled from flags and values
///
/// A command is one or more pipeline segments; most commands have exactly one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    segments: Vec<Vec<Token>>,
}

impl ShellCommand {
    /// Start a command with a bare program name found on `PATH`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            segments: vec![vec![Token::Bare(program.into())]],
        }
    }

    /// Start a command with a program given by path
    pub fn program(path: impl AsRef<Path>) -> Self {
        Self {
            segments: vec![vec![Token::Quoted(
                path.as_ref().to_string_lossy().into_owned(),
            )]],
        }
    }

    fn current(&mut self) -> &mut Vec<Token> {
        // segments is never empty; every constructor seeds one
        let last = self.segments.len() - 1;
        &mut self.segments[last]
    }

    /// Append a bare token (flag or literal word)
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.current().push(Token::Bare(arg.into()));
        self
    }

    /// Append several bare tokens
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segment = self.current();
        segment.extend(args.into_iter().map(|a| Token::Bare(a.into())));
        self
    }

    /// Append a quoted value
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.current().push(Token::Quoted(value.into()));
        self
    }

    /// Append a path as a quoted value
    pub fn path(self, path: impl AsRef<Path>) -> Self {
        let value = path.as_ref().to_string_lossy().into_owned();
        self.value(value)
    }

    /// Append `name "value"`
    pub fn option(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arg(name).value(value)
    }

    /// Append `name` only when `enabled`
    pub fn flag_if(self, name: impl Into<String>, enabled: bool) -> Self {
        if enabled { self.arg(name) } else { self }
    }

    /// Pipe this command's stdout into `next`
    pub fn pipe(mut self, next: ShellCommand) -> Self {
        self.segments.extend(next.segments);
        self
    }

    /// Run this command through a wrapper program (`wrapper <command...>`)
    pub fn prefixed(mut self, wrapper: impl Into<String>) -> Self {
        self.segments[0].insert(0, Token::Bare(wrapper.into()));
        self
    }

    /// Program of the first segment
    pub fn program_name(&self) -> &str {
        self.segments[0][0].value()
    }

    /// Unquoted tokens of the first segment, in order
    pub fn argv(&self) -> Vec<&str> {
        self.segments[0].iter().map(Token::value).collect()
    }

    /// Number of pipeline segments
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" | ")?;
            }
            for (j, token) in segment.iter().enumerate() {
                if j > 0 {
                    f.write_str(" ")?;
                }
                write!(f, "{}", token)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quotes_values_only() {
        let cmd = ShellCommand::new("gcloud")
            .arg("--quiet")
            .option("--project", "my-project")
            .args(["app", "deploy"])
            .value("app.yaml");

        assert_eq!(
            cmd.to_string(),
            r#"gcloud --quiet --project "my-project" app deploy "app.yaml""#
        );
        assert_eq!(
            cmd.argv(),
            vec!["gcloud", "--quiet", "--project", "my-project", "app", "deploy", "app.yaml"]
        );
    }

    #[test]
    fn test_render_escapes_shell_metacharacters() {
        let cmd = ShellCommand::new("echo").value(r#"a "b" $HOME `x` \n"#);
        assert_eq!(cmd.to_string(), r#"echo "a \"b\" \$HOME \`x\` \\n""#);
    }

    #[test]
    fn test_empty_value_is_kept() {
        let cmd = ShellCommand::new("ssh-keygen").option("-N", "");
        assert_eq!(cmd.to_string(), r#"ssh-keygen -N """#);
        assert_eq!(cmd.argv(), vec!["ssh-keygen", "-N", ""]);
    }

    #[test]
    fn test_pipeline() {
        let cmd = ShellCommand::new("curl")
            .arg("-L")
            .arg("https://example.com/a.tar.gz")
            .pipe(ShellCommand::new("gzip").arg("-d"))
            .pipe(ShellCommand::new("tar").args(["-x", "-C"]).path("/tmp/root"));

        assert_eq!(cmd.segment_count(), 3);
        assert_eq!(
            cmd.to_string(),
            r#"curl -L https://example.com/a.tar.gz | gzip -d | tar -x -C "/tmp/root""#
        );
    }

    #[test]
    fn test_prefixed_and_flag_if() {
        let cmd = ShellCommand::program("/opt/sdk/bin/gcloud")
            .flag_if("--set-default", false)
            .prefixed("aedeploy");

        assert_eq!(cmd.program_name(), "aedeploy");
        assert_eq!(cmd.argv(), vec!["aedeploy", "/opt/sdk/bin/gcloud"]);
        assert_eq!(cmd.to_string(), r#"aedeploy "/opt/sdk/bin/gcloud""#);

        let cmd = ShellCommand::new("gcloud").flag_if("--set-default", true);
        assert_eq!(cmd.argv(), vec!["gcloud", "--set-default"]);
    }
}

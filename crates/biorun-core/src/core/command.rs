use std::fmt;

/// Renders a parameter value the way the wrapped tools expect it on their command lines.
pub trait ArgValue {
    fn to_arg(&self) -> String;
}

impl ArgValue for str {
    fn to_arg(&self) -> String {
        self.to_string()
    }
}

impl ArgValue for String {
    fn to_arg(&self) -> String {
        self.clone()
    }
}

impl ArgValue for f64 {
    fn to_arg(&self) -> String {
        format_float(*self)
    }
}

impl<T: ArgValue + ?Sized> ArgValue for &T {
    fn to_arg(&self) -> String {
        (**self).to_arg()
    }
}

macro_rules! impl_arg_value_for_integers {
    ($($ty:ty),*) => {
        $(
            impl ArgValue for $ty {
                fn to_arg(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

impl_arg_value_for_integers!(u8, u16, u32, u64, usize, i32, i64);

/// Formats a float so that integral values keep one decimal place (`10.0`, not `10`).
pub fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}

/// An external command as an ordered list of tokens.
///
/// Built once through [`CommandBuilder`] and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
}

impl CommandLine {
    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// All tokens, program first.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.program.as_str()).chain(self.args.iter().map(String::as_str))
    }

    pub fn contains(&self, token: &str) -> bool {
        self.args.iter().any(|a| a == token)
    }

    /// Returns the token that directly follows `flag`, if the flag is present.
    pub fn value_of(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|a| a == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Appends arguments in a fixed, explicit order.
///
/// Optional flags are expressed as `Option` values and switches as booleans, so the
/// resulting order never depends on inserting tokens relative to other tokens.
#[derive(Debug, Clone)]
pub struct CommandBuilder {
    program: String,
    args: Vec<String>,
}

impl CommandBuilder {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, value: impl ArgValue) -> Self {
        self.args.push(value.to_arg());
        self
    }

    pub fn args<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ArgValue,
    {
        self.args.extend(values.into_iter().map(|v| v.to_arg()));
        self
    }

    pub fn flag(mut self, name: &str, value: impl ArgValue) -> Self {
        self.args.push(name.to_string());
        self.args.push(value.to_arg());
        self
    }

    pub fn opt_flag<T: ArgValue>(self, name: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.flag(name, v),
            None => self,
        }
    }

    pub fn switch(mut self, name: &str, enabled: bool) -> Self {
        if enabled {
            self.args.push(name.to_string());
        }
        self
    }

    pub fn build(self) -> CommandLine {
        CommandLine {
            program: self.program,
            args: self.args,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_float_keeps_one_decimal_for_integral_values() {
        assert_eq!(format_float(10.0), "10.0");
        assert_eq!(format_float(0.0), "0.0");
        assert_eq!(format_float(9.5), "9.5");
        assert_eq!(format_float(0.05), "0.05");
    }

    #[test]
    fn builder_appends_tokens_in_call_order() {
        let cmd = CommandBuilder::new("tool")
            .arg("input.pdb")
            .flag("--threads", 8u32)
            .opt_flag::<u32>("--seed", None)
            .opt_flag("--max-length", Some(200u32))
            .switch("--ca_only", false)
            .switch("--verbose", true)
            .flag("-e", 10.0)
            .build();

        assert_eq!(cmd.program(), "tool");
        assert_eq!(
            cmd.args(),
            &[
                "input.pdb",
                "--threads",
                "8",
                "--max-length",
                "200",
                "--verbose",
                "-e",
                "10.0"
            ]
        );
        assert!(!cmd.contains("--seed"));
        assert_eq!(cmd.value_of("--threads"), Some("8"));
        assert_eq!(cmd.value_of("--missing"), None);
    }

    #[test]
    fn display_joins_tokens_with_spaces() {
        let cmd = CommandBuilder::new("docker")
            .args(["run", "--rm"])
            .arg("image")
            .build();
        assert_eq!(cmd.to_string(), "docker run --rm image");
        assert_eq!(cmd.tokens().count(), 4);
    }
}

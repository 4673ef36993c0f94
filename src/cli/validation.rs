use crate::cli::args::CliArgs;
use crate::output::OutputFormat;
use crate::runner::FailurePolicy;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(raw) = args.format.as_deref() {
        OutputFormat::parse(raw)
            .ok_or_else(|| format!("invalid --format '{raw}', expected html, json or text"))?;
    }
    if let Some(raw) = args.failure_policy.as_deref() {
        FailurePolicy::parse(raw).ok_or_else(|| {
            format!("invalid --failure-policy '{raw}', expected notice or silent")
        })?;
    }
    if let Some(timeout) = args.timeout {
        if timeout == 0 {
            return Err("invalid timeout, expected a positive number of seconds".to_string());
        }
    }
    for (flag, value) in [("--insurance", &args.insurance), ("--leasing", &args.leasing)] {
        if value.as_deref().map(|v| v.trim().is_empty()).unwrap_or(false) {
            return Err(format!("{flag} must not be empty"));
        }
    }
    if args.migrate.iter().any(|p| p.trim().is_empty()) {
        return Err("--migrate expects file paths".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn parse(argv: &[&str]) -> CliArgs {
        CliArgs::parse_from(std::iter::once("carcompare").chain(argv.iter().copied()))
    }

    #[test]
    fn accepts_defaults() {
        assert!(validate(&parse(&[])).is_ok());
    }

    #[test]
    fn rejects_unknown_format_and_policy() {
        assert!(validate(&parse(&["--format", "xml"])).unwrap_err().contains("--format"));
        assert!(validate(&parse(&["--failure-policy", "loud"]))
            .unwrap_err()
            .contains("--failure-policy"));
        assert!(validate(&parse(&["--timeout", "0"])).is_err());
        assert!(validate(&parse(&["--leasing", " "])).is_err());
    }
}

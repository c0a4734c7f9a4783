//! # Inspection Subcommands
//!
//! `url-eq`, `unescape` and `schema`: thin wrappers over the test helpers
//! and the schema table.

use anyhow::{bail, Result};
use clap::Args;

use ors_params::ors_parameters;
use ors_testkit::{decode_unicode_escapes, url_equivalent};

/// Arguments for `ors url-eq`.
#[derive(Args, Debug)]
pub struct UrlEqArgs {
    /// First URL.
    pub first: String,
    /// Second URL.
    pub second: String,
}

/// Arguments for `ors unescape`.
#[derive(Args, Debug)]
pub struct UnescapeArgs {
    /// Text containing backslash escapes.
    pub text: String,
}

/// Arguments for `ors schema`.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Print only the rule for this parameter.
    #[arg(long)]
    pub param: Option<String>,
}

/// Compare two URLs. Exit code 0 when equivalent, 1 when not.
pub fn run_url_eq(args: &UrlEqArgs) -> Result<u8> {
    let equivalent = url_equivalent(&args.first, &args.second)?;
    println!("{}", if equivalent { "EQUAL" } else { "DIFFERENT" });
    Ok(u8::from(!equivalent))
}

/// Print the decoded text.
pub fn run_unescape(args: &UnescapeArgs) -> Result<u8> {
    println!("{}", decode_unicode_escapes(&args.text)?);
    Ok(0)
}

/// Print the schema, or a single rule, as pretty JSON.
pub fn run_schema(args: &SchemaArgs) -> Result<u8> {
    let schema = ors_parameters();
    let rendered = match &args.param {
        Some(name) => match schema.get(name) {
            Some(rule) => serde_json::to_string_pretty(rule)?,
            None => bail!("unknown parameter '{name}'"),
        },
        None => serde_json::to_string_pretty(schema)?,
    };
    println!("{rendered}");
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_eq_exit_codes() {
        let same = UrlEqArgs {
            first: "http://x/y?a=1&b=2".into(),
            second: "http://x/y?b=2&a=1".into(),
        };
        assert_eq!(run_url_eq(&same).unwrap(), 0);

        let different = UrlEqArgs {
            first: "http://x/y?a=1".into(),
            second: "http://x/z?a=1".into(),
        };
        assert_eq!(run_url_eq(&different).unwrap(), 1);
    }

    #[test]
    fn url_eq_rejects_relative() {
        let args = UrlEqArgs {
            first: "y?a=1".into(),
            second: "http://x/y?a=1".into(),
        };
        assert!(run_url_eq(&args).is_err());
    }

    #[test]
    fn unescape_reports_malformed_input() {
        let ok = UnescapeArgs {
            text: r"Stra\u00dfe".into(),
        };
        assert_eq!(run_unescape(&ok).unwrap(), 0);
        let bad = UnescapeArgs { text: r"\x4".into() };
        assert!(run_unescape(&bad).is_err());
    }

    #[test]
    fn schema_for_known_and_unknown_params() {
        let known = SchemaArgs {
            param: Some("profile".into()),
        };
        assert_eq!(run_schema(&known).unwrap(), 0);
        let unknown = SchemaArgs {
            param: Some("teleport".into()),
        };
        assert!(run_schema(&unknown).is_err());
        assert_eq!(run_schema(&SchemaArgs { param: None }).unwrap(), 0);
    }
}

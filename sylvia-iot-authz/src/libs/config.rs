//! Program configurations.

use std::env;

use clap::{Arg, ArgMatches, Command, value_parser};
use serde::Deserialize;

use crate::{
    authorizer::DEF_EXPIRES_IN_DAYS,
    models::{ConflictPolicy, scope::ScopeMatch},
};

/// Configuration file object.
#[derive(Default, Deserialize)]
pub struct Config {
    /// The lifetime of issued authorizations in days. `0` means never expires.
    ///
    /// Default is `30`.
    #[serde(rename = "expiresInDays")]
    pub expires_in_days: Option<i64>,
    /// The scope matching policy.
    /// - `substring`: the required scope occurs anywhere in the scope string.
    /// - `exact`: the required scope equals one of the whitespace-delimited scopes.
    ///
    /// Default is `substring`.
    #[serde(rename = "scopeMatch")]
    pub scope_match: Option<String>,
    /// The policy of registering an existing token or identity.
    /// - `overwrite`: last write wins.
    /// - `reject`: returns an error.
    ///
    /// Default is `overwrite`.
    #[serde(rename = "conflictPolicy")]
    pub conflict_policy: Option<String>,
}

pub const DEF_SCOPE_MATCH: &'static str = ScopeMatch::SUBSTRING;
pub const DEF_CONFLICT_POLICY: &'static str = ConflictPolicy::OVERWRITE;

/// To register Clap arguments.
pub fn reg_args(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("authz.expires-in-days")
            .long("authz.expires-in-days")
            .help("lifetime of issued authorizations in days, 0 means never expires")
            .num_args(1)
            .allow_negative_numbers(true)
            .value_parser(value_parser!(i64)),
    )
    .arg(
        Arg::new("authz.scope-match")
            .long("authz.scope-match")
            .help("scope matching policy")
            .num_args(1)
            .value_parser([ScopeMatch::SUBSTRING, ScopeMatch::EXACT]),
    )
    .arg(
        Arg::new("authz.conflict-policy")
            .long("authz.conflict-policy")
            .help("policy of registering an existing token or identity")
            .num_args(1)
            .value_parser([ConflictPolicy::OVERWRITE, ConflictPolicy::REJECT]),
    )
}

/// To read input arguments from command-line arguments and environment variables.
///
/// This function will call [`apply_default()`] to fill missing values so you do not need call it
/// again.
pub fn read_args(args: &ArgMatches) -> Config {
    apply_default(&Config {
        expires_in_days: match args.try_get_one::<i64>("authz.expires-in-days") {
            Ok(Some(v)) => Some(*v),
            _ => match env::var("AUTHZ_EXPIRES_IN_DAYS") {
                Err(_) => None,
                Ok(v) => v.parse::<i64>().ok(),
            },
        },
        scope_match: read_string(args, "authz.scope-match", "AUTHZ_SCOPE_MATCH"),
        conflict_policy: read_string(args, "authz.conflict-policy", "AUTHZ_CONFLICT_POLICY"),
    })
}

/// Fill missing configuration with default values.
pub fn apply_default(config: &Config) -> Config {
    Config {
        expires_in_days: Some(config.expires_in_days.unwrap_or(DEF_EXPIRES_IN_DAYS)),
        scope_match: match config.scope_match.as_deref().and_then(ScopeMatch::from_name) {
            None => Some(DEF_SCOPE_MATCH.to_string()),
            Some(v) => Some(v.name().to_string()),
        },
        conflict_policy: match config
            .conflict_policy
            .as_deref()
            .and_then(ConflictPolicy::from_name)
        {
            None => Some(DEF_CONFLICT_POLICY.to_string()),
            Some(v) => Some(v.name().to_string()),
        },
    }
}

fn read_string(args: &ArgMatches, arg: &str, var: &str) -> Option<String> {
    match args.try_get_one::<String>(arg) {
        Ok(Some(v)) => Some(v.clone()),
        _ => env::var(var).ok(),
    }
}

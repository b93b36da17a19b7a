//! Renders the reinstall shell script.
//!
//! The emitted artifact is plain POSIX sh: option parsing, one
//! `brew_install` line per formula in dependency order, then a summary of
//! every install that failed during that run. Failures never abort the
//! remaining installs; `brew_install` records the name and carries on.
//!
//! The script's `get_options` accepts exactly one flag per invocation
//! (`--dry-run`, `--force` or `--verbose`). That single-flag grammar is kept
//! as-is from the original dump script and is a known limitation.

use super::command::InstallCommand;

/// Version string embedded in the generated-by banners.
pub const GENERATOR_VERSION: &str = env!("CARGO_PKG_VERSION");

const RULE: &str =
    "# ==============================================================================\n";

const PRELUDE: &str = r#"
set -e
set -u
export LC_ALL=C

VERBOSE='no'
FAILED_INSTALL_LIST=''
DRY_RUN='no'
ME=${0##*/}

"#;

const USAGE_HEAD: &str = r#"usage()
{
  cat <<EOF
Usage: $ME [options]

Exactly one option must be given per invocation.

Options:
  --dry-run     Do not actually install anything, just show what would be done.
  --force       Actually do the installation (the default; incompatible with --dry-run).
  --verbose     Pass --verbose to 'brew install'.

"#;

const SHELL_FUNCTIONS: &str = r#"fatal()
{
  for i in "$@"
  do
    echo >&2 "$ME: fatal: $i"
  done
  exit 1
}

run()
{
  if test x"$DRY_RUN" = xyes
  then
    echo "$ME: run: $@"
  else
    "$@"
  fi
}

brew_install_run()
{
  if test x"$VERBOSE" = xno
  then
    run brew install "$@"
  else
    run brew install --verbose "$@"
  fi
}

brew_install()
{
  local name="$1"; shift
  local options="$@"
  # Do not quote $options: it may be empty and an empty argument must not
  # reach 'brew install'.
  if ! brew_install_run $options "$name"
  then
    FAILED_INSTALL_LIST="$FAILED_INSTALL_LIST $name"
  fi
}

get_options()
{
  if test $# -eq 0 -o $# -gt 1
  then
    usage
    exit 1
  else
    local i
    for i in "$@"
    do
      case "$i" in
        --dry-run) DRY_RUN='yes';;
        --force) DRY_RUN='no';;
        --verbose) VERBOSE='yes';;
        *) fatal "unknown option '$i'";;
      esac
    done
  fi
}

get_options "$@"

"#;

const START_BANNER: &str = r#"cat <<EOF
================================================================================
Start re-installing all your formulae...
================================================================================
EOF

"#;

const UNAVAILABLE_HEAD: &str = r#"# Warn about formulae whose definition could not be reloaded.
cat <<EOF
================================================================================
Warning:
 Some formulae have not been re-installed because their original formula
 definition could not be reloaded.

Here the list:
"#;

const FAILED_REPORT: &str = r#"# Report the formulae that failed to install during this run.
if test x"$FAILED_INSTALL_LIST" != x
then
  cat <<EOF
================================================================================
Error: some formula installations failed.

Here the list:
EOF
  for i in $FAILED_INSTALL_LIST
  do
    echo "  $i"
  done
fi

cat <<EOF
================================================================================
EOF
"#;

/// Render the full reinstall script.
///
/// Pure: the only inputs are the ordered commands and the names whose
/// metadata could not be loaded. The failure-report block is always part of
/// the template; it only prints when the script's own runtime failure list
/// is non-empty.
pub fn render(commands: &[&InstallCommand], unavailable: &[String]) -> String {
    let mut script = String::new();

    script.push_str("#!/bin/sh\n");
    script.push_str(RULE);
    script.push_str(&format!(
        "# Generated by 'brew-dump' version {GENERATOR_VERSION} DO NOT EDIT!!!\n"
    ));
    script.push_str(RULE);
    script.push_str(PRELUDE);

    script.push_str(USAGE_HEAD);
    script.push_str(&format!(
        "Generated by 'brew-dump' version {GENERATOR_VERSION}.\nEOF\n}}\n\n"
    ));
    script.push_str(SHELL_FUNCTIONS);

    script.push_str(START_BANNER);
    script.push_str("# Install all formulae.\n");
    for command in commands {
        script.push_str(&format!("brew_install {command}\n"));
    }
    script.push('\n');

    if !unavailable.is_empty() {
        script.push_str(UNAVAILABLE_HEAD);
        for name in unavailable {
            script.push_str(&format!("  {name}\n"));
        }
        script.push_str("EOF\n\n");
    }

    script.push_str(FAILED_REPORT);
    script
}

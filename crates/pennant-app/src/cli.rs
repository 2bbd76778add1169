// Command-line arguments: `pennant [year] [manager]`.

use anyhow::bail;

pub const USAGE: &str = "usage: pennant [year] [manager]

  year     season to rate (default: the latest configured season)
  manager  show one team's players instead of the standings";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    pub year: Option<i32>,
    pub manager: Option<String>,
    pub help: bool,
}

/// Parse arguments after the program name. A leading number is the year;
/// anything else is a manager.
pub fn parse_args<I>(args: I) -> anyhow::Result<Args>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = Args::default();
    let mut positional = Vec::new();

    for arg in args {
        match arg.as_str() {
            "-h" | "--help" => parsed.help = true,
            s if s.starts_with('-') => bail!("unknown option `{s}`\n\n{USAGE}"),
            _ => positional.push(arg),
        }
    }

    let mut rest = positional.into_iter();
    match rest.next() {
        Some(first) => match first.parse::<i32>() {
            Ok(year) => {
                parsed.year = Some(year);
                parsed.manager = rest.next();
            }
            Err(_) => parsed.manager = Some(first),
        },
        None => return Ok(parsed),
    }

    if let Some(extra) = rest.next() {
        bail!("unexpected argument `{extra}`\n\n{USAGE}");
    }
    Ok(parsed)
}

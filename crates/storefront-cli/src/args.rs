//! Value parsers for repeatable `k=v` and `ID:AMOUNT` arguments.

/// An add-on given on the command line as `ID:AMOUNT`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct AddonArg {
    pub id: String,
    pub amount: i64,
}

/// Parses `key=value`. The value may be empty or contain further `=`.
pub(crate) fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got \"{raw}\""))?;
    if key.trim().is_empty() {
        return Err(format!("empty key in \"{raw}\""));
    }
    Ok((key.trim().to_owned(), value.to_owned()))
}

/// Parses `ID:AMOUNT`; a bare `ID` means amount 1.
pub(crate) fn parse_addon_arg(raw: &str) -> Result<AddonArg, String> {
    let (id, amount) = match raw.split_once(':') {
        Some((id, amount)) => {
            let amount = amount
                .trim()
                .parse::<i64>()
                .map_err(|e| format!("invalid amount in \"{raw}\": {e}"))?;
            (id, amount)
        }
        None => (raw, 1),
    };
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("empty add-on id in \"{raw}\""));
    }
    Ok(AddonArg {
        id: id.to_owned(),
        amount,
    })
}

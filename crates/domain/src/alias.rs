use crate::errors::DomainError;
use fancy_regex::Regex;

/// A suffix rewrite that presents the `real` zone to clients as the `fake` zone.
///
/// Both suffixes are compiled once into end-anchored, case-insensitive
/// expressions that only match on a label boundary: `local.example` covers
/// `host.local.example` and `local.example` itself, not `notlocal.example`.
/// Rewriting replaces the matched suffix with the other literal suffix, so
/// `to_fake(to_real(name))` restores any name in the fake zone.
#[derive(Debug, Clone)]
pub struct AliasBinding {
    fake: String,
    real: String,
    fake_suffix: Regex,
    real_suffix: Regex,
}

impl AliasBinding {
    pub fn new(fake: &str, real: &str) -> Result<Self, DomainError> {
        let fake = normalize_suffix(fake, "fake")?;
        let real = normalize_suffix(real, "real")?;
        let fake_suffix = suffix_regex(&fake)?;
        let real_suffix = suffix_regex(&real)?;
        Ok(Self {
            fake,
            real,
            fake_suffix,
            real_suffix,
        })
    }

    pub fn fake(&self) -> &str {
        &self.fake
    }

    pub fn real(&self) -> &str {
        &self.real
    }

    /// Expression matching any name that ends with the fake suffix.
    pub fn fake_pattern(&self) -> &Regex {
        &self.fake_suffix
    }

    pub fn is_fake(&self, name: &str) -> bool {
        self.fake_suffix.is_match(name).unwrap_or(false)
    }

    /// Rewrites a trailing fake suffix to the real one; `None` if `name` does not end in it.
    pub fn to_real(&self, name: &str) -> Option<String> {
        replace_suffix(&self.fake_suffix, name, &self.real)
    }

    /// Rewrites a trailing real suffix back to the fake one.
    pub fn to_fake(&self, name: &str) -> Option<String> {
        replace_suffix(&self.real_suffix, name, &self.fake)
    }
}

fn normalize_suffix(suffix: &str, which: &str) -> Result<String, DomainError> {
    let trimmed = suffix.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(DomainError::ConfigError(format!(
            "Alias {} suffix cannot be empty",
            which
        )));
    }
    Ok(trimmed.to_string())
}

fn suffix_regex(suffix: &str) -> Result<Regex, DomainError> {
    let source = format!("(?i)(?:^|(?<=\\.)){}$", fancy_regex::escape(suffix));
    Regex::new(&source).map_err(|e| DomainError::InvalidPattern(format!("{}: {}", source, e)))
}

fn replace_suffix(re: &Regex, name: &str, replacement: &str) -> Option<String> {
    let found = re.find(name).ok()??;
    Some(format!("{}{}", &name[..found.start()], replacement))
}

//! Well-known provider presets

use crate::{AccountConfig, CoreError};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Common mail providers with known connection defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// example@gmail.com
    Gmail,
    /// example@yahoo.com
    Yahoo,
    /// example@aol.com
    Aol,
    /// example@hotmail.com
    Hotmail,
}

impl FromStr for Provider {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gmail" => Ok(Provider::Gmail),
            "yahoo" => Ok(Provider::Yahoo),
            "aol" => Ok(Provider::Aol),
            "hotmail" => Ok(Provider::Hotmail),
            other => Err(CoreError::UnknownProvider(other.to_string())),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Provider::Gmail => "gmail",
            Provider::Yahoo => "yahoo",
            Provider::Aol => "aol",
            Provider::Hotmail => "hotmail",
        };
        write!(f, "{}", name)
    }
}

/// Registry of connection templates for well-known providers.
///
/// Constructed once at startup and passed by reference to whatever needs
/// lookups; there is no hidden global table.
pub struct ProviderRegistry {
    templates: HashMap<Provider, AccountConfig>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Create a registry populated with the known provider defaults
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(
            Provider::Gmail,
            template("smtp.gmail.com", 465, "pop.gmail.com", 995, Some(("imap.gmail.com", 993))),
        );
        registry.register(
            Provider::Yahoo,
            template(
                "smtp.mail.yahoo.com",
                465,
                "plus.pop.mail.yahoo.com",
                995,
                Some(("imap.mail.yahoo.com", 993)),
            ),
        );
        registry.register(
            Provider::Aol,
            template("smtp.aol.com", 587, "pop.aol.com", 995, Some(("imap.aol.com", 993))),
        );
        // hotmail does not support IMAP
        registry.register(
            Provider::Hotmail,
            template("smtp.live.com", 587, "pop3.live.com", 995, None),
        );

        registry
    }

    /// Add or replace a provider template
    pub fn register(&mut self, provider: Provider, config: AccountConfig) {
        self.templates.insert(provider, config);
    }

    /// Look up the connection template for a provider
    pub fn lookup(&self, provider: Provider) -> Option<&AccountConfig> {
        self.templates.get(&provider)
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

fn template(
    smtp_host: &str,
    smtp_port: u16,
    pop_host: &str,
    pop_port: u16,
    imap: Option<(&str, u16)>,
) -> AccountConfig {
    let mut config = AccountConfig::default();
    config.smtp_host = smtp_host.to_string();
    config.smtp_port = smtp_port;
    config.smtp_auth = true;
    config.pop_host = pop_host.to_string();
    config.pop_port = pop_port;
    config.pop_auth = true;
    if let Some((imap_host, imap_port)) = imap {
        config.imap_host = imap_host.to_string();
        config.imap_port = imap_port;
        config.imap_auth = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_from_str_case_insensitive() {
        assert_eq!("gmail".parse::<Provider>().unwrap(), Provider::Gmail);
        assert_eq!("GMAIL".parse::<Provider>().unwrap(), Provider::Gmail);
        assert_eq!("Yahoo".parse::<Provider>().unwrap(), Provider::Yahoo);
    }

    #[test]
    fn test_unknown_provider_name() {
        let err = "fastmail".parse::<Provider>().unwrap_err();
        assert!(matches!(err, CoreError::UnknownProvider(_)));
    }

    #[test]
    fn test_default_templates() {
        let registry = ProviderRegistry::with_defaults();

        let gmail = registry.lookup(Provider::Gmail).unwrap();
        assert_eq!(gmail.smtp_host, "smtp.gmail.com");
        assert_eq!(gmail.smtp_port, 465);
        assert_eq!(gmail.imap_host, "imap.gmail.com");
        assert_eq!(gmail.imap_port, 993);
        assert!(gmail.smtp_auth && gmail.pop_auth && gmail.imap_auth);

        let aol = registry.lookup(Provider::Aol).unwrap();
        assert_eq!(aol.smtp_port, 587);
        assert_eq!(aol.pop_port, 995);
    }

    #[test]
    fn test_hotmail_has_no_imap() {
        let registry = ProviderRegistry::with_defaults();
        let hotmail = registry.lookup(Provider::Hotmail).unwrap();
        assert!(hotmail.imap_host.is_empty());
        assert_eq!(hotmail.imap_port, 0);
        assert!(!hotmail.imap_auth);
    }
}

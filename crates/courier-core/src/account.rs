//! Account configuration

use crate::{CoreError, CoreResult, Provider, ProviderRegistry, Secret};
use serde::{Deserialize, Serialize};

/// Default TLS socket port for SMTP submission
const DEFAULT_SOCKET_PORT: u16 = 465;

/// Number of fields in the flat wire record
const WIRE_FIELDS: usize = 13;

/// Connection and identity settings for one mail account.
///
/// Immutable once built apart from the explicit identity setters; the
/// account secret is deliberately not a field here, so no serialized form
/// of this struct can ever carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// SMTP server hostname
    pub smtp_host: String,
    /// SMTP server port
    pub smtp_port: u16,
    /// Whether SMTP requires authentication
    pub smtp_auth: bool,
    /// POP3 server hostname
    pub pop_host: String,
    /// POP3 server port
    pub pop_port: u16,
    /// Whether POP3 requires authentication
    pub pop_auth: bool,
    /// IMAP server hostname (empty when the provider has no IMAP)
    pub imap_host: String,
    /// IMAP server port
    pub imap_port: u16,
    /// Whether IMAP requires authentication
    pub imap_auth: bool,
    /// TLS socket port for SMTP submission
    pub socket_port: u16,
    /// Email address of the account
    pub email_address: String,
    /// Username of the account
    pub username: String,
}

impl Default for AccountConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: 0,
            smtp_auth: false,
            pop_host: String::new(),
            pop_port: 0,
            pop_auth: false,
            imap_host: String::new(),
            imap_port: 0,
            imap_auth: false,
            socket_port: DEFAULT_SOCKET_PORT,
            email_address: String::new(),
            username: String::new(),
        }
    }
}

impl AccountConfig {
    /// Build a configuration for a well-known provider.
    ///
    /// The host/port/auth fields are fixed copies of the registry
    /// template. Fails with `UnknownProvider` when the registry has no
    /// entry, and with `InvalidArgument` when any of the identity values
    /// or the secret is empty.
    pub fn for_provider(
        registry: &ProviderRegistry,
        provider: Provider,
        email_address: &str,
        username: &str,
        secret: &Secret,
    ) -> CoreResult<Self> {
        if email_address.is_empty() || username.is_empty() || secret.is_empty() {
            return Err(CoreError::InvalidArgument(
                "email address, username, and secret are all required".to_string(),
            ));
        }

        let template = registry
            .lookup(provider)
            .ok_or_else(|| CoreError::UnknownProvider(provider.to_string()))?;

        let mut config = template.clone();
        config.email_address = email_address.to_string();
        config.username = username.to_string();
        Ok(config)
    }

    /// Build a configuration by merging an explicit identity with a
    /// caller-supplied template (not necessarily from the registry).
    ///
    /// Fails with `InvalidArgument` when the secret is empty, or when
    /// neither an explicit value nor the template supplies the email
    /// address / username.
    pub fn from_template(
        email_address: Option<&str>,
        username: Option<&str>,
        secret: &Secret,
        template: &AccountConfig,
    ) -> CoreResult<Self> {
        if secret.is_empty() {
            return Err(CoreError::InvalidArgument("secret is required".to_string()));
        }

        let email_address = email_address
            .filter(|s| !s.is_empty())
            .unwrap_or(&template.email_address);
        let username = username
            .filter(|s| !s.is_empty())
            .unwrap_or(&template.username);

        if email_address.is_empty() || username.is_empty() {
            return Err(CoreError::InvalidArgument(
                "neither the arguments nor the template supply an email address and username"
                    .to_string(),
            ));
        }

        let mut config = template.clone();
        config.email_address = email_address.to_string();
        config.username = username.to_string();
        Ok(config)
    }

    /// Replace the username. Callers keeping a persisted copy of this
    /// configuration must update it as well.
    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    /// Replace the email address. Callers keeping a persisted copy of
    /// this configuration must update it as well.
    pub fn set_email_address(&mut self, email_address: impl Into<String>) {
        self.email_address = email_address.into();
    }

    /// Encode as a flat tab-separated record for storage or transfer.
    ///
    /// Field order: email, username, encrypted-secret-or-empty, then the
    /// SMTP/POP/IMAP host/port/auth triples and the socket port. Booleans
    /// encode as `0`/`1`. The plaintext secret is never part of the
    /// record; callers who want the secret persisted pass its encrypted
    /// form (see [`Secret::encrypt`]).
    pub fn to_wire(&self, encrypted_secret: Option<&str>) -> String {
        let fields: [String; WIRE_FIELDS] = [
            self.email_address.clone(),
            self.username.clone(),
            encrypted_secret.unwrap_or("").to_string(),
            self.smtp_host.clone(),
            self.smtp_port.to_string(),
            bool_field(self.smtp_auth).to_string(),
            self.pop_host.clone(),
            self.pop_port.to_string(),
            bool_field(self.pop_auth).to_string(),
            self.imap_host.clone(),
            self.imap_port.to_string(),
            bool_field(self.imap_auth).to_string(),
            self.socket_port.to_string(),
        ];
        fields.join("\t")
    }

    /// Decode a record produced by [`to_wire`](Self::to_wire).
    ///
    /// Returns the configuration and the encrypted secret, when one was
    /// included in the record.
    pub fn from_wire(record: &str) -> CoreResult<(Self, Option<String>)> {
        let fields: Vec<&str> = record.split('\t').collect();
        if fields.len() != WIRE_FIELDS {
            return Err(CoreError::WireFormat(format!(
                "expected {} fields, found {}",
                WIRE_FIELDS,
                fields.len()
            )));
        }

        let config = AccountConfig {
            email_address: fields[0].to_string(),
            username: fields[1].to_string(),
            smtp_host: fields[3].to_string(),
            smtp_port: port_field(fields[4])?,
            smtp_auth: bool_from_field(fields[5])?,
            pop_host: fields[6].to_string(),
            pop_port: port_field(fields[7])?,
            pop_auth: bool_from_field(fields[8])?,
            imap_host: fields[9].to_string(),
            imap_port: port_field(fields[10])?,
            imap_auth: bool_from_field(fields[11])?,
            socket_port: port_field(fields[12])?,
        };

        let encrypted_secret = if fields[2].is_empty() {
            None
        } else {
            Some(fields[2].to_string())
        };

        Ok((config, encrypted_secret))
    }
}

fn bool_field(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

fn bool_from_field(field: &str) -> CoreResult<bool> {
    match field {
        "1" => Ok(true),
        "0" => Ok(false),
        other => Err(CoreError::WireFormat(format!("bad boolean field: {}", other))),
    }
}

fn port_field(field: &str) -> CoreResult<u16> {
    field
        .parse()
        .map_err(|_| CoreError::WireFormat(format!("bad port field: {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ProviderRegistry {
        ProviderRegistry::with_defaults()
    }

    #[test]
    fn test_provider_config_copies_template() {
        let secret = Secret::new("x");
        let config = AccountConfig::for_provider(
            &registry(),
            Provider::Gmail,
            "a@gmail.com",
            "a",
            &secret,
        )
        .unwrap();

        assert_eq!(config.smtp_host, "smtp.gmail.com");
        assert_eq!(config.smtp_port, 465);
        assert_eq!(config.imap_port, 993);
        assert_eq!(config.socket_port, 465);
        assert_eq!(config.email_address, "a@gmail.com");
        assert_eq!(config.username, "a");
    }

    #[test]
    fn test_empty_identity_rejected() {
        let secret = Secret::new("x");
        for (email, user) in [("", "a"), ("a@gmail.com", "")] {
            let err =
                AccountConfig::for_provider(&registry(), Provider::Gmail, email, user, &secret)
                    .unwrap_err();
            assert!(matches!(err, CoreError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_empty_secret_rejected() {
        let err = AccountConfig::for_provider(
            &registry(),
            Provider::Gmail,
            "a@gmail.com",
            "a",
            &Secret::new(""),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_provider_produces_no_config() {
        let empty = ProviderRegistry::new();
        let err = AccountConfig::for_provider(
            &empty,
            Provider::Gmail,
            "a@gmail.com",
            "a",
            &Secret::new("x"),
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::UnknownProvider(_)));
    }

    #[test]
    fn test_template_merge_prefers_explicit_identity() {
        let mut template = AccountConfig::default();
        template.smtp_host = "mail.example.com".to_string();
        template.smtp_port = 587;
        template.email_address = "old@example.com".to_string();
        template.username = "old".to_string();

        let config = AccountConfig::from_template(
            Some("new@example.com"),
            None,
            &Secret::new("x"),
            &template,
        )
        .unwrap();

        assert_eq!(config.email_address, "new@example.com");
        assert_eq!(config.username, "old");
        assert_eq!(config.smtp_host, "mail.example.com");
    }

    #[test]
    fn test_template_merge_requires_identity_somewhere() {
        let template = AccountConfig::default();
        let err = AccountConfig::from_template(None, None, &Secret::new("x"), &template)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_template_merge_requires_secret() {
        let mut template = AccountConfig::default();
        template.email_address = "a@example.com".to_string();
        template.username = "a".to_string();

        let err =
            AccountConfig::from_template(None, None, &Secret::new(""), &template).unwrap_err();
        assert!(matches!(err, CoreError::InvalidArgument(_)));
    }

    #[test]
    fn test_wire_round_trip_excludes_secret() {
        let secret = Secret::new("idkmypsswd");
        let config = AccountConfig::for_provider(
            &registry(),
            Provider::Yahoo,
            "jane@yahoo.com",
            "jane",
            &secret,
        )
        .unwrap();

        let record = config.to_wire(None);
        assert!(!record.contains("idkmypsswd"));

        let (decoded, encrypted) = AccountConfig::from_wire(&record).unwrap();
        assert_eq!(decoded, config);
        assert_eq!(encrypted, None);
    }

    #[test]
    fn test_wire_round_trip_with_encrypted_secret() {
        let secret = Secret::new("idkmypsswd");
        let config = AccountConfig::for_provider(
            &registry(),
            Provider::Hotmail,
            "bill@hotmail.com",
            "bill",
            &secret,
        )
        .unwrap();

        let sealed = secret.encrypt("key phrase").unwrap();
        let record = config.to_wire(Some(&sealed));
        assert!(!record.contains("idkmypsswd"));

        let (decoded, encrypted) = AccountConfig::from_wire(&record).unwrap();
        assert_eq!(decoded, config);
        let restored = Secret::decrypt(&encrypted.unwrap(), "key phrase").unwrap();
        assert!(!restored.is_empty());
    }

    #[test]
    fn test_wire_rejects_malformed_records() {
        assert!(AccountConfig::from_wire("too\tfew\tfields").is_err());

        let config = AccountConfig::default();
        let record = config.to_wire(None).replace("465", "not-a-port");
        assert!(AccountConfig::from_wire(&record).is_err());
    }

    #[test]
    fn test_serde_never_carries_a_secret_field() {
        let config = AccountConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("password"));
    }
}

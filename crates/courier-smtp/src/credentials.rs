//! Credential capability for SMTP authentication

/// Supplies the username/secret pair for one SMTP session.
///
/// The sending client implements this so the secret stays scoped to the
/// component that owns it; the transport only borrows the values for the
/// duration of the authentication exchange.
pub trait ProvideCredentials {
    /// Account username presented during authentication.
    fn username(&self) -> &str;

    /// Account secret presented during authentication. Implementations
    /// must not log or serialize this value.
    fn secret(&self) -> &str;
}

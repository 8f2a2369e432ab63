use wallet_plugin_core::{NetworkName, WalletError};

/// Translates a vendor network identifier through the vendor's table.
/// Table lookup, not pattern inference: a miss falls back to parsing the
/// identifier as an already-canonical name, and anything else is a hard
/// error — there is no silent default network.
pub fn lookup_network(
    wallet: &str,
    table: &[(&str, NetworkName)],
    raw: &str,
) -> Result<NetworkName, WalletError> {
    if let Some((_, name)) = table.iter().find(|(vendor, _)| *vendor == raw) {
        return Ok(*name);
    }
    raw.parse::<NetworkName>()
        .map_err(|_| WalletError::Network(format!("{wallet} unknown network: {raw}")))
}

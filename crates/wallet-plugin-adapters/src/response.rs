use serde::Deserialize;
use serde_json::Value;

use wallet_plugin_core::{NetworkInfo, NetworkName, SubmittedTransaction, WalletError};

/// Splits the vendor's sign-and-submit response on its error-vs-success
/// discriminant: a `code` field marks an error-shaped payload, which becomes
/// a thrown error carrying the vendor's message instead of a fake success.
pub fn submitted_from_response(
    wallet: &str,
    response: Value,
) -> Result<SubmittedTransaction, WalletError> {
    if response.get("code").is_some() {
        let message = response
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| format!("{wallet} Sign and Submit Transaction Error"));
        return Err(WalletError::TransactionSubmission(message));
    }
    serde_json::from_value(response).map_err(|e| {
        WalletError::TransactionSubmission(format!("{wallet} malformed transaction response: {e}"))
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NamedNetworkResponse {
    name: String,
    #[serde(default)]
    chain_id: Option<String>,
    #[serde(default)]
    api: Option<String>,
}

/// Normalizes the two raw network-response shapes vendors use — a bare name
/// string or a name-keyed object — into one descriptor, routing the name
/// through the vendor's translation table.
pub fn network_from_response(
    wallet: &str,
    map_name: fn(&str) -> Result<NetworkName, WalletError>,
    response: Value,
) -> Result<NetworkInfo, WalletError> {
    match response {
        Value::String(raw) => Ok(NetworkInfo {
            name: map_name(&raw)?,
            chain_id: None,
            api: None,
        }),
        response @ Value::Object(_) => {
            let named: NamedNetworkResponse = serde_json::from_value(response).map_err(|e| {
                WalletError::Network(format!("{wallet} malformed network response: {e}"))
            })?;
            Ok(NetworkInfo {
                name: map_name(&named.name)?,
                chain_id: named.chain_id,
                api: named.api,
            })
        }
        other => Err(WalletError::Network(format!(
            "{wallet} unexpected network response shape: {other}"
        ))),
    }
}

use std::collections::BTreeSet;

use thiserror::Error;
use url::Url;

/// Rejection for peer addresses that cannot be reduced to a network
/// location. Malformed input never reaches the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("malformed peer address `{0}`")]
    Malformed(String),
}

/// The set of known peer nodes, keyed by normalized `host[:port]`.
///
/// Sorted storage keeps iteration deterministic, which pins the
/// first-match winner during consensus resolution.
#[derive(Debug, Default)]
pub struct PeerRegistry {
    nodes: BTreeSet<String>,
}

impl PeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a peer address. Adding the same normalized address twice
    /// has no additional effect.
    pub fn add(&mut self, address: &str) -> Result<(), AddressError> {
        let node = normalize(address)?;
        self.nodes.insert(node);
        Ok(())
    }

    /// Register several peers at once, validating every address before
    /// inserting any of them.
    pub fn add_all<S: AsRef<str>>(&mut self, addresses: &[S]) -> Result<(), AddressError> {
        let normalized = addresses
            .iter()
            .map(|a| normalize(a.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.nodes.extend(normalized);
        Ok(())
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.nodes().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Extract the network location (`host[:port]`) from a peer URL.
/// Inputs without a scheme (e.g. `10.0.0.5:5000`) are treated as http.
/// A default port is dropped from the canonical form.
fn normalize(address: &str) -> Result<String, AddressError> {
    let address = address.trim();
    let malformed = || AddressError::Malformed(address.to_string());
    if address.is_empty() {
        return Err(malformed());
    }
    let parsed = match Url::parse(address) {
        Ok(url) if url.host_str().is_some() => url,
        // A scheme was given but no host could be parsed out of it.
        _ if address.contains("://") => return Err(malformed()),
        _ => Url::parse(&format!("http://{address}")).map_err(|_| malformed())?,
    };
    let host = parsed.host_str().ok_or_else(malformed)?;
    Ok(match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::{AddressError, PeerRegistry};

    #[test]
    fn equivalent_spellings_deduplicate() {
        let mut registry = PeerRegistry::new();
        registry.add("http://10.0.0.5:5000/").unwrap();
        registry.add("10.0.0.5:5000").unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.to_vec(), vec!["10.0.0.5:5000".to_string()]);
    }

    #[test]
    fn path_and_scheme_are_stripped() {
        let mut registry = PeerRegistry::new();
        registry.add("http://node.example.com/get_chain").unwrap();
        assert_eq!(registry.to_vec(), vec!["node.example.com".to_string()]);
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        let mut registry = PeerRegistry::new();
        assert!(matches!(
            registry.add(""),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            registry.add("http://"),
            Err(AddressError::Malformed(_))
        ));
        assert!(matches!(
            registry.add("not a url"),
            Err(AddressError::Malformed(_))
        ));
        assert!(registry.is_empty());
    }

    #[test]
    fn add_all_is_rejected_wholesale_on_one_bad_address() {
        let mut registry = PeerRegistry::new();
        let result = registry.add_all(&["10.0.0.1:5000", "http://"]);
        assert!(matches!(result, Err(AddressError::Malformed(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn iteration_order_is_deterministic() {
        let mut registry = PeerRegistry::new();
        registry.add("10.0.0.9:5000").unwrap();
        registry.add("10.0.0.1:5000").unwrap();
        registry.add("10.0.0.5:5000").unwrap();
        let nodes: Vec<&str> = registry.nodes().collect();
        assert_eq!(nodes, vec!["10.0.0.1:5000", "10.0.0.5:5000", "10.0.0.9:5000"]);
    }
}

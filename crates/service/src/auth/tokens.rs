use dashmap::DashMap;
use rand::{distributions::Alphanumeric, rngs::OsRng, Rng};

const TOKEN_LEN: usize = 32;

/// In-memory map of opaque bearer tokens to user ids. Tokens never expire.
#[derive(Default)]
pub struct TokenRegistry {
    tokens: DashMap<String, u64>,
}

impl TokenRegistry {
    pub fn new() -> Self { Self::default() }

    /// Mint a fresh token for `user_id`.
    pub fn issue(&self, user_id: u64) -> String {
        let token: String = OsRng.sample_iter(&Alphanumeric).take(TOKEN_LEN).map(char::from).collect();
        self.tokens.insert(token.clone(), user_id);
        token
    }

    pub fn resolve(&self, token: &str) -> Option<u64> {
        self.tokens.get(token).map(|entry| *entry.value())
    }
}

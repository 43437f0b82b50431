use checkin_domain::CredentialProvider;

/// Token supplied once at startup, from config or the environment.
pub struct StaticCredentialProvider {
    token: Option<String>,
}

impl StaticCredentialProvider {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|value| !value.trim().is_empty()),
        }
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_token_counts_as_missing() {
        assert_eq!(StaticCredentialProvider::new(Some("  ".into())).access_token(), None);
        assert_eq!(
            StaticCredentialProvider::new(Some("tok".into()))
                .access_token()
                .as_deref(),
            Some("tok")
        );
    }
}

use crate::shared::errors::NotifyError;

pub const ENV_ACCOUNT_SID: &str = "TWILIO_ACCOUNT_SID";
pub const ENV_AUTH_TOKEN: &str = "TWILIO_AUTH_TOKEN";
pub const ENV_WHATSAPP_FROM: &str = "TWILIO_WHATSAPP_FROM";
pub const ENV_WHATSAPP_TO: &str = "WHATSAPP_TO";

/// Messaging provider credentials, read from the environment once at startup
#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

impl std::fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"***")
            .field("from", &self.from)
            .field("to", &self.to)
            .finish()
    }
}

impl TwilioCredentials {
    pub fn from_env() -> Result<Self, NotifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, NotifyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| NotifyError::MissingCredential(key.to_string()))
        };

        Ok(Self {
            account_sid: require(ENV_ACCOUNT_SID)?,
            auth_token: require(ENV_AUTH_TOKEN)?,
            from: require(ENV_WHATSAPP_FROM)?,
            to: require(ENV_WHATSAPP_TO)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_all_variables_present() {
        let vars = env(&[
            (ENV_ACCOUNT_SID, "AC123"),
            (ENV_AUTH_TOKEN, "secret"),
            (ENV_WHATSAPP_FROM, "+14155238886"),
            (ENV_WHATSAPP_TO, "+5215512345678"),
        ]);
        let creds = TwilioCredentials::from_lookup(|k| vars.get(k).cloned()).unwrap();
        assert_eq!(creds.account_sid, "AC123");
        assert_eq!(creds.to, "+5215512345678");
        assert!(!format!("{:?}", creds).contains("secret"));
    }

    #[test]
    fn test_missing_variable_is_named() {
        let vars = env(&[
            (ENV_ACCOUNT_SID, "AC123"),
            (ENV_AUTH_TOKEN, "  "),
            (ENV_WHATSAPP_FROM, "+14155238886"),
            (ENV_WHATSAPP_TO, "+5215512345678"),
        ]);
        match TwilioCredentials::from_lookup(|k| vars.get(k).cloned()) {
            Err(NotifyError::MissingCredential(var)) => assert_eq!(var, ENV_AUTH_TOKEN),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }
}

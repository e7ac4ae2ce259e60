use crate::domain::config::{error::ConfigError, local::Provider};

#[derive(Clone)]
pub struct SupabaseSecrets {
    pub storage_url: String,
    pub api_key: String,
    pub bucket_name: String,
}

#[derive(Clone)]
pub struct S3Secrets {
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub bucket_name: String,
}

/// Credentials for the remote storage providers. Only the group the
/// selected provider needs is loaded.
#[derive(Clone, Default)]
pub struct Secrets {
    pub supabase_secrets: Option<SupabaseSecrets>,
    pub s3_secrets: Option<S3Secrets>,
}

impl Secrets {
    pub fn from_env(provider: Provider) -> Result<Self, ConfigError> {
        Self::from_lookup(provider, |name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(provider: Provider, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::MissingVar(name))
        };

        match provider {
            Provider::Local => Ok(Secrets::default()),
            Provider::Supabase => Ok(Secrets {
                supabase_secrets: Some(SupabaseSecrets {
                    storage_url: required("SUPABASE_STORAGE_URL")?,
                    api_key: required("SUPABASE_API_KEY")?,
                    bucket_name: required("SUPABASE_BUCKET")?,
                }),
                s3_secrets: None,
            }),
            Provider::S3 => Ok(Secrets {
                supabase_secrets: None,
                s3_secrets: Some(S3Secrets {
                    endpoint: lookup("S3_ENDPOINT").filter(|v| !v.trim().is_empty()),
                    region: required("S3_REGION")?,
                    access_key_id: required("S3_ACCESS_KEY_ID")?,
                    secret_access_key: required("S3_SECRET_ACCESS_KEY")?,
                    bucket_name: required("S3_BUCKET")?,
                }),
            }),
        }
    }
}

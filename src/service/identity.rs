// service/identity.rs
use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentityError {
    #[error("identity provider call failed for {user}: {message}")]
    Call { user: String, message: String },
}

/// Narrow identity-group port. Only used to reconcile a user's externally
/// managed role; engagement authorization never depends on it directly.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn list_groups(&self, user_identifier: &str) -> Result<Vec<String>, IdentityError>;

    async fn add_to_group(
        &self,
        user_identifier: &str,
        group_name: &str,
    ) -> Result<bool, IdentityError>;
}

pub struct CognitoIdentity {
    user_pool_id: String,
    client: aws_sdk_cognitoidentityprovider::Client,
}

impl CognitoIdentity {
    pub fn new(user_pool_id: String, aws_config: &aws_config::SdkConfig) -> Self {
        Self {
            user_pool_id,
            client: aws_sdk_cognitoidentityprovider::Client::new(aws_config),
        }
    }
}

impl std::fmt::Debug for CognitoIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CognitoIdentity")
            .field("user_pool_id", &self.user_pool_id)
            .finish()
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentity {
    async fn list_groups(&self, user_identifier: &str) -> Result<Vec<String>, IdentityError> {
        let output = self
            .client
            .admin_list_groups_for_user()
            .user_pool_id(&self.user_pool_id)
            .username(user_identifier)
            .send()
            .await
            .map_err(|error| IdentityError::Call {
                user: user_identifier.to_string(),
                message: error.to_string(),
            })?;

        let groups = output
            .groups()
            .iter()
            .filter_map(|group| group.group_name().map(|name| name.to_string()))
            .collect();

        Ok(groups)
    }

    async fn add_to_group(
        &self,
        user_identifier: &str,
        group_name: &str,
    ) -> Result<bool, IdentityError> {
        self.client
            .admin_add_user_to_group()
            .user_pool_id(&self.user_pool_id)
            .username(user_identifier)
            .group_name(group_name)
            .send()
            .await
            .map_err(|error| IdentityError::Call {
                user: user_identifier.to_string(),
                message: error.to_string(),
            })?;

        tracing::info!("user {} added to group {}", user_identifier, group_name);
        Ok(true)
    }
}

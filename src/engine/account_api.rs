use super::helpers::{create, fetch_all, fetch_optional};
use super::Engine;

use async_trait::async_trait;

use crate::{
    api::AccountAPI,
    auth::User,
    entities::{new_id, Account, Profile, Registration},
    error::{invalid_input_error, unauthenticated_error, Error},
    store::Collection,
};

impl Engine {
    async fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, Error> {
        let accounts: Vec<Account> =
            fetch_all(&self.store, Collection::Users, &[("email", email)]).await?;

        Ok(accounts.into_iter().next())
    }
}

#[async_trait]
impl AccountAPI for Engine {
    #[tracing::instrument(skip(self, registration), fields(email = %registration.email))]
    async fn register(&self, registration: Registration) -> Result<Profile, Error> {
        registration.validate()?;

        if self.find_account_by_email(registration.email.trim()).await?.is_some() {
            tracing::info!("email already registered");
            return Err(invalid_input_error("email already registered"));
        }

        let account = registration.into_account(new_id());
        let account = create(&self.store, Collection::Users, &account).await?;

        Ok(account.profile())
    }

    #[tracing::instrument(skip(self, password))]
    async fn login(&self, email: &str, password: &str) -> Result<Profile, Error> {
        let account = self
            .find_account_by_email(email.trim())
            .await?
            .ok_or_else(unauthenticated_error)?;

        if account.password != password {
            tracing::info!("wrong password");
            return Err(unauthenticated_error());
        }

        Ok(account.profile())
    }

    async fn find_user(&self, id: &str) -> Result<User, Error> {
        let account: Account = fetch_optional(&self.store, Collection::Users, id)
            .await?
            .ok_or_else(unauthenticated_error)?;

        Ok(account.profile().into())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, Error> {
        let accounts: Vec<Account> = fetch_all(&self.store, Collection::Users, &[]).await?;

        Ok(accounts.iter().map(Account::profile).collect())
    }
}

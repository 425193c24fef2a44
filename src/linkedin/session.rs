use anyhow::{Context, Result};
use tracing::info;

use crate::browser::Driver;
use crate::config::Credentials;

use super::{FEED_CONTAINER, LOGIN_SUBMIT, LOGIN_URL, PASSWORD_INPUT, USERNAME_INPUT};

/// A logged-in LinkedIn browser session.
pub struct Session {
    driver: Driver,
}

impl Session {
    pub fn new(driver: Driver) -> Self {
        Self { driver }
    }

    /// Sign in with the given credentials. Any failure here is an
    /// unrecoverable startup error.
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        self.driver
            .navigate(LOGIN_URL)
            .await
            .context("opening the login page")?;
        self.driver
            .type_into(USERNAME_INPUT, &credentials.username)
            .await
            .context("entering the username")?;
        self.driver
            .type_into(PASSWORD_INPUT, &credentials.password)
            .await
            .context("entering the password")?;
        self.driver
            .click(LOGIN_SUBMIT)
            .await
            .context("submitting the login form")?;
        self.driver
            .wait_for_navigation()
            .await
            .context("waiting for the post-login redirect")?;
        info!("logged in");
        Ok(())
    }

    /// Block until the feed container has rendered.
    pub async fn await_feed(&self) -> Result<()> {
        self.driver
            .wait_for(FEED_CONTAINER)
            .await
            .context("feed did not load after login")?;
        info!("feed container loaded");
        Ok(())
    }
}

use reqwest::Method;

use super::ApiClient;
use crate::portal::error::Result;
use crate::shared::validation;
use crate::shared::{Profile, Settings};

impl ApiClient {
    /// `GET /user/profile`
    pub async fn get_profile(&self) -> Result<Profile> {
        let request = self.authed(Method::GET, &["user", "profile"])?;
        self.send_json(request, true).await
    }

    /// `PUT /user/profile`; fields are checked before anything is sent
    pub async fn update_profile(&self, profile: &Profile) -> Result<Profile> {
        validation::require("firstName", &profile.first_name)?;
        validation::require("lastName", &profile.last_name)?;
        validation::email("email", &profile.email)?;
        validation::optional_url("website", profile.website.as_deref())?;
        validation::optional_url("linkedin", profile.linkedin.as_deref())?;

        let request = self.authed(Method::PUT, &["user", "profile"])?.json(profile);
        self.send_json(request, true).await
    }

    /// `GET /user/settings`
    pub async fn get_settings(&self) -> Result<Settings> {
        let request = self.authed(Method::GET, &["user", "settings"])?;
        self.send_json(request, true).await
    }

    /// `PUT /user/settings`
    pub async fn update_settings(&self, settings: &Settings) -> Result<Settings> {
        let request = self.authed(Method::PUT, &["user", "settings"])?.json(settings);
        self.send_json(request, true).await
    }
}

use reqwest::Method;
use serde::Serialize;

use super::ApiClient;
use crate::portal::error::Result;
use crate::shared::admin::Ack;
use crate::shared::user::{LoginRequest, RegisterRequest};
use crate::shared::validation;
use crate::shared::{AuthResponse, VerifyTokenResponse};

#[derive(Serialize)]
struct ForgotPasswordRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ResetPasswordRequest<'a> {
    token: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// `POST /user/login`
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        validation::email("email", email)?;
        validation::require("password", password)?;

        let body = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let request = self.public(Method::POST, &["user", "login"])?.json(&body);
        self.send_json(request, false).await
    }

    /// `POST /user/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        validation::require("firstName", &request.first_name)?;
        validation::require("lastName", &request.last_name)?;
        validation::email("email", &request.email)?;
        validation::password("password", &request.password)?;

        let builder = self.public(Method::POST, &["user", "register"])?.json(request);
        self.send_json(builder, false).await
    }

    /// `GET /user/verify-token` with an explicit token.
    ///
    /// Not intercepted: the verifier applies its own generation-checked
    /// clear on failure.
    pub async fn verify_token(&self, token: &str) -> Result<VerifyTokenResponse> {
        let request = self.with_token(Method::GET, &["user", "verify-token"], token)?;
        self.send_json(request, false).await
    }

    /// `POST /user/forgot-password`
    pub async fn forgot_password(&self, email: &str) -> Result<Ack> {
        validation::email("email", email)?;
        let request = self
            .public(Method::POST, &["user", "forgot-password"])?
            .json(&ForgotPasswordRequest { email: email.trim() });
        self.send_json(request, false).await
    }

    /// `POST /user/reset-password`
    pub async fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<Ack> {
        validation::require("token", reset_token)?;
        validation::password("newPassword", new_password)?;
        let request = self
            .public(Method::POST, &["user", "reset-password"])?
            .json(&ResetPasswordRequest {
                token: reset_token,
                new_password,
            });
        self.send_json(request, false).await
    }
}

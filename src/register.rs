//! The registration page and its form handler.

use std::sync::Arc;

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::{NewAccount, sign_up},
    backend::BackendClient,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, base, email_input, loading_spinner, log_in_register, password_input,
        status_message, text_input,
    },
};

/// Minimum password length the identity provider accepts.
const MIN_PASSWORD_LENGTH: u8 = 6;

fn register_form(name: &str, email: &str, error_message: Option<&str>) -> Markup {
    html! {
        form
            hx-post=(endpoints::REGISTER_API)
            hx-indicator="#indicator"
            hx-disabled-elt="#name, #email, #password, #submit-button"
            class="space-y-4 md:space-y-6"
        {
            (text_input("name", "Nome", name))

            (email_input(email))

            (password_input(MIN_PASSWORD_LENGTH))

            @if let Some(error_message) = error_message {
                (status_message(error_message))
            }

            button
                type="submit" id="submit-button" tabindex="0"
                class=(BUTTON_PRIMARY_STYLE)
            {
                span class="inline htmx-indicator" id="indicator"
                {
                    (loading_spinner())
                }
                "Criar conta"
            }

            p class="text-sm font-light text-gray-500 dark:text-gray-400" {
                "Já tem uma conta? "
                a
                    href=(endpoints::LOG_IN_VIEW) tabindex="0"
                    class="font-semibold leading-6 text-blue-600 hover:text-blue-500 dark:text-blue-500 dark:hover:text-blue-400"
                {
                  "Entre aqui"
                }
            }
        }
    }
}

/// Display the registration page.
pub async fn get_register_page() -> Response {
    let register_form = register_form("", "", None);
    let content = log_in_register("Crie sua conta", &register_form);
    base("Cadastro", &[], &content).into_response()
}

/// The state needed to register a new account.
#[derive(Debug, Clone)]
pub struct RegisterState {
    /// The client for the hosted backend.
    pub backend: Arc<BackendClient>,
}

impl FromRef<AppState> for RegisterState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            backend: state.backend.clone(),
        }
    }
}

/// The raw data entered by the user in the registration form.
#[derive(Clone, Deserialize)]
pub struct RegisterData {
    /// The display name for the new account.
    pub name: String,
    /// The e-mail address to register.
    pub email: String,
    /// The password for the new account.
    pub password: String,
}

/// Handler for registration requests via the POST method.
///
/// On success the client is redirected to the log-in page. Otherwise the
/// form is returned with the provider's message in its status region.
pub async fn post_register(
    State(state): State<RegisterState>,
    Form(user_data): Form<RegisterData>,
) -> Response {
    let account = NewAccount {
        email: user_data.email.clone(),
        password: user_data.password,
        display_name: user_data.name.clone(),
    };

    match sign_up(&state.backend, &account).await {
        Ok(()) => (
            HxRedirect(endpoints::LOG_IN_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::RegistrationRejected(message)) => {
            register_form(&user_data.name, &user_data.email, Some(&message)).into_response()
        }
        Err(error) => {
            tracing::error!("Unhandled error while registering: {error}");
            register_form(
                &user_data.name,
                &user_data.email,
                Some("Ocorreu um erro interno. Tente novamente mais tarde."),
            )
            .into_response()
        }
    }
}

#[cfg(test)]
mod register_page_tests {
    use axum::http::StatusCode;

    use crate::endpoints;

    use super::get_register_page;

    #[tokio::test]
    async fn register_page_displays_form() {
        let response = get_register_page().await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let document = scraper::Html::parse_document(&String::from_utf8_lossy(&body));

        let form_selector = scraper::Selector::parse("form").unwrap();
        let forms = document.select(&form_selector).collect::<Vec<_>>();
        assert_eq!(forms.len(), 1, "want 1 form, got {}", forms.len());

        let form = forms.first().unwrap();
        assert_eq!(form.value().attr("hx-post"), Some(endpoints::REGISTER_API));

        for selector_string in [
            "input[type=text][name=name]",
            "input[type=email]",
            "input[type=password]",
        ] {
            let input_selector = scraper::Selector::parse(selector_string).unwrap();
            let inputs = form.select(&input_selector).collect::<Vec<_>>();
            assert_eq!(
                inputs.len(),
                1,
                "want 1 input matching {selector_string}, got {}",
                inputs.len()
            );
        }
    }
}

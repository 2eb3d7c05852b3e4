//! The 404 page shown for unknown routes.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

/// Display the 404 page.
pub async fn get_404_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(
            error_view(
                "Página não encontrada",
                "404",
                "Esta página não existe.",
                "Confira o endereço ou volte para o início.",
            )
            .into_string(),
        ),
    )
        .into_response()
}
